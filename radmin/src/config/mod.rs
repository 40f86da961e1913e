//! Configuration management for radmin
//!
//! Configuration is merged from several sources, later sources winning:
//!
//! 1. Hardcoded defaults
//! 2. `~/.config/radmin/config.toml` (user config, XDG)
//! 3. `<project>/radmin.toml`
//! 4. Environment variables (`RADMIN_` prefix)
//!
//! # Example Configuration
//!
//! ```toml
//! # radmin.toml
//! source_project = "../store"
//! package_manager = "yarn"
//! formatter = "prettier"
//! install_packages = true
//! per_page = 10
//! ```

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{RadminError, Result};
use crate::format::FormatterKind;

/// Name of the per-project configuration file
pub const CONFIG_FILE_NAME: &str = "radmin.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "RADMIN_";

/// Complete radmin configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadminConfig {
    /// Project whose schema and database the admin panel is built for.
    ///
    /// When unset, the target project's own schema is used and no auth model
    /// migration or `.env` copy happens. Relative paths are resolved against
    /// the target project.
    pub source_project: Option<PathBuf>,

    /// Package manager used to run framework commands
    pub package_manager: String,

    /// How generated sources are formatted before they are written
    pub formatter: FormatterKind,

    /// Install the web packages the generated components import
    pub install_packages: bool,

    /// Rows per page in generated list views
    pub per_page: u32,
}

impl Default for RadminConfig {
    fn default() -> Self {
        Self {
            source_project: None,
            package_manager: "yarn".to_string(),
            formatter: FormatterKind::Prettier,
            install_packages: true,
            per_page: 10,
        }
    }
}

impl RadminConfig {
    /// Load configuration for the project at `project_root`
    ///
    /// # Errors
    ///
    /// Returns [`RadminError::Config`] if a configuration file is malformed or
    /// a value has the wrong type.
    pub fn load(project_root: &Path) -> Result<Self> {
        let figment = Self::file_figment(
            Self::user_config_path().as_deref(),
            &project_root.join(CONFIG_FILE_NAME),
        )
        .merge(Env::prefixed(ENV_PREFIX));

        Self::extract(&figment, project_root)
    }

    /// Load configuration from explicit files only, ignoring the environment
    ///
    /// # Errors
    ///
    /// Returns [`RadminError::Config`] if a file is malformed.
    pub fn load_files(user_config: Option<&Path>, project_config: &Path, project_root: &Path) -> Result<Self> {
        Self::extract(&Self::file_figment(user_config, project_config), project_root)
    }

    /// Get the XDG location of the user configuration file
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("radmin").join("config.toml"))
    }

    fn file_figment(user_config: Option<&Path>, project_config: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(user_config) = user_config {
            figment = figment.merge(Toml::file(user_config));
        }
        figment.merge(Toml::file(project_config))
    }

    fn extract(figment: &Figment, project_root: &Path) -> Result<Self> {
        let mut config: Self = figment
            .extract()
            .map_err(|err| RadminError::Config(err.to_string()))?;

        if config.package_manager.trim().is_empty() {
            return Err(RadminError::Config(
                "package_manager must not be empty".to_string(),
            ));
        }
        if config.per_page == 0 {
            return Err(RadminError::Config(
                "per_page must be at least 1".to_string(),
            ));
        }

        config.source_project = config
            .source_project
            .map(|source| if source.is_relative() { project_root.join(source) } else { source });

        Ok(config)
    }
}
