//! Small project-level patches: styles import, app title and database URL

use regex::Regex;

use super::SourceFile;
use crate::error::{RadminError, Result};

/// App component, relative to the project root
pub const APP_PATH: &str = "web/src/App.tsx";

/// Redwood config, relative to the project root
pub const REDWOOD_TOML_PATH: &str = "redwood.toml";

/// Env file, relative to the project root
pub const ENV_PATH: &str = ".env";

const INDEX_CSS_IMPORT: &str = "import './index.css'";
const RADMIN_CSS_IMPORT: &str = "import './radmin.css'";
const DEFAULT_TITLE: &str = "Redwood App";
const DATABASE_URL_PREFIX: &str = "DATABASE_URL=";

/// Import the admin stylesheet ahead of the app's own styles
///
/// # Errors
///
/// Returns an anchor error if the app does not import `./index.css`.
pub fn patch_app_styles(file: &mut SourceFile) -> Result<()> {
    if file.contains(RADMIN_CSS_IMPORT) {
        return Ok(());
    }

    let index = file
        .lines()
        .iter()
        .position(|line| line.trim() == INDEX_CSS_IMPORT)
        .ok_or_else(|| RadminError::anchor(INDEX_CSS_IMPORT, file.path()))?;

    file.insert(index, [RADMIN_CSS_IMPORT]);
    Ok(())
}

/// Replace the default `[web] title` with the app name
///
/// A title the user already changed is left alone.
///
/// # Errors
///
/// Returns a configuration error if the file is not valid TOML.
pub fn patch_redwood_title(file: &mut SourceFile, app_name: &str) -> Result<()> {
    let config: toml::Table = file.text().parse().map_err(|err: toml::de::Error| {
        RadminError::Config(format!("{}: {}", file.path().display(), err.message()))
    })?;

    let title = config
        .get("web")
        .and_then(|web| web.get("title"))
        .and_then(toml::Value::as_str);

    if title != Some(DEFAULT_TITLE) {
        tracing::debug!(?title, "keeping app title");
        return Ok(());
    }

    let title_line = Regex::new(r#"^(\s*)title\s*=\s*"Redwood App"\s*$"#)?;
    if let Some(index) = file.find_first(&title_line) {
        let line = file.lines()[index].replace(DEFAULT_TITLE, app_name);
        file.replace_line(index, [line]);
    }

    Ok(())
}

/// Copy the `DATABASE_URL` line from `source` into `target` when it has none
///
/// Returns whether the target changed.
///
/// # Errors
///
/// Returns an anchor error if the source has no `DATABASE_URL`.
pub fn copy_database_url(source: &SourceFile, target: &mut SourceFile) -> Result<bool> {
    let url = source
        .lines()
        .iter()
        .find(|line| line.starts_with(DATABASE_URL_PREFIX))
        .ok_or_else(|| RadminError::anchor("a DATABASE_URL", source.path()))?;

    if target
        .lines()
        .iter()
        .any(|line| line.starts_with(DATABASE_URL_PREFIX))
    {
        return Ok(false);
    }

    target.append([url.clone()]);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const APP: &str = "import { RedwoodProvider } from '@redwoodjs/web'

import './scaffold.css'
import './index.css'

const App = () => <RedwoodProvider />
";

    #[test]
    fn test_radmin_css_before_index_css() {
        let mut file = SourceFile::new(APP_PATH, APP);
        patch_app_styles(&mut file).unwrap();
        assert!(file
            .text()
            .contains("import './scaffold.css'\nimport './radmin.css'\nimport './index.css'\n"));

        let once = file.text();
        let mut file = SourceFile::new(APP_PATH, &once);
        patch_app_styles(&mut file).unwrap();
        assert!(!file.is_changed());
    }

    #[test]
    fn test_missing_index_css_is_anchor_error() {
        let mut file = SourceFile::new(APP_PATH, "const App = () => null\n");
        assert!(matches!(
            patch_app_styles(&mut file),
            Err(RadminError::Anchor { .. })
        ));
    }

    #[test]
    fn test_default_title_replaced() {
        let toml = "[web]\n  title = \"Redwood App\"\n  port = 8910\n[api]\n  port = 8911\n";
        let mut file = SourceFile::new(REDWOOD_TOML_PATH, toml);
        patch_redwood_title(&mut file, "store-admin").unwrap();
        assert_eq!(
            file.text(),
            "[web]\n  title = \"store-admin\"\n  port = 8910\n[api]\n  port = 8911\n"
        );
    }

    #[test]
    fn test_custom_title_kept() {
        let toml = "[web]\n  title = \"My Shop\"\n";
        let mut file = SourceFile::new(REDWOOD_TOML_PATH, toml);
        patch_redwood_title(&mut file, "store-admin").unwrap();
        assert!(!file.is_changed());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let mut file = SourceFile::new(REDWOOD_TOML_PATH, "[web\n");
        assert!(matches!(
            patch_redwood_title(&mut file, "x"),
            Err(RadminError::Config(_))
        ));
    }

    #[test]
    fn test_database_url_appended() {
        let source = SourceFile::new(".env", "# db\nDATABASE_URL=postgres://localhost/store\n");
        let mut target = SourceFile::new(ENV_PATH, "SESSION_SECRET=abc\n");
        assert!(copy_database_url(&source, &mut target).unwrap());
        assert_eq!(
            target.text(),
            "SESSION_SECRET=abc\nDATABASE_URL=postgres://localhost/store\n"
        );
        assert!(!copy_database_url(&source, &mut target).unwrap());
    }

    #[test]
    fn test_database_url_into_missing_env() {
        let source = SourceFile::new(".env", "DATABASE_URL=file:./dev.db\n");
        let mut target = SourceFile::new(ENV_PATH, "");
        copy_database_url(&source, &mut target).unwrap();
        assert_eq!(target.text(), "DATABASE_URL=file:./dev.db\n");
    }

    #[test]
    fn test_database_url_without_trailing_newline() {
        let source = SourceFile::new(".env", "DATABASE_URL=x");
        let mut target = SourceFile::new(ENV_PATH, "A=1");
        copy_database_url(&source, &mut target).unwrap();
        assert_eq!(target.text(), "A=1\nDATABASE_URL=x");
    }

    #[test]
    fn test_source_without_database_url_is_error() {
        let source = SourceFile::new(".env", "A=1\n");
        let mut target = SourceFile::new(ENV_PATH, "");
        assert!(copy_database_url(&source, &mut target).is_err());
    }
}
