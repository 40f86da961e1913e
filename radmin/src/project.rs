//! Target project layout
//!
//! Every path the generator reads or writes is derived from the project root
//! through [`ProjectLayout`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RadminError, Result};
use crate::format::SourceFormatter;
use crate::patch::SourceFile;
use crate::scaffold::GeneratedFile;

/// Redwood config file marking a project root
pub const REDWOOD_TOML: &str = "redwood.toml";

/// Prisma schema, relative to the project root
pub const SCHEMA_PATH: &str = "api/db/schema.prisma";

/// A Redwood project on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    /// Open the project at `path`
    ///
    /// # Errors
    ///
    /// Returns [`RadminError::NotFound`] if `path` has no `redwood.toml`.
    pub fn open(path: &Path) -> Result<Self> {
        let marker = path.join(REDWOOD_TOML);
        if !marker.is_file() {
            return Err(RadminError::NotFound {
                what: "a Redwood project (redwood.toml)",
                path: marker,
            });
        }

        let root = path.canonicalize().map_err(|err| RadminError::io(path, err))?;
        tracing::debug!(root = %root.display(), "opened project");
        Ok(Self { root })
    }

    /// Project root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// App name: the last component of the project root
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the root has no usable last component.
    pub fn app_name(&self) -> Result<String> {
        self.root
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .map(ToString::to_string)
            .ok_or_else(|| {
                RadminError::Config(format!(
                    "Could not derive an app name from {}",
                    self.root.display()
                ))
            })
    }

    /// Absolute path of `relative`
    #[must_use]
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Path of the Prisma schema
    #[must_use]
    pub fn schema_path(&self) -> PathBuf {
        self.path(SCHEMA_PATH)
    }

    /// Read a project file for patching
    ///
    /// # Errors
    ///
    /// Returns [`RadminError::NotFound`] if the file does not exist.
    pub fn read(&self, relative: &str, what: &'static str) -> Result<SourceFile> {
        SourceFile::read(&self.path(relative), what)
    }

    /// Delete `relative` with everything in it and create it empty
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be removed or created.
    pub fn reset_dir(&self, relative: &str) -> Result<PathBuf> {
        let dir = self.path(relative);
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(|err| RadminError::io(&dir, err))?;
        }
        fs::create_dir_all(&dir).map_err(|err| RadminError::io(&dir, err))?;

        tracing::debug!(dir = %dir.display(), "reset directory");
        Ok(dir)
    }

    /// Format and write a generated file, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns an error if formatting fails or the file cannot be written.
    pub fn write_generated(&self, file: &GeneratedFile, formatter: &dyn SourceFormatter) -> Result<PathBuf> {
        let full_path = self.path(&file.path);
        let content = formatter.format(&file.content, &file.path.to_string_lossy())?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|err| RadminError::io(parent, err))?;
        }
        fs::write(&full_path, content).map_err(|err| RadminError::io(&full_path, err))?;

        Ok(full_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Passthrough;
    use tempfile::tempdir;

    fn project() -> (tempfile::TempDir, ProjectLayout) {
        let dir = tempdir().unwrap();
        let root = dir.path().join("store-admin");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join(REDWOOD_TOML), "[web]\n").unwrap();
        let layout = ProjectLayout::open(&root).unwrap();
        (dir, layout)
    }

    #[test]
    fn test_open_requires_redwood_toml() {
        let dir = tempdir().unwrap();
        let err = ProjectLayout::open(dir.path()).unwrap_err();
        assert!(matches!(err, RadminError::NotFound { .. }));
    }

    #[test]
    fn test_app_name_is_last_component() {
        let (_dir, layout) = project();
        assert_eq!(layout.app_name().unwrap(), "store-admin");
    }

    #[test]
    fn test_reset_dir_empties_directory() {
        let (_dir, layout) = project();
        let pages = layout.reset_dir("web/src/pages/Radmin").unwrap();
        fs::write(pages.join("stale.tsx"), "x").unwrap();

        layout.reset_dir("web/src/pages/Radmin").unwrap();
        assert!(pages.is_dir());
        assert_eq!(fs::read_dir(&pages).unwrap().count(), 0);
    }

    #[test]
    fn test_write_generated_creates_parents() {
        let (_dir, layout) = project();
        let file = GeneratedFile::new("web/src/lib/radminFormatters.tsx", "export {}\n".to_string(), "formatters");
        let path = layout.write_generated(&file, &Passthrough).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "export {}\n");
    }
}
