//! Source formatting for generated files
//!
//! Rendered templates are normalized by the project's own Prettier install so
//! the output matches the style of a freshly generated Redwood project.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::process::CommandRunner;

/// Which formatter to run over generated sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatterKind {
    /// Run Prettier through the package manager (default)
    #[default]
    Prettier,
    /// Write sources exactly as rendered
    None,
}

/// Formats one generated source file
pub trait SourceFormatter {
    /// Format `source`; `file_name` selects the parser (`.ts`, `.tsx`, `.css`)
    ///
    /// # Errors
    ///
    /// Returns an error if the formatter cannot run or rejects the source.
    fn format(&self, source: &str, file_name: &str) -> Result<String>;
}

/// Leaves sources untouched
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl SourceFormatter for Passthrough {
    fn format(&self, source: &str, _file_name: &str) -> Result<String> {
        Ok(source.to_string())
    }
}

/// Prettier options used for all generated sources
const PRETTIER_OPTIONS: &[&str] = &[
    "--trailing-comma",
    "es5",
    "--bracket-spacing",
    "--tab-width",
    "2",
    "--no-semi",
    "--single-quote",
    "--arrow-parens",
    "always",
];

/// Runs `<package manager> prettier --stdin-filepath <file>` in the project
pub struct Prettier<'a> {
    runner: &'a dyn CommandRunner,
    package_manager: String,
    cwd: PathBuf,
}

impl<'a> Prettier<'a> {
    /// Create a formatter that runs inside `cwd`
    #[must_use]
    pub fn new(runner: &'a dyn CommandRunner, package_manager: impl Into<String>, cwd: &Path) -> Self {
        Self {
            runner,
            package_manager: package_manager.into(),
            cwd: cwd.to_path_buf(),
        }
    }
}

impl SourceFormatter for Prettier<'_> {
    fn format(&self, source: &str, file_name: &str) -> Result<String> {
        let mut args = vec!["prettier", "--stdin-filepath", file_name];
        args.extend_from_slice(PRETTIER_OPTIONS);
        self.runner.pipe(&self.cwd, &self.package_manager, &args, source)
    }
}

/// Build the formatter selected by `kind`
#[must_use]
pub fn formatter_for<'a>(
    kind: FormatterKind,
    runner: &'a dyn CommandRunner,
    package_manager: &str,
    cwd: &Path,
) -> Box<dyn SourceFormatter + 'a> {
    match kind {
        FormatterKind::Prettier => Box::new(Prettier::new(runner, package_manager, cwd)),
        FormatterKind::None => Box::new(Passthrough),
    }
}
