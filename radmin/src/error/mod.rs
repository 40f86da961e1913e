//! Error types and error handling
//!
//! Every failure in a generator run is fatal. The variants group failures by
//! where they come from so the CLI can print a useful diagnostic before it
//! exits with a non-zero status.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T, E = RadminError> = std::result::Result<T, E>;

/// Generator error type
#[derive(Debug, Error)]
pub enum RadminError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// The project root, schema file or another required location is missing
    #[error("Could not find {what} at {}", path.display())]
    NotFound {
        /// What was being looked for
        what: &'static str,
        /// Where it was expected
        path: PathBuf,
    },

    /// The Prisma schema could not be parsed
    #[error("Schema parse error on line {line}: {message}")]
    SchemaParse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// The schema is internally inconsistent or lacks something the generator needs
    #[error("Schema error: {0}")]
    Schema(String),

    /// An external command could not be started or exited unsuccessfully
    #[error("Command `{command}` failed: {reason}")]
    Process {
        /// The command line that was run
        command: String,
        /// Exit status or spawn error
        reason: String,
    },

    /// A patch could not find the text it anchors on
    #[error("Could not find {anchor} in {}", path.display())]
    Anchor {
        /// Description of the missing anchor
        anchor: String,
        /// File being patched
        path: PathBuf,
    },

    /// Template rendering failed
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// A line pattern failed to compile
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// File system error
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl RadminError {
    /// Build a schema consistency error
    #[must_use]
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Build an anchor error for `path`
    #[must_use]
    pub fn anchor(anchor: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Anchor {
            anchor: anchor.into(),
            path: path.into(),
        }
    }

    /// Wrap an I/O error with the path it happened on
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_message_names_file() {
        let err = RadminError::anchor("@redwoodjs/router import", "web/src/Routes.tsx");
        assert_eq!(
            err.to_string(),
            "Could not find @redwoodjs/router import in web/src/Routes.tsx"
        );
    }

    #[test]
    fn test_parse_error_has_line() {
        let err = RadminError::SchemaParse {
            line: 12,
            message: "unterminated block".to_string(),
        };
        assert!(err.to_string().contains("line 12"));
    }
}
