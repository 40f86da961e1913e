//! Source patching
//!
//! Existing project files are edited in place by locating anchor lines and
//! inserting or removing line ranges. Every patch is written so that running
//! it again on its own output changes nothing.

pub mod app;
pub mod auth;
pub mod routes;

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use similar::TextDiff;

use crate::error::{RadminError, Result};
use crate::format::SourceFormatter;

pub use app::{copy_database_url, patch_app_styles, patch_redwood_title};
pub use auth::{append_auth_model, patch_auth_function, patch_auth_lib};
pub use routes::{patch_routes, ModelRoutes};

/// A text file held as lines while it is being patched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    original: String,
    lines: Vec<String>,
}

impl SourceFile {
    /// Create a document for `path` from `content` without touching the disk
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, content: &str) -> Self {
        Self {
            path: path.into(),
            original: content.to_string(),
            lines: split_lines(content),
        }
    }

    /// Read `path`
    ///
    /// # Errors
    ///
    /// Returns [`RadminError::NotFound`] if the file does not exist, or an
    /// I/O error if it cannot be read.
    pub fn read(path: &Path, what: &'static str) -> Result<Self> {
        if !path.is_file() {
            return Err(RadminError::NotFound {
                what,
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|err| RadminError::io(path, err))?;
        Ok(Self::new(path, &content))
    }

    /// Read `path`, treating a missing file as empty
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file exists but cannot be read.
    pub fn read_or_empty(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|err| RadminError::io(path, err))?;
            Ok(Self::new(path, &content))
        } else {
            Ok(Self::new(path, ""))
        }
    }

    /// Path the document was read from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current lines
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Current content
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Whether the content differs from what was read
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.text() != self.original
    }

    /// Whether any line contains `needle`
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }

    /// Index of the first line matching `pattern`
    #[must_use]
    pub fn find_first(&self, pattern: &Regex) -> Option<usize> {
        self.find_first_from(0, pattern)
    }

    /// Index of the first line at or after `start` matching `pattern`
    #[must_use]
    pub fn find_first_from(&self, start: usize, pattern: &Regex) -> Option<usize> {
        self.lines
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, line)| pattern.is_match(line))
            .map(|(index, _)| index)
    }

    /// Index of the last line matching `pattern`
    #[must_use]
    pub fn find_last(&self, pattern: &Regex) -> Option<usize> {
        self.lines.iter().rposition(|line| pattern.is_match(line))
    }

    /// Line at `index`
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Insert `lines` before `index`; an index past the end appends
    pub fn insert<I, S>(&mut self, index: usize, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = index.min(self.lines.len());
        self.lines
            .splice(index..index, lines.into_iter().map(Into::into));
    }

    /// Replace the line at `index` with `lines`
    pub fn replace_line<I, S>(&mut self, index: usize, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if index < self.lines.len() {
            self.lines
                .splice(index..=index, lines.into_iter().map(Into::into));
        }
    }

    /// Append `lines`, keeping a trailing newline if the file had one
    pub fn append<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = if self.lines.last().is_some_and(String::is_empty) {
            self.lines.len() - 1
        } else {
            self.lines.len()
        };
        self.insert(index, lines);
    }

    /// Drop every line matching `predicate`, returning how many were dropped
    pub fn remove_lines(&mut self, mut predicate: impl FnMut(&str) -> bool) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| !predicate(line));
        before - self.lines.len()
    }

    /// Remove the region from the first line containing `open` through the
    /// next line containing `close`
    ///
    /// Returns whether a region was removed. An opening marker without a
    /// closing one is left alone.
    pub fn remove_region(&mut self, open: &str, close: &str) -> bool {
        let Some(start) = self.lines.iter().position(|line| line.contains(open)) else {
            return false;
        };
        let Some(end) = self.lines[start..]
            .iter()
            .position(|line| line.contains(close))
            .map(|offset| start + offset)
        else {
            return false;
        };

        self.lines.drain(start..=end);
        true
    }

    /// Replace every occurrence of `from` with `to` across the whole text
    pub fn replace_all(&mut self, from: &str, to: &str) {
        let text = self.text();
        if text.contains(from) {
            self.lines = split_lines(&text.replace(from, to));
        }
    }

    /// Run `formatter` over the current content
    ///
    /// # Errors
    ///
    /// Returns the formatter's error.
    pub fn format_with(&mut self, formatter: &dyn SourceFormatter) -> Result<()> {
        let file_name = self.path.to_string_lossy().into_owned();
        let formatted = formatter.format(&self.text(), &file_name)?;
        self.lines = split_lines(&formatted);
        Ok(())
    }

    /// Write the document back if it changed
    ///
    /// The change is logged as a unified diff at debug level. Returns whether
    /// anything was written.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn write(&self) -> Result<bool> {
        let text = self.text();
        if text == self.original {
            tracing::debug!(path = %self.path.display(), "unchanged");
            return Ok(false);
        }

        let name = self.path.display().to_string();
        let diff = TextDiff::from_lines(&self.original, &text);
        let mut unified = diff.unified_diff();
        unified.context_radius(2).header(&name, &name);
        tracing::debug!(path = %name, diff = %unified, "patched");

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| RadminError::io(parent, err))?;
        }
        fs::write(&self.path, &text).map_err(|err| RadminError::io(&self.path, err))?;
        Ok(true)
    }
}

/// Leading whitespace of `line`
#[must_use]
pub fn indent_of(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

fn split_lines(content: &str) -> Vec<String> {
    content.split('\n').map(str::to_string).collect()
}
