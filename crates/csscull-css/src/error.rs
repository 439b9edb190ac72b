//! Error types for loading stylesheets.
//!
//! Parse problems are never errors here: they are
//! [`Diagnostic`](csscull_common::Diagnostic)s inside a
//! [`ParseResult`](crate::ParseResult). Only failing to get at the text is.

use std::path::PathBuf;

/// Result type alias for stylesheet loading.
pub type Result<T> = std::result::Result<T, CssError>;

/// Errors that can occur while loading a stylesheet.
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    /// The stylesheet could not be read.
    #[error("failed to read stylesheet '{}': {source}", .path.display())]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl CssError {
    /// Create an I/O error.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
