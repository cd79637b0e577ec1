//! Error types for mesh loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for mesh loading operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while loading a mesh.
#[derive(Debug, Error)]
pub enum IoError {
    /// The mesh source could not be opened.
    ///
    /// [`load_mesh`](crate::load_mesh) recovers from this by returning an
    /// empty mesh; [`try_load_mesh`](crate::try_load_mesh) surfaces it.
    #[error("mesh source unavailable: {path}: {source}")]
    SourceUnavailable {
        /// Path that could not be opened.
        path: PathBuf,
        /// Underlying open error.
        source: std::io::Error,
    },

    /// Malformed vector or index text.
    #[error("parse error{}: {message}", line_suffix(.line))]
    Parse {
        /// 1-based source line, when the text came from a mesh source.
        line: Option<usize>,
        /// Description of what was malformed.
        message: String,
    },

    /// I/O error while reading an already opened source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    /// Create a `Parse` error not tied to a source line.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            line: None,
            message: message.into(),
        }
    }

    /// Attach a 1-based source line to a `Parse` error.
    ///
    /// Other variants are returned unchanged.
    #[must_use]
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Self::Parse { message, .. } => Self::Parse {
                line: Some(line),
                message,
            },
            other => other,
        }
    }
}

#[allow(clippy::ref_option)] // thiserror passes fields by reference
fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {l}")).unwrap_or_default()
}
