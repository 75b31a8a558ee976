//! Error handling for Tablekit
//!
//! Provides the error types for every layer of the editor:
//! - Scene errors (reading, writing and parsing scene documents)
//! - The unified `Error` used in public APIs that span layers
//!
//! All error types use `thiserror`. Texture problems are deliberately not
//! errors: a missing image degrades to an invalid texture and a warning.

use std::path::PathBuf;
use thiserror::Error;

/// Scene persistence error type
///
/// Represents failures while moving a scene between memory and a JSON
/// document. A failed load never leaves the scene half-modified.
#[derive(Error, Debug)]
pub enum SceneError {
    /// The scene file could not be read
    #[error("Failed to read scene file {path}: {source}")]
    Read {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The scene file could not be written
    #[error("Failed to write scene file {path}: {source}")]
    Write {
        /// The file that was being written.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or does not match the scene schema
    #[error("Malformed scene document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but carries a value the scene cannot accept
    #[error("Invalid scene document: {reason}")]
    InvalidDocument {
        /// What was wrong with the document.
        reason: String,
    },

    /// An operation needed a file path but the scene was never saved
    #[error("Scene has no file path")]
    NoFilePath,
}

impl SceneError {
    /// Create an invalid-document error from a message
    pub fn invalid(reason: impl Into<String>) -> Self {
        SceneError::InvalidDocument {
            reason: reason.into(),
        }
    }

    /// Check if this error came from the file system rather than the content
    pub fn is_io_error(&self) -> bool {
        matches!(self, SceneError::Read { .. } | SceneError::Write { .. })
    }
}

/// Main error type for Tablekit
///
/// A unified error type that can represent any error from the core layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Scene persistence error
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Image decoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
