//! Error types for pdfshelf.
//!
//! Every fallible operation in the library returns [`ShelfError`]. The
//! variants fall into four groups that the HTTP layer maps onto status codes:
//!
//! - **Validation**: missing or malformed input, wrong extension
//! - **Not found**: a referenced stored file does not exist
//! - **Conflict**: a target name is already taken
//! - **Internal**: PDF library or filesystem failures
//!
//! Metadata and text extraction failures never surface here; see
//! [`crate::metadata`].

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfshelf operations.
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Main error type for pdfshelf operations.
#[derive(Debug, thiserror::Error)]
pub enum ShelfError {
    /// Request input was missing or malformed.
    #[error("{message}")]
    Validation {
        /// Message shown to the caller.
        message: String,
    },

    /// A stored file (or merge input) does not exist.
    #[error("{message}")]
    NotFound {
        /// Message shown to the caller.
        message: String,
    },

    /// The requested target name already exists.
    #[error("{message}")]
    Conflict {
        /// Message shown to the caller.
        message: String,
    },

    /// Failed to load a PDF for merging.
    #[error("{reason}")]
    FailedToLoadPdf {
        /// Path to the PDF file.
        path: PathBuf,
        /// Message reported by the PDF library.
        reason: String,
    },

    /// Merge operation failed.
    #[error("{reason}")]
    MergeFailed {
        /// Message reported by the PDF library.
        reason: String,
    },

    /// Failed to write an output file.
    #[error("Failed to write {}: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },
}

impl From<lopdf::Error> for ShelfError {
    fn from(err: lopdf::Error) -> Self {
        Self::merge_failed(err.to_string())
    }
}

impl ShelfError {
    /// Create a Validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a NotFound error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a Conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path,
            reason: reason.into(),
        }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// HTTP status code for this error.
    ///
    /// Conflicts are reported as 400, matching the rest of the validation
    /// family.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Conflict { .. } => 400,
            Self::NotFound { .. } => 404,
            Self::FailedToLoadPdf { .. } => 500,
            Self::MergeFailed { .. } => 500,
            Self::FailedToWrite { .. } => 500,
            Self::InvalidConfig { .. } => 500,
            Self::Io { .. } => 500,
        }
    }
}
