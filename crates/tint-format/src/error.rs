//! Error types for the tint-format crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing TINT-family files.
#[derive(Debug, Error)]
pub enum TintError {
    /// Underlying I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that could not be opened.
        path: PathBuf,
    },

    /// Structural problem in a header, label block or spike data stream.
    #[error("format error: {message}")]
    Format {
        /// Human-readable description of the problem.
        message: String,
    },

    /// The native sample rate does not evenly divide the TINT timebase.
    #[error("sample rate {sample_rate} hz does not divide the {timebase} hz timebase")]
    UnsupportedRate {
        /// Native sample rate of the recording.
        sample_rate: u32,
        /// The fixed tetrode-file timebase.
        timebase: u32,
    },
}

impl TintError {
    /// Build a `Format` error from anything printable.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Prefix a `Format` error with the file it came from, leaving other
    /// variants untouched.
    pub(crate) fn with_path(self, path: &std::path::Path) -> Self {
        match self {
            Self::Format { message } => Self::Format {
                message: format!("{}: {message}", path.display()),
            },
            other => other,
        }
    }
}

/// Result type for TINT format operations.
pub type Result<T> = std::result::Result<T, TintError>;
