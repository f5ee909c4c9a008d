//! Error types for the tint-export crate.

use std::path::PathBuf;

use thiserror::Error;
use tint_format::TintError;

use crate::source::GroupId;

/// Errors raised while orchestrating an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The sources cannot be wired together as configured.
    #[error("configuration error: {message}")]
    Configuration {
        /// Human-readable description of the problem.
        message: String,
    },

    /// A codec failure outside any particular group (e.g. the `.set` file).
    #[error(transparent)]
    Format(#[from] TintError),

    /// A codec failure while writing one group's tetrode file.
    #[error("group {group}: {path}: {source}")]
    Group {
        /// 0-indexed channel group.
        group: GroupId,
        /// File being written.
        path: PathBuf,
        /// Underlying codec error.
        source: TintError,
    },

    /// A label file could not be written.
    #[error("group {group}: {path}: {source}")]
    Io {
        /// 0-indexed channel group.
        group: GroupId,
        /// File being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A collaborator source failed while producing data for one group.
    #[error("group {group}: source error: {source}")]
    Source {
        /// 0-indexed channel group.
        group: GroupId,
        /// Error reported by the collaborator.
        source: anyhow::Error,
    },
}

impl ExportError {
    /// Build a `Configuration` error from anything printable.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
