//! Error types for the tint-assess crate.

use std::path::PathBuf;

use thiserror::Error;
use tint_format::TintError;

/// Errors raised while matching timestamp series or comparing exports.
#[derive(Debug, Error)]
pub enum AssessError {
    /// Metrics were requested over zero matched buckets.
    #[error("no matched spike buckets to summarize")]
    EmptyInput,

    /// A specific group had zero matched buckets during a comparison.
    #[error("group {group}: no matched spike buckets to summarize")]
    EmptyGroup {
        /// 0-indexed channel group.
        group: u32,
    },

    /// No tetrode files were found next to the given `.set` file.
    #[error("no tetrode files found next to {path}")]
    NoTetrodeFiles {
        /// The `.set` file whose siblings were scanned.
        path: PathBuf,
    },

    /// A tetrode file could not be read or decoded.
    #[error("group {group}: {source}")]
    Tetrode {
        /// 0-indexed channel group.
        group: u32,
        /// Underlying codec error.
        source: TintError,
    },

    /// Underlying I/O failure while scanning for tetrode files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for assessment operations.
pub type Result<T> = std::result::Result<T, AssessError>;
