//! Spike-timestamp reconciliation for TINT exports.
//!
//! After a sorted recording has been written back to tetrode files, it is
//! useful to check how well the sorter-detected spike times line up with
//! the threshold-detected times of the original acquisition. This crate
//! provides:
//!
//! - a greedy windowed matcher pairing two ascending timestamp series
//!   within a tolerance ([`match_timestamps`]),
//! - summary statistics over the matched pairs ([`summarize`]),
//! - a file-level driver comparing two on-disk exports group by group
//!   ([`compare_exports`]).

mod compare;
mod error;
mod matcher;
mod metrics;

pub use compare::{
    CompareOptions, GroupComparison, compare_exports, compare_group, discover_tetrode_groups,
};
pub use error::{AssessError, Result};
pub use matcher::{
    DEFAULT_TOLERANCE, MatchBucket, MatchOutcome, MatchedSpike, match_timestamps,
};
pub use metrics::{SpikeMetrics, summarize};
