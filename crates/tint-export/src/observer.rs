//! Progress reporting for export runs.
//!
//! Completion of each channel group is reported through an injectable
//! observer instead of being printed by the codec layer, so embedding
//! applications can drive their own progress UI.

use std::path::PathBuf;

use tracing::info;

use crate::source::GroupId;

/// What was written for one channel group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupExportReport {
    /// 0-indexed channel group.
    pub group: GroupId,
    /// The tetrode waveform file.
    pub tetrode_path: PathBuf,
    /// The `.cut` label file.
    pub cut_path: PathBuf,
    /// The `.clu` label file.
    pub clu_path: PathBuf,
    /// Units exported on this group.
    pub n_units: usize,
    /// Spikes written to the tetrode file.
    pub n_spikes: usize,
}

/// Callback invoked as groups finish exporting.
pub trait ExportObserver {
    /// One channel group's files have been written.
    fn group_exported(&self, report: &GroupExportReport);
}

/// Observer that reports through the `tracing` facade. Used by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ExportObserver for TracingObserver {
    fn group_exported(&self, report: &GroupExportReport) {
        info!(
            group = report.group,
            tetrode = %report.tetrode_path.display(),
            n_units = report.n_units,
            n_spikes = report.n_spikes,
            "group exported"
        );
    }
}
