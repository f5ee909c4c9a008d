//! TINT export orchestration.
//!
//! This crate sequences the per-tetrode export of a spike-sorted recording
//! into the TINT format family. The raw recording and the sorting result
//! live behind the [`RecordingSource`] and [`SortingSource`] traits; the
//! actual file encoding lives in `tint-format`. For each channel group the
//! exporter writes the tetrode waveform file (`<base>.<n>`) and the
//! `.cut`/`.clu` label files (`<base>_<n>.cut`, `<base>_<n>.clu`) next to
//! the session's `.set` file.
//!
//! # Example
//!
//! ```ignore
//! use tint_export::{ExportOptions, TintExporter};
//!
//! let exporter = TintExporter::new(&recording, &sorting, "session.set", ExportOptions::new())?;
//! let summary = exporter.export()?;
//! for report in &summary.groups {
//!     println!("tetrode {}: {} spikes", report.group + 1, report.n_spikes);
//! }
//! ```

mod error;
mod export;
mod observer;
mod options;
mod source;

pub use error::{ExportError, Result};
pub use export::{ExportSummary, TintExporter};
pub use observer::{ExportObserver, GroupExportReport, TracingObserver};
pub use options::{DEFAULT_GROUP_PROPERTY, ExportOptions};
pub use source::{GroupId, RecordingSource, SortingSource, UnitId, WaveformWindow};
