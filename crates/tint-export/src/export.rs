//! Per-tetrode export orchestration.
//!
//! The exporter walks the channel groups the sorting assigns units to and,
//! for each group, writes the tetrode waveform file and the `.cut`/`.clu`
//! label files next to the session's `.set` file. Only this module touches
//! the external Recording/Sorting Source collaborators; all file encoding
//! is delegated to `tint-format`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info_span, warn};

use tint_format::{
    Header, SAMPLES_PER_SPIKE, SpikeEvent, SpikeWaveform, clu_path, cut_path, encode_clu,
    encode_cut, parse_set_fields, read_set_header, tetrode_path, unit_labels_from_trains,
    write_tetrode_file,
};

use crate::error::{ExportError, Result};
use crate::observer::{ExportObserver, GroupExportReport, TracingObserver};
use crate::options::ExportOptions;
use crate::source::{GroupId, RecordingSource, SortingSource, UnitId, WaveformWindow};

/// Outcome of an export run.
///
/// Group failures are isolated: a failing group leaves its entry in
/// `errors` (with file path and group id) and does not block siblings.
/// Partially written files of a failed group are left on disk for the
/// caller to inspect or delete.
#[derive(Debug, Default)]
pub struct ExportSummary {
    /// Successfully exported groups, ordered by group id.
    pub groups: Vec<GroupExportReport>,
    /// Per-group failures, in group order.
    pub errors: Vec<ExportError>,
}

impl ExportSummary {
    /// True when at least one group failed.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Total spikes written across all exported groups.
    #[must_use]
    pub fn total_spikes(&self) -> usize {
        self.groups.iter().map(|report| report.n_spikes).sum()
    }
}

/// Orchestrates a TINT export over one recording/sorting pair.
pub struct TintExporter<'a, R: RecordingSource, S: SortingSource> {
    recording: &'a R,
    sorting: &'a S,
    set_file: PathBuf,
    group_property: String,
}

impl<'a, R: RecordingSource, S: SortingSource> TintExporter<'a, R, S> {
    /// Wire an exporter to its sources, resolving the group-membership
    /// property up front.
    ///
    /// The configured property name is preferred as an exact match on the
    /// sorting's unit properties; failing that, the first unit property
    /// containing it as a substring is accepted with a warning. The
    /// resolved name must also exist on the recording's channels.
    ///
    /// # Errors
    ///
    /// [`ExportError::Configuration`] when no usable property exists or the
    /// two sources disagree on its name.
    pub fn new(
        recording: &'a R,
        sorting: &'a S,
        set_file: impl Into<PathBuf>,
        options: ExportOptions,
    ) -> Result<Self> {
        let group_property = resolve_group_property(sorting, &options.group_property)?;
        if !recording
            .channel_property_names()
            .iter()
            .any(|name| *name == group_property)
        {
            return Err(ExportError::configuration(format!(
                "sorting assigns groups via `{group_property}` but the recording has no channel \
                 property of that name"
            )));
        }
        Ok(Self {
            recording,
            sorting,
            set_file: set_file.into(),
            group_property,
        })
    }

    /// The resolved group-membership property name.
    #[must_use]
    pub fn group_property(&self) -> &str {
        &self.group_property
    }

    /// Export all groups, reporting progress through the `tracing` facade.
    pub fn export(&self) -> Result<ExportSummary> {
        self.export_with_observer(&TracingObserver)
    }

    /// Export all groups, reporting each completed group to `observer`.
    pub fn export_with_observer(&self, observer: &dyn ExportObserver) -> Result<ExportSummary> {
        let span = info_span!("tint_export", set_file = %self.set_file.display());
        let _guard = span.enter();

        let header = parse_set_fields(&self.set_file)?;
        let set_header = read_set_header(&self.set_file)?;
        let window = waveform_window(&header)?;
        let sample_rate = self.recording.sampling_frequency();

        let assignments = self.unit_assignments();
        let known_groups = self.recording.channel_groups();
        let mut summary = ExportSummary::default();

        for (group, unit_ids) in assignments {
            if !known_groups.contains(&group) {
                warn!(group, "sorting assigns units to a group the recording does not declare");
            }
            match self.export_group(group, &unit_ids, &set_header, window, sample_rate) {
                Ok(report) => {
                    observer.group_exported(&report);
                    summary.groups.push(report);
                }
                Err(error) => {
                    warn!(group, error = %error, "group export failed");
                    summary.errors.push(error);
                }
            }
        }
        Ok(summary)
    }

    /// Group units by their resolved group property.
    ///
    /// Units lacking a value for the property are skipped with a warning;
    /// the property name itself was validated at construction.
    fn unit_assignments(&self) -> BTreeMap<GroupId, Vec<UnitId>> {
        let mut assignments: BTreeMap<GroupId, Vec<UnitId>> = BTreeMap::new();
        for unit in self.sorting.unit_ids() {
            match self.sorting.unit_property(unit, &self.group_property) {
                Some(group) => assignments.entry(group).or_default().push(unit),
                None => warn!(
                    unit,
                    property = %self.group_property,
                    "unit has no group assignment and is skipped"
                ),
            }
        }
        assignments
    }

    fn export_group(
        &self,
        group: GroupId,
        unit_ids: &[UnitId],
        set_header: &str,
        window: WaveformWindow,
        sample_rate: u32,
    ) -> Result<GroupExportReport> {
        let trains = self.sorting.units_spike_train(unit_ids);
        let snippets = self
            .recording
            .waveform_snippets(group, &trains, window)
            .map_err(|source| ExportError::Source { group, source })?;
        validate_snippet_shape(group, &trains, &snippets)?;

        let events = combine_unit_spikes(&trains, snippets);
        let tetrode_file = tetrode_path(&self.set_file, group);
        write_tetrode_file(&tetrode_file, set_header, &events, sample_rate).map_err(|source| {
            ExportError::Group {
                group,
                path: tetrode_file.clone(),
                source,
            }
        })?;

        // Label files use the same flattening, shifted to TINT's 1-indexed
        // cluster ids (0 stays reserved for unclustered spikes).
        let labels: Vec<u32> = unit_labels_from_trains(&trains)
            .into_iter()
            .map(|label| label + 1)
            .collect();
        let cut_file = cut_path(&self.set_file, group);
        let clu_file = clu_path(&self.set_file, group);
        let basename = cut_file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        write_text(group, &cut_file, &encode_cut(&labels, &basename))?;
        write_text(group, &clu_file, &encode_clu(&labels))?;

        debug!(
            group,
            n_units = unit_ids.len(),
            n_spikes = events.len(),
            tetrode = %tetrode_file.display(),
            "group files written"
        );

        Ok(GroupExportReport {
            group,
            tetrode_path: tetrode_file,
            cut_path: cut_file,
            clu_path: clu_file,
            n_units: unit_ids.len(),
            n_spikes: events.len(),
        })
    }
}

/// Flatten per-unit spike trains and snippets into one time-ordered event
/// list.
///
/// The sort is stable: spikes sharing a timestamp keep unit order, so the
/// written file is deterministic even when two units fire simultaneously.
fn combine_unit_spikes(trains: &[Vec<i64>], snippets: Vec<Vec<SpikeWaveform>>) -> Vec<SpikeEvent> {
    let total: usize = trains.iter().map(Vec::len).sum();
    let mut events = Vec::with_capacity(total);
    for (train, unit_snippets) in trains.iter().zip(snippets) {
        for (&timestamp, waveform) in train.iter().zip(unit_snippets) {
            events.push(SpikeEvent::new(timestamp, waveform));
        }
    }
    events.sort_by_key(|event| event.timestamp);
    events
}

/// Derive the snippet window from the `.set` header.
///
/// `pretrigSamps` and `spikeLockout` are the acquisition system's pre- and
/// post-trigger sample counts; together they must fill the fixed 50-sample
/// record.
fn waveform_window(header: &Header) -> Result<WaveformWindow> {
    let samples_before: usize = header.get_parsed("pretrigSamps")?;
    let samples_after: usize = header.get_parsed("spikeLockout")?;
    let window = WaveformWindow {
        samples_before,
        samples_after,
    };
    if window.len() != SAMPLES_PER_SPIKE {
        return Err(ExportError::configuration(format!(
            "pretrigSamps + spikeLockout must equal {SAMPLES_PER_SPIKE}, got {}",
            window.len()
        )));
    }
    Ok(window)
}

fn resolve_group_property<S: SortingSource>(sorting: &S, configured: &str) -> Result<String> {
    let names = sorting.unit_property_names();
    if names.iter().any(|name| name == configured) {
        return Ok(configured.to_string());
    }
    if let Some(candidate) = names.iter().find(|name| name.contains(configured)) {
        warn!(
            property = %candidate,
            configured = %configured,
            "exact group property not found, using substring match"
        );
        return Ok(candidate.clone());
    }
    Err(ExportError::configuration(format!(
        "no unit property named `{configured}` (or containing it) assigns units to tetrode groups"
    )))
}

fn validate_snippet_shape(
    group: GroupId,
    trains: &[Vec<i64>],
    snippets: &[Vec<SpikeWaveform>],
) -> Result<()> {
    if snippets.len() != trains.len() {
        return Err(ExportError::Source {
            group,
            source: anyhow::anyhow!(
                "recording returned snippets for {} units, expected {}",
                snippets.len(),
                trains.len()
            ),
        });
    }
    for (unit_index, (train, unit_snippets)) in trains.iter().zip(snippets).enumerate() {
        if train.len() != unit_snippets.len() {
            return Err(ExportError::Source {
                group,
                source: anyhow::anyhow!(
                    "unit {unit_index}: {} snippets for {} spikes",
                    unit_snippets.len(),
                    train.len()
                ),
            });
        }
    }
    Ok(())
}

/// Write a label file, wrapping failures with group and path context.
fn write_text(group: GroupId, path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|source| ExportError::Io {
        group,
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_unit_spikes_is_stable() {
        let trains = vec![vec![10, 30], vec![10, 20]];
        let snippets = vec![
            vec![SpikeWaveform::filled(1), SpikeWaveform::filled(1)],
            vec![SpikeWaveform::filled(2), SpikeWaveform::filled(2)],
        ];
        let events = combine_unit_spikes(&trains, snippets);
        let order: Vec<(i64, i16)> = events
            .iter()
            .map(|event| (event.timestamp, event.waveform.samples[0][0]))
            .collect();
        // Unit 0's spike at 10 precedes unit 1's spike at 10.
        assert_eq!(order, [(10, 1), (10, 2), (20, 2), (30, 1)]);
    }

    #[test]
    fn test_waveform_window_must_fill_record() {
        let mut header = Header::new();
        header.set("pretrigSamps", "10");
        header.set("spikeLockout", "41");
        assert!(matches!(
            waveform_window(&header),
            Err(ExportError::Configuration { .. })
        ));

        header.set("spikeLockout", "40");
        let window = waveform_window(&header).unwrap();
        assert_eq!(window.samples_before, 10);
        assert_eq!(window.samples_after, 40);
    }

    #[test]
    fn test_waveform_window_missing_field() {
        let header = Header::new();
        assert!(matches!(
            waveform_window(&header),
            Err(ExportError::Format(_))
        ));
    }
}
