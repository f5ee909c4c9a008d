//! Comparison of two on-disk TINT exports.
//!
//! Given the `.set` file of an original export (threshold-detected spike
//! times) and of a re-derived export (sorter-detected spike times), this
//! module reads the tetrode files of both back through `tint-format`,
//! matches the timestamp series per channel group and emits one fixed-shape
//! comparison record per group.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use tint_format::{read_tetrode, tetrode_path};

use crate::error::{AssessError, Result};
use crate::matcher::{DEFAULT_TOLERANCE, match_timestamps};
use crate::metrics::{SpikeMetrics, summarize};

/// Options for an export comparison.
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Matching tolerance in timebase samples.
    pub tolerance: i64,
    /// Sorted units per group, when the caller has sorting information.
    pub unit_counts: BTreeMap<u32, usize>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            unit_counts: BTreeMap::new(),
        }
    }
}

impl CompareOptions {
    /// Default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the matching tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: i64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Attach per-group unit counts from the sorting that produced the
    /// re-derived export.
    #[must_use]
    pub fn with_unit_counts(mut self, unit_counts: BTreeMap<u32, usize>) -> Self {
        self.unit_counts = unit_counts;
        self
    }
}

/// Comparison record for one channel group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupComparison {
    /// 0-indexed channel group.
    pub group_id: u32,
    /// Units sorted on this group, when known.
    pub num_units: Option<usize>,
    /// Spikes in the threshold-detected (original) export.
    pub threshold_spikes: usize,
    /// Spikes in the sorter-detected (re-derived) export.
    pub sorter_spikes: usize,
    /// Sorter spikes classified as noise during matching.
    pub noise_spikes: usize,
    /// Correspondence metrics over the matched buckets.
    pub metrics: SpikeMetrics,
}

/// Compare two exports tetrode by tetrode.
///
/// Channel groups are discovered from the tetrode files sitting next to
/// `original_set`; each group's file must also exist next to
/// `resorted_set`. Records come back ordered by group id.
///
/// # Errors
///
/// [`AssessError::NoTetrodeFiles`] when the original export has no tetrode
/// files at all, [`AssessError::Tetrode`] when a file fails to decode, and
/// [`AssessError::EmptyGroup`] when a group has no matched buckets to
/// summarize.
pub fn compare_exports(
    original_set: &Path,
    resorted_set: &Path,
    options: &CompareOptions,
) -> Result<Vec<GroupComparison>> {
    let groups = discover_tetrode_groups(original_set)?;
    if groups.is_empty() {
        return Err(AssessError::NoTetrodeFiles {
            path: original_set.to_path_buf(),
        });
    }

    let mut comparisons = Vec::with_capacity(groups.len());
    for group in groups {
        comparisons.push(compare_group(original_set, resorted_set, group, options)?);
    }
    info!(
        group_count = comparisons.len(),
        original = %original_set.display(),
        resorted = %resorted_set.display(),
        "export comparison complete"
    );
    Ok(comparisons)
}

/// Compare one channel group of two exports.
pub fn compare_group(
    original_set: &Path,
    resorted_set: &Path,
    group: u32,
    options: &CompareOptions,
) -> Result<GroupComparison> {
    let threshold_ts = read_group_timestamps(original_set, group)?;
    let sorter_ts = read_group_timestamps(resorted_set, group)?;

    let outcome = match_timestamps(&threshold_ts, &sorter_ts, options.tolerance);
    let metrics = summarize(&outcome).map_err(|error| match error {
        AssessError::EmptyInput => AssessError::EmptyGroup { group },
        other => other,
    })?;

    debug!(
        group,
        threshold_spikes = threshold_ts.len(),
        sorter_spikes = sorter_ts.len(),
        noise_spikes = outcome.noise_count,
        found_by_sorter = metrics.found_by_sorter,
        "group compared"
    );

    Ok(GroupComparison {
        group_id: group,
        num_units: options.unit_counts.get(&group).copied(),
        threshold_spikes: threshold_ts.len(),
        sorter_spikes: sorter_ts.len(),
        noise_spikes: outcome.noise_count,
        metrics,
    })
}

fn read_group_timestamps(set_file: &Path, group: u32) -> Result<Vec<i64>> {
    let path = tetrode_path(set_file, group);
    let tetrode = read_tetrode(&path).map_err(|source| AssessError::Tetrode { group, source })?;
    let mut timestamps = tetrode.timestamps();
    // Written files are ordered, but an acquisition-system file is not
    // guaranteed to be.
    timestamps.sort_unstable();
    Ok(timestamps)
}

/// Discover which channel groups were exported next to a `.set` file.
///
/// A sibling file whose stem matches the set file and whose extension is a
/// positive integer `n` is tetrode `n`, i.e. group `n - 1`.
pub fn discover_tetrode_groups(set_file: &Path) -> Result<Vec<u32>> {
    let stem = set_file.file_stem().map(|s| s.to_string_lossy().into_owned());
    let Some(stem) = stem else {
        return Ok(Vec::new());
    };
    let parent = set_file.parent().filter(|p| !p.as_os_str().is_empty());
    let dir = parent.unwrap_or_else(|| Path::new("."));

    let mut groups = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches_stem = path
            .file_stem()
            .is_some_and(|s| s.to_string_lossy() == stem);
        if !matches_stem {
            continue;
        }
        let tetrode: Option<u32> = path
            .extension()
            .and_then(|ext| ext.to_string_lossy().parse().ok());
        if let Some(tetrode) = tetrode
            && tetrode >= 1
        {
            groups.push(tetrode - 1);
        }
    }
    groups.sort_unstable();
    Ok(groups)
}
