//! Collaborator interfaces for recording and sorting data access.
//!
//! The exporter does not read raw signals or sorting results itself; both
//! live behind these traits so that any acquisition backend can be plugged
//! in. Trait methods that touch external data report failures as
//! [`anyhow::Error`], which the exporter wraps with group context.

use tint_format::SpikeWaveform;

/// 0-indexed channel group (tetrode) identifier.
pub type GroupId = u32;

/// Sorted-unit identifier.
pub type UnitId = u32;

/// Snippet window around each spike sample, in samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveformWindow {
    /// Samples kept before the spike sample.
    pub samples_before: usize,
    /// Samples kept from the spike sample onward.
    pub samples_after: usize,
}

impl WaveformWindow {
    /// Total snippet length in samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples_before + self.samples_after
    }

    /// True for a degenerate zero-length window.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read access to the raw recording.
pub trait RecordingSource {
    /// Native sampling frequency in Hz.
    fn sampling_frequency(&self) -> u32;

    /// Channel groups present on the recording.
    fn channel_groups(&self) -> Vec<GroupId>;

    /// Property names attached to recording channels.
    fn channel_property_names(&self) -> Vec<String>;

    /// Cut waveform snippets around the given spike samples on the group's
    /// channels.
    ///
    /// `spike_trains` holds one ascending sample-index train per unit; the
    /// result must mirror that shape, one snippet per spike sample.
    fn waveform_snippets(
        &self,
        group: GroupId,
        spike_trains: &[Vec<i64>],
        window: WaveformWindow,
    ) -> anyhow::Result<Vec<Vec<SpikeWaveform>>>;
}

/// Read access to the spike-sorting result.
pub trait SortingSource {
    /// All sorted unit identifiers.
    fn unit_ids(&self) -> Vec<UnitId>;

    /// Property names attached to units.
    fn unit_property_names(&self) -> Vec<String>;

    /// Value of a unit property; the group-membership property resolves to
    /// the unit's channel group.
    fn unit_property(&self, unit: UnitId, name: &str) -> Option<GroupId>;

    /// Spike trains for the given units, one ascending sample-index train
    /// per unit, in the order the ids were passed.
    fn units_spike_train(&self, unit_ids: &[UnitId]) -> Vec<Vec<i64>>;
}
