//! Core types and constants for the tetrode codec.

use std::path::{Path, PathBuf};

use crate::error::{Result, TintError};

/// Channels bundled into one tetrode.
pub const NUM_CHANNELS: usize = 4;

/// Waveform samples stored per channel for each spike.
pub const SAMPLES_PER_SPIKE: usize = 50;

/// Fixed timestamp timebase of tetrode files, in Hz.
pub const TIMEBASE_HZ: u32 = 96_000;

/// Bytes taken by one packed timestamp.
pub const BYTES_PER_TIMESTAMP: usize = 4;

/// Size of one packed spike record: the timestamp is repeated before each
/// channel's sample block.
pub const RECORD_LEN: usize = NUM_CHANNELS * (BYTES_PER_TIMESTAMP + SAMPLES_PER_SPIKE);

/// One spike's waveform snippet: [`SAMPLES_PER_SPIKE`] samples for each of
/// the [`NUM_CHANNELS`] channels.
///
/// Samples are kept at source width; the writer clips them to the signed
/// 8-bit range of the format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpikeWaveform {
    /// Per-channel sample blocks, channel 1 first.
    pub samples: [[i16; SAMPLES_PER_SPIKE]; NUM_CHANNELS],
}

impl SpikeWaveform {
    /// All-zero waveform.
    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            samples: [[0; SAMPLES_PER_SPIKE]; NUM_CHANNELS],
        }
    }

    /// Waveform with the same value in every cell.
    #[must_use]
    pub fn filled(value: i16) -> Self {
        Self {
            samples: [[value; SAMPLES_PER_SPIKE]; NUM_CHANNELS],
        }
    }
}

impl Default for SpikeWaveform {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// A detected spike: sample-index timestamp plus its waveform snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpikeEvent {
    /// Sample index at which the spike occurred.
    pub timestamp: i64,
    /// Snippet cut around the spike.
    pub waveform: SpikeWaveform,
}

impl SpikeEvent {
    /// Build a spike event.
    #[must_use]
    pub fn new(timestamp: i64, waveform: SpikeWaveform) -> Self {
        Self {
            timestamp,
            waveform,
        }
    }
}

/// Compute the integer factor that rescales native-rate sample indices to
/// the fixed 96 kHz timebase.
///
/// # Errors
///
/// Returns [`TintError::UnsupportedRate`] when the rate does not divide the
/// timebase exactly; the format has no way to carry fractional timestamps.
pub fn timebase_scale(sample_rate: u32) -> Result<i64> {
    if sample_rate == 0 || !TIMEBASE_HZ.is_multiple_of(sample_rate) {
        return Err(TintError::UnsupportedRate {
            sample_rate,
            timebase: TIMEBASE_HZ,
        });
    }
    Ok(i64::from(TIMEBASE_HZ / sample_rate))
}

/// Tetrode file path for a 0-indexed channel group.
///
/// TINT numbers tetrodes from 1, so group 0 maps to suffix `.1`.
#[must_use]
pub fn tetrode_path(set_file: &Path, group: u32) -> PathBuf {
    set_file.with_extension((group + 1).to_string())
}

/// `.cut` sibling path for a 0-indexed channel group: `<base>_<n>.cut`.
#[must_use]
pub fn cut_path(set_file: &Path, group: u32) -> PathBuf {
    labeled_path(set_file, group, "cut")
}

/// `.clu` sibling path for a 0-indexed channel group: `<base>_<n>.clu`.
#[must_use]
pub fn clu_path(set_file: &Path, group: u32) -> PathBuf {
    labeled_path(set_file, group, "clu")
}

fn labeled_path(set_file: &Path, group: u32, extension: &str) -> PathBuf {
    let stem = set_file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    set_file.with_file_name(format!("{stem}_{}.{extension}", group + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timebase_scale_exact_divisors() {
        assert_eq!(timebase_scale(48_000).unwrap(), 2);
        assert_eq!(timebase_scale(24_000).unwrap(), 4);
        assert_eq!(timebase_scale(96_000).unwrap(), 1);
    }

    #[test]
    fn test_timebase_scale_rejects_non_divisor() {
        assert!(matches!(
            timebase_scale(44_100),
            Err(TintError::UnsupportedRate { .. })
        ));
        assert!(matches!(
            timebase_scale(0),
            Err(TintError::UnsupportedRate { .. })
        ));
    }

    #[test]
    fn test_tetrode_path_is_one_indexed() {
        let set_file = Path::new("/data/session.set");
        assert_eq!(tetrode_path(set_file, 0), Path::new("/data/session.1"));
        assert_eq!(tetrode_path(set_file, 3), Path::new("/data/session.4"));
    }

    #[test]
    fn test_label_paths() {
        let set_file = Path::new("/data/session.set");
        assert_eq!(cut_path(set_file, 0), Path::new("/data/session_1.cut"));
        assert_eq!(clu_path(set_file, 3), Path::new("/data/session_4.clu"));
    }
}
