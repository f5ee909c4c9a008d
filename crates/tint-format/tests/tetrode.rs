//! Integration tests for the tetrode file round trip.
//!
//! These tests write real files to disk and read them back, covering the
//! header prefix handling, timestamp rescaling and sample clipping.

use std::fs;
use std::path::Path;

use tint_format::{
    DATA_END, SpikeEvent, SpikeWaveform, TintError, read_set_header, read_tetrode, tetrode_path,
    write_tetrode_file,
};

const SET_CONTENT: &str = "trial_date Monday 12 Aug 2019\n\
                           trial_time 11:00:00\n\
                           experimenter kg\n\
                           sw_version 1.2.2.14\n\
                           pretrigSamps 10\n\
                           spikeLockout 40\n";

fn write_set_file(dir: &Path) -> std::path::PathBuf {
    let set_file = dir.join("session.set");
    fs::write(&set_file, SET_CONTENT).unwrap();
    set_file
}

fn spike(timestamp: i64, fill: i16) -> SpikeEvent {
    SpikeEvent::new(timestamp, SpikeWaveform::filled(fill))
}

#[test]
fn test_write_read_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let set_file = write_set_file(dir.path());
    let set_header = read_set_header(&set_file).unwrap();

    let spikes = vec![spike(100, 1), spike(250, -3), spike(400, 127)];
    let tetrode_file = tetrode_path(&set_file, 0);
    write_tetrode_file(&tetrode_file, &set_header, &spikes, 48_000).unwrap();

    let parsed = read_tetrode(&tetrode_file).unwrap();
    assert_eq!(parsed.spikes.len(), 3);
    // Timestamps are stored in the 96 kHz timebase (factor 2 for 48 kHz).
    assert_eq!(parsed.timestamps(), [200, 500, 800]);
    assert_eq!(parsed.spikes[1].waveform.samples[2][10], -3);

    // The set header rides along in front of the derived fields.
    assert_eq!(parsed.header.get("trial_date"), Some("Monday 12 Aug 2019"));
    assert_eq!(parsed.header.get("sw_version"), Some("1.2.2.14"));
    assert_eq!(
        parsed.header.get_parsed::<usize>("num_spikes").unwrap(),
        3
    );
}

#[test]
fn test_set_header_stops_at_sw_version() {
    let dir = tempfile::tempdir().unwrap();
    let set_file = write_set_file(dir.path());

    let set_header = read_set_header(&set_file).unwrap();
    assert!(set_header.ends_with("sw_version 1.2.2.14\n"));
    assert!(!set_header.contains("pretrigSamps"));
}

#[test]
fn test_set_header_missing_version_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let set_file = dir.path().join("broken.set");
    fs::write(&set_file, "trial_date Monday\n").unwrap();

    assert!(matches!(
        read_set_header(&set_file),
        Err(TintError::Format { .. })
    ));
}

#[test]
fn test_zero_spike_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let set_file = write_set_file(dir.path());
    let set_header = read_set_header(&set_file).unwrap();

    let tetrode_file = tetrode_path(&set_file, 3);
    assert!(tetrode_file.ends_with("session.4"));
    write_tetrode_file(&tetrode_file, &set_header, &[], 96_000).unwrap();

    let bytes = fs::read(&tetrode_file).unwrap();
    assert!(bytes.ends_with(DATA_END));

    let parsed = read_tetrode(&tetrode_file).unwrap();
    assert!(parsed.spikes.is_empty());
}

#[test]
fn test_clipping_of_wide_samples() {
    let dir = tempfile::tempdir().unwrap();
    let set_file = write_set_file(dir.path());
    let set_header = read_set_header(&set_file).unwrap();

    let mut event = spike(10, 0);
    event.waveform.samples[0][0] = 1000;
    event.waveform.samples[0][1] = -1000;

    let tetrode_file = tetrode_path(&set_file, 1);
    write_tetrode_file(&tetrode_file, &set_header, &[event], 96_000).unwrap();

    let parsed = read_tetrode(&tetrode_file).unwrap();
    assert_eq!(parsed.spikes[0].waveform.samples[0][0], 127);
    assert_eq!(parsed.spikes[0].waveform.samples[0][1], -128);
}

#[test]
fn test_missing_file_reports_path() {
    let result = read_tetrode(Path::new("/nonexistent/session.1"));
    assert!(matches!(result, Err(TintError::FileNotFound { .. })));
}
