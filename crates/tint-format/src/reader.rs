//! Tetrode file reader.
//!
//! Decodes the text header and the packed spike records written by the
//! [`crate::writer`] module (or by the original acquisition system).

use std::fs;
use std::path::Path;

use crate::error::{Result, TintError};
use crate::header::{DATA_END, DATA_START, Header, parse_header_bytes};
use crate::types::{
    BYTES_PER_TIMESTAMP, NUM_CHANNELS, RECORD_LEN, SAMPLES_PER_SPIKE, SpikeEvent, SpikeWaveform,
};

/// A decoded tetrode file: header plus spike records.
///
/// Timestamps are returned in the file's 96 kHz timebase, exactly as
/// stored; waveform samples are widened back to `i16` without rescaling.
#[derive(Debug, Clone)]
pub struct TetrodeFile {
    /// Parsed header fields.
    pub header: Header,
    /// Spike records in file order (ascending timestamps).
    pub spikes: Vec<SpikeEvent>,
}

impl TetrodeFile {
    /// Spike timestamps in file order.
    #[must_use]
    pub fn timestamps(&self) -> Vec<i64> {
        self.spikes.iter().map(|spike| spike.timestamp).collect()
    }
}

/// Read a tetrode file from a path.
pub fn read_tetrode(path: &Path) -> Result<TetrodeFile> {
    let bytes = fs::read(path).map_err(|error| {
        if error.kind() == std::io::ErrorKind::NotFound {
            TintError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            TintError::Io(error)
        }
    })?;
    parse_tetrode_bytes(&bytes).map_err(|error| error.with_path(path))
}

/// Parse tetrode data from bytes.
///
/// Validates the fixed record geometry declared in the header against the
/// TINT layout before decoding, and requires the `data_end` terminator
/// after the last record.
pub fn parse_tetrode_bytes(bytes: &[u8]) -> Result<TetrodeFile> {
    let header = parse_header_bytes(bytes)?;

    expect_field(&header, "num_chans", NUM_CHANNELS)?;
    expect_field(&header, "samples_per_spike", SAMPLES_PER_SPIKE)?;
    expect_field(&header, "bytes_per_timestamp", BYTES_PER_TIMESTAMP)?;
    expect_field(&header, "bytes_per_sample", 1)?;
    let n_spikes: usize = header.get_parsed("num_spikes")?;

    let data_offset = data_start_offset(bytes)
        .ok_or_else(|| TintError::format("data_start sentinel not found"))?;
    let data = &bytes[data_offset..];

    let total = n_spikes
        .checked_mul(RECORD_LEN)
        .ok_or_else(|| TintError::format("num_spikes overflows the record size"))?;
    if data.len() < total + DATA_END.len() {
        return Err(TintError::format(format!(
            "truncated spike data: expected {} record bytes plus terminator, found {}",
            total,
            data.len()
        )));
    }
    if &data[total..total + DATA_END.len()] != DATA_END {
        return Err(TintError::format("data_end terminator missing"));
    }

    let mut spikes = Vec::with_capacity(n_spikes);
    for record in data[..total].chunks_exact(RECORD_LEN) {
        spikes.push(decode_record(record));
    }

    Ok(TetrodeFile { header, spikes })
}

/// Decode one packed spike record.
///
/// The timestamp is stored once per channel; the copies are identical by
/// construction, so the first one is taken.
fn decode_record(record: &[u8]) -> SpikeEvent {
    let timestamp = i64::from(i32::from_be_bytes([record[0], record[1], record[2], record[3]]));

    let mut waveform = SpikeWaveform::zeroed();
    for channel in 0..NUM_CHANNELS {
        let offset = channel * (BYTES_PER_TIMESTAMP + SAMPLES_PER_SPIKE) + BYTES_PER_TIMESTAMP;
        for (sample_index, &byte) in record[offset..offset + SAMPLES_PER_SPIKE].iter().enumerate() {
            waveform.samples[channel][sample_index] = i16::from(byte as i8);
        }
    }

    SpikeEvent::new(timestamp, waveform)
}

fn expect_field(header: &Header, name: &str, expected: usize) -> Result<()> {
    let value: usize = header.get_parsed(name)?;
    if value != expected {
        return Err(TintError::format(format!(
            "header field `{name}` is {value}, expected {expected}"
        )));
    }
    Ok(())
}

fn data_start_offset(bytes: &[u8]) -> Option<usize> {
    let needle = DATA_START.as_bytes();
    bytes
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|position| position + needle.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::build_tetrode_header;
    use crate::writer::encode_spikes;

    fn file_bytes(events: &[SpikeEvent], sample_rate: u32) -> Vec<u8> {
        let mut bytes = build_tetrode_header("sw_version 1.2.3\n", events.len(), sample_rate)
            .into_bytes();
        bytes.extend_from_slice(&encode_spikes(events, sample_rate).unwrap());
        bytes.extend_from_slice(DATA_END);
        bytes
    }

    #[test]
    fn test_parse_empty_file() {
        let parsed = parse_tetrode_bytes(&file_bytes(&[], 48_000)).unwrap();
        assert!(parsed.spikes.is_empty());
        assert_eq!(parsed.header.get_parsed::<usize>("num_spikes").unwrap(), 0);
    }

    #[test]
    fn test_parse_decodes_timestamps_and_samples() {
        let mut spike = SpikeEvent::new(100, SpikeWaveform::filled(-2));
        spike.waveform.samples[3][49] = 90;
        let parsed = parse_tetrode_bytes(&file_bytes(&[spike], 48_000)).unwrap();

        assert_eq!(parsed.timestamps(), [200]);
        assert_eq!(parsed.spikes[0].waveform.samples[0][0], -2);
        assert_eq!(parsed.spikes[0].waveform.samples[3][49], 90);
    }

    #[test]
    fn test_parse_rejects_missing_terminator() {
        let mut bytes = file_bytes(&[SpikeEvent::new(1, SpikeWaveform::zeroed())], 96_000);
        bytes.truncate(bytes.len() - 1);
        assert!(matches!(
            parse_tetrode_bytes(&bytes),
            Err(TintError::Format { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_foreign_geometry() {
        let mut bytes = b"num_chans 2\nbytes_per_timestamp 4\nsamples_per_spike 50\nbytes_per_sample 1\nnum_spikes 0\ndata_start".to_vec();
        bytes.extend_from_slice(DATA_END);
        assert!(matches!(
            parse_tetrode_bytes(&bytes),
            Err(TintError::Format { .. })
        ));
    }
}
