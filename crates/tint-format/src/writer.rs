//! Tetrode file writer.
//!
//! Produces the text header, the packed spike records and the `data_end`
//! terminator in one pass.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, TintError};
use crate::header::{DATA_END, build_tetrode_header};
use crate::types::{NUM_CHANNELS, RECORD_LEN, SpikeEvent, timebase_scale};

/// Tetrode file writer.
pub struct TetrodeWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> TetrodeWriter<W> {
    /// Create a new tetrode writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Write one complete tetrode file.
    ///
    /// The header is written and flushed before any spike data; records are
    /// emitted in ascending timestamp order. Zero spikes still produce a
    /// valid file: header with `num_spikes 0`, then the terminator.
    pub fn write_tetrode(
        mut self,
        set_header: &str,
        events: &[SpikeEvent],
        sample_rate: u32,
    ) -> Result<()> {
        let header = build_tetrode_header(set_header, events.len(), sample_rate);
        let data = encode_spikes(events, sample_rate)?;

        self.writer.write_all(header.as_bytes())?;
        self.writer.flush()?;
        self.writer.write_all(&data)?;
        self.writer.write_all(DATA_END)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl TetrodeWriter<File> {
    /// Create a tetrode file for writing.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(file))
    }
}

/// Write a tetrode file at `path`.
///
/// This is a convenience function that creates the file and writes the
/// header, spike records and terminator.
pub fn write_tetrode_file(
    path: &Path,
    set_header: &str,
    events: &[SpikeEvent],
    sample_rate: u32,
) -> Result<()> {
    TetrodeWriter::create(path)?.write_tetrode(set_header, events, sample_rate)
}

/// Pack spike records into the tetrode binary layout.
///
/// Events are stably sorted ascending by timestamp; duplicate timestamps
/// keep their input order. Each record repeats the rescaled timestamp as a
/// 4-byte big-endian signed integer before each channel's 50 samples, every
/// sample clipped to the signed 8-bit range of the format.
///
/// # Errors
///
/// [`TintError::UnsupportedRate`] when the sample rate does not divide the
/// 96 kHz timebase, [`TintError::Format`] when a rescaled timestamp
/// overflows 4 bytes.
pub fn encode_spikes(events: &[SpikeEvent], sample_rate: u32) -> Result<Vec<u8>> {
    let scale = timebase_scale(sample_rate)?;

    let mut ordered: Vec<&SpikeEvent> = events.iter().collect();
    ordered.sort_by_key(|event| event.timestamp);

    let mut data = Vec::with_capacity(ordered.len() * RECORD_LEN);
    for event in ordered {
        let rescaled = event
            .timestamp
            .checked_mul(scale)
            .and_then(|timestamp| i32::try_from(timestamp).ok())
            .ok_or_else(|| {
                TintError::format(format!(
                    "timestamp {} overflows the 4-byte timebase",
                    event.timestamp
                ))
            })?;
        for channel in 0..NUM_CHANNELS {
            data.extend_from_slice(&rescaled.to_be_bytes());
            for &sample in &event.waveform.samples[channel] {
                data.push(clip_sample(sample) as u8);
            }
        }
    }
    Ok(data)
}

/// Clip a source sample to the signed 8-bit range of the format.
///
/// Wider source samples (e.g. 16-bit acquisition) are intentionally and
/// lossily downcast; TINT stores one byte per sample.
fn clip_sample(sample: i16) -> i8 {
    sample.clamp(i16::from(i8::MIN), i16::from(i8::MAX)) as i8
}
