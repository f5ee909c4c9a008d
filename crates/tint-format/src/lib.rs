//! Axona TINT file format reader and writer.
//!
//! This crate provides the file-level codec for the TINT format family
//! used by tetrode analysis tools: the shared key-value text header, the
//! per-tetrode spike-waveform files (`.1`, `.2`, ...) and the `.cut`/`.clu`
//! unit-label files.
//!
//! A tetrode file is a text header terminated by the literal `data_start`,
//! followed by packed spike records (big-endian 4-byte timestamps
//! interleaved with 50 signed bytes per channel, 4 channels per spike) and
//! the literal terminator `\r\ndata_end\r\n`.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tint_format::{SpikeEvent, SpikeWaveform, read_set_header, read_tetrode, write_tetrode_file};
//!
//! let set_header = read_set_header(Path::new("session.set")).unwrap();
//! let spikes = vec![SpikeEvent::new(1200, SpikeWaveform::zeroed())];
//! write_tetrode_file(Path::new("session.1"), &set_header, &spikes, 48_000).unwrap();
//!
//! let tetrode = read_tetrode(Path::new("session.1")).unwrap();
//! assert_eq!(tetrode.spikes.len(), 1);
//! ```

mod error;
pub mod header;
mod labels;
mod reader;
mod types;
mod writer;

// Re-export error types
pub use error::{Result, TintError};

// Re-export core types and constants
pub use types::{
    BYTES_PER_TIMESTAMP, NUM_CHANNELS, RECORD_LEN, SAMPLES_PER_SPIKE, SpikeEvent, SpikeWaveform,
    TIMEBASE_HZ, clu_path, cut_path, tetrode_path, timebase_scale,
};

// Re-export header handling
pub use header::{
    DATA_END, DATA_START, Header, build_tetrode_header, parse_header, parse_header_bytes,
    parse_set_fields, read_set_header,
};

// Re-export label codecs
pub use labels::{encode_clu, encode_cut, parse_clu, parse_cut_labels, unit_labels_from_trains};

// Re-export reader and writer functionality
pub use reader::{TetrodeFile, parse_tetrode_bytes, read_tetrode};
pub use writer::{TetrodeWriter, encode_spikes, write_tetrode_file};
