//! TINT header block parsing and building.
//!
//! `.set` files and tetrode files share a line-oriented text header: each
//! line is a field name followed by a free-form value, encoded in a legacy
//! single-byte code page (Windows-1252). In tetrode files the header is
//! terminated by the literal `data_start`, after which raw spike records
//! follow with no separator.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, TintError};
use crate::types::{NUM_CHANNELS, SAMPLES_PER_SPIKE, TIMEBASE_HZ};

/// Sentinel marking the start of binary spike data in a tetrode file.
pub const DATA_START: &str = "data_start";

/// Terminator written after the binary spike data.
pub const DATA_END: &[u8] = b"\r\ndata_end\r\n";

/// `.set` header lines are copied verbatim up to and including the line
/// carrying this field.
pub const SET_VERSION_FIELD: &str = "sw_version";

/// Ordered field-name to value mapping parsed from a TINT header.
///
/// Field order is preserved as read; setting an existing field overwrites
/// its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    fields: Vec<(String, String)>,
}

impl Header {
    /// Empty header.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no fields have been parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Raw value of a field, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Parse a field value, reporting the field name on failure.
    ///
    /// Only the first whitespace-delimited token of the value is parsed, so
    /// unit-suffixed fields such as `sample_rate 48000 hz` work too.
    pub fn get_parsed<T: FromStr>(&self, name: &str) -> Result<T> {
        let value = self
            .get(name)
            .ok_or_else(|| TintError::format(format!("missing header field `{name}`")))?;
        let token = value.split_whitespace().next().unwrap_or("");
        token
            .parse()
            .map_err(|_| TintError::format(format!("header field `{name}` has invalid value `{value}`")))
    }

    /// Insert a field, overwriting in place when the name already exists.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Iterate fields in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// Parse the key-value header of a `.set` or tetrode file.
///
/// Reads line by line up to (not including) the line containing the
/// [`DATA_START`] sentinel. The first whitespace-delimited token of each
/// line becomes the field name; the remainder of the line is the value.
///
/// # Errors
///
/// [`TintError::Format`] when the sentinel never appears before end of
/// file, [`TintError::FileNotFound`] / [`TintError::Io`] on open failure.
pub fn parse_header(path: &Path) -> Result<Header> {
    let bytes = read_file(path)?;
    parse_header_bytes(&bytes).map_err(|error| error.with_path(path))
}

/// Parse a header from an in-memory byte stream. See [`parse_header`].
pub fn parse_header_bytes(bytes: &[u8]) -> Result<Header> {
    let (header, sentinel_found) = scan_fields(bytes);
    if !sentinel_found {
        return Err(TintError::format(
            "data_start sentinel not found before end of file",
        ));
    }
    Ok(header)
}

/// Parse the key-value fields of a `.set` file.
///
/// `.set` files carry no binary block, so the scan is allowed to run to end
/// of file; a `data_start` line still terminates it when present.
pub fn parse_set_fields(path: &Path) -> Result<Header> {
    let bytes = read_file(path)?;
    Ok(scan_fields(&bytes).0)
}

fn scan_fields(bytes: &[u8]) -> (Header, bool) {
    let mut header = Header::new();
    for line in bytes.split(|&byte| byte == b'\n') {
        if contains_subslice(line, DATA_START.as_bytes()) {
            return (header, true);
        }
        let text = decode_cp1252(line);
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        match text.split_once(' ') {
            Some((name, value)) => header.set(name, value),
            None => header.set(text, ""),
        }
    }
    (header, false)
}

/// Copy the leading lines of a `.set` file, up to and including the line
/// containing [`SET_VERSION_FIELD`], as one newline-normalized string.
///
/// The returned block prefixes every tetrode file written for the session,
/// carrying the recording's original metadata forward.
///
/// # Errors
///
/// [`TintError::Format`] when no `sw_version` line exists.
pub fn read_set_header(path: &Path) -> Result<String> {
    let bytes = read_file(path)?;
    let mut out = String::new();
    for line in bytes.split(|&byte| byte == b'\n') {
        let mut text = decode_cp1252(line);
        if text.ends_with('\r') {
            text.pop();
        }
        out.push_str(&text);
        out.push('\n');
        if text.contains(SET_VERSION_FIELD) {
            return Ok(out);
        }
    }
    Err(TintError::format(format!(
        "{}: {SET_VERSION_FIELD} line not found",
        path.display()
    )))
}

/// Build the text header of a tetrode file.
///
/// The `.set` header prefix is emitted first, then the fixed TINT geometry
/// fields in their canonical order. Only the sample rate and spike count
/// vary; everything else is a format constant. The returned string ends
/// with `data_start` and no trailing newline: binary spike data follows
/// immediately.
#[must_use]
pub fn build_tetrode_header(set_header: &str, n_spikes: usize, sample_rate: u32) -> String {
    let mut out = String::with_capacity(set_header.len() + 256);
    out.push_str(set_header);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&format!("num_chans {NUM_CHANNELS}"));
    out.push_str(&format!("\ntimebase {TIMEBASE_HZ} hz"));
    out.push_str("\nbytes_per_timestamp 4");
    out.push_str(&format!("\nsamples_per_spike {SAMPLES_PER_SPIKE}"));
    out.push_str(&format!("\nsample_rate {sample_rate} hz"));
    out.push_str("\nbytes_per_sample 1");
    out.push_str("\nspike_format t,ch1,t,ch2,t,ch3,t,ch4");
    out.push_str(&format!("\nnum_spikes {n_spikes}"));
    out.push_str(&format!("\n{DATA_START}"));
    out
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|error| {
        if error.kind() == std::io::ErrorKind::NotFound {
            TintError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            TintError::Io(error)
        }
    })
}

fn contains_subslice(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

/// Windows-1252 code points for the 0x80..0xA0 block; all other bytes map
/// as Latin-1.
const CP1252_C1: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

fn decode_cp1252(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&byte| match byte {
            0x80..=0x9F => CP1252_C1[usize::from(byte - 0x80)],
            _ => char::from(byte),
        })
        .collect()
}
