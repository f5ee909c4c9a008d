//! `.cut` and `.clu` unit-label codecs.
//!
//! Both files carry the same time-ordered unit-label stream for one
//! tetrode: `.cut` is the verbose TINT layout with per-cluster parameter
//! blocks, `.clu` the compact one-label-per-line layout. Labels are
//! 1-indexed on disk; 0 is reserved for noise/unclustered spikes.

use std::collections::BTreeSet;

use crate::error::{Result, TintError};

/// Labels per data line in a `.cut` file.
const CUT_LABELS_PER_LINE: usize = 25;

/// One zeroed vector cell, as TINT renders them (4 spaces + "0").
const ZERO_CELL: &str = "    0";

/// Indent before the `min:`/`max:` lines of a cluster block.
const CLUSTER_INDENT: &str = "               ";

/// Marker line carrying the basename and spike count ahead of the labels.
const EXACT_CUT_MARKER: &str = "Exact_cut_for:";

/// Build the time-ordered unit-label sequence for one channel group.
///
/// Each spike train contributes its dense 0-based unit index once per
/// sample; the flattened sequence is stably sorted by timestamp, so
/// simultaneous spikes keep their unit order. This is the transformation
/// that turns per-unit spike trains into a single per-tetrode label vector.
#[must_use]
pub fn unit_labels_from_trains(spike_trains: &[Vec<i64>]) -> Vec<u32> {
    let total: usize = spike_trains.iter().map(Vec::len).sum();
    let mut tagged: Vec<(i64, u32)> = Vec::with_capacity(total);
    for (unit_index, train) in spike_trains.iter().enumerate() {
        for &sample in train {
            tagged.push((sample, unit_index as u32));
        }
    }
    tagged.sort_by_key(|&(sample, _)| sample);
    tagged.into_iter().map(|(_, label)| label).collect()
}

/// Encode a 1-indexed label sequence into the `.cut` layout.
///
/// `basename` is the tetrode's file stem (e.g. `session_1` for tetrode 1),
/// recorded on the `Exact_cut_for` line. The label block renders 25
/// width-3 integers per line with any remainder on a short final line.
#[must_use]
pub fn encode_cut(labels: &[u32], basename: &str) -> String {
    let n_clusters = distinct_count(labels);
    let n_spikes = labels.len();

    let mut out = String::new();
    out.push_str(&format!("n_clusters: {n_clusters}\n"));
    out.push_str("n_channels: 4\n");
    out.push_str("n_params: 2\n");
    out.push_str(&format!("times_used_in_Vt:{}\n", ZERO_CELL.repeat(4)));
    for cluster in 0..n_clusters {
        out.push_str(&format!(
            " cluster: {cluster} center:{}\n",
            ZERO_CELL.repeat(8)
        ));
        out.push_str(&format!("{CLUSTER_INDENT}min:{}\n", ZERO_CELL.repeat(8)));
        out.push_str(&format!("{CLUSTER_INDENT}max:{}\n", ZERO_CELL.repeat(8)));
    }
    out.push_str(&format!(
        "\n{EXACT_CUT_MARKER} {basename} spikes: {n_spikes}\n"
    ));
    for (index, label) in labels.iter().enumerate() {
        out.push_str(&format!("{label:3}"));
        if (index + 1).is_multiple_of(CUT_LABELS_PER_LINE) {
            out.push('\n');
        }
    }
    out
}

/// Encode a 1-indexed label sequence into the `.clu` layout.
///
/// The first line is the distinct cluster count; every following line is
/// one label.
#[must_use]
pub fn encode_clu(labels: &[u32]) -> String {
    let mut out = String::with_capacity(labels.len() * 3 + 8);
    out.push_str(&format!("{}\n", distinct_count(labels)));
    for label in labels {
        out.push_str(&format!("{label}\n"));
    }
    out
}

/// Recover the label stream from `.cut` text.
///
/// Scans for the `Exact_cut_for` line, reads its declared spike count and
/// parses the remainder of the file as whitespace-separated labels.
///
/// # Errors
///
/// [`TintError::Format`] when the marker line is missing or malformed, a
/// label is non-numeric, or the label count disagrees with the declared
/// spike count.
pub fn parse_cut_labels(text: &str) -> Result<Vec<u32>> {
    let marker = text
        .find(EXACT_CUT_MARKER)
        .ok_or_else(|| TintError::format("Exact_cut_for line not found in .cut file"))?;
    let rest = &text[marker..];
    let line_end = rest.find('\n').unwrap_or(rest.len());
    let line = &rest[..line_end];

    let declared: usize = line
        .split_whitespace()
        .last()
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| TintError::format("malformed Exact_cut_for line"))?;

    let labels = parse_label_tokens(&rest[line_end..])?;
    if labels.len() != declared {
        return Err(TintError::format(format!(
            "label count {} does not match declared spike count {declared}",
            labels.len()
        )));
    }
    Ok(labels)
}

/// Recover the label stream from `.clu` text.
///
/// The leading cluster-count line is read and discarded; the remaining
/// lines are the labels.
pub fn parse_clu(text: &str) -> Result<Vec<u32>> {
    let mut tokens = text.split_whitespace();
    let _clusters: usize = tokens
        .next()
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| TintError::format("missing cluster count line in .clu file"))?;
    tokens
        .map(|token| {
            token
                .parse()
                .map_err(|_| TintError::format(format!("non-numeric label `{token}` in .clu file")))
        })
        .collect()
}

fn parse_label_tokens(text: &str) -> Result<Vec<u32>> {
    text.split_whitespace()
        .map(|token| {
            token
                .parse()
                .map_err(|_| TintError::format(format!("non-numeric label `{token}` in .cut file")))
        })
        .collect()
}

fn distinct_count(labels: &[u32]) -> usize {
    labels.iter().collect::<BTreeSet<_>>().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_labels_flatten_and_sort() {
        // Unit 0 fires at 10 and 40, unit 1 at 20, unit 2 at 5 and 40.
        let trains = vec![vec![10, 40], vec![20], vec![5, 40]];
        let labels = unit_labels_from_trains(&trains);
        // 5->u2, 10->u0, 20->u1, 40->u0 before 40->u2 (stable).
        assert_eq!(labels, [2, 0, 1, 0, 2]);
    }

    #[test]
    fn test_clu_oracle() {
        assert_eq!(encode_clu(&[1, 1, 2]), "2\n1\n1\n2\n");
    }

    #[test]
    fn test_clu_round_trip() {
        let labels = vec![1, 3, 2, 1, 1];
        assert_eq!(parse_clu(&encode_clu(&labels)).unwrap(), labels);
    }

    #[test]
    fn test_cut_header_lines() {
        let text = encode_cut(&[1, 2, 1], "session_1");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "n_clusters: 2");
        assert_eq!(lines[1], "n_channels: 4");
        assert_eq!(lines[2], "n_params: 2");
        assert_eq!(lines[3], "times_used_in_Vt:    0    0    0    0");
        assert!(lines[4].starts_with(" cluster: 0 center:"));
        assert!(lines[5].starts_with("               min:"));
        assert!(text.contains("\nExact_cut_for: session_1 spikes: 3\n"));
        assert!(text.ends_with("  1  2  1"));
    }

    #[test]
    fn test_cut_wraps_at_25_labels() {
        let labels: Vec<u32> = (0..60).map(|index| (index % 3) + 1).collect();
        let text = encode_cut(&labels, "session_2");
        let block = text.split("spikes: 60\n").nth(1).unwrap();
        let rows: Vec<&str> = block.split('\n').collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].len(), 25 * 3);
        assert_eq!(rows[1].len(), 25 * 3);
        assert_eq!(rows[2].len(), 10 * 3);
    }

    #[test]
    fn test_cut_round_trip() {
        for len in [0usize, 7, 25, 60] {
            let labels: Vec<u32> = (0..len as u32).map(|index| (index % 4) + 1).collect();
            let text = encode_cut(&labels, "session_1");
            assert_eq!(parse_cut_labels(&text).unwrap(), labels);
        }
    }

    #[test]
    fn test_parse_cut_rejects_count_mismatch() {
        let mut text = encode_cut(&[1, 1, 2], "session_1");
        text.push_str("  9");
        assert!(matches!(
            parse_cut_labels(&text),
            Err(TintError::Format { .. })
        ));
    }
}
