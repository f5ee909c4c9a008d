//! Greedy windowed matching of two spike-timestamp series.
//!
//! The matcher pairs a threshold-detected series against a sorter-detected
//! series for the same tetrode. Both series are consumed front to back:
//! sorter timestamps far enough behind the current threshold timestamp are
//! classified as noise, those within the tolerance window are collected
//! into that threshold timestamp's bucket. An empty bucket marks a spike
//! the sorter missed; a bucket with several entries marks a threshold event
//! the sorter split into multiple detections.

/// Default matching tolerance, in timebase samples.
pub const DEFAULT_TOLERANCE: i64 = 50;

/// One sorter timestamp paired to a threshold timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedSpike {
    /// The sorter-detected timestamp.
    pub timestamp: i64,
    /// Signed distance from the threshold timestamp (sorter - threshold).
    pub offset: i64,
}

/// All sorter timestamps found within tolerance of one threshold timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchBucket {
    /// The threshold-detected timestamp keying this bucket.
    pub threshold_timestamp: i64,
    /// Sorter timestamps within the tolerance window, in series order.
    pub matches: Vec<MatchedSpike>,
}

impl MatchBucket {
    /// The sorter produced no detection for this threshold event.
    #[must_use]
    pub fn is_missed(&self) -> bool {
        self.matches.is_empty()
    }

    /// The sorter split this threshold event into multiple detections.
    #[must_use]
    pub fn is_split(&self) -> bool {
        self.matches.len() > 1
    }

    /// Sum of signed offsets over the bucket.
    #[must_use]
    pub fn summed_offset(&self) -> i64 {
        self.matches.iter().map(|matched| matched.offset).sum()
    }

    /// Sum of absolute offsets over the bucket.
    #[must_use]
    pub fn summed_abs_offset(&self) -> i64 {
        self.matches.iter().map(|matched| matched.offset.abs()).sum()
    }
}

/// Result of matching one threshold series against one sorter series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    /// One bucket per processed threshold timestamp, in input order.
    pub buckets: Vec<MatchBucket>,
    /// Sorter timestamps discarded as noise while scanning forward.
    pub noise_count: usize,
}

impl MatchOutcome {
    /// Buckets that received at least one match.
    pub fn matched_buckets(&self) -> impl Iterator<Item = &MatchBucket> {
        self.buckets.iter().filter(|bucket| !bucket.is_missed())
    }
}

/// Match a threshold-detected timestamp series against a sorter-detected
/// one.
///
/// Both inputs must be ascending; this is debug-asserted. The scan is a
/// two-pointer pass: for each threshold timestamp, sorter timestamps more
/// than `tolerance` behind are counted as noise and discarded, then every
/// sorter timestamp within `[-tolerance, tolerance]` (inclusive) is
/// consumed into the bucket. Processing stops once either series is
/// exhausted; sorter timestamps left over at that point are not counted as
/// noise.
#[must_use]
pub fn match_timestamps(threshold: &[i64], sorter: &[i64], tolerance: i64) -> MatchOutcome {
    debug_assert!(threshold.is_sorted(), "threshold series must be ascending");
    debug_assert!(sorter.is_sorted(), "sorter series must be ascending");

    let mut buckets = Vec::with_capacity(threshold.len());
    let mut noise_count = 0;
    let mut next = 0;

    for &threshold_timestamp in threshold {
        if next >= sorter.len() {
            break;
        }
        while next < sorter.len() && sorter[next] - threshold_timestamp < -tolerance {
            noise_count += 1;
            next += 1;
        }
        let mut matches = Vec::new();
        while next < sorter.len() && (sorter[next] - threshold_timestamp).abs() <= tolerance {
            matches.push(MatchedSpike {
                timestamp: sorter[next],
                offset: sorter[next] - threshold_timestamp,
            });
            next += 1;
        }
        buckets.push(MatchBucket {
            threshold_timestamp,
            matches,
        });
    }

    MatchOutcome {
        buckets,
        noise_count,
    }
}
