//! Deltas between two samples.

use std::collections::BTreeMap;

use crate::{FlatStats, Scalar};

/// Change of one statistic between two samples.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DeltaEntry {
    /// Value in the second (later) sample.
    pub last_value: Scalar,

    /// Value in the first sample, `None` if the key did not exist yet.
    pub first_value: Option<Scalar>,

    /// `last_value - first_value`; `None` for non-numeric or undefined values.
    pub delta: Option<f64>,

    /// `delta / time_delta`.
    pub rate: Option<f64>,
}

impl DeltaEntry {
    /// Entry for a value that cannot be differenced.
    pub fn undefined(last_value: Scalar, first_value: Option<Scalar>) -> Self {
        Self {
            last_value,
            first_value,
            delta: None,
            rate: None,
        }
    }
}

/// Per-key deltas between two samples plus the interval they span.
///
/// The key set equals the key set of the second sample. With `serde`, the
/// report serializes as one flat object holding the synthetic `timeDelta`
/// key next to every statistic path.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeltaReport {
    /// Seconds between the two samples, from the server's uptime.
    #[cfg_attr(feature = "serde", serde(rename = "timeDelta"))]
    pub time_delta: f64,

    /// Entries keyed by statistic path.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub entries: BTreeMap<String, DeltaEntry>,
}

impl DeltaReport {
    /// Create an empty report for an interval.
    pub fn new(time_delta: f64) -> Self {
        Self {
            time_delta,
            entries: BTreeMap::new(),
        }
    }

    /// Check if the interval is unusable for rates.
    ///
    /// A report over a zero, negative or non-finite interval carries
    /// non-finite rates and should be discarded by consumers.
    pub fn is_degenerate(&self) -> bool {
        !(self.time_delta.is_finite() && self.time_delta > 0.0)
    }

    /// Number of entries (excluding `timeDelta`).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the report has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the entry for a statistic.
    pub fn get(&self, path: &str) -> Option<&DeltaEntry> {
        self.entries.get(path)
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, path: impl Into<String>, entry: DeltaEntry) {
        self.entries.insert(path.into(), entry);
    }

    /// Iterate over entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &DeltaEntry)> {
        self.entries.iter()
    }

    /// Per-second rate of a statistic, if defined.
    pub fn rate(&self, path: &str) -> Option<f64> {
        self.entries.get(path)?.rate
    }

    /// Absolute change of a statistic, if defined.
    pub fn delta(&self, path: &str) -> Option<f64> {
        self.entries.get(path)?.delta
    }
}

/// The raw output of one monitoring interval.
///
/// `finals` is the full map of the second sample, used for point-in-time
/// metrics such as queue lengths.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitoringData {
    pub deltas: DeltaReport,
    pub finals: FlatStats,
}

impl MonitoringData {
    pub fn new(deltas: DeltaReport, finals: FlatStats) -> Self {
        Self { deltas, finals }
    }
}
