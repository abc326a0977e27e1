//! Sample - one flattened, rate-annotated view of a status tree.

use std::collections::BTreeMap;

use crate::Scalar;

/// Flattened statistics, keyed by dotted path.
///
/// For example `wiredTiger.cache.bytes currently in the cache`. Every key
/// corresponds to a leaf of the tree it was built from.
pub type FlatStats = BTreeMap<String, Scalar>;

/// A single statistic within a [`Sample`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statistic {
    /// Dotted path of the statistic.
    pub statistic: String,

    /// Value at the time the sample was taken.
    pub value: Scalar,

    /// Average rate over the server's lifetime (value / uptime seconds).
    ///
    /// `None` for non-numeric values and for the uptime fields themselves.
    #[cfg_attr(feature = "serde", serde(rename = "ratePs"))]
    pub rate_ps: Option<f64>,
}

impl Statistic {
    /// Create a statistic with no rate.
    pub fn new(statistic: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            statistic: statistic.into(),
            value: value.into(),
            rate_ps: None,
        }
    }

    /// Attach a per-second rate.
    pub fn with_rate(mut self, rate_ps: f64) -> Self {
        self.rate_ps = Some(rate_ps);
        self
    }
}

/// A point-in-time sample of server statistics.
///
/// Callers should treat `statistics` as a set keyed by
/// [`Statistic::statistic`]; the order carries no meaning.
///
/// # Example
///
/// ```rust
/// use serverstat_types::{Sample, Scalar, Statistic};
///
/// let sample = Sample::new(
///     100.0,
///     vec![
///         Statistic::new("uptime", 100),
///         Statistic::new("network.bytesIn", 1000).with_rate(10.0),
///     ],
/// );
///
/// let map = sample.to_map();
/// assert_eq!(map.get("network.bytesIn"), Some(&Scalar::Int(1000)));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// Server uptime in seconds when the sample was taken.
    #[cfg_attr(feature = "serde", serde(rename = "uptimeSeconds"))]
    pub uptime_secs: f64,

    /// Flattened statistics.
    pub statistics: Vec<Statistic>,
}

impl Sample {
    /// Create a sample from already computed statistics.
    pub fn new(uptime_secs: f64, statistics: Vec<Statistic>) -> Self {
        Self {
            uptime_secs,
            statistics,
        }
    }

    /// Number of statistics in the sample.
    pub fn len(&self) -> usize {
        self.statistics.len()
    }

    /// Check if the sample holds no statistics.
    pub fn is_empty(&self) -> bool {
        self.statistics.is_empty()
    }

    /// Look up a statistic by path.
    pub fn get(&self, path: &str) -> Option<&Statistic> {
        self.statistics.iter().find(|s| s.statistic == path)
    }

    /// Iterate over all statistics.
    pub fn iter(&self) -> impl Iterator<Item = &Statistic> {
        self.statistics.iter()
    }

    /// Project the sample onto a `path -> value` map.
    ///
    /// Every statistic in the sample appears in the result.
    pub fn to_map(&self) -> FlatStats {
        self.statistics
            .iter()
            .map(|s| (s.statistic.clone(), s.value.clone()))
            .collect()
    }
}
