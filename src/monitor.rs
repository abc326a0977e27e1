//! Two-sample monitoring: sample, wait, sample again, difference.

use std::time::Duration;

use serverstat_types::{DerivedMetrics, MonitoringData, Sample};
use tracing::{debug, info};

use crate::config::{format_interval, Settings};
use crate::delta::{delta, MissingKeyPolicy};
use crate::derived::derive;
use crate::error::StatsError;
use crate::sampler::Sampler;
use crate::search::Search;
use crate::source::StatusSource;

/// Difference two samples into monitoring data.
///
/// `finals` is the full map of `second`.
pub fn compare(first: &Sample, second: &Sample, policy: MissingKeyPolicy) -> MonitoringData {
    MonitoringData::new(delta(first, second, policy), second.to_map())
}

/// Measures a server over an interval.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use serverstat::{KeyStats, Monitor, ReplaySource, StatusTree};
///
/// let capture = |millis: i64, queries: i64| {
///     StatusTree::builder()
///         .long("uptimeMillis", millis)
///         .document("opcounters", |o| o.field("query", queries))
///         .build()
/// };
/// let source = ReplaySource::new([capture(10_000, 100), capture(12_000, 300)]);
///
/// let data = Monitor::new(source).measure(Duration::ZERO)?;
/// assert_eq!(data.derived().get("queryPS"), Some(100.0));
/// # Ok::<(), serverstat::StatsError>(())
/// ```
#[derive(Debug)]
pub struct Monitor<S> {
    sampler: Sampler<S>,
    policy: MissingKeyPolicy,
    interval: Duration,
}

impl<S: StatusSource> Monitor<S> {
    /// Monitor with default settings.
    pub fn new(source: S) -> Self {
        Self {
            sampler: Sampler::new(source),
            policy: MissingKeyPolicy::default(),
            interval: Duration::from_secs(5),
        }
    }

    pub fn from_settings(source: S, settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self {
            sampler: Sampler::with_options(source, settings.sample_options()),
            policy: settings.missing_first,
            interval: settings.interval()?,
        })
    }

    pub fn with_policy(mut self, policy: MissingKeyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The configured interval, for [`Monitor::measure_default`].
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn sampler(&self) -> &Sampler<S> {
        &self.sampler
    }

    /// Sample, block for `interval`, sample again.
    pub fn measure(&mut self, interval: Duration) -> Result<MonitoringData, StatsError> {
        let first = self.sampler.sample()?;
        self.log_wait(interval);
        std::thread::sleep(interval);
        let second = self.sampler.sample()?;
        Ok(self.finish(&first, &second))
    }

    /// [`Monitor::measure`] over the configured interval.
    pub fn measure_default(&mut self) -> Result<MonitoringData, StatsError> {
        self.measure(self.interval)
    }

    /// Like [`Monitor::measure`], but waits with `tokio::time::sleep`.
    pub async fn measure_async(&mut self, interval: Duration) -> Result<MonitoringData, StatsError> {
        let first = self.sampler.sample()?;
        self.log_wait(interval);
        tokio::time::sleep(interval).await;
        let second = self.sampler.sample()?;
        Ok(self.finish(&first, &second))
    }

    fn log_wait(&self, interval: Duration) {
        debug!(
            source = self.sampler.source().description(),
            interval = %format_interval(interval),
            "waiting for second sample"
        );
    }

    fn finish(&self, first: &Sample, second: &Sample) -> MonitoringData {
        let data = compare(first, second, self.policy);
        info!(
            source = self.sampler.source().description(),
            time_delta = data.deltas.time_delta,
            statistics = data.deltas.len(),
            "measured interval"
        );
        data
    }
}

/// Derived views of monitoring data.
pub trait KeyStats {
    /// All derived metrics.
    fn derived(&self) -> DerivedMetrics;

    /// Derived metrics whose name matches `pattern`.
    fn key_stats(&self, pattern: &str) -> DerivedMetrics {
        self.derived().search(pattern)
    }
}

impl KeyStats for MonitoringData {
    fn derived(&self) -> DerivedMetrics {
        derive(&self.deltas, &self.finals)
    }
}
