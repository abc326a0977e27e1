//! Rate-annotated samples of a server's status.

use serverstat_types::{FlatStats, Sample, StatusTree, Statistic};
use tracing::debug;

use crate::config::DEFAULT_HANDLE_MARKER;
use crate::derived::round_metric;
use crate::error::StatsError;
use crate::flatten::Flattener;
use crate::source::StatusSource;

/// Field names used while sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleOptions {
    /// Field name excluded by the flattener, and path substring excluded
    /// from the sample.
    pub handle_marker: String,
    /// Uptime in milliseconds (sub-second precision). Preferred.
    pub uptime_millis_key: String,
    /// Uptime in seconds. Used when the millisecond field is absent.
    pub uptime_key: String,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            handle_marker: DEFAULT_HANDLE_MARKER.to_string(),
            uptime_millis_key: "uptimeMillis".to_string(),
            uptime_key: "uptime".to_string(),
        }
    }
}

impl SampleOptions {
    fn is_uptime_key(&self, key: &str) -> bool {
        key == self.uptime_millis_key || key == self.uptime_key
    }

    /// Server uptime in seconds, from the flattened status.
    fn uptime_secs(&self, stats: &FlatStats) -> Result<f64, StatsError> {
        let uptime = stats
            .get(&self.uptime_millis_key)
            .and_then(|v| v.as_f64())
            .map(|ms| ms / 1000.0)
            .or_else(|| stats.get(&self.uptime_key).and_then(|v| v.as_f64()))
            .ok_or_else(|| {
                StatsError::InvalidSample(format!(
                    "status has no numeric '{}' or '{}' field",
                    self.uptime_millis_key, self.uptime_key
                ))
            })?;

        if !(uptime.is_finite() && uptime > 0.0) {
            return Err(StatsError::InvalidSample(format!(
                "server uptime must be positive, got {}",
                uptime
            )));
        }
        Ok(uptime)
    }
}

/// Takes samples from a [`StatusSource`].
///
/// Each call to [`Sampler::sample`] fetches one status tree, flattens it and
/// annotates every numeric statistic with its lifetime average rate.
#[derive(Debug)]
pub struct Sampler<S> {
    source: S,
    options: SampleOptions,
}

impl<S: StatusSource> Sampler<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, SampleOptions::default())
    }

    pub fn with_options(source: S, options: SampleOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &SampleOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Take a sample now.
    pub fn sample(&mut self) -> Result<Sample, StatsError> {
        let tree = self.source.server_status()?;
        let sample = sample_tree(&self.options, &tree)?;
        debug!(
            source = self.source.description(),
            statistics = sample.len(),
            uptime_secs = sample.uptime_secs,
            "sampled server status"
        );
        Ok(sample)
    }
}

/// Build a sample from an already retrieved tree.
pub fn sample_tree(options: &SampleOptions, tree: &StatusTree) -> Result<Sample, StatsError> {
    let stats = Flattener::new(options.handle_marker.as_str()).flatten(tree);
    let uptime_secs = options.uptime_secs(&stats)?;
    let marker = options.handle_marker.as_str();

    let statistics = stats
        .into_iter()
        .filter(|(key, _)| marker.is_empty() || !key.contains(marker))
        .map(|(key, value)| {
            let rate_ps = if options.is_uptime_key(&key) {
                None
            } else {
                value.as_f64().map(|v| round_metric(v / uptime_secs))
            };
            Statistic {
                statistic: key,
                value,
                rate_ps,
            }
        })
        .collect();

    Ok(Sample::new(uptime_secs, statistics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use serverstat_types::Scalar;

    #[derive(Debug)]
    struct Fixed(Option<StatusTree>);

    impl StatusSource for Fixed {
        fn server_status(&mut self) -> Result<StatusTree, SourceError> {
            self.0
                .clone()
                .ok_or_else(|| SourceError::Unavailable("fixed".into()))
        }

        fn description(&self) -> &str {
            "fixed"
        }
    }

    fn status() -> StatusTree {
        StatusTree::builder()
            .field("uptime", 100)
            .field("uptimeMillis", 100_500)
            .field("version", "7.0.2")
            .document("opcounters", |o| o.field("query", 201).long("insert", 1005))
            .document("metrics", |m| {
                m.document("cursor", |c| c.field("shell_mongo_handles", 4))
            })
            .build()
    }

    #[test]
    fn test_rates_use_millisecond_uptime() {
        let sample = Sampler::new(Fixed(Some(status()))).sample().unwrap();

        assert!((sample.uptime_secs - 100.5).abs() < 1e-9);
        let query = sample.get("opcounters.query").unwrap();
        assert_eq!(query.value, Scalar::Int(201));
        assert!((query.rate_ps.unwrap() - 2.0).abs() < 1e-9);
        let insert = sample.get("opcounters.insert").unwrap();
        assert!((insert.rate_ps.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_rates_rounded_to_four_decimals() {
        let tree = StatusTree::builder()
            .field("uptime", 3)
            .document("opcounters", |o| o.field("query", 100).field("insert", 30))
            .build();

        let sample = sample_tree(&SampleOptions::default(), &tree).unwrap();
        assert_eq!(sample.get("opcounters.query").unwrap().rate_ps, Some(33.3333));
        assert_eq!(sample.get("opcounters.insert").unwrap().rate_ps, Some(10.0));
    }

    #[test]
    fn test_non_numeric_and_uptime_have_no_rate() {
        let sample = Sampler::new(Fixed(Some(status()))).sample().unwrap();

        assert!(sample.get("version").unwrap().rate_ps.is_none());
        assert!(sample.get("uptime").unwrap().rate_ps.is_none());
        assert!(sample.get("uptimeMillis").unwrap().rate_ps.is_none());
    }

    #[test]
    fn test_falls_back_to_uptime_seconds() {
        let tree = StatusTree::builder()
            .field("uptime", 100)
            .document("network", |n| n.field("bytesIn", 1000))
            .build();

        let sample = sample_tree(&SampleOptions::default(), &tree).unwrap();
        assert_eq!(sample.uptime_secs, 100.0);
        assert_eq!(sample.get("network.bytesIn").unwrap().rate_ps, Some(10.0));
    }

    #[test]
    fn test_marker_substring_excluded() {
        let sample = Sampler::new(Fixed(Some(status()))).sample().unwrap();
        assert!(sample.get("metrics.cursor.shell_mongo_handles").is_none());
        assert!(sample.iter().all(|s| !s.statistic.contains("_mongo")));
    }

    #[test]
    fn test_missing_uptime_is_invalid() {
        let tree = StatusTree::builder()
            .document("opcounters", |o| o.field("query", 1))
            .build();

        let err = Sampler::new(Fixed(Some(tree))).sample().unwrap_err();
        assert!(matches!(err, StatsError::InvalidSample(_)));
    }

    #[test]
    fn test_non_numeric_uptime_is_invalid() {
        let tree = StatusTree::builder().field("uptime", "a while").build();
        let err = sample_tree(&SampleOptions::default(), &tree).unwrap_err();
        assert!(matches!(err, StatsError::InvalidSample(_)));
    }

    #[test]
    fn test_zero_uptime_is_invalid() {
        let tree = StatusTree::builder().field("uptimeMillis", 0).build();
        let err = sample_tree(&SampleOptions::default(), &tree).unwrap_err();
        assert!(matches!(err, StatsError::InvalidSample(_)));
    }

    #[test]
    fn test_source_error_surfaces() {
        let err = Sampler::new(Fixed(None)).sample().unwrap_err();
        assert!(matches!(err, StatsError::Source(SourceError::Unavailable(_))));
    }
}
