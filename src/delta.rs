//! Deltas and interval rates between two samples.

use serde::Deserialize;
use serverstat_types::{DeltaEntry, DeltaReport, Sample, Scalar};
use tracing::warn;

/// How a key that exists only in the second sample is differenced.
///
/// Metric sets drift between server versions and across restarts, so a key
/// may appear between two samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingKeyPolicy {
    /// The first value is unknown: `delta` and `rate` are `None`.
    #[default]
    Undefined,
    /// The first value is taken as `0`.
    Zero,
}

/// Compute per-key deltas between two samples.
///
/// The report covers exactly the keys of `second`. Keys that only exist in
/// `first` are dropped. The interval comes from the samples' uptime; when it
/// is not positive the report is still built but
/// [`DeltaReport::is_degenerate`] is set and its rates are not finite.
pub fn delta(first: &Sample, second: &Sample, policy: MissingKeyPolicy) -> DeltaReport {
    let before = first.to_map();
    let time_delta = second.uptime_secs - first.uptime_secs;

    let mut report = DeltaReport::new(time_delta);
    if report.is_degenerate() {
        warn!(
            time_delta,
            "samples do not span a positive interval; rates are not meaningful"
        );
    }

    for stat in second.iter() {
        let first_value = before.get(&stat.statistic).cloned();
        let entry = delta_entry(stat.value.clone(), first_value, time_delta, policy);
        report.insert(stat.statistic.clone(), entry);
    }
    report
}

fn delta_entry(
    last_value: Scalar,
    first_value: Option<Scalar>,
    time_delta: f64,
    policy: MissingKeyPolicy,
) -> DeltaEntry {
    let Some(last) = last_value.as_f64() else {
        return DeltaEntry::undefined(last_value, first_value);
    };

    let first = match (&first_value, policy) {
        (Some(value), _) => value.as_f64(),
        (None, MissingKeyPolicy::Zero) => Some(0.0),
        (None, MissingKeyPolicy::Undefined) => None,
    };

    match first {
        Some(first) => {
            let delta = last - first;
            DeltaEntry {
                last_value,
                first_value,
                delta: Some(delta),
                rate: Some(delta / time_delta),
            }
        }
        None => DeltaEntry::undefined(last_value, first_value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serverstat_types::Statistic;

    fn sample(uptime: f64, stats: Vec<(&str, Scalar)>) -> Sample {
        Sample::new(
            uptime,
            stats
                .into_iter()
                .map(|(k, v)| Statistic::new(k, v))
                .collect(),
        )
    }

    #[test]
    fn test_end_to_end_bytes_in() {
        let a = sample(100.0, vec![("uptime", 100.into()), ("network.bytesIn", 1000.into())]);
        let b = sample(160.0, vec![("uptime", 160.into()), ("network.bytesIn", 7000.into())]);

        let report = delta(&a, &b, MissingKeyPolicy::Undefined);

        assert_eq!(report.time_delta, 60.0);
        let entry = report.get("network.bytesIn").unwrap();
        assert_eq!(entry.first_value, Some(Scalar::Int(1000)));
        assert_eq!(entry.last_value, Scalar::Int(7000));
        assert_eq!(entry.delta, Some(6000.0));
        assert_eq!(entry.rate, Some(100.0));
    }

    #[test]
    fn test_delta_correctness_for_shared_numeric_keys() {
        let a = sample(10.0, vec![("a", 5.into()), ("b", 2.5.into()), ("c", 100.into())]);
        let b = sample(14.0, vec![("a", 25.into()), ("b", 4.5.into()), ("c", 80.into())]);

        let report = delta(&a, &b, MissingKeyPolicy::Undefined);
        for (key, expected) in [("a", 20.0), ("b", 2.0), ("c", -20.0)] {
            let entry = report.get(key).unwrap();
            assert_eq!(entry.delta, Some(expected));
            assert_eq!(entry.rate, Some(expected / 4.0));
        }
    }

    #[test]
    fn test_key_set_follows_second_sample() {
        let a = sample(1.0, vec![("kept", 1.into()), ("removed", 1.into())]);
        let b = sample(2.0, vec![("kept", 2.into()), ("added", 3.into())]);

        let report = delta(&a, &b, MissingKeyPolicy::Undefined);
        let keys: Vec<_> = report.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["added", "kept"]);
    }

    #[test]
    fn test_added_key_is_undefined_by_default() {
        let a = sample(1.0, vec![]);
        let b = sample(2.0, vec![("added", 3.into())]);

        let entry = delta(&a, &b, MissingKeyPolicy::Undefined)
            .get("added")
            .cloned()
            .unwrap();
        assert_eq!(entry.first_value, None);
        assert_eq!(entry.delta, None);
        assert_eq!(entry.rate, None);
    }

    #[test]
    fn test_added_key_as_zero() {
        let a = sample(1.0, vec![]);
        let b = sample(3.0, vec![("added", 8.into())]);

        let report = delta(&a, &b, MissingKeyPolicy::Zero);
        let entry = report.get("added").unwrap();
        assert_eq!(entry.first_value, None);
        assert_eq!(entry.delta, Some(8.0));
        assert_eq!(entry.rate, Some(4.0));
    }

    #[test]
    fn test_non_numeric_values_have_no_delta() {
        let a = sample(1.0, vec![("engine", "wiredTiger".into()), ("flip", 1.into())]);
        let b = sample(2.0, vec![("engine", "wiredTiger".into()), ("flip", true.into())]);

        let report = delta(&a, &b, MissingKeyPolicy::Zero);
        assert_eq!(report.get("engine").unwrap().delta, None);
        assert_eq!(report.get("flip").unwrap().rate, None);
    }

    #[test]
    fn test_type_change_is_undefined() {
        let a = sample(1.0, vec![("state", "starting".into())]);
        let b = sample(2.0, vec![("state", 1.into())]);

        let entry = delta(&a, &b, MissingKeyPolicy::Zero).get("state").cloned().unwrap();
        assert_eq!(entry.first_value, Some(Scalar::from("starting")));
        assert_eq!(entry.delta, None);
    }

    #[test]
    fn test_degenerate_interval_does_not_panic() {
        let a = sample(50.0, vec![("ops", 10.into())]);
        let b = sample(50.0, vec![("ops", 20.into())]);

        let report = delta(&a, &b, MissingKeyPolicy::Undefined);
        assert!(report.is_degenerate());
        assert_eq!(report.delta("ops"), Some(10.0));
        assert!(!report.rate("ops").unwrap().is_finite());
    }
}
