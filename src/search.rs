//! Key filtering for flat statistic maps.
//!
//! Patterns are regular expressions. A pattern that does not compile is
//! matched as a literal substring instead, so searching never fails.

use std::collections::BTreeMap;

use regex::Regex;
use serverstat_types::{DeltaReport, DerivedMetrics, MonitoringData};
use tracing::debug;

/// Compiled key pattern.
#[derive(Debug, Clone)]
pub enum KeyFilter {
    /// Matches every key.
    All,
    Regex(Regex),
    /// Fallback for patterns that are not valid regular expressions.
    Substring(String),
}

impl KeyFilter {
    pub fn new(pattern: &str) -> Self {
        if pattern.is_empty() {
            return KeyFilter::All;
        }
        match Regex::new(pattern) {
            Ok(re) => KeyFilter::Regex(re),
            Err(e) => {
                debug!(pattern, error = %e, "invalid pattern, matching as substring");
                KeyFilter::Substring(pattern.to_string())
            }
        }
    }

    pub fn matches(&self, key: &str) -> bool {
        match self {
            KeyFilter::All => true,
            KeyFilter::Regex(re) => re.is_match(key),
            KeyFilter::Substring(s) => key.contains(s.as_str()),
        }
    }

    /// Copy of the entries whose key matches.
    pub fn filter<V: Clone>(&self, map: &BTreeMap<String, V>) -> BTreeMap<String, V> {
        map.iter()
            .filter(|(key, _)| self.matches(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// Entries of `map` whose key matches `pattern`.
pub fn search<V: Clone>(map: &BTreeMap<String, V>, pattern: &str) -> BTreeMap<String, V> {
    KeyFilter::new(pattern).filter(map)
}

/// Key search over the engine's result types.
pub trait Search {
    fn search(&self, pattern: &str) -> Self;
}

impl Search for DeltaReport {
    /// The interval is kept; only entries are filtered.
    fn search(&self, pattern: &str) -> Self {
        DeltaReport {
            time_delta: self.time_delta,
            entries: search(&self.entries, pattern),
        }
    }
}

impl Search for DerivedMetrics {
    fn search(&self, pattern: &str) -> Self {
        DerivedMetrics {
            values: search(&self.values, pattern),
        }
    }
}

impl Search for MonitoringData {
    /// Filters deltas and finals with the same pattern.
    fn search(&self, pattern: &str) -> Self {
        let filter = KeyFilter::new(pattern);
        MonitoringData {
            deltas: DeltaReport {
                time_delta: self.deltas.time_delta,
                entries: filter.filter(&self.deltas.entries),
            },
            finals: filter.filter(&self.finals),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serverstat_types::{DeltaEntry, FlatStats, Scalar};

    fn metrics() -> DerivedMetrics {
        let mut m = DerivedMetrics::new();
        m.insert("queryPS", 10.0);
        m.insert("insertPS", 2.0);
        m.insert("netKBInPS", 4.5);
        m.insert("wtHitRate", 99.0);
        m
    }

    #[test]
    fn test_regex_filter() {
        let found = metrics().search("PS$");
        let keys: Vec<_> = found.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["insertPS", "netKBInPS", "queryPS"]);
    }

    #[test]
    fn test_search_is_exact_subset() {
        let all = metrics();
        let found = all.search("^(query|wt)");
        for (key, value) in all.iter() {
            let matches = key.starts_with("query") || key.starts_with("wt");
            assert_eq!(found.get(key), matches.then_some(*value));
        }
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(metrics().search("latency").is_empty());
    }

    #[test]
    fn test_empty_pattern_matches_all() {
        assert_eq!(metrics().search(""), metrics());
    }

    #[test]
    fn test_invalid_regex_falls_back_to_substring() {
        let mut map = BTreeMap::new();
        map.insert("wiredTiger.cache.pages read into cache".to_string(), 1);
        map.insert("opcounters(query".to_string(), 2);

        assert!(matches!(KeyFilter::new("("), KeyFilter::Substring(_)));
        let found = search(&map, "s(q");
        assert_eq!(found.len(), 1);
        assert!(found.contains_key("opcounters(query"));
    }

    #[test]
    fn test_raw_search_filters_deltas_and_finals() {
        let mut deltas = DeltaReport::new(5.0);
        deltas.insert("opcounters.query", DeltaEntry::undefined(Scalar::Int(1), None));
        deltas.insert("network.bytesIn", DeltaEntry::undefined(Scalar::Int(2), None));
        let mut finals = FlatStats::new();
        finals.insert("opcounters.query".into(), Scalar::Int(1));
        finals.insert("network.bytesIn".into(), Scalar::Int(2));

        let found = MonitoringData::new(deltas, finals).search("opcounters");

        assert_eq!(found.deltas.time_delta, 5.0);
        assert_eq!(found.deltas.len(), 1);
        assert!(found.deltas.get("opcounters.query").is_some());
        assert_eq!(found.finals.keys().collect::<Vec<_>>(), vec!["opcounters.query"]);
    }
}
