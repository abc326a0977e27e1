//! Derived metrics - named, human-meaningful statistics.

use std::collections::BTreeMap;
use std::fmt;

/// Named derived metrics computed from a monitoring interval.
///
/// Values are plain `f64`s. When serialized, integral values are written as
/// JSON integers so that a count of `42` reads `42` rather than `42.0`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DerivedMetrics {
    pub values: BTreeMap<String, f64>,
}

impl DerivedMetrics {
    /// Create an empty set of metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of metrics.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no metric could be derived.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a metric by name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Check if a metric is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Insert or replace a metric.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Iterate over metrics in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.values.iter()
    }
}

/// Integral values that fit an `i64` are shown without a fraction.
fn as_integer(value: f64) -> Option<i64> {
    let in_range = value >= i64::MIN as f64 && value <= i64::MAX as f64;
    (value.is_finite() && value.fract() == 0.0 && in_range).then_some(value as i64)
}

impl fmt::Display for DerivedMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.values {
            match as_integer(*value) {
                Some(v) => writeln!(f, "{:<24} {}", name, v)?,
                None => writeln!(f, "{:<24} {}", name, value)?,
            }
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DerivedMetrics {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            match as_integer(*value) {
                Some(v) => map.serialize_entry(name, &v)?,
                None => map.serialize_entry(name, value)?,
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let mut metrics = DerivedMetrics::new();
        assert!(metrics.is_empty());

        metrics.insert("queryPS", 12.3457);
        metrics.insert("connections", 42.0);

        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics.get("queryPS"), Some(12.3457));
        assert!(metrics.contains("connections"));
        assert!(metrics.get("insertPS").is_none());
    }

    #[test]
    fn test_display_integral_without_fraction() {
        let mut metrics = DerivedMetrics::new();
        metrics.insert("connections", 42.0);
        metrics.insert("wtHitRate", 99.5);

        let text = metrics.to_string();
        assert!(text.contains("connections"));
        assert!(text.contains(" 42\n"));
        assert!(text.contains(" 99.5\n"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_integral_as_integer() {
        let mut metrics = DerivedMetrics::new();
        metrics.insert("connections", 42.0);
        metrics.insert("queryPS", 12.3457);

        let json = serde_json::to_string(&metrics).unwrap();
        assert_eq!(json, r#"{"connections":42,"queryPS":12.3457}"#);

        let parsed: DerivedMetrics = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, metrics);
    }
}
