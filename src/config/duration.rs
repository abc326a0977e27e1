//! Measurement interval strings ("5s", "1500ms", "250us").

use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Unit suffix to nanoseconds multiplier. Longer suffixes first so that
/// "ms" is not read as "s".
const UNITS: &[(&str, f64)] = &[
    ("ns", 1.0),
    ("µs", 1_000.0),
    ("us", 1_000.0),
    ("ms", 1_000_000.0),
    ("m", 60_000_000_000.0),
    ("s", 1_000_000_000.0),
];

/// Parse an interval such as "5s", "1.5s", "750ms" or "2m".
///
/// A bare number is taken as milliseconds, the unit the server itself uses
/// for `uptimeMillis`.
pub fn parse_interval(s: &str) -> Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        bail!("Empty interval");
    }

    let (number, multiplier) = UNITS
        .iter()
        .find_map(|(suffix, multiplier)| s.strip_suffix(suffix).map(|n| (n, *multiplier)))
        .unwrap_or((s, 1_000_000.0));

    let value: f64 = number
        .trim()
        .parse()
        .with_context(|| format!("Unknown interval format: {}", s))?;
    if !value.is_finite() || value < 0.0 {
        bail!("Interval must be a non-negative duration: {}", s);
    }

    Ok(Duration::from_nanos((value * multiplier).round() as u64))
}

/// Format an interval for log output.
pub fn format_interval(d: Duration) -> String {
    let micros = d.as_micros();
    if micros < 1_000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.1}ms", micros as f64 / 1_000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_interval("5s").unwrap(), Duration::from_secs(5));
        let d = parse_interval("1.5s").unwrap();
        assert!((d.as_secs_f64() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_milliseconds() {
        assert_eq!(parse_interval("750ms").unwrap(), Duration::from_millis(750));
        assert_eq!(parse_interval("5000").unwrap(), Duration::from_secs(5));
    }

    #[test]
    fn test_parse_minutes_and_micros() {
        assert_eq!(parse_interval("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_interval("250us").unwrap(), Duration::from_micros(250));
        assert_eq!(parse_interval("250µs").unwrap(), Duration::from_micros(250));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_interval("").is_err());
        assert!(parse_interval("soon").is_err());
        assert!(parse_interval("-1s").is_err());
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(Duration::from_micros(12)), "12µs");
        assert_eq!(format_interval(Duration::from_millis(250)), "250.0ms");
        assert_eq!(format_interval(Duration::from_secs(60)), "60.00s");
    }
}
