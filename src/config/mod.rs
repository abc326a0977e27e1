//! Settings for sampling and differencing.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `SERVERSTAT_*` environment variables.
//!
//! ```toml
//! handle_marker = "_mongo"
//! uptime_millis_key = "uptimeMillis"
//! uptime_key = "uptime"
//! missing_first = "undefined"   # or "zero"
//! interval = "5s"
//! ```

pub mod duration;

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::delta::MissingKeyPolicy;
use crate::sampler::SampleOptions;

pub use duration::{format_interval, parse_interval};

/// Prefix for environment overrides, e.g. `SERVERSTAT_MISSING_FIRST=zero`.
pub const ENV_PREFIX: &str = "SERVERSTAT";

/// Field name the shell uses for its connection handle.
pub const DEFAULT_HANDLE_MARKER: &str = "_mongo";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Field name (and path substring) excluded from every sample.
    pub handle_marker: String,
    /// Preferred uptime field, in milliseconds.
    pub uptime_millis_key: String,
    /// Fallback uptime field, in seconds.
    pub uptime_key: String,
    /// How keys absent from the first sample are differenced.
    pub missing_first: MissingKeyPolicy,
    /// Default measurement interval.
    pub interval: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            handle_marker: DEFAULT_HANDLE_MARKER.to_string(),
            uptime_millis_key: "uptimeMillis".to_string(),
            uptime_key: "uptime".to_string(),
            missing_first: MissingKeyPolicy::default(),
            interval: "5s".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        // Fail at load time rather than on the first measurement.
        settings.interval()?;
        Ok(settings)
    }

    /// The parsed measurement interval.
    pub fn interval(&self) -> Result<Duration> {
        parse_interval(&self.interval)
    }

    /// Options for the sampler.
    pub fn sample_options(&self) -> SampleOptions {
        SampleOptions {
            handle_marker: self.handle_marker.clone(),
            uptime_millis_key: self.uptime_millis_key.clone(),
            uptime_key: self.uptime_key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn toml_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.handle_marker, "_mongo");
        assert_eq!(settings.missing_first, MissingKeyPolicy::Undefined);
        assert_eq!(settings.interval().unwrap(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_file_overrides_defaults() {
        let file = toml_file(
            r#"
            handle_marker = "_conn"
            missing_first = "zero"
            interval = "1500ms"
            "#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.handle_marker, "_conn");
        assert_eq!(settings.missing_first, MissingKeyPolicy::Zero);
        assert_eq!(settings.interval().unwrap(), Duration::from_millis(1500));
        assert_eq!(settings.uptime_millis_key, "uptimeMillis");
    }

    #[test]
    fn test_load_rejects_bad_interval() {
        let file = toml_file(r#"interval = "whenever""#);
        assert!(Settings::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(Settings::load(Some(Path::new("/nonexistent/serverstat.toml"))).is_err());
    }

    #[test]
    fn test_environment_override() {
        std::env::set_var("SERVERSTAT_UPTIME_KEY", "uptimeSecs");
        let settings = Settings::load(None).unwrap();
        std::env::remove_var("SERVERSTAT_UPTIME_KEY");

        assert_eq!(settings.uptime_key, "uptimeSecs");
    }

    #[test]
    fn test_sample_options() {
        let options = Settings::default().sample_options();
        assert_eq!(options.handle_marker, "_mongo");
        assert_eq!(options.uptime_key, "uptime");
    }
}
