//! Error types for sampling and snapshot retrieval.

use thiserror::Error;

/// Errors raised while obtaining a raw status tree.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Reading the status document failed.
    #[error("Read error: {0}")]
    Read(#[from] std::io::Error),

    /// The status document could not be interpreted as a status tree.
    #[error("Parse error: {0}")]
    Parse(String),

    /// No status document is available yet.
    #[error("No status available: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(err.to_string())
    }
}

/// Errors surfaced by the sampler.
///
/// Missing derived-metric sources and degenerate intervals are not errors:
/// the former are omitted from the report and the latter is reported by
/// `DeltaReport::is_degenerate`.
#[derive(Debug, Error)]
pub enum StatsError {
    /// The snapshot cannot be normalized into rates.
    #[error("Invalid sample: {0}")]
    InvalidSample(String),

    /// The snapshot source failed.
    #[error(transparent)]
    Source(#[from] SourceError),
}
