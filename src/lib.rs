//! # serverstat
//!
//! Sampling, differencing and derived metrics for MongoDB `serverStatus`
//! documents.
//!
//! A status document is a deep tree of counters and gauges. This crate
//! flattens it into dotted paths, annotates every numeric value with its
//! lifetime rate, differences two samples taken some seconds apart and
//! turns the result into a fixed set of human-meaningful metrics such as
//! `queryPS`, `readLatencyMs` or `wtHitRate`.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  ┌─────────┐    ┌─────────┐    ┌─────────┐    ┌─────────┐      │
//! │  │ source  │───▶│ flatten │───▶│ sampler │───▶│  delta  │      │
//! │  │ (input) │    │ (paths) │    │ (rates) │    │(interval)      │
//! │  └─────────┘    └─────────┘    └─────────┘    └────┬────┘      │
//! │       ▲                                            │           │
//! │       │                                            ▼           │
//! │  FileSource | ChannelSource |          ┌─────────┐  ┌────────┐ │
//! │  ReplaySource                          │ derived │─▶│ search │ │
//! │                                        └─────────┘  └────────┘ │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: [`StatusSource`] trait with file, channel and replay
//!   implementations, plus Extended JSON parsing
//! - **[`flatten`]**: nested tree to `{ "a.b.c": value }`
//! - **[`sampler`]**: flattened statistics with per-second rates over uptime
//! - **[`delta`]**: per-key change and rate between two samples
//! - **[`derived`]**: named metrics with alias resolution and safe division
//! - **[`search`]**: regex key filtering over any of the above
//! - **[`monitor`]**: sample, wait, sample, difference
//!
//! ## Usage
//!
//! ### Differencing two captures
//!
//! ```
//! use serverstat::{compare, sample_tree, KeyStats, MissingKeyPolicy, SampleOptions, StatusTree};
//!
//! let capture = |uptime: i64, bytes_in: i64| {
//!     StatusTree::builder()
//!         .field("uptime", uptime)
//!         .document("network", |n| n.long("bytesIn", bytes_in))
//!         .build()
//! };
//!
//! let options = SampleOptions::default();
//! let first = sample_tree(&options, &capture(100, 1000))?;
//! let second = sample_tree(&options, &capture(160, 7000))?;
//!
//! let data = compare(&first, &second, MissingKeyPolicy::Undefined);
//! assert_eq!(data.deltas.time_delta, 60.0);
//! assert_eq!(data.deltas.rate("network.bytesIn"), Some(100.0));
//! assert_eq!(data.key_stats("netKB").get("netKBInPS"), Some(0.0977));
//! # Ok::<(), serverstat::StatsError>(())
//! ```
//!
//! ### Monitoring a live feed
//!
//! ```no_run
//! use std::time::Duration;
//! use serverstat::{ChannelSource, KeyStats, Monitor};
//!
//! # tokio_test::block_on(async {
//! let (tx, source) = ChannelSource::create("db1:27017");
//! // another task sends `Some(tree)` on `tx` whenever it polls the server
//! # drop(tx);
//! let mut monitor = Monitor::new(source);
//! let data = monitor.measure_async(Duration::from_secs(5)).await?;
//! println!("{}", data.key_stats("PS$"));
//! # Ok::<(), serverstat::StatsError>(())
//! # });
//! ```

pub mod config;
pub mod delta;
pub mod derived;
pub mod error;
pub mod flatten;
pub mod monitor;
pub mod sampler;
pub mod search;
pub mod source;

// Re-export main types for convenience
pub use crate::config::Settings;
pub use delta::{delta, MissingKeyPolicy};
pub use derived::derive;
pub use error::{SourceError, StatsError};
pub use flatten::{flatten, Flattener};
pub use monitor::{compare, KeyStats, Monitor};
pub use sampler::{sample_tree, SampleOptions, Sampler};
pub use search::{search, KeyFilter, Search};
pub use source::{
    parse_status, status_from_json, ChannelSource, FileSource, ReplaySource, StatusSource,
};
pub use serverstat_types::*;
