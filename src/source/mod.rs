//! Snapshot sources for raw `serverStatus` documents.
//!
//! A [`StatusSource`] hands out one status tree per call. The sampler does
//! not care whether the tree was captured from a live server, read from a
//! file or pushed through a channel by some other task.

mod channel;
mod file;
mod json;
mod replay;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use json::{parse_status, status_from_json};
pub use replay::ReplaySource;

use std::fmt::Debug;

use serverstat_types::StatusTree;

use crate::error::SourceError;

/// Trait for obtaining status trees from various sources.
///
/// # Example
///
/// ```no_run
/// use serverstat::{FileSource, StatusSource};
///
/// let mut source = FileSource::new("serverStatus.json");
/// let tree = source.server_status()?;
/// println!("{} top-level sections", tree.len());
/// # Ok::<(), serverstat::SourceError>(())
/// ```
pub trait StatusSource: Send + Debug {
    /// Fetch the current status tree.
    fn server_status(&mut self) -> Result<StatusTree, SourceError>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;
}
