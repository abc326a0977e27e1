//! File-based status source.
//!
//! Reads a captured `serverStatus` JSON document from disk.

use std::fs;
use std::path::{Path, PathBuf};

use serverstat_types::StatusTree;
use tracing::trace;

use super::{parse_status, StatusSource};
use crate::error::SourceError;

/// A source that reads a status document from a JSON file.
///
/// The file is re-read on every call, so a process that rewrites it between
/// calls (for example a shell script capturing `db.serverStatus()` on a
/// timer) yields a fresh tree each time.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatusSource for FileSource {
    fn server_status(&mut self) -> Result<StatusTree, SourceError> {
        let content = fs::read_to_string(&self.path)?;
        trace!(path = %self.path.display(), bytes = content.len(), "read status file");
        parse_status(&content)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
