//! Replay of previously captured status trees.

use std::collections::VecDeque;

use serverstat_types::StatusTree;

use super::StatusSource;
use crate::error::SourceError;

/// A source that hands out a fixed sequence of trees, one per call.
///
/// Useful for computing deltas between two historical captures.
#[derive(Debug, Default)]
pub struct ReplaySource {
    trees: VecDeque<StatusTree>,
    description: String,
}

impl ReplaySource {
    pub fn new(trees: impl IntoIterator<Item = StatusTree>) -> Self {
        let trees: VecDeque<_> = trees.into_iter().collect();
        let description = format!("replay: {} captures", trees.len());
        Self { trees, description }
    }

    /// Captures not yet returned.
    pub fn remaining(&self) -> usize {
        self.trees.len()
    }
}

impl StatusSource for ReplaySource {
    fn server_status(&mut self) -> Result<StatusTree, SourceError> {
        self.trees
            .pop_front()
            .ok_or_else(|| SourceError::Unavailable("replay exhausted".to_string()))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_in_order_then_exhausts() {
        let first = StatusTree::builder().field("uptime", 1).build();
        let second = StatusTree::builder().field("uptime", 2).build();
        let mut source = ReplaySource::new([first.clone(), second.clone()]);

        assert_eq!(source.description(), "replay: 2 captures");
        assert_eq!(source.server_status().unwrap(), first);
        assert_eq!(source.server_status().unwrap(), second);
        assert_eq!(source.remaining(), 0);
        assert!(matches!(
            source.server_status(),
            Err(SourceError::Unavailable(_))
        ));
    }
}
