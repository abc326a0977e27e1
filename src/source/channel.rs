//! Channel-based status source.
//!
//! Receives status trees via a tokio watch channel, for setups where another
//! task owns the database connection and pushes fresh documents.

use serverstat_types::StatusTree;
use tokio::sync::watch;

use super::StatusSource;
use crate::error::SourceError;

/// A source that returns the latest tree pushed through a channel.
///
/// # Example
///
/// ```
/// use serverstat::{ChannelSource, StatusSource, StatusTree};
///
/// let (tx, mut source) = ChannelSource::create("shell");
/// assert!(source.server_status().is_err());
///
/// tx.send(Some(StatusTree::builder().field("uptime", 10).build())).unwrap();
/// assert!(source.server_status().is_ok());
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<Option<StatusTree>>,
    description: String,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// * `receiver` - The receiving end of a watch channel
    /// * `source_description` - Where the trees come from (e.g. a host name)
    pub fn new(receiver: watch::Receiver<Option<StatusTree>>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
        }
    }

    /// Create a channel pair. Nothing is available until the first send.
    pub fn create(source_description: &str) -> (watch::Sender<Option<StatusTree>>, Self) {
        let (tx, rx) = watch::channel(None);
        (tx, Self::new(rx, source_description))
    }
}

impl StatusSource for ChannelSource {
    fn server_status(&mut self) -> Result<StatusTree, SourceError> {
        self.receiver
            .borrow_and_update()
            .clone()
            .ok_or_else(|| SourceError::Unavailable(self.description.clone()))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serverstat_types::StatusValue;

    #[test]
    fn test_channel_source_latest_value() {
        let (tx, mut source) = ChannelSource::create("test");
        assert_eq!(source.description(), "channel: test");

        let err = source.server_status().unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(_)));

        tx.send(Some(StatusTree::builder().field("uptime", 1).build()))
            .unwrap();
        tx.send(Some(StatusTree::builder().field("uptime", 2).build()))
            .unwrap();

        let tree = source.server_status().unwrap();
        assert_eq!(tree.get("uptime"), Some(&StatusValue::Int(2)));

        // The latest tree stays available until replaced.
        let tree = source.server_status().unwrap();
        assert_eq!(tree.get("uptime"), Some(&StatusValue::Int(2)));
    }
}
