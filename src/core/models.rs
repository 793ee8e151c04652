use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::slack::transport::TeamInfo;

/// Presence assumed for a direct-message peer whose presence could not be fetched.
pub const PRESENCE_AWAY: &str = "away";

/// Author name used whenever an identity cannot be resolved.
pub const UNKNOWN_NAME: &str = "unknown";

/// A conversation as shown in the channel list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub topic: String,
    /// Peer user for direct messages, empty otherwise.
    pub user_id: String,
    /// Live availability of the peer; only populated for direct messages.
    pub presence: String,
}

impl Channel {
    #[must_use]
    pub fn is_direct(&self) -> bool {
        !self.user_id.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Other,
    Title,
    Link,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub content: String,
    pub kind: AttachmentKind,
}

impl Attachment {
    pub fn new(content: impl Into<String>, kind: AttachmentKind) -> Self {
        Self {
            content: content.into(),
            kind,
        }
    }
}

/// Canonical, render-ready message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Thread key: the raw thread timestamp, or the message's own timestamp for roots.
    pub thread_ts: String,
    pub channel: Arc<Channel>,
    pub occurred_at: DateTime<Utc>,
    pub author: String,
    pub content: String,
    pub attachments: Vec<Attachment>,
    /// Set for every message that carries a thread timestamp, the thread root included.
    pub is_reply: bool,
}

/// Who we are and which workspace we are connected to.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub user_id: String,
    pub username: String,
    pub team: TeamInfo,
}

/// Parse a Slack timestamp (`"1700000000.000200"`) down to whole seconds.
///
/// Unparseable input maps to the Unix epoch.
#[must_use]
pub fn parse_slack_ts(ts: &str) -> DateTime<Utc> {
    let secs = ts.parse::<f64>().map_or(0, |f| f.trunc() as i64);
    Utc.timestamp_opt(secs, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_seconds() {
        let t = parse_slack_ts("1700000000.999900");
        assert_eq!(t.timestamp(), 1_700_000_000);
    }

    #[test]
    fn bad_timestamp_is_epoch() {
        assert_eq!(parse_slack_ts("not-a-ts").timestamp(), 0);
        assert_eq!(parse_slack_ts("").timestamp(), 0);
    }

    #[test]
    fn direct_channel_has_peer() {
        let mut c = Channel::default();
        assert!(!c.is_direct());
        c.user_id = "U1".into();
        assert!(c.is_direct());
    }
}
