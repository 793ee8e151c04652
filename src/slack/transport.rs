//! Slack Web API surface consumed by the sync engine.
//!
//! The engine only talks to Slack through [`SlackTransport`], so the HTTP client
//! can be swapped for canned pages in tests.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

use crate::errors::SlackError;

/// Page size used when listing conversations.
pub const CONVERSATIONS_PAGE_SIZE: u16 = 1000;

/// Page size used when listing thread replies.
pub const REPLIES_PAGE_SIZE: u16 = 200;

/// Page size used when listing workspace members.
pub const USERS_PAGE_SIZE: u16 = 1000;

/// One page of a cursor-paginated listing. An empty `next_cursor` marks the last page.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
    pub next_cursor: String,
}

impl<T> Page<T> {
    #[must_use]
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            has_more: false,
            next_cursor: String::new(),
        }
    }

    #[must_use]
    pub fn with_cursor(items: Vec<T>, next_cursor: impl Into<String>) -> Self {
        Self {
            items,
            has_more: true,
            next_cursor: next_cursor.into(),
        }
    }

    /// Cursor for the following request, if any.
    #[must_use]
    pub fn next(&self) -> Option<&str> {
        Some(self.next_cursor.as_str()).filter(|c| !c.is_empty())
    }
}

/// Decode an explicit JSON `null` as the field's default, the same as an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default)]
pub struct AuthIdentity {
    pub user_id: String,
    pub user: String,
    pub team_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamInfo {
    pub id: String,
    pub name: String,
    pub domain: String,
}

#[derive(Debug, Clone, Default)]
pub struct RawUser {
    pub id: String,
    pub name: String,
    pub deleted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawTopic {
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

/// A conversation record as returned by `conversations.list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawConversation {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_channel: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_group: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_im: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_mpim: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_member: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_open: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_archived: bool,
    /// Peer user of a direct message.
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topic: RawTopic,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawField {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawAttachment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub author_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title_link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<RawField>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawFile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url_private: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preview: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawReplyRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ts: String,
}

/// A message as returned by history/replies listings and carried by live events.
///
/// Every field tolerates both a missing key and an explicit `null`, so one
/// sparse message never fails the page it arrived in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawMessage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ts: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thread_ts: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bot_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtype: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<RawAttachment>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<RawFile>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub replies: Vec<RawReplyRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reply_count: u32,
}

impl RawMessage {
    /// Whether this message heads a thread that has replies to expand.
    #[must_use]
    pub fn has_replies(&self) -> bool {
        !self.replies.is_empty() || self.reply_count > 0
    }

    /// Thread key: the thread timestamp, or the message's own timestamp for roots.
    #[must_use]
    pub fn thread_key(&self) -> &str {
        if self.thread_ts.is_empty() {
            &self.ts
        } else {
            &self.thread_ts
        }
    }

    /// The replies listing returns the thread root as one of its entries.
    #[must_use]
    pub fn is_thread_root(&self) -> bool {
        !self.thread_ts.is_empty() && self.thread_ts == self.ts
    }
}

/// Remote operations the engine depends on.
#[async_trait]
pub trait SlackTransport: Send + Sync {
    /// Identify the token's user and team.
    async fn auth_test(&self) -> Result<AuthIdentity, SlackError>;

    async fn list_users(&self, cursor: Option<&str>) -> Result<Page<RawUser>, SlackError>;

    /// One page of public/private channels, direct and multi-person direct messages,
    /// archived conversations excluded.
    async fn list_conversations(
        &self,
        cursor: Option<&str>,
        limit: u16,
    ) -> Result<Page<RawConversation>, SlackError>;

    async fn conversation_history(
        &self,
        channel_id: &str,
        limit: u16,
    ) -> Result<Vec<RawMessage>, SlackError>;

    async fn conversation_replies(
        &self,
        channel_id: &str,
        thread_ts: &str,
        cursor: Option<&str>,
        limit: u16,
    ) -> Result<Page<RawMessage>, SlackError>;

    async fn user_info(&self, user_id: &str) -> Result<RawUser, SlackError>;

    async fn user_presence(&self, user_id: &str) -> Result<String, SlackError>;

    async fn team_info(&self) -> Result<TeamInfo, SlackError>;

    async fn mark_read(&self, channel_id: &str, ts: &str) -> Result<(), SlackError>;
}
