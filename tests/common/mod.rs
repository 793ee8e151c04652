//! In-memory Slack transport for integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use slag::SlackError;
use slag::slack::transport::{
    AuthIdentity, Page, RawConversation, RawMessage, RawUser, SlackTransport, TeamInfo,
};

/// Canned responses. Paged listings use the page index as the cursor.
#[derive(Default)]
pub struct FakeTransport {
    pub auth_fails: bool,
    pub me: String,
    pub team: TeamInfo,
    pub user_pages: Vec<Vec<RawUser>>,
    pub conversation_pages: Vec<Vec<RawConversation>>,
    pub failing_conversation_page: Option<usize>,
    pub history: HashMap<String, Vec<RawMessage>>,
    /// Reply pages keyed by thread timestamp.
    pub replies: HashMap<String, Vec<Vec<RawMessage>>>,
    pub failing_threads: HashSet<String>,
    /// `users.info` answers; missing IDs fail.
    pub profiles: HashMap<String, String>,
    /// Presence answers; missing IDs fail.
    pub presence: HashMap<String, String>,
    pub mark_fails: bool,
    pub calls: Mutex<Vec<String>>,
    pub marked: Mutex<Vec<(String, String)>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            me: "UME".to_string(),
            team: TeamInfo {
                id: "T1".into(),
                name: "Acme".into(),
                domain: "acme".into(),
            },
            ..Self::default()
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    /// Number of recorded calls whose name starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn page<T: Clone>(pages: &[Vec<T>], cursor: Option<&str>) -> Page<T> {
        let idx = cursor.and_then(|c| c.parse::<usize>().ok()).unwrap_or(0);
        let items = pages.get(idx).cloned().unwrap_or_default();
        if idx + 1 < pages.len() {
            Page::with_cursor(items, (idx + 1).to_string())
        } else {
            Page::last(items)
        }
    }
}

#[async_trait]
impl SlackTransport for FakeTransport {
    async fn auth_test(&self) -> Result<AuthIdentity, SlackError> {
        self.record("auth_test".into());
        if self.auth_fails {
            return Err(SlackError::ApiError("auth.test error: invalid_auth".into()));
        }
        Ok(AuthIdentity {
            user_id: self.me.clone(),
            user: "me".into(),
            team_id: self.team.id.clone(),
        })
    }

    async fn list_users(&self, cursor: Option<&str>) -> Result<Page<RawUser>, SlackError> {
        self.record(format!("list_users:{}", cursor.unwrap_or("")));
        Ok(Self::page(&self.user_pages, cursor))
    }

    async fn list_conversations(
        &self,
        cursor: Option<&str>,
        _limit: u16,
    ) -> Result<Page<RawConversation>, SlackError> {
        self.record(format!("list_conversations:{}", cursor.unwrap_or("")));
        let idx = cursor.and_then(|c| c.parse::<usize>().ok()).unwrap_or(0);
        if self.failing_conversation_page == Some(idx) {
            return Err(SlackError::HttpError("connection reset".into()));
        }
        Ok(Self::page(&self.conversation_pages, cursor))
    }

    async fn conversation_history(
        &self,
        channel_id: &str,
        _limit: u16,
    ) -> Result<Vec<RawMessage>, SlackError> {
        self.record(format!("history:{channel_id}"));
        self.history
            .get(channel_id)
            .cloned()
            .ok_or_else(|| SlackError::ApiError("conversations.history error: channel_not_found".into()))
    }

    async fn conversation_replies(
        &self,
        _channel_id: &str,
        thread_ts: &str,
        cursor: Option<&str>,
        _limit: u16,
    ) -> Result<Page<RawMessage>, SlackError> {
        self.record(format!("replies:{thread_ts}:{}", cursor.unwrap_or("")));
        if self.failing_threads.contains(thread_ts) {
            return Err(SlackError::HttpError("timed out".into()));
        }
        let pages = self.replies.get(thread_ts).cloned().unwrap_or_default();
        Ok(Self::page(&pages, cursor))
    }

    async fn user_info(&self, user_id: &str) -> Result<RawUser, SlackError> {
        self.record(format!("user_info:{user_id}"));
        self.profiles
            .get(user_id)
            .map(|name| RawUser {
                id: user_id.to_string(),
                name: name.clone(),
                deleted: false,
            })
            .ok_or_else(|| SlackError::ApiError("users.info error: user_not_found".into()))
    }

    async fn user_presence(&self, user_id: &str) -> Result<String, SlackError> {
        self.record(format!("presence:{user_id}"));
        self.presence
            .get(user_id)
            .cloned()
            .ok_or_else(|| SlackError::HttpError("presence unavailable".into()))
    }

    async fn team_info(&self) -> Result<TeamInfo, SlackError> {
        self.record("team_info".into());
        Ok(self.team.clone())
    }

    async fn mark_read(&self, channel_id: &str, ts: &str) -> Result<(), SlackError> {
        self.record(format!("mark:{channel_id}"));
        if self.mark_fails {
            return Err(SlackError::ApiError("conversations.mark error: not_in_channel".into()));
        }
        self.marked
            .lock()
            .unwrap()
            .push((channel_id.to_string(), ts.to_string()));
        Ok(())
    }
}

pub fn user(id: &str, name: &str) -> RawUser {
    RawUser {
        id: id.into(),
        name: name.into(),
        deleted: false,
    }
}

pub fn channel_conv(id: &str, name: &str, member: bool) -> RawConversation {
    RawConversation {
        id: id.into(),
        name: name.into(),
        is_channel: true,
        is_member: member,
        ..RawConversation::default()
    }
}

pub fn group_conv(id: &str, name: &str) -> RawConversation {
    RawConversation {
        id: id.into(),
        name: name.into(),
        is_group: true,
        is_member: true,
        ..RawConversation::default()
    }
}

pub fn mpim_conv(id: &str, name: &str, open: bool) -> RawConversation {
    RawConversation {
        id: id.into(),
        name: name.into(),
        is_group: true,
        is_mpim: true,
        is_member: true,
        is_open: open,
        ..RawConversation::default()
    }
}

pub fn im_conv(id: &str, peer: &str) -> RawConversation {
    RawConversation {
        id: id.into(),
        name: peer.into(),
        is_im: true,
        is_open: true,
        user: peer.into(),
        ..RawConversation::default()
    }
}

pub fn raw(ts: &str, user: &str, text: &str) -> RawMessage {
    RawMessage {
        ts: ts.into(),
        user: user.into(),
        text: text.into(),
        ..RawMessage::default()
    }
}

pub fn reply(ts: &str, thread_ts: &str, user: &str, text: &str) -> RawMessage {
    RawMessage {
        thread_ts: thread_ts.into(),
        ..raw(ts, user, text)
    }
}
