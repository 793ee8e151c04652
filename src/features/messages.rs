//! Raw Slack messages to canonical [`Message`]s.

use std::sync::Arc;

use tracing::debug;

use crate::core::models::{Attachment, AttachmentKind, Channel, Message, UNKNOWN_NAME, parse_slack_ts};
use crate::errors::SlackError;
use crate::identity::IdentityCache;
use crate::slack::transport::{REPLIES_PAGE_SIZE, RawAttachment, RawFile, RawMessage, SlackTransport};
use crate::utils::text::{normalize_text, sanitize_links};

/// Builds canonical messages, resolving authors and mentions through the identity cache.
pub struct MessageBuilder<'a, T: SlackTransport + ?Sized> {
    transport: &'a T,
    cache: &'a IdentityCache,
}

impl<'a, T: SlackTransport + ?Sized> MessageBuilder<'a, T> {
    #[must_use]
    pub fn new(transport: &'a T, cache: &'a IdentityCache) -> Self {
        Self { transport, cache }
    }

    /// Display name for a user ID, looked up remotely on a cache miss.
    pub async fn resolve_user(&self, user_id: &str) -> String {
        if user_id.is_empty() {
            return UNKNOWN_NAME.to_string();
        }
        let transport = self.transport;
        self.cache
            .resolve(user_id, || async move {
                transport.user_info(user_id).await.map(|u| u.name)
            })
            .await
    }

    /// Author name of a raw message.
    ///
    /// Order: cached user, then cached bot, then the username carried by the bot
    /// message (cached under the bot ID), then a live user lookup.
    pub async fn resolve_author(&self, raw: &RawMessage) -> String {
        if !raw.user.is_empty()
            && let Some(name) = self.cache.get(&raw.user)
        {
            return name;
        }

        if !raw.bot_id.is_empty() {
            if let Some(name) = self.cache.get(&raw.bot_id) {
                return name;
            }
            return self.cache.set(&raw.bot_id, &raw.username);
        }

        self.resolve_user(&raw.user).await
    }

    /// One canonical message for `raw`, without expanding its thread.
    pub async fn canonicalize(&self, raw: &RawMessage, channel: &Arc<Channel>) -> Message {
        let author = self.resolve_author(raw).await;
        let content = normalize_text(&raw.text, move |id: String| async move {
            self.resolve_user(&id).await
        })
        .await;

        Message {
            thread_ts: raw.thread_key().to_string(),
            channel: Arc::clone(channel),
            occurred_at: parse_slack_ts(&raw.ts),
            author,
            content,
            attachments: format_attachments(&raw.attachments, &raw.files),
            is_reply: !raw.thread_ts.is_empty(),
        }
    }

    /// The message itself followed by every reply of its thread, if it has any.
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` if any page of the thread cannot be fetched.
    pub async fn build(
        &self,
        raw: &RawMessage,
        channel: &Arc<Channel>,
    ) -> Result<Vec<Message>, SlackError> {
        let mut messages = vec![self.canonicalize(raw, channel).await];

        if raw.has_replies() {
            let thread = self.fetch_thread(&channel.id, raw.thread_key()).await?;
            for reply in thread_replies(thread) {
                messages.push(self.canonicalize(&reply, channel).await);
            }
        }

        Ok(messages)
    }

    /// Every message of a thread, following the replies cursor to the end.
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` if any page fails; no partial thread is returned.
    pub async fn fetch_thread(
        &self,
        channel_id: &str,
        thread_ts: &str,
    ) -> Result<Vec<RawMessage>, SlackError> {
        let mut thread: Vec<RawMessage> = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self
                .transport
                .conversation_replies(channel_id, thread_ts, cursor.as_deref(), REPLIES_PAGE_SIZE)
                .await
                .map_err(SlackError::into_fetch)?;

            cursor = page.next().map(str::to_string);
            debug!(
                "Fetched {} replies for thread {} in {} (more: {})",
                page.items.len(),
                thread_ts,
                channel_id,
                cursor.is_some()
            );
            thread.extend(page.items);

            if cursor.is_none() {
                break;
            }
        }

        Ok(thread)
    }
}

/// Drop the thread root from a replies listing, which always includes it.
#[must_use]
pub fn thread_replies(thread: Vec<RawMessage>) -> Vec<RawMessage> {
    thread
        .into_iter()
        .filter(|m| !m.is_thread_root())
        .collect()
}

/// Flatten attachments and files into render-ordered entries.
///
/// Per attachment: author, title, title link, text, then fields last-to-first.
/// Per file: `name ⇒ url`, then its preview if present.
#[must_use]
pub fn format_attachments(attachments: &[RawAttachment], files: &[RawFile]) -> Vec<Attachment> {
    let mut out: Vec<Attachment> = Vec::new();

    for attachment in attachments {
        if !attachment.author_name.is_empty() {
            out.push(Attachment::new(attachment.author_name.clone(), AttachmentKind::Other));
        }
        if !attachment.title.is_empty() {
            out.push(Attachment::new(sanitize_links(&attachment.title), AttachmentKind::Title));
        }
        if !attachment.title_link.is_empty() {
            out.push(Attachment::new(
                sanitize_links(&attachment.title_link),
                AttachmentKind::Link,
            ));
        }
        if !attachment.text.is_empty() {
            out.push(Attachment::new(sanitize_links(&attachment.text), AttachmentKind::Text));
        }
        for field in attachment.fields.iter().rev() {
            out.push(Attachment::new(
                format!("{} {}", field.title, field.value),
                AttachmentKind::Link,
            ));
        }
    }

    for file in files {
        out.push(Attachment::new(
            format!("{} ⇒ {}", file.name, file.url_private),
            AttachmentKind::Link,
        ));
        if !file.preview.is_empty() {
            out.push(Attachment::new(file.preview.clone(), AttachmentKind::Link));
        }
    }

    out
}
