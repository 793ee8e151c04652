//! Session facade tying the transport, identity cache and features together.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use futures::Stream;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::core::models::{Channel, Message, SessionContext};
use crate::errors::SlackError;
use crate::features::conversations::ConversationSync;
use crate::features::listen::{EventDispatcher, WatchSet, watch_set};
use crate::features::messages::MessageBuilder;
use crate::identity::IdentityCache;
use crate::slack::events::SlackEvent;
use crate::slack::transport::{RawConversation, RawMessage, SlackTransport};

/// Username used when the current user's own profile cannot be fetched.
pub const FALLBACK_USERNAME: &str = "slag";

const AUTH_FAILED: &str = "not able to authorize client, check your connection and if your slack-token is set correctly";

/// A connected workspace: session context, identity cache and the last synced channel list.
pub struct SlackService<T: SlackTransport> {
    transport: Arc<T>,
    cache: Arc<IdentityCache>,
    session: SessionContext,
    channels: RwLock<Vec<Arc<Channel>>>,
    conversations: RwLock<Vec<RawConversation>>,
}

impl<T: SlackTransport> SlackService<T> {
    /// Authenticate, warm the identity cache with every live user and load team info.
    ///
    /// # Errors
    ///
    /// Returns a `ConnectionError` if the token is rejected, or the team info error.
    pub async fn connect(transport: T) -> Result<Self, SlackError> {
        let transport = Arc::new(transport);
        let cache = Arc::new(IdentityCache::new());

        let identity = transport.auth_test().await.map_err(|e| {
            warn!("auth.test failed: {}", e);
            SlackError::ConnectionError(AUTH_FAILED.to_string())
        })?;

        let users = Self::warm_cache(&*transport, &cache).await;
        info!("Identity cache warmed with {} users", users);

        let team = transport.team_info().await?;

        let username = match transport.user_info(&identity.user_id).await {
            Ok(user) if !user.name.is_empty() => user.name,
            Ok(_) => FALLBACK_USERNAME.to_string(),
            Err(e) => {
                warn!("Failed to fetch current user {}: {}", identity.user_id, e);
                FALLBACK_USERNAME.to_string()
            }
        };

        info!(
            "Connected to {} as {} ({})",
            team.name, username, identity.user_id
        );

        Ok(Self {
            transport,
            cache,
            session: SessionContext {
                user_id: identity.user_id,
                username,
                team,
            },
            channels: RwLock::new(Vec::new()),
            conversations: RwLock::new(Vec::new()),
        })
    }

    /// Cache every non-deleted user. A failing page stops warming but not the session.
    async fn warm_cache(transport: &T, cache: &IdentityCache) -> usize {
        let mut cursor: Option<String> = None;
        let mut cached = 0usize;

        loop {
            let page = match transport.list_users(cursor.as_deref()).await {
                Ok(page) => page,
                Err(e) => {
                    warn!("Failed to list users, continuing with partial cache: {}", e);
                    break;
                }
            };

            cursor = page.next().map(str::to_string);
            for user in page.items.into_iter().filter(|u| !u.deleted) {
                cache.set(&user.id, &user.name);
                cached += 1;
            }

            if cursor.is_none() {
                break;
            }
        }

        cached
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<IdentityCache> {
        &self.cache
    }

    #[must_use]
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Channels from the last [`sync`](Self::sync), in display order.
    #[must_use]
    pub fn channels(&self) -> Vec<Arc<Channel>> {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Raw conversations from the last sync, in the same order as [`channels`](Self::channels).
    #[must_use]
    pub fn conversations(&self) -> Vec<RawConversation> {
        self.conversations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn builder(&self) -> MessageBuilder<'_, T> {
        MessageBuilder::new(&*self.transport, &self.cache)
    }

    /// Replace the channel list with a fresh synchronization.
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` if any conversation page fails; the previous
    /// channel list is kept in that case.
    pub async fn sync(&self) -> Result<Vec<Arc<Channel>>, SlackError> {
        let synced = ConversationSync::new(&*self.transport, &self.cache)
            .sync()
            .await?;

        let channels: Vec<Arc<Channel>> = synced.channels.into_iter().map(Arc::new).collect();
        *self
            .channels
            .write()
            .unwrap_or_else(PoisonError::into_inner) = channels.clone();
        *self
            .conversations
            .write()
            .unwrap_or_else(PoisonError::into_inner) = synced.conversations;
        Ok(channels)
    }

    /// Canonical messages for one raw message, thread replies included.
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` if the thread cannot be fetched.
    pub async fn build(
        &self,
        raw: &RawMessage,
        channel: &Arc<Channel>,
    ) -> Result<Vec<Message>, SlackError> {
        self.builder().build(raw, channel).await
    }

    /// The latest `count` messages of a channel, each followed by its thread replies.
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` if history or any thread cannot be fetched.
    pub async fn messages(
        &self,
        channel: &Arc<Channel>,
        count: u16,
    ) -> Result<Vec<Message>, SlackError> {
        let history = self
            .transport
            .conversation_history(&channel.id, count)
            .await
            .map_err(SlackError::into_fetch)?;

        let builder = self.builder();
        let mut messages = Vec::with_capacity(history.len());
        for raw in &history {
            messages.extend(builder.build(raw, channel).await?);
        }
        Ok(messages)
    }

    /// Watch set over every channel of the last sync.
    #[must_use]
    pub fn watch_all(&self) -> WatchSet {
        watch_set(&self.channels())
    }

    /// Dispatch live events until the stream ends or fails.
    ///
    /// # Errors
    ///
    /// Returns a `ConnectionError` on a fatal stream error or invalid credentials.
    pub async fn listen<S, F>(
        &self,
        events: S,
        watch: &WatchSet,
        on_message: F,
    ) -> Result<(), SlackError>
    where
        S: Stream<Item = SlackEvent>,
        F: FnMut(Message, &SessionContext),
    {
        EventDispatcher::new(self.builder(), &self.session)
            .listen(events, watch, on_message)
            .await
    }

    /// Run [`listen`](Self::listen) on its own task so it can overlap with
    /// [`sync`](Self::sync) and history fetches on the same service.
    pub fn spawn_listen<S, F>(
        &self,
        events: S,
        watch: WatchSet,
        on_message: F,
    ) -> JoinHandle<Result<(), SlackError>>
    where
        T: 'static,
        S: Stream<Item = SlackEvent> + Send + 'static,
        F: FnMut(Message, &SessionContext) + Send + 'static,
    {
        let transport = Arc::clone(&self.transport);
        let cache = Arc::clone(&self.cache);
        let session = self.session.clone();

        tokio::spawn(async move {
            let builder = MessageBuilder::new(&*transport, &cache);
            EventDispatcher::new(builder, &session)
                .listen(events, &watch, on_message)
                .await
        })
    }

    /// Mark a channel read up to now. Failures are logged and otherwise ignored.
    pub async fn mark_as_read(&self, channel_id: &str) {
        let ts = format!("{:.6}", Utc::now().timestamp() as f64);
        if let Err(e) = self.transport.mark_read(channel_id, &ts).await {
            warn!("Failed to mark {} as read: {}", channel_id, e);
        }
    }

    /// # Errors
    ///
    /// Returns the transport error if presence cannot be fetched.
    pub async fn user_presence(&self, user_id: &str) -> Result<String, SlackError> {
        self.transport.user_presence(user_id).await
    }
}
