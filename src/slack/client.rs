//! Slack Web API client
//!
//! Implements [`SlackTransport`] over slack-morphism sessions with retry logic and
//! error handling. Typed requests are used wherever slack-morphism's models carry
//! every field the engine reads; conversation listings go through the same session
//! with the crate's own wire types, because the typed channel and message models
//! drop the direct-message peer, `is_open`, attachment author/link and file previews.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use slack_morphism::errors::SlackClientError;
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::prelude::{
    SlackApiAuthTestResponse, SlackApiTeamInfoRequest, SlackApiUsersGetPresenceRequest,
    SlackApiUsersInfoRequest, SlackApiUsersListRequest,
};
use slack_morphism::{
    SlackApiToken, SlackApiTokenValue, SlackCursorId, SlackResponseMetadata, SlackTeamInfo,
    SlackUser, SlackUserId,
};
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

use super::transport::{
    AuthIdentity, Page, RawConversation, RawMessage, RawUser, SlackTransport, TeamInfo,
    USERS_PAGE_SIZE,
};
use crate::core::config::AppConfig;
use crate::errors::SlackError;

const CONVERSATION_TYPES: &str = "public_channel,private_channel,im,mpim";

#[derive(Debug, Default, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConversationsListResponse {
    #[serde(default)]
    channels: Vec<RawConversation>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    messages: Vec<RawMessage>,
    #[serde(default)]
    has_more: Option<bool>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

impl MessagesResponse {
    fn into_page(self) -> Page<RawMessage> {
        Page {
            items: self.messages,
            has_more: self.has_more.unwrap_or(false),
            next_cursor: cursor_of(self.response_metadata),
        }
    }
}

#[derive(Debug, Serialize)]
struct MarkRequest<'a> {
    channel: &'a str,
    ts: &'a str,
}

fn cursor_of(metadata: Option<ResponseMetadata>) -> String {
    metadata.and_then(|m| m.next_cursor).unwrap_or_default()
}

fn typed_cursor_of(metadata: Option<SlackResponseMetadata>) -> String {
    metadata
        .and_then(|m| m.next_cursor)
        .map(|c| c.0)
        .unwrap_or_default()
}

fn user_from(user: SlackUser) -> RawUser {
    RawUser {
        id: user.id.0,
        name: user.name.unwrap_or_default(),
        deleted: user.deleted.unwrap_or(false),
    }
}

fn team_from(team: SlackTeamInfo) -> TeamInfo {
    TeamInfo {
        id: team.id.0,
        name: team.name.unwrap_or_default(),
        domain: team.domain.unwrap_or_default(),
    }
}

fn identity_from(resp: SlackApiAuthTestResponse) -> AuthIdentity {
    AuthIdentity {
        user_id: resp.user_id.0,
        user: resp.user.unwrap_or_default(),
        team_id: resp.team_id.0,
    }
}

fn cursor_params(cursor: Option<&str>, limit: u16) -> Vec<(&'static str, Option<String>)> {
    vec![
        ("limit", Some(limit.to_string())),
        ("cursor", cursor.filter(|c| !c.is_empty()).map(str::to_string)),
    ]
}

/// Slack Web API client with retry logic and error handling
pub struct SlackClient {
    client: SlackHyperClient,
    token: SlackApiToken,
    timeout: Duration,
}

impl SlackClient {
    /// # Errors
    ///
    /// Returns a `ConfigError` if the HTTPS connector cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, SlackError> {
        let connector = SlackClientHyperConnector::new()
            .map_err(|e| SlackError::ConfigError(format!("Slack HTTP connector: {e}")))?
            .with_slack_api_url(&config.api_base);

        Ok(Self {
            client: SlackHyperClient::new(connector),
            token: SlackApiToken::new(SlackApiTokenValue::new(config.slack_token.clone())),
            timeout: Duration::from_secs(config.http_timeout_secs),
        })
    }

    #[must_use]
    pub fn token(&self) -> &SlackApiToken {
        &self.token
    }

    /// Retry transport failures with jittered exponential backoff. Slack-level
    /// errors (`ok: false`) are returned immediately.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> Result<T, SlackError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, SlackError>> + Send,
        T: Send,
    {
        let strategy = ExponentialBackoff::from_millis(100).map(jitter).take(5);

        RetryIf::start(strategy, operation, |e: &SlackError| {
            matches!(e, SlackError::HttpError(_))
        })
        .await
    }

    /// Await one Slack call under the configured timeout. A rate-limited call
    /// waits out `Retry-After` and comes back as a retryable `HttpError`.
    async fn send<R, Fut>(&self, method: &str, call: Fut) -> Result<R, SlackError>
    where
        Fut: Future<Output = Result<R, SlackClientError>> + Send,
    {
        debug!("Calling {}", method);
        match tokio::time::timeout(self.timeout, call).await {
            Err(_) => Err(SlackError::HttpError(format!(
                "{method}: timed out after {}s",
                self.timeout.as_secs()
            ))),
            Ok(Ok(resp)) => Ok(resp),
            Ok(Err(SlackClientError::RateLimitError(limit))) => {
                let retry_after = limit.retry_after.unwrap_or(Duration::from_secs(1));
                warn!(
                    "Slack rate limited {} (429), waiting {}s before retry",
                    method,
                    retry_after.as_secs()
                );
                tokio::time::sleep(retry_after).await;
                Err(SlackError::HttpError(format!("{method}: rate limited")))
            }
            Ok(Err(e)) => Err(match SlackError::from(e) {
                SlackError::ApiError(code) => SlackError::ApiError(format!("{method} error: {code}")),
                other => other,
            }),
        }
    }
}

#[async_trait]
impl SlackTransport for SlackClient {
    async fn auth_test(&self) -> Result<AuthIdentity, SlackError> {
        self.with_retry(|| async {
            let session = self.client.open_session(&self.token);
            let resp = self.send("auth.test", session.auth_test()).await?;
            Ok(identity_from(resp))
        })
        .await
    }

    async fn list_users(&self, cursor: Option<&str>) -> Result<Page<RawUser>, SlackError> {
        let request = SlackApiUsersListRequest::new()
            .with_limit(USERS_PAGE_SIZE)
            .opt_cursor(cursor.filter(|c| !c.is_empty()).map(|c| SlackCursorId(c.to_string())));

        self.with_retry(|| async {
            let session = self.client.open_session(&self.token);
            let resp = self.send("users.list", session.users_list(&request)).await?;
            let next_cursor = typed_cursor_of(resp.response_metadata);
            Ok(Page {
                items: resp.members.into_iter().map(user_from).collect(),
                has_more: !next_cursor.is_empty(),
                next_cursor,
            })
        })
        .await
    }

    async fn list_conversations(
        &self,
        cursor: Option<&str>,
        limit: u16,
    ) -> Result<Page<RawConversation>, SlackError> {
        let mut params = cursor_params(cursor, limit);
        params.push(("exclude_archived", Some("true".to_string())));
        params.push(("types", Some(CONVERSATION_TYPES.to_string())));

        self.with_retry(|| async {
            let session = self.client.open_session(&self.token);
            let resp: ConversationsListResponse = self
                .send(
                    "conversations.list",
                    session
                        .http_session_api
                        .http_get("conversations.list", &params, None),
                )
                .await?;
            let next_cursor = cursor_of(resp.response_metadata);
            Ok(Page {
                items: resp.channels,
                has_more: !next_cursor.is_empty(),
                next_cursor,
            })
        })
        .await
    }

    async fn conversation_history(
        &self,
        channel_id: &str,
        limit: u16,
    ) -> Result<Vec<RawMessage>, SlackError> {
        let params = vec![
            ("channel", Some(channel_id.to_string())),
            ("limit", Some(limit.to_string())),
            ("inclusive", Some("false".to_string())),
        ];

        self.with_retry(|| async {
            let session = self.client.open_session(&self.token);
            let resp: MessagesResponse = self
                .send(
                    "conversations.history",
                    session
                        .http_session_api
                        .http_get("conversations.history", &params, None),
                )
                .await?;
            Ok(resp.messages)
        })
        .await
    }

    async fn conversation_replies(
        &self,
        channel_id: &str,
        thread_ts: &str,
        cursor: Option<&str>,
        limit: u16,
    ) -> Result<Page<RawMessage>, SlackError> {
        let mut params = cursor_params(cursor, limit);
        params.push(("channel", Some(channel_id.to_string())));
        params.push(("ts", Some(thread_ts.to_string())));

        self.with_retry(|| async {
            let session = self.client.open_session(&self.token);
            let resp: MessagesResponse = self
                .send(
                    "conversations.replies",
                    session
                        .http_session_api
                        .http_get("conversations.replies", &params, None),
                )
                .await?;
            Ok(resp.into_page())
        })
        .await
    }

    async fn user_info(&self, user_id: &str) -> Result<RawUser, SlackError> {
        let request = SlackApiUsersInfoRequest::new(SlackUserId(user_id.to_string()));

        self.with_retry(|| async {
            let session = self.client.open_session(&self.token);
            let resp = self.send("users.info", session.users_info(&request)).await?;
            Ok(user_from(resp.user))
        })
        .await
    }

    async fn user_presence(&self, user_id: &str) -> Result<String, SlackError> {
        let request = SlackApiUsersGetPresenceRequest::new(SlackUserId(user_id.to_string()));

        self.with_retry(|| async {
            let session = self.client.open_session(&self.token);
            let resp = self
                .send("users.getPresence", session.users_get_presence(&request))
                .await?;
            Ok(resp.presence)
        })
        .await
    }

    async fn team_info(&self) -> Result<TeamInfo, SlackError> {
        let request = SlackApiTeamInfoRequest::new();

        self.with_retry(|| async {
            let session = self.client.open_session(&self.token);
            let resp = self.send("team.info", session.team_info(&request)).await?;
            Ok(team_from(resp.team))
        })
        .await
    }

    // No typed request for conversations.mark; post it through the same session.
    async fn mark_read(&self, channel_id: &str, ts: &str) -> Result<(), SlackError> {
        let request = MarkRequest {
            channel: channel_id,
            ts,
        };

        let session = self.client.open_session(&self.token);
        let _: Value = self
            .send(
                "conversations.mark",
                session
                    .http_session_api
                    .http_post("conversations.mark", &request, None),
            )
            .await?;
        Ok(())
    }
}
