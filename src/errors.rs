use slack_morphism::errors::SlackClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlackError {
    #[error("Failed to fetch from Slack: {0}")]
    FetchError(String),

    #[error("Failed to resolve identity: {0}")]
    LookupError(String),

    #[error("Event stream terminated: {0}")]
    ConnectionError(String),

    #[error("Failed to access Slack API: {0}")]
    ApiError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to parse Slack payload: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl SlackError {
    /// Whether the error ended a live session rather than a single request.
    #[must_use]
    pub fn is_fatal_connection(&self) -> bool {
        matches!(self, SlackError::ConnectionError(_))
    }

    /// Collapse any transport-level failure into a `FetchError` so aggregate
    /// operations report one kind of failure to the caller.
    #[must_use]
    pub fn into_fetch(self) -> Self {
        match self {
            SlackError::FetchError(_) | SlackError::ConnectionError(_) => self,
            other => SlackError::FetchError(other.to_string()),
        }
    }
}

impl From<SlackClientError> for SlackError {
    fn from(error: SlackClientError) -> Self {
        match error {
            SlackClientError::ApiError(e) => SlackError::ApiError(e.code),
            SlackClientError::ProtocolError(e) => SlackError::ParseError(e.to_string()),
            other @ (SlackClientError::HttpError(_)
            | SlackClientError::HttpProtocolError(_)
            | SlackClientError::RateLimitError(_)
            | SlackClientError::SystemError(_)
            | SlackClientError::EndOfStream(_)) => SlackError::HttpError(other.to_string()),
            other => SlackError::ApiError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for SlackError {
    fn from(error: serde_json::Error) -> Self {
        SlackError::ParseError(error.to_string())
    }
}

impl From<anyhow::Error> for SlackError {
    fn from(error: anyhow::Error) -> Self {
        SlackError::ApiError(error.to_string())
    }
}
