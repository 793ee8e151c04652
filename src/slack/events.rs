//! Real-time events delivered by the event-stream connection.

use serde::Deserialize;

use super::transport::RawMessage;
use crate::errors::SlackError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StreamError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
}

/// A `message` event: the message itself plus, for edits, the edited payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageEvent {
    #[serde(default)]
    pub channel: String,
    #[serde(flatten)]
    pub msg: RawMessage,
    /// Replacement payload carried by `message_changed` and `message_replied`.
    #[serde(default, rename = "message")]
    pub sub_message: Option<Box<RawMessage>>,
}

/// Events the dispatcher understands; everything else decodes to `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlackEvent {
    Hello,
    Connecting,
    Connected,
    Disconnected,
    Goodbye,
    Message(MessageEvent),
    /// Fatal transport error reported by the stream.
    Error {
        #[serde(default)]
        error: StreamError,
    },
    InvalidAuth,
    #[serde(other)]
    Unknown,
}

impl SlackEvent {
    /// Decode one JSON frame from the event stream.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the frame is not a JSON object with a `type`.
    pub fn from_json(frame: &str) -> Result<Self, SlackError> {
        serde_json::from_str(frame).map_err(|e| SlackError::ParseError(format!("event frame: {e}")))
    }

    /// Handshake and connection-state events.
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            SlackEvent::Hello
                | SlackEvent::Connecting
                | SlackEvent::Connected
                | SlackEvent::Disconnected
                | SlackEvent::Goodbye
        )
    }
}
