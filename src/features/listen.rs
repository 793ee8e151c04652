//! Live event dispatch: stream events in, canonical messages out.

use std::collections::HashMap;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use tracing::{debug, error};

use super::messages::MessageBuilder;
use crate::core::models::{Channel, Message, SessionContext};
use crate::errors::SlackError;
use crate::slack::events::{MessageEvent, SlackEvent};
use crate::slack::transport::{RawMessage, SlackTransport};

/// Channels whose live messages are delivered, keyed by channel ID.
pub type WatchSet = HashMap<String, Arc<Channel>>;

/// Suffix appended to the text of edited messages.
pub const EDITED_SUFFIX: &str = " (edited)";

/// Build a watch set from channels.
pub fn watch_set<'c, I>(channels: I) -> WatchSet
where
    I: IntoIterator<Item = &'c Arc<Channel>>,
{
    channels
        .into_iter()
        .map(|c| (c.id.clone(), Arc::clone(c)))
        .collect()
}

/// The message a `message` event should render as, if any.
///
/// Edits render the edited payload with `" (edited)"` appended; thread-reply
/// notifications render nothing.
#[must_use]
pub fn effective_message(event: MessageEvent) -> Option<RawMessage> {
    match event.msg.subtype.as_str() {
        "message_changed" => event.sub_message.map(|sub| {
            let mut edited = *sub;
            edited.text.push_str(EDITED_SUFFIX);
            edited
        }),
        "message_replied" => None,
        _ => Some(event.msg),
    }
}

pub struct EventDispatcher<'a, T: SlackTransport + ?Sized> {
    builder: MessageBuilder<'a, T>,
    session: &'a SessionContext,
}

impl<'a, T: SlackTransport + ?Sized> EventDispatcher<'a, T> {
    #[must_use]
    pub fn new(builder: MessageBuilder<'a, T>, session: &'a SessionContext) -> Self {
        Self { builder, session }
    }

    /// Consume `events` until the stream ends, handing every message posted in
    /// a watched channel to `on_message`.
    ///
    /// # Errors
    ///
    /// Returns a `ConnectionError` when the stream reports a fatal error or
    /// invalid credentials. A stream that simply ends returns `Ok(())`.
    pub async fn listen<S, F>(
        &self,
        events: S,
        watch: &WatchSet,
        mut on_message: F,
    ) -> Result<(), SlackError>
    where
        S: Stream<Item = SlackEvent>,
        F: FnMut(Message, &SessionContext),
    {
        let mut events = std::pin::pin!(events);

        while let Some(event) = events.next().await {
            match event {
                SlackEvent::Hello
                | SlackEvent::Connecting
                | SlackEvent::Connected
                | SlackEvent::Disconnected
                | SlackEvent::Goodbye => {}
                SlackEvent::Message(ev) => {
                    let Some(channel) = watch.get(&ev.channel) else {
                        continue;
                    };
                    let Some(raw) = effective_message(ev) else {
                        continue;
                    };
                    let message = self.builder.canonicalize(&raw, channel).await;
                    on_message(message, self.session);
                }
                SlackEvent::Error { error } => {
                    let e = SlackError::ConnectionError(format!("Error: {}", error.msg));
                    error!("{}", e);
                    return Err(e);
                }
                SlackEvent::InvalidAuth => {
                    let e = SlackError::ConnectionError("Invalid credentials".to_string());
                    error!("{}", e);
                    return Err(e);
                }
                SlackEvent::Unknown => {
                    debug!("Ignoring unhandled event");
                }
            }
        }

        Ok(())
    }
}
