mod common;

use std::sync::Arc;

use common::{FakeTransport, raw};
use futures::stream;
use slag::SlackError;
use slag::core::models::{Channel, SessionContext};
use slag::features::listen::{EventDispatcher, watch_set};
use slag::features::messages::MessageBuilder;
use slag::identity::IdentityCache;
use slag::slack::events::{MessageEvent, SlackEvent, StreamError};
use slag::slack::transport::{RawMessage, TeamInfo};

fn session() -> SessionContext {
    SessionContext {
        user_id: "UME".into(),
        username: "me".into(),
        team: TeamInfo {
            id: "T1".into(),
            name: "Acme".into(),
            domain: "acme".into(),
        },
    }
}

fn channels() -> Vec<Arc<Channel>> {
    vec![Arc::new(Channel {
        id: "C1".into(),
        name: "general".into(),
        ..Channel::default()
    })]
}

fn posted(channel: &str, msg: RawMessage) -> SlackEvent {
    SlackEvent::Message(MessageEvent {
        channel: channel.into(),
        msg,
        sub_message: None,
    })
}

fn edited(channel: &str, new: RawMessage) -> SlackEvent {
    SlackEvent::Message(MessageEvent {
        channel: channel.into(),
        msg: RawMessage {
            subtype: "message_changed".into(),
            ts: "9.0".into(),
            ..RawMessage::default()
        },
        sub_message: Some(Box::new(new)),
    })
}

fn replied(channel: &str) -> SlackEvent {
    SlackEvent::Message(MessageEvent {
        channel: channel.into(),
        msg: RawMessage {
            subtype: "message_replied".into(),
            ts: "9.1".into(),
            ..RawMessage::default()
        },
        sub_message: Some(Box::new(raw("1.0", "U1", "root"))),
    })
}

#[tokio::test]
async fn test_listen_delivers_watched_messages_until_stream_ends() {
    let transport = FakeTransport::new();
    let cache = IdentityCache::new();
    cache.set("U1", "bob");
    let session = session();
    let dispatcher = EventDispatcher::new(MessageBuilder::new(&transport, &cache), &session);
    let watch = watch_set(&channels());

    let events = stream::iter(vec![
        SlackEvent::Hello,
        SlackEvent::Connected,
        posted("C9", raw("1.0", "U1", "elsewhere")),
        posted("C1", raw("2.0", "U1", "hi :wave:")),
        edited("C1", raw("1.5", "U1", "fixed")),
        replied("C1"),
        SlackEvent::Unknown,
        SlackEvent::Disconnected,
    ]);

    let mut seen: Vec<(String, String, String)> = Vec::new();
    dispatcher
        .listen(events, &watch, |message, ctx| {
            seen.push((message.author, message.content, ctx.team.name.clone()));
        })
        .await
        .unwrap();

    assert_eq!(
        seen,
        vec![
            ("bob".to_string(), "hi 👋".to_string(), "Acme".to_string()),
            ("bob".to_string(), "fixed (edited)".to_string(), "Acme".to_string()),
        ]
    );
    assert_eq!(transport.count("replies:"), 0);
}

#[tokio::test]
async fn test_listen_stops_on_fatal_error() {
    let transport = FakeTransport::new();
    let cache = IdentityCache::new();
    let session = session();
    let dispatcher = EventDispatcher::new(MessageBuilder::new(&transport, &cache), &session);
    let watch = watch_set(&channels());

    let events = stream::iter(vec![
        SlackEvent::Error {
            error: StreamError {
                code: 1,
                msg: "Socket URL has expired".into(),
            },
        },
        posted("C1", raw("2.0", "U1", "never delivered")),
    ]);

    let mut delivered = 0;
    let result = dispatcher
        .listen(events, &watch, |_, _| delivered += 1)
        .await;

    match result {
        Err(SlackError::ConnectionError(msg)) => {
            assert_eq!(msg, "Error: Socket URL has expired");
        }
        other => panic!("Expected ConnectionError, got: {other:?}"),
    }
    assert_eq!(delivered, 0);
}

#[tokio::test]
async fn test_listen_stops_on_invalid_auth() {
    let transport = FakeTransport::new();
    let cache = IdentityCache::new();
    let session = session();
    let dispatcher = EventDispatcher::new(MessageBuilder::new(&transport, &cache), &session);

    let result = dispatcher
        .listen(stream::iter(vec![SlackEvent::InvalidAuth]), &watch_set(&channels()), |_, _| {})
        .await;

    let err = result.unwrap_err();
    assert!(err.is_fatal_connection());
    assert_eq!(err.to_string(), "Event stream terminated: Invalid credentials");
}

#[tokio::test]
async fn test_live_reply_is_flagged_and_not_expanded() {
    let transport = FakeTransport::new();
    let cache = IdentityCache::new();
    cache.set("U1", "bob");
    let session = session();
    let dispatcher = EventDispatcher::new(MessageBuilder::new(&transport, &cache), &session);

    let live_reply = RawMessage {
        thread_ts: "1.0".into(),
        reply_count: 3,
        ..raw("5.0", "U1", "in thread")
    };
    let mut seen = Vec::new();
    dispatcher
        .listen(
            stream::iter(vec![posted("C1", live_reply)]),
            &watch_set(&channels()),
            |message, _| seen.push(message),
        )
        .await
        .unwrap();

    assert_eq!(seen.len(), 1);
    assert!(seen[0].is_reply);
    assert_eq!(seen[0].thread_ts, "1.0");
    assert_eq!(transport.count("replies:"), 0);
}

#[tokio::test]
async fn test_decoded_frames_flow_through_dispatcher() {
    let transport = FakeTransport::new();
    let cache = IdentityCache::new();
    cache.set("U1", "bob");
    let session = session();
    let dispatcher = EventDispatcher::new(MessageBuilder::new(&transport, &cache), &session);

    let frames = [
        r#"{"type":"hello"}"#,
        r#"{"type":"user_typing","channel":"C1","user":"U1"}"#,
        r#"{"type":"message","channel":"C1","user":"U1","text":"from the wire","ts":"3.0"}"#,
    ];
    let events: Vec<SlackEvent> = frames
        .iter()
        .map(|f| SlackEvent::from_json(f).unwrap())
        .collect();

    let mut contents = Vec::new();
    dispatcher
        .listen(stream::iter(events), &watch_set(&channels()), |m, _| {
            contents.push(m.content);
        })
        .await
        .unwrap();
    assert_eq!(contents, vec!["from the wire".to_string()]);
}
