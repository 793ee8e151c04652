//! All Slack-specific functionality

pub mod client;
pub mod events;
pub mod transport;

// Re-export main types for convenience
pub use client::SlackClient;
pub use events::{MessageEvent, SlackEvent};
pub use transport::{Page, SlackTransport};
