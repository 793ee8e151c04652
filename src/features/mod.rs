pub mod conversations;
pub mod listen;
pub mod messages;

pub use conversations::{Bucket, ConversationSync, SyncedConversations};
pub use listen::{EventDispatcher, WatchSet};
pub use messages::MessageBuilder;
