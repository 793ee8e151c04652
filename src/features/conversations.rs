//! Conversation list synchronization.
//!
//! Pulls every conversation page, sorts conversations into buckets, drops the
//! ones the local user cannot see, fetches presence for direct messages and
//! produces the ordered channel list the UI shows.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::core::models::{Channel, PRESENCE_AWAY};
use crate::errors::SlackError;
use crate::identity::IdentityCache;
use crate::slack::transport::{CONVERSATIONS_PAGE_SIZE, RawConversation, SlackTransport};

/// Conversation category. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    Channel,
    Group,
    MultiPersonDirect,
    Direct,
}

impl Bucket {
    fn index(self) -> usize {
        match self {
            Bucket::Channel => 0,
            Bucket::Group => 1,
            Bucket::MultiPersonDirect => 2,
            Bucket::Direct => 3,
        }
    }
}

/// Bucket of a conversation from its flags alone. Multi-person direct messages
/// are flagged as groups too, so `is_mpim` wins over `is_group`.
#[must_use]
pub fn classify(conversation: &RawConversation) -> Option<Bucket> {
    if conversation.is_im {
        Some(Bucket::Direct)
    } else if conversation.is_mpim {
        Some(Bucket::MultiPersonDirect)
    } else if conversation.is_channel {
        Some(Bucket::Channel)
    } else if conversation.is_group {
        Some(Bucket::Group)
    } else {
        None
    }
}

/// Channel entry for a conversation, or `None` if it should not be listed.
///
/// Direct messages are only listed when the peer is a known, non-deleted user;
/// their name becomes the peer's name.
#[must_use]
pub fn admit(
    conversation: &RawConversation,
    bucket: Bucket,
    cache: &IdentityCache,
) -> Option<Channel> {
    let mut channel = Channel {
        id: conversation.id.clone(),
        name: conversation.name.clone(),
        topic: conversation.topic.value.clone(),
        user_id: conversation.user.clone(),
        presence: String::new(),
    };

    match bucket {
        Bucket::Channel | Bucket::Group => conversation.is_member.then_some(channel),
        Bucket::MultiPersonDirect => {
            (conversation.is_member && conversation.is_open).then_some(channel)
        }
        Bucket::Direct => {
            let name = cache.get(&conversation.user)?;
            channel.name = name;
            Some(channel)
        }
    }
}

/// Ordered channel list plus the raw conversations in the same order.
#[derive(Debug, Clone, Default)]
pub struct SyncedConversations {
    pub channels: Vec<Channel>,
    pub conversations: Vec<RawConversation>,
}

/// One entry per conversation ID, or per peer for direct messages. A later
/// duplicate replaces the earlier one at its original position.
#[must_use]
pub fn dedupe(
    entries: Vec<(Bucket, Channel, RawConversation)>,
) -> Vec<(Bucket, Channel, RawConversation)> {
    let mut slots: HashMap<(Bucket, String), usize> = HashMap::with_capacity(entries.len());
    let mut kept: Vec<(Bucket, Channel, RawConversation)> = Vec::with_capacity(entries.len());

    for entry in entries {
        let key = match entry.0 {
            Bucket::Direct => entry.2.user.clone(),
            _ => entry.2.id.clone(),
        };
        match slots.entry((entry.0, key)) {
            Entry::Occupied(slot) => {
                debug!("Replacing duplicate conversation {}", kept[*slot.get()].2.id);
                kept[*slot.get()] = entry;
            }
            Entry::Vacant(slot) => {
                slot.insert(kept.len());
                kept.push(entry);
            }
        }
    }

    kept
}

/// Sort every bucket by name and concatenate them in bucket order.
#[must_use]
pub fn order_buckets(entries: Vec<(Bucket, Channel, RawConversation)>) -> SyncedConversations {
    let mut buckets: [Vec<(Channel, RawConversation)>; 4] = Default::default();
    for (bucket, channel, conversation) in entries {
        buckets[bucket.index()].push((channel, conversation));
    }

    let mut synced = SyncedConversations::default();
    for mut bucket in buckets {
        bucket.sort_by(|(a, _), (b, _)| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        for (channel, conversation) in bucket {
            synced.channels.push(channel);
            synced.conversations.push(conversation);
        }
    }
    synced
}

pub struct ConversationSync<'a, T: SlackTransport + ?Sized> {
    transport: &'a T,
    cache: &'a IdentityCache,
}

impl<'a, T: SlackTransport + ?Sized> ConversationSync<'a, T> {
    #[must_use]
    pub fn new(transport: &'a T, cache: &'a IdentityCache) -> Self {
        Self { transport, cache }
    }

    /// Every non-archived conversation, across all pages.
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` if any page fails; nothing is returned in that case.
    pub async fn fetch_all(&self) -> Result<Vec<RawConversation>, SlackError> {
        let mut conversations: Vec<RawConversation> = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self
                .transport
                .list_conversations(cursor.as_deref(), CONVERSATIONS_PAGE_SIZE)
                .await
                .map_err(SlackError::into_fetch)?;

            cursor = page.next().map(str::to_string);
            debug!(
                "Fetched {} conversations (more: {})",
                page.items.len(),
                cursor.is_some()
            );
            conversations.extend(page.items.into_iter().filter(|c| !c.is_archived));

            if cursor.is_none() {
                break;
            }
        }

        Ok(conversations)
    }

    /// Presence for every direct-message peer, fetched concurrently.
    /// A failed fetch leaves the peer "away".
    pub async fn fill_presence(&self, channels: &mut [&mut Channel]) {
        let transport = self.transport;
        let fetches = channels.iter().map(move |channel| {
            let user = channel.user_id.clone();
            async move {
                match transport.user_presence(&user).await {
                    Ok(presence) => presence,
                    Err(e) => {
                        warn!("Failed to fetch presence for {}: {}", user, e);
                        PRESENCE_AWAY.to_string()
                    }
                }
            }
        });

        let presences = join_all(fetches).await;
        for (channel, presence) in channels.iter_mut().zip(presences) {
            channel.presence = presence;
        }
    }

    /// Full synchronization pass.
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` if listing conversations fails. Presence failures
    /// and unresolvable direct-message peers do not fail the sync.
    pub async fn sync(&self) -> Result<SyncedConversations, SlackError> {
        let conversations = self.fetch_all().await?;
        let total = conversations.len();

        let mut entries: Vec<(Bucket, Channel, RawConversation)> = Vec::with_capacity(total);
        for conversation in conversations {
            let Some(bucket) = classify(&conversation) else {
                debug!("Skipping unclassifiable conversation {}", conversation.id);
                continue;
            };
            match admit(&conversation, bucket, self.cache) {
                Some(channel) => entries.push((bucket, channel, conversation)),
                None if bucket == Bucket::Direct => {
                    debug!(
                        "Dropping direct message {} with unknown peer {}",
                        conversation.id, conversation.user
                    );
                }
                None => {}
            }
        }

        let mut entries = dedupe(entries);
        let mut direct: Vec<&mut Channel> = entries
            .iter_mut()
            .filter(|(bucket, _, _)| *bucket == Bucket::Direct)
            .map(|(_, channel, _)| channel)
            .collect();
        self.fill_presence(&mut direct).await;

        let synced = order_buckets(entries);
        info!(
            "Synchronized {} of {} conversations",
            synced.channels.len(),
            total
        );
        Ok(synced)
    }
}
