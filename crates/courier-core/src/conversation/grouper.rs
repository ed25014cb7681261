//! Conversation grouping
//!
//! Partitions a flat, unordered message list into per-counterparty threads
//! and computes display projections (last message, unread count). Pure
//! functions: for a fixed message list and read-state map the output is
//! fully deterministic, and equal timestamps keep input order (stable sort).

use std::collections::HashMap;

use crate::entities::{Message, MessageDirection, ReadStateMap};
use crate::value_objects::PhoneNumber;

/// A per-counterparty conversation thread with display projections.
///
/// `messages` is ordered newest-first; `unread_count` counts received
/// messages strictly newer than the counterparty's last-read marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationProjection {
    pub counterparty: PhoneNumber,
    pub messages: Vec<Message>,
    pub unread_count: u32,
}

impl ConversationProjection {
    /// The most recent message in the thread.
    ///
    /// Threads are never constructed empty, so this always exists.
    pub fn last_message(&self) -> &Message {
        &self.messages[0]
    }
}

/// Group messages into conversations, newest conversation first.
///
/// The counterparty of a message is its sender when received and its
/// recipient when sent. When `own_phone_number` is known, messages whose
/// counterparty is that number are discarded (a user cannot converse with
/// themself). Unread counts compare each received message's timestamp
/// against `read_states`; a counterparty absent from the map counts as
/// never read.
pub fn group_conversations(
    messages: &[Message],
    own_phone_number: Option<&PhoneNumber>,
    read_states: &ReadStateMap,
) -> Vec<ConversationProjection> {
    let mut threads: HashMap<PhoneNumber, Vec<Message>> = HashMap::new();

    for message in messages {
        let counterparty = message.counterparty();
        if own_phone_number.is_some_and(|own| counterparty == own) {
            continue;
        }
        threads
            .entry(counterparty.clone())
            .or_default()
            .push(message.clone());
    }

    let mut conversations: Vec<ConversationProjection> = threads
        .into_iter()
        .map(|(counterparty, mut msgs)| {
            // Newest first; stable, so equal timestamps keep input order
            msgs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            let last_read = read_states.last_read_at(&counterparty);
            let unread_count = msgs
                .iter()
                .filter(|m| {
                    m.direction == MessageDirection::Received
                        && last_read.is_none_or(|read| m.timestamp > read)
                })
                .count() as u32;
            ConversationProjection {
                counterparty,
                messages: msgs,
                unread_count,
            }
        })
        .collect();

    conversations.sort_by(|a, b| b.last_message().timestamp.cmp(&a.last_message().timestamp));
    conversations
}

/// Messages of a single conversation, oldest first.
///
/// With a known own number only messages between that number and the
/// counterparty are kept; without one, any message touching the
/// counterparty qualifies.
pub fn conversation_messages(
    messages: &[Message],
    counterparty: &PhoneNumber,
    own_phone_number: Option<&PhoneNumber>,
) -> Vec<Message> {
    let mut thread: Vec<Message> = messages
        .iter()
        .filter(|m| match own_phone_number {
            Some(own) => {
                (&m.from == own && &m.to == counterparty)
                    || (&m.from == counterparty && &m.to == own)
            }
            None => m.involves(counterparty),
        })
        .cloned()
        .collect();
    thread.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    thread
}
