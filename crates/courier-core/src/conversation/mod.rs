//! Conversation projections derived from flat message lists

mod grouper;

pub use grouper::{conversation_messages, group_conversations, ConversationProjection};
