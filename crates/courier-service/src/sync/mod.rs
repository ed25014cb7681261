//! Conversation read-state synchronization
//!
//! Owns the client-visible read/unread state for one user session:
//! bulk-loads read markers, derives unread counts through the conversation
//! grouper, and runs the optimistic mark-as-read protocol against an
//! ordered chain of upsert strategies (HTTP gateway first, direct store
//! second).

mod strategy;
mod synchronizer;

pub use strategy::{
    DirectStoreStrategy, GatewayError, HttpGatewayStrategy, MarkReadConfirmation,
    MarkReadStrategy,
};
pub use synchronizer::{MarkReadOutcome, ReadStateSynchronizer, SyncPhase};
