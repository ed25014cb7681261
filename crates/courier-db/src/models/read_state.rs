//! Read-state database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the conversation_read_states table.
///
/// Uniqueness on (user_id, phone_number) is enforced by the store; rows are
/// written by whole-row upsert only.
#[derive(Debug, Clone, FromRow)]
pub struct ReadStateModel {
    pub user_id: Uuid,
    pub phone_number: String,
    pub last_read_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}
