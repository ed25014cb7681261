//! Phone assignment database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the user_phone_numbers table
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentModel {
    pub user_id: Uuid,
    pub phone_number: String,
    pub assigned_at: DateTime<Utc>,
}
