//! Phone assignment entity - which provider number a user works from
//!
//! At most one assignment per user; assigning a new number replaces the old
//! row.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::value_objects::PhoneNumber;

/// Assignment of a provider phone number to a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneAssignment {
    pub user_id: Uuid,
    pub phone_number: PhoneNumber,
    pub assigned_at: DateTime<Utc>,
}

impl PhoneAssignment {
    /// Create a new assignment stamped now
    pub fn new(user_id: Uuid, phone_number: PhoneNumber) -> Self {
        Self {
            user_id,
            phone_number,
            assigned_at: Utc::now(),
        }
    }
}
