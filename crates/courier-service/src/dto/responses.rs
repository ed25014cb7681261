//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output. Timestamps
//! serialize as ISO-8601 via chrono's serde support.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courier_core::MessageDirection;

// ============================================================================
// Conversation Responses
// ============================================================================

/// Confirmation of a mark-as-read upsert.
///
/// This is the gateway wire contract: the synchronizer's HTTP strategy
/// deserializes exactly this shape, so it derives `Deserialize` too.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkReadResponse {
    pub success: bool,
    pub phone_number: String,
    pub last_read_at: DateTime<Utc>,
}

/// One stored read marker
#[derive(Debug, Clone, Serialize)]
pub struct ReadStateResponse {
    pub phone_number: String,
    pub last_read_at: Option<DateTime<Utc>>,
}

/// A message in API form
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub from: String,
    pub to: String,
    pub direction: MessageDirection,
    pub body: String,
    pub media_count: u32,
    pub timestamp: DateTime<Utc>,
    pub status: String,
}

/// A conversation summary for the inbox listing
#[derive(Debug, Clone, Serialize)]
pub struct ConversationResponse {
    pub counterparty: String,
    pub last_message: MessageResponse,
    pub unread_count: u32,
}

// ============================================================================
// User / Assignment Responses
// ============================================================================

/// A user in API form
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// A phone-number assignment, optionally joined with its user
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentResponse {
    pub user_id: Uuid,
    pub phone_number: String,
    pub assigned_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}

// ============================================================================
// Template Responses
// ============================================================================

/// A message template in API form
#[derive(Debug, Clone, Serialize)]
pub struct TemplateResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Liveness probe response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self { status: "ok" }
    }
}

/// Readiness probe response with dependency health
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: bool,
}

impl ReadinessResponse {
    pub fn ready(database: bool) -> Self {
        Self {
            ready: database,
            database,
        }
    }
}
