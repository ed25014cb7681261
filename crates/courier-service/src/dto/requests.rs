//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input
//! validation.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Conversation Requests
// ============================================================================

/// Mark-conversation-as-read request body.
///
/// The field is camelCased on the wire (`{"userId": …}`) to match the
/// gateway contract consumed by the synchronizer.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MarkReadRequest {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

/// Send an outbound message from the user's assigned number
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub user_id: Uuid,

    /// Destination number, E.164-like
    #[validate(length(min = 1, message = "Destination number is required"))]
    pub to: String,

    #[validate(length(min = 1, max = 1600, message = "Body must be 1-1600 characters"))]
    pub body: String,
}

// ============================================================================
// Auth / User Requests
// ============================================================================

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    pub password: String,
}

/// Create user request (admin surface)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: String,

    #[validate(length(min = 1, max = 64, message = "Display name must be 1-64 characters"))]
    pub display_name: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,

    /// "admin" or "user"; defaults to "user"
    pub role: Option<String>,
}

// ============================================================================
// Assignment Requests
// ============================================================================

/// Assign a provider number to a user
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignNumberRequest {
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone_number: String,
}

// ============================================================================
// Template Requests
// ============================================================================

/// Create template request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTemplateRequest {
    pub user_id: Uuid,

    /// One of: Estimate, Delivered, Cancel, Delay, Others
    #[validate(length(min = 1, message = "Template kind is required"))]
    pub kind: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 1600, message = "Content must be 1-1600 characters"))]
    pub content: String,
}

/// Update template request; omitted fields keep their current value
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTemplateRequest {
    pub kind: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 1600, message = "Content must be 1-1600 characters"))]
    pub content: Option<String>,
}
