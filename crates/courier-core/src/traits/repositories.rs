//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::{ConversationReadState, MessageTemplate, PhoneAssignment, User};
use crate::error::DomainError;
use crate::value_objects::PhoneNumber;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Read-State Repository
// ============================================================================

/// Durable store for conversation read markers.
///
/// The store owns the uniqueness constraint on (`user_id`, `phone_number`);
/// writes are whole-row upserts, never partial updates, so retrying the same
/// upsert is idempotent apart from `updated_at`.
#[async_trait]
pub trait ReadStateRepository: Send + Sync {
    /// Insert-or-update the read marker for a (user, counterparty) pair,
    /// returning the persisted row.
    async fn upsert(
        &self,
        user_id: Uuid,
        phone_number: &PhoneNumber,
        last_read_at: DateTime<Utc>,
    ) -> RepoResult<ConversationReadState>;

    /// All read markers for a user
    async fn find_all_for_user(&self, user_id: Uuid) -> RepoResult<Vec<ConversationReadState>>;

    /// One read marker, `None` when the pair has never been marked
    async fn find_one(
        &self,
        user_id: Uuid,
        phone_number: &PhoneNumber,
    ) -> RepoResult<Option<ConversationReadState>>;
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// List all users
    async fn list(&self) -> RepoResult<Vec<User>>;

    /// Create a new user with its password hash
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Uuid) -> RepoResult<Option<String>>;
}

// ============================================================================
// Phone Assignment Repository
// ============================================================================

#[async_trait]
pub trait PhoneAssignmentRepository: Send + Sync {
    /// The number assigned to a user, if any
    async fn find_by_user(&self, user_id: Uuid) -> RepoResult<Option<PhoneAssignment>>;

    /// The user a number is assigned to, if any
    async fn find_by_phone(&self, phone_number: &PhoneNumber)
        -> RepoResult<Option<PhoneAssignment>>;

    /// All assignments, ordered by phone number
    async fn list_all(&self) -> RepoResult<Vec<PhoneAssignment>>;

    /// Assign a number to a user, replacing any previous assignment of that
    /// user in the same transaction.
    async fn assign(&self, user_id: Uuid, phone_number: &PhoneNumber)
        -> RepoResult<PhoneAssignment>;

    /// Remove a user's assignment (no-op when none exists)
    async fn remove(&self, user_id: Uuid) -> RepoResult<()>;
}

// ============================================================================
// Template Repository
// ============================================================================

#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Find template by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<MessageTemplate>>;

    /// All templates owned by a user, newest first
    async fn find_by_user(&self, user_id: Uuid) -> RepoResult<Vec<MessageTemplate>>;

    /// Create a new template
    async fn create(&self, template: &MessageTemplate) -> RepoResult<()>;

    /// Update an existing template
    async fn update(&self, template: &MessageTemplate) -> RepoResult<()>;

    /// Delete a template
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}
