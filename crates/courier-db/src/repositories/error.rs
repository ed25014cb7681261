//! Error handling utilities for repositories

use courier_core::DomainError;
use sqlx::Error as SqlxError;
use uuid::Uuid;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Create a "user not found" error
pub fn user_not_found(id: Uuid) -> DomainError {
    DomainError::UserNotFound(id)
}

/// Create a "template not found" error
pub fn template_not_found(id: Uuid) -> DomainError {
    DomainError::TemplateNotFound(id)
}

/// Create an "assignment not found" error
pub fn assignment_not_found(user_id: Uuid) -> DomainError {
    DomainError::AssignmentNotFound(user_id)
}
