//! Domain errors - error types for the domain layer

use thiserror::Error;
use uuid::Uuid;

use crate::value_objects::PhoneNumberParseError;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Template not found: {0}")]
    TemplateNotFound(Uuid),

    #[error("No phone number assigned to user: {0}")]
    AssignmentNotFound(Uuid),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(#[from] PhoneNumberParseError),

    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Username already in use: {0}")]
    UsernameTaken(String),

    #[error("Phone number already assigned: {0}")]
    PhoneNumberAssigned(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::TemplateNotFound(_) => "UNKNOWN_TEMPLATE",
            Self::AssignmentNotFound(_) => "UNKNOWN_ASSIGNMENT",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidPhoneNumber(_) => "INVALID_PHONE_NUMBER",
            Self::MissingArgument(_) => "MISSING_ARGUMENT",
            Self::UsernameTaken(_) => "USERNAME_TAKEN",
            Self::PhoneNumberAssigned(_) => "PHONE_NUMBER_ASSIGNED",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::ProviderError(_) => "PROVIDER_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::TemplateNotFound(_) | Self::AssignmentNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidPhoneNumber(_) | Self::MissingArgument(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::UsernameTaken(_) | Self::PhoneNumberAssigned(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::UserNotFound(Uuid::nil());
        assert_eq!(err.code(), "UNKNOWN_USER");

        let err = DomainError::MissingArgument("user_id");
        assert_eq!(err.code(), "MISSING_ARGUMENT");
    }

    #[test]
    fn test_classifiers() {
        assert!(DomainError::UserNotFound(Uuid::nil()).is_not_found());
        assert!(DomainError::MissingArgument("phone").is_validation());
        assert!(DomainError::UsernameTaken("kim".to_string()).is_conflict());
        assert!(!DomainError::DatabaseError("down".to_string()).is_validation());
    }

    #[test]
    fn test_phone_parse_error_converts() {
        let parse_err = crate::value_objects::PhoneNumber::parse("bogus").unwrap_err();
        let err: DomainError = parse_err.into();
        assert!(err.is_validation());
        assert_eq!(err.code(), "INVALID_PHONE_NUMBER");
    }
}
