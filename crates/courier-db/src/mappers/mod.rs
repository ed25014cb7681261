//! Model → entity mappers
//!
//! Conversions are fallible: a stored phone number, role, or template kind
//! that no longer parses is reported as a database error rather than
//! silently dropped.

mod assignment;
mod read_state;
mod template;
mod user;

use courier_core::{DomainError, PhoneNumber};

/// Parse a stored phone number column, mapping corruption to a database error
pub(crate) fn parse_stored_phone(raw: &str) -> Result<PhoneNumber, DomainError> {
    PhoneNumber::parse(raw)
        .map_err(|e| DomainError::DatabaseError(format!("corrupt phone_number column: {e}")))
}
