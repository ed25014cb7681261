//! Phone-number path extractor
//!
//! Parses the `{phone}` path segment into a validated [`PhoneNumber`],
//! answering 400 with the flat error body on malformed input.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use courier_core::PhoneNumber;

use crate::response::ApiError;

/// Extracts a validated phone number from the request path
#[derive(Debug, Clone)]
pub struct PhonePath(pub PhoneNumber);

#[async_trait]
impl<S> FromRequestParts<S> for PhonePath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::invalid_path("Phone number is required"))?;

        let phone = PhoneNumber::parse(&raw)
            .map_err(|e| ApiError::invalid_path(format!("Invalid phone number: {e}")))?;

        Ok(PhonePath(phone))
    }
}
