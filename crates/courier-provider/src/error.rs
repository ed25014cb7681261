//! Provider client errors

use thiserror::Error;

/// Errors from the messaging provider client
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider rejected the request ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unreadable provider response: {0}")]
    Decode(String),
}

impl From<ProviderError> for courier_core::DomainError {
    fn from(e: ProviderError) -> Self {
        courier_core::DomainError::ProviderError(e.to_string())
    }
}
