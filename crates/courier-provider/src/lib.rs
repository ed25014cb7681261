//! # courier-provider
//!
//! REST client for the third-party messaging provider. Lists the message
//! history of a provider number and sends outbound SMS/MMS. Account
//! management (balance, number provisioning) is intentionally not covered.

mod client;
mod error;
mod types;

pub use client::ProviderClient;
pub use error::ProviderError;
pub use types::MessageFilter;
