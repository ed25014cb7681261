//! Mark-read upsert strategies
//!
//! The primary and fallback paths of the mark-as-read protocol share one
//! contract: an idempotent upsert keyed on (user, counterparty) that
//! returns the persisted read instant. The synchronizer walks an ordered
//! chain of these until one succeeds or a non-recoverable error stops it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, instrument};
use uuid::Uuid;

use courier_common::GatewayConfig;
use courier_core::{PhoneNumber, ReadStateRepository};

use crate::dto::MarkReadResponse;

/// The persisted outcome of a mark-as-read upsert.
///
/// `last_read_at` is the instant the store actually recorded, which is the
/// authoritative value regardless of any optimistic guess on the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkReadConfirmation {
    pub counterparty: PhoneNumber,
    pub last_read_at: DateTime<Utc>,
}

/// Errors from a mark-read strategy
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The endpoint could not be reached at all (connect error, timeout)
    #[error("gateway unreachable: {0}")]
    Unreachable(String),

    /// The route answered 404; the shim is simply not deployed
    #[error("gateway route not found")]
    RouteMissing,

    /// The request itself was rejected (400 bad arguments, 405 wrong method)
    #[error("gateway rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The endpoint answered but failed (5xx and anything else unexpected)
    #[error("gateway server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The endpoint answered 2xx but the body was not the contract shape
    #[error("unreadable gateway response: {0}")]
    Decode(String),

    /// The direct store upsert failed
    #[error("store upsert failed: {0}")]
    Store(String),
}

impl GatewayError {
    /// Whether the next strategy in the chain should be tried.
    ///
    /// Unreachable endpoints, missing routes, server-side failures, and
    /// malformed responses are all worth retrying against the store; a 400
    /// or 405 means the request itself is wrong and would fail anywhere.
    pub fn is_fallback_eligible(&self) -> bool {
        match self {
            Self::Unreachable(_) | Self::RouteMissing | Self::Server { .. } | Self::Decode(_) => {
                true
            }
            Self::Rejected { .. } | Self::Store(_) => false,
        }
    }
}

/// One way of persisting a mark-as-read upsert.
///
/// Implementations must be semantically equivalent: same uniqueness key,
/// same fields written, idempotent under retry (apart from `updated_at`).
#[async_trait]
pub trait MarkReadStrategy: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &'static str;

    /// Perform exactly one upsert attempt for the pair
    async fn mark_read(
        &self,
        user_id: Uuid,
        counterparty: &PhoneNumber,
    ) -> Result<MarkReadConfirmation, GatewayError>;
}

// ============================================================================
// HTTP gateway strategy (primary path)
// ============================================================================

/// Primary path: `PATCH {base}/conversations/{phone}/mark-read` with a JSON
/// body carrying the user id. The server assigns and returns the recorded
/// read instant.
#[derive(Debug, Clone)]
pub struct HttpGatewayStrategy {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGatewayStrategy {
    /// Create a strategy from gateway configuration
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn mark_read_url(&self, counterparty: &PhoneNumber) -> String {
        // The leading '+' must be percent-encoded to survive the path
        let encoded = counterparty.as_str().replace('+', "%2B");
        format!("{}/conversations/{}/mark-read", self.base_url, encoded)
    }
}

#[async_trait]
impl MarkReadStrategy for HttpGatewayStrategy {
    fn name(&self) -> &'static str {
        "http-gateway"
    }

    #[instrument(skip(self))]
    async fn mark_read(
        &self,
        user_id: Uuid,
        counterparty: &PhoneNumber,
    ) -> Result<MarkReadConfirmation, GatewayError> {
        let url = self.mark_read_url(counterparty);
        debug!(%url, "Calling mark-read gateway");

        let response = self
            .http
            .patch(&url)
            .json(&json!({ "userId": user_id }))
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = read_error_message(response).await;
            return Err(match status.as_u16() {
                404 => GatewayError::RouteMissing,
                400 | 405 => GatewayError::Rejected {
                    status: status.as_u16(),
                    message,
                },
                code => GatewayError::Server {
                    status: code,
                    message,
                },
            });
        }

        let body: MarkReadResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        let counterparty = PhoneNumber::parse(&body.phone_number)
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        Ok(MarkReadConfirmation {
            counterparty,
            last_read_at: body.last_read_at,
        })
    }
}

/// Extract the `{"error": …}` message from a failed gateway response
async fn read_error_message(response: reqwest::Response) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: String,
    }

    response
        .json::<ErrorBody>()
        .await
        .map(|b| b.error)
        .unwrap_or_else(|_| "mark-read request failed".to_string())
}

// ============================================================================
// Direct store strategy (fallback path)
// ============================================================================

/// Fallback path: upsert straight into the read-state store, stamping the
/// read instant at the call site.
#[derive(Clone)]
pub struct DirectStoreStrategy {
    repo: Arc<dyn ReadStateRepository>,
}

impl DirectStoreStrategy {
    /// Create a strategy over the given repository
    pub fn new(repo: Arc<dyn ReadStateRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl MarkReadStrategy for DirectStoreStrategy {
    fn name(&self) -> &'static str {
        "direct-store"
    }

    #[instrument(skip(self))]
    async fn mark_read(
        &self,
        user_id: Uuid,
        counterparty: &PhoneNumber,
    ) -> Result<MarkReadConfirmation, GatewayError> {
        let now = Utc::now();
        let state = self
            .repo
            .upsert(user_id, counterparty, now)
            .await
            .map_err(|e| GatewayError::Store(e.to_string()))?;

        Ok(MarkReadConfirmation {
            counterparty: state.phone_number,
            // The store echoes what it wrote; prefer that over our `now`
            last_read_at: state.last_read_at.unwrap_or(now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: String) -> GatewayConfig {
        GatewayConfig {
            base_url,
            timeout_secs: 2,
        }
    }

    fn number(s: &str) -> PhoneNumber {
        PhoneNumber::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_success_parses_confirmation() {
        let server = MockServer::start().await;
        let user_id = Uuid::new_v4();

        Mock::given(method("PATCH"))
            .and(path_regex(r"^/conversations/.+/mark-read$"))
            .and(body_json(json!({ "userId": user_id })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "phone_number": "+15551230001",
                "last_read_at": "2026-08-04T10:00:00Z",
            })))
            .mount(&server)
            .await;

        let strategy = HttpGatewayStrategy::new(&config(server.uri())).unwrap();
        let confirmation = strategy
            .mark_read(user_id, &number("+15551230001"))
            .await
            .unwrap();

        assert_eq!(confirmation.counterparty, number("+15551230001"));
        assert_eq!(
            confirmation.last_read_at.to_rfc3339(),
            "2026-08-04T10:00:00+00:00"
        );
    }

    #[tokio::test]
    async fn test_404_is_route_missing_and_fallback_eligible() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "no route"})))
            .mount(&server)
            .await;

        let strategy = HttpGatewayStrategy::new(&config(server.uri())).unwrap();
        let err = strategy
            .mark_read(Uuid::new_v4(), &number("+15551230001"))
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::RouteMissing));
        assert!(err.is_fallback_eligible());
    }

    #[tokio::test]
    async fn test_400_is_hard_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "User ID is required"})),
            )
            .mount(&server)
            .await;

        let strategy = HttpGatewayStrategy::new(&config(server.uri())).unwrap();
        let err = strategy
            .mark_read(Uuid::new_v4(), &number("+15551230001"))
            .await
            .unwrap_err();

        match &err {
            GatewayError::Rejected { status, message } => {
                assert_eq!(*status, 400);
                assert_eq!(message, "User ID is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!err.is_fallback_eligible());
    }

    #[tokio::test]
    async fn test_500_is_fallback_eligible() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "store down"})))
            .mount(&server)
            .await;

        let strategy = HttpGatewayStrategy::new(&config(server.uri())).unwrap();
        let err = strategy
            .mark_read(Uuid::new_v4(), &number("+15551230001"))
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Server { status: 500, .. }));
        assert!(err.is_fallback_eligible());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        // Nothing listens on this port
        let strategy = HttpGatewayStrategy::new(&config(
            "http://127.0.0.1:1/api".to_string(),
        ))
        .unwrap();
        let err = strategy
            .mark_read(Uuid::new_v4(), &number("+15551230001"))
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Unreachable(_)));
        assert!(err.is_fallback_eligible());
    }
}
