//! Messaging provider REST client

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument};

use courier_common::ProviderConfig;
use courier_core::{Message, PhoneNumber};

use crate::error::ProviderError;
use crate::types::{MessageFilter, MessageListPayload, MessageResource};

/// Client for the provider's message REST API.
///
/// Authenticates with HTTP basic auth (account SID + auth token) and speaks
/// the provider's JSON/form-encoded dialect.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
    page_size: u32,
}

/// Error body the provider returns on non-2xx responses
#[derive(Debug, Deserialize)]
struct ProviderErrorPayload {
    message: Option<String>,
}

impl ProviderClient {
    /// Create a client from provider configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            page_size: config.page_size,
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        )
    }

    /// Fetch message history for a number, newest first.
    ///
    /// The provider filters on one endpoint per request, so `All` issues two
    /// requests (inbound to the number, outbound from it) and merges them.
    #[instrument(skip(self))]
    pub async fn list_messages(
        &self,
        number: &PhoneNumber,
        filter: MessageFilter,
    ) -> Result<Vec<Message>, ProviderError> {
        let mut messages = match filter {
            MessageFilter::Received => self.fetch_page(&[("To", number.as_str())]).await?,
            MessageFilter::Sent => self.fetch_page(&[("From", number.as_str())]).await?,
            MessageFilter::All => {
                let mut inbound = self.fetch_page(&[("To", number.as_str())]).await?;
                let outbound = self.fetch_page(&[("From", number.as_str())]).await?;
                inbound.extend(outbound);
                inbound
            }
        };

        messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        debug!(count = messages.len(), "Fetched provider messages");
        Ok(messages)
    }

    /// Send an outbound message, returning the created message resource
    #[instrument(skip(self, body))]
    pub async fn send_message(
        &self,
        from: &PhoneNumber,
        to: &PhoneNumber,
        body: &str,
    ) -> Result<Message, ProviderError> {
        let response = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("From", from.as_str()), ("To", to.as_str()), ("Body", body)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::api_error(status, response).await);
        }

        let resource: MessageResource = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        resource
            .into_message()
            .ok_or_else(|| ProviderError::Decode("unusable message resource".to_string()))
    }

    async fn fetch_page(&self, filters: &[(&str, &str)]) -> Result<Vec<Message>, ProviderError> {
        let page_size = self.page_size.to_string();
        let mut query: Vec<(&str, &str)> = vec![("PageSize", page_size.as_str())];
        query.extend_from_slice(filters);

        let response = self
            .http
            .get(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::api_error(status, response).await);
        }

        let payload: MessageListPayload = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        Ok(payload
            .messages
            .into_iter()
            .filter_map(MessageResource::into_message)
            .collect())
    }

    async fn api_error(status: StatusCode, response: reqwest::Response) -> ProviderError {
        let message = response
            .json::<ProviderErrorPayload>()
            .await
            .ok()
            .and_then(|p| p.message)
            .unwrap_or_else(|| "request failed".to_string());
        ProviderError::Api {
            status: status.as_u16(),
            message,
        }
    }
}
