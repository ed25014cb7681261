//! Wire types for the provider's REST API

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use courier_core::{Message, MessageDirection, PhoneNumber};

/// Which side of the history to fetch for a number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageFilter {
    /// Both sent and received messages
    #[default]
    All,
    /// Only messages sent from the number
    Sent,
    /// Only messages received by the number
    Received,
}

/// One page of message resources
#[derive(Debug, Deserialize)]
pub(crate) struct MessageListPayload {
    #[serde(default)]
    pub messages: Vec<MessageResource>,
}

/// A single message resource as the provider returns it
#[derive(Debug, Deserialize)]
pub(crate) struct MessageResource {
    pub sid: String,
    pub from: String,
    pub to: String,
    pub body: Option<String>,
    pub num_media: Option<String>,
    pub direction: Option<String>,
    pub status: Option<String>,
    pub date_sent: Option<String>,
    pub date_created: Option<String>,
}

impl MessageResource {
    /// Convert the wire resource into a domain message.
    ///
    /// Returns `None` (with a warning) for resources the dashboard cannot
    /// use: unparseable endpoints or no usable timestamp. The provider
    /// occasionally returns such rows for short codes and alphanumeric
    /// sender IDs.
    pub(crate) fn into_message(self) -> Option<Message> {
        let from = match PhoneNumber::parse(&self.from) {
            Ok(n) => n,
            Err(e) => {
                warn!(sid = %self.sid, error = %e, "Skipping message with unusable sender");
                return None;
            }
        };
        let to = match PhoneNumber::parse(&self.to) {
            Ok(n) => n,
            Err(e) => {
                warn!(sid = %self.sid, error = %e, "Skipping message with unusable recipient");
                return None;
            }
        };

        let raw_date = self.date_sent.or(self.date_created);
        let timestamp = match raw_date.as_deref().and_then(parse_provider_date) {
            Some(ts) => ts,
            None => {
                warn!(sid = %self.sid, "Skipping message without a usable timestamp");
                return None;
            }
        };

        // Inbound direction strings start with "inbound"; everything else
        // (outbound-api, outbound-call, outbound-reply) was sent by us.
        let direction = if self
            .direction
            .as_deref()
            .is_some_and(|d| d.starts_with("inbound"))
        {
            MessageDirection::Received
        } else {
            MessageDirection::Sent
        };

        let media_count = self
            .num_media
            .as_deref()
            .and_then(|n| n.parse::<u32>().ok())
            .unwrap_or(0);

        Some(Message::new(
            self.sid,
            from,
            to,
            direction,
            self.body.unwrap_or_default(),
            media_count,
            timestamp,
            self.status.unwrap_or_default(),
        ))
    }
}

/// The provider formats timestamps as RFC 2822
fn parse_provider_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
