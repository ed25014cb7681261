//! Message entity - an SMS/MMS message sourced from the messaging provider
//!
//! Messages are immutable: the provider is their system of record and this
//! core only projects them into conversations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::PhoneNumber;

/// Direction of a message relative to the dashboard's provider account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageDirection {
    /// Inbound message from a counterparty
    Received,
    /// Outbound message sent through the provider
    Sent,
}

/// An SMS/MMS message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Opaque stable identifier assigned by the provider
    pub id: String,
    pub from: PhoneNumber,
    pub to: PhoneNumber,
    pub direction: MessageDirection,
    /// Text content, possibly empty for media-only messages
    pub body: String,
    /// Count of attached media items
    pub media_count: u32,
    pub timestamp: DateTime<Utc>,
    /// Provider-defined delivery-state label, informational only
    pub status: String,
}

impl Message {
    /// Create a new Message
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        from: PhoneNumber,
        to: PhoneNumber,
        direction: MessageDirection,
        body: impl Into<String>,
        media_count: u32,
        timestamp: DateTime<Utc>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from,
            to,
            direction,
            body: body.into(),
            media_count,
            timestamp,
            status: status.into(),
        }
    }

    /// Check if this is an inbound message
    #[inline]
    pub fn is_received(&self) -> bool {
        self.direction == MessageDirection::Received
    }

    /// The phone number on the other end of this message: the sender for
    /// received messages, the recipient for sent ones.
    #[inline]
    pub fn counterparty(&self) -> &PhoneNumber {
        match self.direction {
            MessageDirection::Received => &self.from,
            MessageDirection::Sent => &self.to,
        }
    }

    /// Check if the given number is either endpoint of this message
    pub fn involves(&self, number: &PhoneNumber) -> bool {
        &self.from == number || &self.to == number
    }

    /// Check if the message carries media attachments
    #[inline]
    pub fn has_media(&self) -> bool {
        self.media_count > 0
    }

    /// Get a truncated preview of the body (for conversation listings)
    pub fn preview(&self, max_len: usize) -> &str {
        if self.body.len() <= max_len {
            &self.body
        } else {
            let mut end = max_len;
            while !self.body.is_char_boundary(end) && end > 0 {
                end -= 1;
            }
            &self.body[..end]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(s: &str) -> PhoneNumber {
        PhoneNumber::parse(s).unwrap()
    }

    fn received(from: &str, to: &str) -> Message {
        Message::new(
            "SM1",
            number(from),
            number(to),
            MessageDirection::Received,
            "hello",
            0,
            Utc::now(),
            "received",
        )
    }

    #[test]
    fn test_counterparty_follows_direction() {
        let msg = received("+15551230001", "+15551230002");
        assert_eq!(msg.counterparty().as_str(), "+15551230001");

        let mut sent = msg.clone();
        sent.direction = MessageDirection::Sent;
        assert_eq!(sent.counterparty().as_str(), "+15551230002");
    }

    #[test]
    fn test_involves() {
        let msg = received("+15551230001", "+15551230002");
        assert!(msg.involves(&number("+15551230001")));
        assert!(msg.involves(&number("+15551230002")));
        assert!(!msg.involves(&number("+15551230003")));
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let mut msg = received("+15551230001", "+15551230002");
        msg.body = "héllo".to_string();
        // 'é' is two bytes; a cut inside it must back up
        assert_eq!(msg.preview(2), "h");
        assert_eq!(msg.preview(100), "héllo");
    }

    #[test]
    fn test_has_media() {
        let mut msg = received("+15551230001", "+15551230002");
        assert!(!msg.has_media());
        msg.media_count = 2;
        assert!(msg.has_media());
    }
}
