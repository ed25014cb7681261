//! Phone number value object
//!
//! E.164-style identifier: a leading `+` followed by at least 11 digits.
//! Parsed at every boundary so the rest of the domain never sees a malformed
//! number.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Minimum number of digits after the leading `+`
const MIN_DIGITS: usize = 11;

/// Validated phone number in E.164-like form (`+15551230000`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse and validate a phone number from a string
    pub fn parse(s: &str) -> Result<Self, PhoneNumberParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PhoneNumberParseError::Empty);
        }
        let digits = s
            .strip_prefix('+')
            .ok_or_else(|| PhoneNumberParseError::MissingPlus(s.to_string()))?;
        if digits.len() < MIN_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneNumberParseError::InvalidFormat(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Get the number as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the value and return the inner string
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Error when parsing a phone number from string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhoneNumberParseError {
    #[error("phone number is empty")]
    Empty,

    #[error("phone number must start with '+': {0}")]
    MissingPlus(String),

    #[error("phone number must be '+' followed by at least 11 digits: {0}")]
    InvalidFormat(String),
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneNumberParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PhoneNumber::parse(s)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for PhoneNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

// Deserialize with validation so malformed numbers are rejected at the edge
impl<'de> Deserialize<'de> for PhoneNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PhoneNumber::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let number = PhoneNumber::parse("+15551230000").unwrap();
        assert_eq!(number.as_str(), "+15551230000");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let number = PhoneNumber::parse("  +84912345678 ").unwrap();
        assert_eq!(number.as_str(), "+84912345678");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(PhoneNumber::parse(""), Err(PhoneNumberParseError::Empty));
        assert_eq!(PhoneNumber::parse("   "), Err(PhoneNumberParseError::Empty));
    }

    #[test]
    fn test_parse_requires_plus() {
        assert!(matches!(
            PhoneNumber::parse("15551230000"),
            Err(PhoneNumberParseError::MissingPlus(_))
        ));
    }

    #[test]
    fn test_parse_rejects_short_or_non_digit() {
        assert!(matches!(
            PhoneNumber::parse("+1555123"),
            Err(PhoneNumberParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            PhoneNumber::parse("+1555123000a"),
            Err(PhoneNumberParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_serde_round_trip() {
        let number = PhoneNumber::parse("+15551230000").unwrap();
        let json = serde_json::to_string(&number).unwrap();
        assert_eq!(json, "\"+15551230000\"");
        let back: PhoneNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back, number);
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let result: Result<PhoneNumber, _> = serde_json::from_str("\"not-a-number\"");
        assert!(result.is_err());
    }
}
