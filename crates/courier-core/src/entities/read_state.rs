//! Conversation read state - when a user last viewed a conversation
//!
//! One durable row per (user, counterparty) pair, upserted on every
//! mark-as-read and never deleted. Absence of a row means "never read".

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::value_objects::PhoneNumber;

/// Durable read marker for one (user, counterparty) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationReadState {
    pub user_id: Uuid,
    pub phone_number: PhoneNumber,
    /// Last time the user viewed this conversation; `None` = never read
    pub last_read_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationReadState {
    /// Create a new read state
    pub fn new(
        user_id: Uuid,
        phone_number: PhoneNumber,
        last_read_at: Option<DateTime<Utc>>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            phone_number,
            last_read_at,
            updated_at,
        }
    }

    /// Check if a message at `timestamp` is covered by this marker
    #[inline]
    pub fn covers(&self, timestamp: DateTime<Utc>) -> bool {
        self.last_read_at.is_some_and(|read| timestamp <= read)
    }
}

/// In-memory projection of a user's read states, keyed by counterparty.
///
/// A missing key and a key mapped to `None` both mean "never read"; the
/// distinction only matters to the synchronizer's rollback path, which
/// removes the key entirely to fall back to server truth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadStateMap(HashMap<PhoneNumber, Option<DateTime<Utc>>>);

impl ReadStateMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from durable read-state rows
    pub fn from_states(states: impl IntoIterator<Item = ConversationReadState>) -> Self {
        Self(
            states
                .into_iter()
                .map(|s| (s.phone_number, s.last_read_at))
                .collect(),
        )
    }

    /// Last-read instant for a counterparty, `None` when never read
    pub fn last_read_at(&self, counterparty: &PhoneNumber) -> Option<DateTime<Utc>> {
        self.0.get(counterparty).copied().flatten()
    }

    /// Record a read marker for a counterparty
    pub fn set(&mut self, counterparty: PhoneNumber, last_read_at: DateTime<Utc>) {
        self.0.insert(counterparty, Some(last_read_at));
    }

    /// Drop the entry for a counterparty (treated as "never read" afterwards)
    pub fn remove(&mut self, counterparty: &PhoneNumber) {
        self.0.remove(counterparty);
    }

    pub fn contains(&self, counterparty: &PhoneNumber) -> bool {
        self.0.contains_key(counterparty)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over (counterparty, last_read_at) entries
    pub fn iter(&self) -> impl Iterator<Item = (&PhoneNumber, Option<DateTime<Utc>>)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn number(s: &str) -> PhoneNumber {
        PhoneNumber::parse(s).unwrap()
    }

    #[test]
    fn test_covers() {
        let now = Utc::now();
        let state = ConversationReadState::new(
            Uuid::new_v4(),
            number("+15551230001"),
            Some(now),
            now,
        );
        assert!(state.covers(now));
        assert!(state.covers(now - Duration::seconds(1)));
        assert!(!state.covers(now + Duration::seconds(1)));
    }

    #[test]
    fn test_never_read_covers_nothing() {
        let now = Utc::now();
        let state =
            ConversationReadState::new(Uuid::new_v4(), number("+15551230001"), None, now);
        assert!(!state.covers(now - Duration::days(365)));
    }

    #[test]
    fn test_map_from_states() {
        let now = Utc::now();
        let user = Uuid::new_v4();
        let map = ReadStateMap::from_states(vec![
            ConversationReadState::new(user, number("+15551230001"), Some(now), now),
            ConversationReadState::new(user, number("+15551230002"), None, now),
        ]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.last_read_at(&number("+15551230001")), Some(now));
        // Present but never read
        assert!(map.contains(&number("+15551230002")));
        assert_eq!(map.last_read_at(&number("+15551230002")), None);
        // Absent entirely
        assert_eq!(map.last_read_at(&number("+15551230003")), None);
    }

    #[test]
    fn test_map_set_and_remove() {
        let now = Utc::now();
        let mut map = ReadStateMap::new();
        map.set(number("+15551230001"), now);
        assert_eq!(map.last_read_at(&number("+15551230001")), Some(now));

        map.remove(&number("+15551230001"));
        assert!(!map.contains(&number("+15551230001")));
        assert!(map.is_empty());
    }
}
