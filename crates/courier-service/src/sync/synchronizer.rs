//! Read-state synchronizer
//!
//! Client-side owner of the read/unread state for one user session. The
//! mark-as-read workflow is a small per-counterparty state machine:
//!
//! ```text
//! Idle -> Pending -> Confirmed  -> Idle
//!                 \-> RolledBack -> Idle
//! ```
//!
//! `Idle -> Pending` happens only when the pair has unread messages; while a
//! pair is `Pending` further mark-as-read calls short-circuit so at most one
//! upsert is ever in flight per pair. On confirmation the full read-state
//! map is reloaded from the store (another session may have written
//! concurrently, so a local merge is never trusted). On failure the
//! optimistic entry is deleted, not restored, and a reload recovers the
//! authoritative value when it can.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use courier_core::{
    group_conversations, DomainError, Message, PhoneNumber, ReadStateMap, ReadStateRepository,
};

use crate::services::ServiceResult;

use super::strategy::{GatewayError, MarkReadConfirmation, MarkReadStrategy};

/// Per-counterparty synchronization phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    /// Unread counts reflect the last known server state
    #[default]
    Idle,
    /// A mark-as-read upsert is in flight; local state is optimistic
    Pending,
    /// The last upsert succeeded and the map was reconciled
    Confirmed,
    /// The last upsert failed and the optimistic entry was discarded
    RolledBack,
}

/// Outcome of a mark-as-read invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkReadOutcome {
    /// The upsert succeeded; carries the server-recorded instant
    Updated(MarkReadConfirmation),
    /// Nothing was unread, so no upsert was issued
    AlreadyRead,
    /// An upsert for this pair is already in flight; this call was a no-op
    Pending,
}

/// Interior state, guarded by one mutex and never held across `.await`
#[derive(Default)]
struct SyncState {
    read_states: ReadStateMap,
    messages: Vec<Message>,
    in_flight: HashSet<PhoneNumber>,
    outcomes: HashMap<PhoneNumber, SyncPhase>,
}

/// Client-side read-state synchronizer for one user session
pub struct ReadStateSynchronizer {
    user_id: Uuid,
    own_phone_number: Option<PhoneNumber>,
    read_state_repo: Arc<dyn ReadStateRepository>,
    strategies: Vec<Arc<dyn MarkReadStrategy>>,
    state: Mutex<SyncState>,
}

impl ReadStateSynchronizer {
    /// Create a synchronizer with an explicit strategy chain.
    ///
    /// Strategies are tried in order until one succeeds or a
    /// non-recoverable error stops the walk; the chain must not be empty.
    pub fn new(
        user_id: Uuid,
        own_phone_number: Option<PhoneNumber>,
        read_state_repo: Arc<dyn ReadStateRepository>,
        strategies: Vec<Arc<dyn MarkReadStrategy>>,
    ) -> Self {
        assert!(!strategies.is_empty(), "strategy chain must not be empty");
        Self {
            user_id,
            own_phone_number,
            read_state_repo,
            strategies,
            state: Mutex::new(SyncState::default()),
        }
    }

    /// Bulk-load all read states for the session user.
    ///
    /// Fails softly: on any store error an empty map is returned (and the
    /// cached map left untouched), since absent read state degrades to
    /// "everything unread" instead of breaking the caller.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn load_read_states(&self) -> ReadStateMap {
        if self.user_id.is_nil() {
            return ReadStateMap::new();
        }

        match self.read_state_repo.find_all_for_user(self.user_id).await {
            Ok(states) => {
                let map = ReadStateMap::from_states(states);
                self.state.lock().read_states = map.clone();
                map
            }
            Err(e) => {
                warn!(error = %e, "Failed to load read states, defaulting to unread");
                ReadStateMap::new()
            }
        }
    }

    /// Replace the message snapshot unread counts are derived from
    pub fn update_messages(&self, messages: Vec<Message>) {
        self.state.lock().messages = messages;
    }

    /// Unread count for one counterparty, from the latest snapshot and map
    pub fn unread_count(&self, counterparty: &PhoneNumber) -> u32 {
        let state = self.state.lock();
        Self::unread_count_locked(&state, self.own_phone_number.as_ref(), counterparty)
    }

    /// Current synchronization phase for a pair.
    ///
    /// `Pending` while an upsert is in flight; otherwise the outcome of the
    /// most recent attempt (`Confirmed`/`RolledBack`), which the pair has
    /// already left for `Idle` as far as gating is concerned.
    pub fn phase(&self, counterparty: &PhoneNumber) -> SyncPhase {
        let state = self.state.lock();
        if state.in_flight.contains(counterparty) {
            SyncPhase::Pending
        } else {
            state
                .outcomes
                .get(counterparty)
                .copied()
                .unwrap_or_default()
        }
    }

    /// Mark a conversation as read.
    ///
    /// Applies an optimistic local marker, issues one pass through the
    /// strategy chain, then reconciles: reload-on-success, delete-and-
    /// reload-on-failure. Serialized per pair; concurrent calls for the
    /// same counterparty return [`MarkReadOutcome::Pending`] without
    /// touching the network.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn mark_as_read(
        &self,
        counterparty: &PhoneNumber,
    ) -> ServiceResult<MarkReadOutcome> {
        if self.user_id.is_nil() {
            return Err(DomainError::MissingArgument("user_id").into());
        }

        {
            let mut state = self.state.lock();
            if state.in_flight.contains(counterparty) {
                return Ok(MarkReadOutcome::Pending);
            }
            if Self::unread_count_locked(&state, self.own_phone_number.as_ref(), counterparty)
                == 0
            {
                return Ok(MarkReadOutcome::AlreadyRead);
            }

            // Idle -> Pending: optimistic marker at the local clock; the
            // server's instant replaces it on confirmation.
            state.in_flight.insert(counterparty.clone());
            state.read_states.set(counterparty.clone(), Utc::now());
        }

        let result = self.run_strategy_chain(counterparty).await;

        match result {
            Ok(confirmation) => {
                {
                    let mut state = self.state.lock();
                    state
                        .read_states
                        .set(counterparty.clone(), confirmation.last_read_at);
                }
                // Full reload rather than a local merge: another session may
                // have upserted other pairs since our bulk load.
                self.reload_after_write(counterparty).await;
                self.finish(counterparty, SyncPhase::Confirmed);
                info!(counterparty = %counterparty, "Conversation marked as read");
                Ok(MarkReadOutcome::Updated(confirmation))
            }
            Err(e) => {
                {
                    let mut state = self.state.lock();
                    state.read_states.remove(counterparty);
                }
                self.reload_after_write(counterparty).await;
                self.finish(counterparty, SyncPhase::RolledBack);
                warn!(counterparty = %counterparty, error = %e, "Mark-as-read failed, rolled back");
                Err(e.into())
            }
        }
    }

    /// Walk the strategy chain: first success wins, fallback-eligible
    /// failures move on, anything else stops the walk.
    async fn run_strategy_chain(
        &self,
        counterparty: &PhoneNumber,
    ) -> Result<MarkReadConfirmation, GatewayError> {
        let last = self.strategies.len() - 1;
        for (i, strategy) in self.strategies.iter().enumerate() {
            match strategy.mark_read(self.user_id, counterparty).await {
                Ok(confirmation) => return Ok(confirmation),
                Err(e) if i < last && e.is_fallback_eligible() => {
                    warn!(
                        strategy = strategy.name(),
                        error = %e,
                        "Mark-read strategy failed, falling back"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        unreachable!("strategy chain is never empty");
    }

    /// Best-effort reload of the full map after a write attempt. On reload
    /// failure the map keeps whatever the write path left for the pair: the
    /// confirmed instant after success, no entry after rollback.
    async fn reload_after_write(&self, counterparty: &PhoneNumber) {
        match self.read_state_repo.find_all_for_user(self.user_id).await {
            Ok(states) => {
                let mut state = self.state.lock();
                state.read_states = ReadStateMap::from_states(states);
            }
            Err(e) => {
                warn!(
                    counterparty = %counterparty,
                    error = %e,
                    "Read-state reload failed, keeping local view"
                );
            }
        }
    }

    fn finish(&self, counterparty: &PhoneNumber, outcome: SyncPhase) {
        let mut state = self.state.lock();
        state.in_flight.remove(counterparty);
        state.outcomes.insert(counterparty.clone(), outcome);
    }

    fn unread_count_locked(
        state: &SyncState,
        own_phone_number: Option<&PhoneNumber>,
        counterparty: &PhoneNumber,
    ) -> u32 {
        group_conversations(&state.messages, own_phone_number, &state.read_states)
            .into_iter()
            .find(|c| &c.counterparty == counterparty)
            .map_or(0, |c| c.unread_count)
    }
}

impl std::fmt::Debug for ReadStateSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadStateSynchronizer")
            .field("user_id", &self.user_id)
            .field("own_phone_number", &self.own_phone_number)
            .field("strategies", &self.strategies.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};
    use std::collections::HashMap as StdHashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::Notify;

    use courier_core::{ConversationReadState, MessageDirection, RepoResult};

    const ME: &str = "+15550000000";
    const ALICE: &str = "+15551110001";

    fn number(s: &str) -> PhoneNumber {
        PhoneNumber::parse(s).unwrap()
    }

    fn received(id: &str, from: &str, ts: DateTime<Utc>) -> Message {
        Message::new(
            id,
            number(from),
            number(ME),
            MessageDirection::Received,
            "body",
            0,
            ts,
            "received",
        )
    }

    /// In-memory read-state store with a failure switch
    #[derive(Default)]
    struct MemoryReadStateRepo {
        rows: Mutex<StdHashMap<(Uuid, String), ConversationReadState>>,
        fail: AtomicBool,
    }

    impl MemoryReadStateRepo {
        fn set_failing(&self, failing: bool) {
            self.fail.store(failing, Ordering::SeqCst);
        }

        fn check(&self) -> RepoResult<()> {
            if self.fail.load(Ordering::SeqCst) {
                Err(DomainError::DatabaseError("store offline".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ReadStateRepository for MemoryReadStateRepo {
        async fn upsert(
            &self,
            user_id: Uuid,
            phone_number: &PhoneNumber,
            last_read_at: DateTime<Utc>,
        ) -> RepoResult<ConversationReadState> {
            self.check()?;
            let state = ConversationReadState::new(
                user_id,
                phone_number.clone(),
                Some(last_read_at),
                Utc::now(),
            );
            self.rows
                .lock()
                .insert((user_id, phone_number.as_str().to_string()), state.clone());
            Ok(state)
        }

        async fn find_all_for_user(
            &self,
            user_id: Uuid,
        ) -> RepoResult<Vec<ConversationReadState>> {
            self.check()?;
            Ok(self
                .rows
                .lock()
                .values()
                .filter(|s| s.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn find_one(
            &self,
            user_id: Uuid,
            phone_number: &PhoneNumber,
        ) -> RepoResult<Option<ConversationReadState>> {
            self.check()?;
            Ok(self
                .rows
                .lock()
                .get(&(user_id, phone_number.as_str().to_string()))
                .cloned())
        }
    }

    /// Strategy that returns a scripted result and counts invocations,
    /// optionally parking until released so tests can observe `Pending`.
    struct ScriptedStrategy {
        calls: AtomicUsize,
        result: Box<dyn Fn() -> Result<MarkReadConfirmation, GatewayError> + Send + Sync>,
        entered: Notify,
        release: Notify,
        hold: AtomicBool,
    }

    impl ScriptedStrategy {
        fn new(
            result: impl Fn() -> Result<MarkReadConfirmation, GatewayError> + Send + Sync + 'static,
        ) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                result: Box::new(result),
                entered: Notify::new(),
                release: Notify::new(),
                hold: AtomicBool::new(false),
            })
        }

        fn holding(
            result: impl Fn() -> Result<MarkReadConfirmation, GatewayError> + Send + Sync + 'static,
        ) -> Arc<Self> {
            let s = Self::new(result);
            s.hold.store(true, Ordering::SeqCst);
            s
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MarkReadStrategy for ScriptedStrategy {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn mark_read(
            &self,
            _user_id: Uuid,
            _counterparty: &PhoneNumber,
        ) -> Result<MarkReadConfirmation, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            if self.hold.load(Ordering::SeqCst) {
                self.release.notified().await;
            }
            (self.result)()
        }
    }

    fn confirmation(at: DateTime<Utc>) -> MarkReadConfirmation {
        MarkReadConfirmation {
            counterparty: number(ALICE),
            last_read_at: at,
        }
    }

    fn synchronizer(
        repo: Arc<MemoryReadStateRepo>,
        strategies: Vec<Arc<dyn MarkReadStrategy>>,
    ) -> ReadStateSynchronizer {
        ReadStateSynchronizer::new(
            Uuid::new_v4(),
            Some(number(ME)),
            repo,
            strategies,
        )
    }

    #[tokio::test]
    async fn test_load_read_states_soft_fails_to_empty() {
        let repo = Arc::new(MemoryReadStateRepo::default());
        repo.set_failing(true);
        let sync = synchronizer(
            repo,
            vec![ScriptedStrategy::new(|| Ok(confirmation(Utc::now())))],
        );

        let map = sync.load_read_states().await;
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn test_mark_as_read_via_direct_store() {
        let repo = Arc::new(MemoryReadStateRepo::default());
        let sync = ReadStateSynchronizer::new(
            Uuid::new_v4(),
            Some(number(ME)),
            repo.clone(),
            vec![Arc::new(super::super::DirectStoreStrategy::new(repo.clone()))],
        );

        let t0 = Utc::now() - Duration::minutes(5);
        sync.update_messages(vec![received("SM1", ALICE, t0)]);
        assert_eq!(sync.unread_count(&number(ALICE)), 1);

        let outcome = sync.mark_as_read(&number(ALICE)).await.unwrap();
        let MarkReadOutcome::Updated(conf) = outcome else {
            panic!("expected Updated outcome");
        };
        assert_eq!(conf.counterparty, number(ALICE));

        // Scenario C: recomputed against the reloaded map, nothing at or
        // before the server instant is unread.
        assert_eq!(sync.unread_count(&number(ALICE)), 0);
        assert_eq!(sync.phase(&number(ALICE)), SyncPhase::Confirmed);
    }

    #[tokio::test]
    async fn test_already_read_is_noop_without_network() {
        let repo = Arc::new(MemoryReadStateRepo::default());
        let strategy = ScriptedStrategy::new(|| Ok(confirmation(Utc::now())));
        let sync = synchronizer(repo, vec![strategy.clone()]);

        // No messages at all: nothing unread
        let outcome = sync.mark_as_read(&number(ALICE)).await.unwrap();
        assert_eq!(outcome, MarkReadOutcome::AlreadyRead);
        assert_eq!(strategy.calls(), 0);
    }

    // P3: a second invocation while the first is pending issues no second
    // upsert and reports Pending.
    #[tokio::test]
    async fn test_pending_short_circuits_duplicate_calls() {
        let repo = Arc::new(MemoryReadStateRepo::default());
        let strategy = ScriptedStrategy::holding(|| Ok(confirmation(Utc::now())));
        let sync = Arc::new(synchronizer(repo, vec![strategy.clone()]));
        sync.update_messages(vec![received("SM1", ALICE, Utc::now())]);

        let first = {
            let sync = sync.clone();
            tokio::spawn(async move { sync.mark_as_read(&number(ALICE)).await })
        };

        // Wait until the first call is parked inside the strategy
        strategy.entered.notified().await;
        assert_eq!(sync.phase(&number(ALICE)), SyncPhase::Pending);

        let second = sync.mark_as_read(&number(ALICE)).await.unwrap();
        assert_eq!(second, MarkReadOutcome::Pending);

        strategy.release.notify_one();
        let first = first.await.unwrap().unwrap();
        assert!(matches!(first, MarkReadOutcome::Updated(_)));
        assert_eq!(strategy.calls(), 1);
    }

    // Scenario D: primary 404s, the fallback runs exactly once and its
    // confirmation has the same shape as the primary's.
    #[tokio::test]
    async fn test_fallback_runs_once_on_route_missing() {
        let repo = Arc::new(MemoryReadStateRepo::default());
        let primary = ScriptedStrategy::new(|| Err(GatewayError::RouteMissing));
        let fallback: Arc<dyn MarkReadStrategy> =
            Arc::new(super::super::DirectStoreStrategy::new(repo.clone()));
        let sync = ReadStateSynchronizer::new(
            Uuid::new_v4(),
            Some(number(ME)),
            repo.clone(),
            vec![primary.clone(), fallback],
        );
        sync.update_messages(vec![received("SM1", ALICE, Utc::now() - Duration::minutes(1))]);

        let outcome = sync.mark_as_read(&number(ALICE)).await.unwrap();
        assert!(matches!(outcome, MarkReadOutcome::Updated(_)));
        assert_eq!(primary.calls(), 1);
        // The fallback wrote exactly one row
        assert_eq!(repo.rows.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_hard_rejection_skips_fallback() {
        let repo = Arc::new(MemoryReadStateRepo::default());
        let primary = ScriptedStrategy::new(|| {
            Err(GatewayError::Rejected {
                status: 400,
                message: "User ID is required".to_string(),
            })
        });
        let fallback = ScriptedStrategy::new(|| Ok(confirmation(Utc::now())));
        let sync = synchronizer(repo, vec![primary.clone(), fallback.clone()]);
        sync.update_messages(vec![received("SM1", ALICE, Utc::now())]);

        let err = sync.mark_as_read(&number(ALICE)).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(fallback.calls(), 0);
    }

    // P4: after a failed upsert the unread count never comes back lower
    // than it was before the optimistic update.
    #[tokio::test]
    async fn test_rollback_never_lowers_unread_count() {
        let repo = Arc::new(MemoryReadStateRepo::default());
        let user_id = Uuid::new_v4();
        let t1 = Utc::now() - Duration::minutes(10);

        // Server truth: everything up to t1 read
        repo.upsert(user_id, &number(ALICE), t1).await.unwrap();

        let failing = ScriptedStrategy::new(|| {
            Err(GatewayError::Server {
                status: 500,
                message: "store down".to_string(),
            })
        });
        let sync = ReadStateSynchronizer::new(
            user_id,
            Some(number(ME)),
            repo.clone(),
            vec![failing],
        );
        sync.load_read_states().await;
        sync.update_messages(vec![
            received("SM1", ALICE, t1 - Duration::minutes(1)),
            received("SM2", ALICE, t1 + Duration::minutes(1)),
        ]);

        let before = sync.unread_count(&number(ALICE));
        assert_eq!(before, 1);

        // Reload succeeds: the authoritative t1 marker is restored
        let err = sync.mark_as_read(&number(ALICE)).await.unwrap_err();
        assert_eq!(err.error_code(), "MARK_READ_FAILED");
        assert_eq!(sync.phase(&number(ALICE)), SyncPhase::RolledBack);
        assert_eq!(sync.unread_count(&number(ALICE)), before);
    }

    #[tokio::test]
    async fn test_rollback_with_failed_reload_degrades_to_unread() {
        let repo = Arc::new(MemoryReadStateRepo::default());
        let user_id = Uuid::new_v4();
        let t1 = Utc::now() - Duration::minutes(10);
        repo.upsert(user_id, &number(ALICE), t1).await.unwrap();

        let failing = ScriptedStrategy::new(|| {
            Err(GatewayError::Server {
                status: 500,
                message: "store down".to_string(),
            })
        });
        let sync = ReadStateSynchronizer::new(
            user_id,
            Some(number(ME)),
            repo.clone(),
            vec![failing],
        );
        sync.load_read_states().await;
        sync.update_messages(vec![
            received("SM1", ALICE, t1 - Duration::minutes(1)),
            received("SM2", ALICE, t1 + Duration::minutes(1)),
        ]);
        assert_eq!(sync.unread_count(&number(ALICE)), 1);

        // Both the upsert and the recovery reload fail: the entry stays
        // absent and every received message counts unread. More unread than
        // before, never fewer.
        repo.set_failing(true);
        sync.mark_as_read(&number(ALICE)).await.unwrap_err();
        assert_eq!(sync.unread_count(&number(ALICE)), 2);
    }

    #[tokio::test]
    async fn test_nil_user_is_invalid_argument() {
        let repo = Arc::new(MemoryReadStateRepo::default());
        let strategy = ScriptedStrategy::new(|| Ok(confirmation(Utc::now())));
        let sync = ReadStateSynchronizer::new(
            Uuid::nil(),
            Some(number(ME)),
            repo,
            vec![strategy.clone()],
        );

        let err = sync.mark_as_read(&number(ALICE)).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(strategy.calls(), 0);
    }

    #[tokio::test]
    async fn test_independent_pairs_do_not_block_each_other() {
        let repo = Arc::new(MemoryReadStateRepo::default());
        let strategy = ScriptedStrategy::holding(|| Ok(confirmation(Utc::now())));
        let sync = Arc::new(synchronizer(repo.clone(), vec![strategy.clone()]));

        let bob = "+15551110002";
        sync.update_messages(vec![
            received("SM1", ALICE, Utc::now()),
            received("SM2", bob, Utc::now()),
        ]);

        let first = {
            let sync = sync.clone();
            tokio::spawn(async move { sync.mark_as_read(&number(ALICE)).await })
        };
        strategy.entered.notified().await;

        // A different pair is not gated by ALICE's in-flight upsert
        assert_eq!(sync.phase(&number(bob)), SyncPhase::Idle);
        assert_eq!(sync.unread_count(&number(bob)), 1);

        strategy.release.notify_one();
        first.await.unwrap().unwrap();
    }
}
