use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::client::MatchClient;
use crate::config::game::{CleanupPolicy, GameConfig};
use crate::config::retry::{Progress, RetryPolicy};
use crate::coordinator::matchmaking::{self, PairOutcome};
use crate::coordinator::views::MatchState;
use crate::coordinator::{lifecycle, registry, rounds};
use crate::error::CoordinatorError;
use crate::game::payoff;
use crate::game::types::{Action, PayoffPair, Role};
use crate::store::memory::MemoryStore;
use crate::store::schema::{self, ClaimRecord, MatchRecord, MatchStatus};
use crate::store::{Store, StoreError, paths};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn cfg() -> GameConfig {
    GameConfig::reference()
}

fn client(store: &MemoryStore, config: GameConfig, id: &str) -> MatchClient<MemoryStore> {
    MatchClient::new(store.clone(), config, RetryPolicy::fast(3), id)
}

async fn join_all(store: &MemoryStore, ids: &[&str]) {
    for id in ids {
        registry::join(store, &cfg(), id).await.expect("join failed");
    }
}

/// Store adapter that fails its first N calls, then delegates. Models a
/// transient outage in front of the polling loop.
#[derive(Clone)]
struct FlakyStore {
    inner: MemoryStore,
    failures_left: Arc<AtomicU32>,
}

impl FlakyStore {
    fn new(inner: MemoryStore, failures: u32) -> Self {
        Self {
            inner,
            failures_left: Arc::new(AtomicU32::new(failures)),
        }
    }

    fn maybe_fail(&self) -> Result<(), StoreError> {
        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            return Err(StoreError::Unavailable("injected outage".to_string()));
        }
        Ok(())
    }
}

impl Store for FlakyStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        self.maybe_fail()?;
        self.inner.get(path).await
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        self.maybe_fail()?;
        self.inner.set(path, value).await
    }

    async fn update(&self, path: &str, partial: Value) -> Result<(), StoreError> {
        self.maybe_fail()?;
        self.inner.update(path, partial).await
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        self.maybe_fail()?;
        self.inner.delete(path).await
    }
}

async fn active_matches_containing(store: &MemoryStore, id: &str) -> Vec<String> {
    let Some(Value::Object(map)) = store.get(paths::MATCHES).await.expect("get matches") else {
        return Vec::new();
    };
    let mut found = Vec::new();
    for (mid, node) in map {
        let Some(state) = node.get("state") else {
            continue;
        };
        let record: MatchRecord =
            serde_json::from_value(state.clone()).expect("decode match record");
        if record.status == MatchStatus::Active && record.pair.iter().any(|p| p == id) {
            found.push(mid);
        }
    }
    found
}

// --- store adapter -------------------------------------------------------

#[tokio::test]
async fn memory_store_parent_reads_and_merge() {
    let store = MemoryStore::new();
    store.set("players/Alice", json!({"joined": true})).await.expect("set");
    store.set("players/Bob", json!({"joined": true})).await.expect("set");

    let tree = store.get("players").await.expect("get").expect("present");
    let map = tree.as_object().expect("object");
    assert_eq!(map.len(), 2);
    assert!(map.contains_key("Alice") && map.contains_key("Bob"));

    // update merges distinct keys and removes on null
    store
        .update("players/Alice", json!({"paired": true}))
        .await
        .expect("update");
    let alice = store.get("players/Alice").await.expect("get").expect("present");
    assert_eq!(alice["joined"], json!(true));
    assert_eq!(alice["paired"], json!(true));

    store
        .update("players/Alice", json!({"paired": null}))
        .await
        .expect("update");
    let alice = store.get("players/Alice").await.expect("get").expect("present");
    assert!(alice.get("paired").is_none());
}

#[tokio::test]
async fn memory_store_delete_drops_subtree() {
    let store = MemoryStore::new();
    store.set("matches/m/state", json!({"status": "ACTIVE"})).await.expect("set");
    store.set("matches/m/rounds/1", json!({"P1": "A"})).await.expect("set");
    store.delete("matches/m").await.expect("delete");
    assert!(store.get("matches/m/state").await.expect("get").is_none());
    assert!(store.get("matches/m/rounds/1").await.expect("get").is_none());
}

#[tokio::test]
async fn store_outage_propagates_to_caller() {
    init_logs();
    let flaky = FlakyStore::new(MemoryStore::new(), 1);
    let err = registry::join(&flaky, &cfg(), "Alice").await.expect_err("should fail");
    assert!(matches!(
        err,
        CoordinatorError::Store(StoreError::Unavailable(_))
    ));
    // The outage has passed; the caller's next poll succeeds.
    registry::join(&flaky, &cfg(), "Alice").await.expect("join after outage");
}

#[tokio::test]
async fn retry_poll_propagates_errors_immediately() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let result: Result<Progress<()>, &str> = RetryPolicy::fast(5)
        .poll(async || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err("boom")
        })
        .await;
    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// --- registry ------------------------------------------------------------

#[tokio::test]
async fn concurrent_joins_keep_both_records() {
    init_logs();
    let store = MemoryStore::new();
    let config = cfg();
    let (a, b) = tokio::join!(
        registry::join(&store, &config, "Alice"),
        registry::join(&store, &config, "Bob"),
    );
    a.expect("alice join");
    b.expect("bob join");
    let waiting = registry::list_unpaired(&store).await.expect("list");
    let ids: Vec<_> = waiting.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["Alice", "Bob"]);
}

#[tokio::test]
async fn duplicate_join_rejected_when_rejoin_disallowed() {
    let store = MemoryStore::new();
    let mut config = cfg();
    config.allow_rejoin = false;
    registry::join(&store, &config, "Alice").await.expect("first join");
    let err = registry::join(&store, &config, "Alice").await.expect_err("second join");
    assert!(matches!(err, CoordinatorError::DuplicateId(_)));
}

#[tokio::test]
async fn rejoin_refreshes_but_keeps_pairing() {
    let store = MemoryStore::new();
    let config = cfg();
    registry::join(&store, &config, "Alice").await.expect("join");
    registry::join(&store, &config, "Alice").await.expect("rejoin");

    registry::mark_paired(&store, "Alice", Role::P1, "Alice_vs_Bob").await.expect("mark");
    let record = registry::join(&store, &config, "Alice").await.expect("rejoin paired");
    assert!(record.paired);
    assert_eq!(record.match_id.as_deref(), Some("Alice_vs_Bob"));
}

#[tokio::test]
async fn invalid_player_ids_rejected() {
    let store = MemoryStore::new();
    for bad in ["", "a/b"] {
        let err = registry::join(&store, &cfg(), bad).await.expect_err("should reject");
        assert!(matches!(err, CoordinatorError::InvalidPlayerId(_)));
    }
}

#[tokio::test]
async fn mark_paired_is_idempotent_and_conflicts_on_mismatch() {
    let store = MemoryStore::new();
    join_all(&store, &["Alice"]).await;
    registry::mark_paired(&store, "Alice", Role::P1, "m").await.expect("first mark");
    registry::mark_paired(&store, "Alice", Role::P1, "m").await.expect("same mark is no-op");
    let err = registry::mark_paired(&store, "Alice", Role::P2, "m").await.expect_err("role flip");
    assert!(matches!(err, CoordinatorError::RoleConflict { .. }));
    let err = registry::mark_paired(&store, "Alice", Role::P1, "other").await.expect_err("match flip");
    assert!(matches!(err, CoordinatorError::RoleConflict { .. }));
}

// --- matchmaking ---------------------------------------------------------

#[test]
fn match_id_is_order_independent() {
    let (id_ab, pair_ab) = matchmaking::derive_match_id("Alice", "Bob");
    let (id_ba, pair_ba) = matchmaking::derive_match_id("Bob", "Alice");
    assert_eq!(id_ab, "Alice_vs_Bob");
    assert_eq!(id_ab, id_ba);
    assert_eq!(pair_ab, pair_ba);
}

#[tokio::test]
async fn pairing_converges_on_one_match_with_complementary_roles() {
    init_logs();
    let store = MemoryStore::new();
    let config = cfg();
    join_all(&store, &["Alice", "Bob"]).await;

    let alice = matchmaking::try_pair(&store, &config, "Alice").await.expect("alice pair");
    let bob = matchmaking::try_pair(&store, &config, "Bob").await.expect("bob pair");

    let PairOutcome::Paired(alice_seat) = alice else {
        panic!("alice should be paired");
    };
    let PairOutcome::Paired(bob_seat) = bob else {
        panic!("bob should be paired");
    };
    assert_eq!(alice_seat.match_id, "Alice_vs_Bob");
    assert_eq!(alice_seat.match_id, bob_seat.match_id);
    assert_eq!(alice_seat.role, Role::P1);
    assert_eq!(bob_seat.role, Role::P2);
    assert_eq!(alice_seat.role.opponent(), bob_seat.role);

    assert_eq!(active_matches_containing(&store, "Alice").await.len(), 1);
}

#[tokio::test]
async fn unpaired_player_keeps_waiting() {
    let store = MemoryStore::new();
    join_all(&store, &["Alice"]).await;
    let outcome = matchmaking::try_pair(&store, &cfg(), "Alice").await.expect("pair");
    assert_eq!(outcome, PairOutcome::Waiting);
    let view = registry::registry_view(&store, "Alice").await.expect("view");
    assert!(view.waiting);
}

#[tokio::test]
async fn third_player_never_double_books_a_paired_player() {
    init_logs();
    let store = MemoryStore::new();
    let config = cfg();
    join_all(&store, &["Alice", "Bob", "Carol"]).await;

    // Bob pairs first and lands Alice (lexicographically first candidate).
    let bob = matchmaking::try_pair(&store, &config, "Bob").await.expect("bob pair");
    assert!(matches!(bob, PairOutcome::Paired(_)));

    // Carol's poll sees Alice as paired and finds nobody else.
    let carol = matchmaking::try_pair(&store, &config, "Carol").await.expect("carol pair");
    assert_eq!(carol, PairOutcome::Waiting);

    assert_eq!(
        active_matches_containing(&store, "Alice").await,
        vec!["Alice_vs_Bob".to_string()]
    );
}

#[tokio::test]
async fn reservation_conflict_aborts_creation_and_releases_claim() {
    init_logs();
    let store = MemoryStore::new();
    let config = cfg();
    join_all(&store, &["Alice", "Carol"]).await;

    // Alice's record is already bound to another match while still listed
    // unpaired (a racing writer landed between Carol's reads).
    store
        .update(&paths::player("Alice"), json!({"match_id": "Alice_vs_Bob"}))
        .await
        .expect("bind alice");

    let carol = matchmaking::try_pair(&store, &config, "Carol").await.expect("carol pair");
    assert_eq!(carol, PairOutcome::Waiting);

    // No ACTIVE match was created for the overlapping pair, the claim was
    // released, and Carol is untouched.
    assert!(store.get("matches/Alice_vs_Carol").await.expect("get").is_none());
    let carol_record = registry::get_player(&store, "Carol").await.expect("get").expect("present");
    assert!(!carol_record.paired);
}

#[tokio::test]
async fn claim_loser_adopts_the_winning_match() {
    init_logs();
    let store = MemoryStore::new();
    let config = cfg();
    join_all(&store, &["Alice", "Bob"]).await;

    // Bob holds a fresh claim on the derived match id but has not written
    // the match record yet.
    let claim = ClaimRecord {
        owner: "Bob".to_string(),
        token: Uuid::new_v4(),
        claimed_at: Utc::now(),
    };
    store
        .set(
            &paths::match_claim("Alice_vs_Bob"),
            schema::encode(&claim).expect("encode"),
        )
        .await
        .expect("set claim");

    // Alice loses the create race and stays in the waiting state.
    let first = matchmaking::try_pair(&store, &config, "Alice").await.expect("pair");
    assert_eq!(first, PairOutcome::Waiting);

    // Bob's client finishes creating; Alice's next poll adopts.
    let record = MatchRecord {
        match_id: "Alice_vs_Bob".to_string(),
        pair: ["Alice".to_string(), "Bob".to_string()],
        status: MatchStatus::Active,
        created_at: Utc::now(),
        completed_at: None,
    };
    store
        .set(
            &paths::match_state("Alice_vs_Bob"),
            schema::encode(&record).expect("encode"),
        )
        .await
        .expect("set state");

    let second = matchmaking::try_pair(&store, &config, "Alice").await.expect("pair");
    let PairOutcome::Paired(seat) = second else {
        panic!("alice should adopt the existing match");
    };
    assert_eq!(seat.role, Role::P1);
    let alice = registry::get_player(&store, "Alice").await.expect("get").expect("present");
    assert!(alice.paired);
}

#[tokio::test]
async fn abandoned_claim_is_reclaimed() {
    init_logs();
    let store = MemoryStore::new();
    let config = cfg();
    join_all(&store, &["Alice", "Bob"]).await;

    let stale = ClaimRecord {
        owner: "Ghost".to_string(),
        token: Uuid::new_v4(),
        claimed_at: Utc::now() - TimeDelta::seconds(120),
    };
    store
        .set(
            &paths::match_claim("Alice_vs_Bob"),
            schema::encode(&stale).expect("encode"),
        )
        .await
        .expect("set claim");

    let outcome = matchmaking::try_pair(&store, &config, "Alice").await.expect("pair");
    assert!(matches!(outcome, PairOutcome::Paired(_)));
}

// --- rounds --------------------------------------------------------------

async fn paired_store() -> (MemoryStore, GameConfig) {
    let store = MemoryStore::new();
    let config = cfg();
    join_all(&store, &["Alice", "Bob"]).await;
    matchmaking::try_pair(&store, &config, "Alice").await.expect("pair alice");
    matchmaking::try_pair(&store, &config, "Bob").await.expect("pair bob");
    (store, config)
}

const MID: &str = "Alice_vs_Bob";

#[tokio::test]
async fn invalid_action_rejected_before_any_write() {
    let (store, config) = paired_store().await;
    let err = rounds::submit_action(&store, &config, MID, 1, Role::P1, &Action::from("X"))
        .await
        .expect_err("X is not a P1 action");
    assert!(matches!(err, CoordinatorError::InvalidAction { .. }));
    let round = rounds::read_round(&store, MID, 1).await.expect("read");
    assert!(round.p1.is_none());
}

#[tokio::test]
async fn out_of_range_rounds_are_not_open() {
    let (store, config) = paired_store().await;
    for bad in [0, 3] {
        let err = rounds::submit_action(&store, &config, MID, bad, Role::P1, &Action::from("A"))
            .await
            .expect_err("round out of range");
        assert!(matches!(err, CoordinatorError::RoundNotOpen { .. }));
    }
}

#[tokio::test]
async fn round_two_opens_only_after_round_one_resolves() {
    init_logs();
    let (store, config) = paired_store().await;

    let err = rounds::submit_action(&store, &config, MID, 2, Role::P1, &Action::from("A"))
        .await
        .expect_err("round 2 closed");
    assert!(matches!(err, CoordinatorError::RoundNotOpen { round: 2 }));

    rounds::submit_action(&store, &config, MID, 1, Role::P1, &Action::from("A")).await.expect("p1");
    // Still closed with one submission in.
    let err = rounds::submit_action(&store, &config, MID, 2, Role::P1, &Action::from("B"))
        .await
        .expect_err("round 2 still closed");
    assert!(matches!(err, CoordinatorError::RoundNotOpen { round: 2 }));

    rounds::submit_action(&store, &config, MID, 1, Role::P2, &Action::from("Z")).await.expect("p2");
    rounds::poll_round(&store, &config, MID, 1).await.expect("resolve");

    rounds::submit_action(&store, &config, MID, 2, Role::P1, &Action::from("B"))
        .await
        .expect("round 2 open after round 1 outcome");
}

#[tokio::test]
async fn submissions_are_write_once_with_idempotent_retry() {
    let (store, config) = paired_store().await;
    rounds::submit_action(&store, &config, MID, 1, Role::P1, &Action::from("A")).await.expect("first");

    // Retry after an uncertain delivery: identical value, no conflict.
    rounds::submit_action(&store, &config, MID, 1, Role::P1, &Action::from("A"))
        .await
        .expect("identical retry is a no-op");

    // A changed mind is rejected, not applied.
    let err = rounds::submit_action(&store, &config, MID, 1, Role::P1, &Action::from("B"))
        .await
        .expect_err("different value rejected");
    assert!(matches!(
        err,
        CoordinatorError::AlreadySubmitted { round: 1, role: Role::P1 }
    ));

    let round = rounds::read_round(&store, MID, 1).await.expect("read");
    assert_eq!(round.p1, Some(Action::from("A")));
}

#[tokio::test]
async fn outcome_is_write_once_and_payoff_is_pure() {
    init_logs();
    let (store, config) = paired_store().await;
    rounds::submit_action(&store, &config, MID, 1, Role::P1, &Action::from("A")).await.expect("p1");
    rounds::submit_action(&store, &config, MID, 1, Role::P2, &Action::from("Z")).await.expect("p2");

    // Both clients race to resolve; every poll reports the same outcome and
    // the stored value never changes.
    let first = rounds::poll_round(&store, &config, MID, 1).await.expect("poll");
    let second = rounds::poll_round(&store, &config, MID, 1).await.expect("poll again");
    assert_eq!(first.outcome, Some(PayoffPair::new(1, 4)));
    assert_eq!(first.outcome, second.outcome);

    let a = payoff::payoff(&config, &Action::from("A"), &Action::from("Z")).expect("payoff");
    let b = payoff::payoff(&config, &Action::from("A"), &Action::from("Z")).expect("payoff");
    assert_eq!(a, b);
}

#[tokio::test]
async fn undefined_outcome_is_surfaced_not_stored() {
    init_logs();
    let store = MemoryStore::new();
    let mut config = cfg();
    // Domain allows an action the matrix does not know: a configuration bug.
    config.role1_actions.push(Action::from("C"));
    join_all(&store, &["Alice", "Bob"]).await;
    matchmaking::try_pair(&store, &config, "Alice").await.expect("pair");

    rounds::submit_action(&store, &config, MID, 1, Role::P1, &Action::from("C")).await.expect("p1");
    rounds::submit_action(&store, &config, MID, 1, Role::P2, &Action::from("X")).await.expect("p2");

    let err = rounds::poll_round(&store, &config, MID, 1).await.expect_err("no matrix entry");
    assert!(matches!(err, CoordinatorError::UndefinedOutcome { .. }));
    let round = rounds::read_round(&store, MID, 1).await.expect("read");
    assert!(round.outcome.is_none());
}

// --- full scenario through the client driver -----------------------------

#[tokio::test]
async fn reference_two_round_scenario() {
    init_logs();
    let store = MemoryStore::new();
    let mut config = cfg();
    config.cleanup = CleanupPolicy::OnAck;
    let mut alice = client(&store, config.clone(), "Alice");
    let mut bob = client(&store, config.clone(), "Bob");

    alice.join().await.expect("alice join");
    bob.join().await.expect("bob join");

    let (a, b) = tokio::join!(alice.pair(), bob.pair());
    let alice_seat = a.expect("alice pair").ready().expect("alice seated");
    let bob_seat = b.expect("bob pair").ready().expect("bob seated");
    assert_eq!(alice_seat.role, Role::P1);
    assert_eq!(bob_seat.role, Role::P2);

    // Round 1: Alice plays A, Bob plays Z -> (1, 4).
    alice.submit(1, "A").await.expect("alice r1");
    bob.submit(1, "Z").await.expect("bob r1");
    let (a, b) = tokio::join!(alice.await_outcome(1), bob.await_outcome(1));
    assert_eq!(a.expect("a r1").ready(), Some(PayoffPair::new(1, 4)));
    assert_eq!(b.expect("b r1").ready(), Some(PayoffPair::new(1, 4)));

    // Round 2: Alice plays B, Bob plays Y -> (2, 1).
    alice.submit(2, "B").await.expect("alice r2");
    bob.submit(2, "Y").await.expect("bob r2");
    let (a, b) = tokio::join!(alice.await_outcome(2), bob.await_outcome(2));
    assert_eq!(a.expect("a r2").ready(), Some(PayoffPair::new(2, 1)));
    assert_eq!(b.expect("b r2").ready(), Some(PayoffPair::new(2, 1)));

    assert!(alice.is_complete().await.expect("complete"));
    let view = alice.match_view().await.expect("view");
    assert_eq!(view.state, MatchState::Complete);

    // Cleanup waits for both acknowledgements.
    alice.acknowledge().await.expect("alice ack");
    assert!(!alice.cleanup().await.expect("cleanup not eligible"));
    bob.acknowledge().await.expect("bob ack");
    assert!(bob.cleanup().await.expect("cleanup eligible"));
    assert!(store.get(&paths::player("Alice")).await.expect("get").is_none());
    assert!(store.get("matches/Alice_vs_Bob").await.expect("get").is_none());
}

#[tokio::test]
async fn lone_client_reports_pending() {
    init_logs();
    let store = MemoryStore::new();
    let mut alice = client(&store, cfg(), "Alice");
    alice.join().await.expect("join");
    let progress = alice.pair().await.expect("pair");
    assert!(progress.is_pending());
    assert!(alice.registry_view().await.expect("view").waiting);
}

#[tokio::test]
async fn client_requires_a_seat_before_playing() {
    let store = MemoryStore::new();
    let alice = client(&store, cfg(), "Alice");
    alice.join().await.expect("join");
    let err = alice.submit(1, "A").await.expect_err("not paired yet");
    assert!(matches!(err, CoordinatorError::NotPaired(_)));
}

// --- lifecycle -----------------------------------------------------------

async fn completed_match(config: &GameConfig) -> MemoryStore {
    let store = MemoryStore::new();
    join_all(&store, &["Alice", "Bob"]).await;
    matchmaking::try_pair(&store, config, "Alice").await.expect("pair");
    for (round, a1, a2) in [(1, "A", "X"), (2, "B", "Y")] {
        rounds::submit_action(&store, config, MID, round, Role::P1, &Action::from(a1))
            .await
            .expect("p1 submit");
        rounds::submit_action(&store, config, MID, round, Role::P2, &Action::from(a2))
            .await
            .expect("p2 submit");
        rounds::poll_round(&store, config, MID, round).await.expect("resolve");
    }
    store
}

#[tokio::test]
async fn cleanup_never_fires_on_an_active_match() {
    let store = MemoryStore::new();
    let mut config = cfg();
    config.cleanup = CleanupPolicy::Immediate;
    join_all(&store, &["Alice", "Bob"]).await;
    matchmaking::try_pair(&store, &config, "Alice").await.expect("pair");
    assert!(!lifecycle::cleanup_match(&store, &config, MID).await.expect("cleanup"));
    assert!(store.get(&paths::match_state(MID)).await.expect("get").is_some());
}

#[tokio::test]
async fn immediate_policy_cleans_after_completion() {
    let mut config = cfg();
    config.cleanup = CleanupPolicy::Immediate;
    let store = completed_match(&config).await;
    assert!(lifecycle::cleanup_match(&store, &config, MID).await.expect("cleanup"));
    assert!(store.get(&paths::player("Bob")).await.expect("get").is_none());
}

#[tokio::test]
async fn on_ack_policy_waits_for_both_roles() {
    init_logs();
    let mut config = cfg();
    config.cleanup = CleanupPolicy::OnAck;
    let store = completed_match(&config).await;

    assert!(!lifecycle::cleanup_match(&store, &config, MID).await.expect("no acks"));
    lifecycle::acknowledge(&store, MID, Role::P1).await.expect("p1 ack");
    lifecycle::acknowledge(&store, MID, Role::P1).await.expect("repeated ack is a no-op");
    assert!(!lifecycle::cleanup_match(&store, &config, MID).await.expect("one ack"));
    lifecycle::acknowledge(&store, MID, Role::P2).await.expect("p2 ack");
    assert!(lifecycle::cleanup_match(&store, &config, MID).await.expect("both acks"));
}

#[tokio::test]
async fn ttl_policy_respects_retention() {
    let mut config = cfg();
    config.cleanup = CleanupPolicy::Ttl(Duration::from_secs(3600));
    let store = completed_match(&config).await;
    assert!(!lifecycle::cleanup_match(&store, &config, MID).await.expect("too fresh"));

    config.cleanup = CleanupPolicy::Ttl(Duration::ZERO);
    assert!(lifecycle::cleanup_match(&store, &config, MID).await.expect("expired"));
}
