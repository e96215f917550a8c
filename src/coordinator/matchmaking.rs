//! Deterministic pairing over the shared store.
//!
//! Both clients of a candidate pair independently derive the same match id
//! from the sorted pair of names, so pairing needs no coordination channel
//! beyond the store itself. Creation is guarded twice:
//!
//! 1. a claim sub-key simulates create-if-absent (write a token, read back,
//!    confirm ownership), so at most one client creates the match record;
//! 2. both player records are reserved (write-then-confirm) before the
//!    ACTIVE record is written, so at most one active match can ever hold a
//!    given player even when overlapping pairs race.
//!
//! Losing any of these races is recovered silently by adopting whatever the
//! winner wrote; it is never surfaced as an error.

use chrono::Utc;
use log::{debug, info, warn};
use serde_json::Value;
use uuid::Uuid;

use crate::config::game::{CLAIM_GRACE_SECS, GameConfig};
use crate::coordinator::registry;
use crate::error::{CoordinatorError, Result};
use crate::game::types::{PlayerId, Role};
use crate::store::schema::{self, ClaimRecord, MatchRecord, MatchStatus};
use crate::store::{Store, paths};

/// A client's seat in a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub match_id: String,
    pub role: Role,
}

/// Result of one pairing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairOutcome {
    Paired(Seat),
    /// Nobody available, or a race in flight; caller re-polls.
    Waiting,
}

/// Match id both partners derive without coordination: the sorted pair
/// joined by `_vs_`. Returns the id and the sorted pair itself.
pub fn derive_match_id(a: &str, b: &str) -> (String, [PlayerId; 2]) {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    (
        format!("{first}_vs_{second}"),
        [first.to_string(), second.to_string()],
    )
}

/// One pairing attempt for `self_id`.
///
/// Order of checks matters: recover an existing binding first (own record,
/// then a scan of the matches tree), and only then try to create a new
/// pairing from the unpaired set.
pub async fn try_pair<S: Store>(store: &S, cfg: &GameConfig, self_id: &str) -> Result<PairOutcome> {
    let Some(own) = registry::get_player(store, self_id).await? else {
        return Err(CoordinatorError::UnknownPlayer(self_id.to_string()));
    };

    // Cheap path: our record already points at a match.
    if let Some(mid) = own.match_id.as_deref() {
        if let Some(seat) = adopt(store, mid, self_id).await? {
            return Ok(PairOutcome::Paired(seat));
        }
        // Stale pointer (match cleaned up under us): clear it and re-pair.
        warn!("[Matchmaking] {self_id} pointed at missing match {mid}; clearing");
        clear_binding(store, self_id).await?;
    }

    // A partner's client may have created our match before marking us.
    if let Some(seat) = find_existing(store, self_id).await? {
        registry::mark_paired(store, self_id, seat.role, &seat.match_id).await?;
        return Ok(PairOutcome::Paired(seat));
    }

    // Deterministic candidate: lexicographically first unpaired other player.
    // Pure function of the unpaired set, so racing clients converge.
    let unpaired = registry::list_unpaired(store).await?;
    let Some((candidate, _)) = unpaired.iter().find(|(id, _)| id.as_str() != self_id) else {
        debug!("[Matchmaking] {self_id} waiting for an opponent");
        return Ok(PairOutcome::Waiting);
    };

    let (match_id, pair) = derive_match_id(self_id, candidate);
    match claim(store, &match_id, self_id).await? {
        ClaimResult::Won => create_match(store, &match_id, pair, self_id).await,
        ClaimResult::Lost => {
            if let Some(seat) = adopt(store, &match_id, self_id).await? {
                debug!("[Matchmaking] {self_id} lost the create race for {match_id}; adopting");
                registry::mark_paired(store, self_id, seat.role, &seat.match_id).await?;
                Ok(PairOutcome::Paired(seat))
            } else {
                // Winner is still writing; pick the match up on the next poll.
                Ok(PairOutcome::Waiting)
            }
        }
    }
}

enum ClaimResult {
    Won,
    Lost,
}

/// Simulated create-if-absent on the claim sub-key: write our token, read
/// back, and own the match id only if our token survived.
async fn claim<S: Store>(store: &S, match_id: &str, self_id: &str) -> Result<ClaimResult> {
    if store.get(&paths::match_state(match_id)).await?.is_some() {
        // Match already exists; nothing to create.
        return Ok(ClaimResult::Lost);
    }
    let path = paths::match_claim(match_id);
    if let Some(value) = store.get(&path).await? {
        let existing: ClaimRecord = schema::decode(&path, value)?;
        if existing.owner != self_id && !is_abandoned(&existing) {
            return Ok(ClaimResult::Lost);
        }
        // Our own retry, or a claimant that died before creating: re-claim.
    }
    let token = Uuid::new_v4();
    let record = ClaimRecord {
        owner: self_id.to_string(),
        token,
        claimed_at: Utc::now(),
    };
    store.set(&path, schema::encode(&record)?).await?;
    let Some(value) = store.get(&path).await? else {
        return Ok(ClaimResult::Lost);
    };
    let stored: ClaimRecord = schema::decode(&path, value)?;
    if stored.token == token {
        Ok(ClaimResult::Won)
    } else {
        Ok(ClaimResult::Lost)
    }
}

/// A claim whose match record never appeared within the grace period is
/// abandoned; its owner crashed between claiming and creating.
fn is_abandoned(claim: &ClaimRecord) -> bool {
    Utc::now()
        .signed_duration_since(claim.claimed_at)
        .num_seconds()
        >= CLAIM_GRACE_SECS
}

/// Claim-winner path: reserve both players, then write the ACTIVE record.
///
/// If either reservation fails (the player is already bound to a different
/// match), nothing ACTIVE is written: reservations made so far are rolled
/// back, the claim is released, and the caller stays in the waiting state
/// to retry against the refreshed unpaired set.
async fn create_match<S: Store>(
    store: &S,
    match_id: &str,
    pair: [PlayerId; 2],
    self_id: &str,
) -> Result<PairOutcome> {
    let roles = [Role::P1, Role::P2];
    for (i, id) in pair.iter().enumerate() {
        if !reserve_player(store, id, roles[i], match_id).await? {
            warn!("[Matchmaking] {id} is bound elsewhere; releasing claim on {match_id}");
            for prev in &pair[..i] {
                release_player(store, prev, match_id).await?;
            }
            store.delete(&paths::match_claim(match_id)).await?;
            return Ok(PairOutcome::Waiting);
        }
    }

    let record = MatchRecord {
        match_id: match_id.to_string(),
        pair,
        status: MatchStatus::Active,
        created_at: Utc::now(),
        completed_at: None,
    };
    store
        .set(&paths::match_state(match_id), schema::encode(&record)?)
        .await?;
    let role = record
        .role_of(self_id)
        .ok_or_else(|| CoordinatorError::RoleConflict {
            id: self_id.to_string(),
        })?;
    info!("[Matchmaking] match {match_id} created; {self_id} is {role}");
    Ok(PairOutcome::Paired(Seat {
        match_id: match_id.to_string(),
        role,
    }))
}

/// Write-then-confirm reservation of one player record.
///
/// Returns false when the player is (or just became) bound to a different
/// match. The read-back catches a concurrent reservation whose write landed
/// after ours.
async fn reserve_player<S: Store>(store: &S, id: &str, role: Role, match_id: &str) -> Result<bool> {
    let path = paths::player(id);
    let Some(record) = registry::get_player(store, id).await? else {
        return Ok(false);
    };
    if let Some(existing) = record.match_id.as_deref() {
        return Ok(existing == match_id);
    }
    store
        .update(
            &path,
            serde_json::json!({ "paired": true, "role": role, "match_id": match_id }),
        )
        .await?;
    let Some(stored) = registry::get_player(store, id).await? else {
        return Ok(false);
    };
    Ok(stored.match_id.as_deref() == Some(match_id))
}

/// Undo a reservation, but only if the record still points at our match.
async fn release_player<S: Store>(store: &S, id: &str, match_id: &str) -> Result<()> {
    let Some(record) = registry::get_player(store, id).await? else {
        return Ok(());
    };
    if record.match_id.as_deref() == Some(match_id) {
        clear_binding(store, id).await?;
    }
    Ok(())
}

async fn clear_binding<S: Store>(store: &S, id: &str) -> Result<()> {
    store
        .update(
            &paths::player(id),
            serde_json::json!({ "paired": false, "role": null, "match_id": null }),
        )
        .await?;
    Ok(())
}

/// Re-derive a seat from the stored match record. The stored pair ordering
/// is ground truth for roles; a cached reference never is.
pub async fn adopt<S: Store>(store: &S, match_id: &str, self_id: &str) -> Result<Option<Seat>> {
    let path = paths::match_state(match_id);
    let Some(value) = store.get(&path).await? else {
        return Ok(None);
    };
    let record: MatchRecord = schema::decode(&path, value)?;
    Ok(record.role_of(self_id).map(|role| Seat {
        match_id: match_id.to_string(),
        role,
    }))
}

/// Scan the matches tree for a match containing `id`.
///
/// Covers the window where a partner created the match but has not marked
/// our registry record yet, and lets a client that lost its local state
/// recover its seat.
async fn find_existing<S: Store>(store: &S, id: &str) -> Result<Option<Seat>> {
    let Some(tree) = store.get(paths::MATCHES).await? else {
        return Ok(None);
    };
    let Value::Object(map) = tree else {
        return Ok(None);
    };
    for (mid, node) in map {
        let Some(state) = node.get("state") else {
            // Claimed but not created yet.
            continue;
        };
        let record: MatchRecord = schema::decode(&paths::match_state(&mid), state.clone())?;
        if let Some(role) = record.role_of(id) {
            return Ok(Some(Seat {
                match_id: mid,
                role,
            }));
        }
    }
    Ok(None)
}
