//! Per-match round coordination.
//!
//! Submissions are write-once per role per round; the outcome is a derived,
//! write-once field computed by whichever client happens to observe both
//! submissions first. Round advance is implicit: the presence of round k's
//! outcome is what opens round k+1, so there is no advance call for the two
//! clients to race on.

use chrono::Utc;
use log::{debug, info};
use serde_json::{Map, Value};

use crate::config::game::GameConfig;
use crate::coordinator::views::{MatchState, MatchView, RoundView};
use crate::error::{CoordinatorError, Result};
use crate::game::payoff;
use crate::game::types::{Action, Role};
use crate::store::schema::{self, MatchRecord, MatchStatus, RoundRecord};
use crate::store::{Store, paths};

/// Decode the round record at `matches/{mid}/rounds/{k}`; empty if unwritten.
pub async fn read_round<S: Store>(store: &S, match_id: &str, round: u32) -> Result<RoundRecord> {
    let path = paths::round(match_id, round);
    match store.get(&path).await? {
        Some(value) => schema::decode(&path, value),
        None => Ok(RoundRecord::default()),
    }
}

/// Record `role`'s action for the given round.
///
/// Validation order: action domain, round range, ordering gate (round k is
/// open only once round k-1 has resolved), then the write-once check. An
/// identical retry of a committed submission is a no-op; a different value
/// for a committed slot is rejected without touching the store.
pub async fn submit_action<S: Store>(
    store: &S,
    cfg: &GameConfig,
    match_id: &str,
    round: u32,
    role: Role,
    action: &Action,
) -> Result<()> {
    if !cfg.is_allowed(role, action) {
        return Err(CoordinatorError::InvalidAction {
            role,
            action: action.clone(),
        });
    }
    if round == 0 || round > cfg.rounds {
        return Err(CoordinatorError::RoundNotOpen { round });
    }
    if store.get(&paths::match_state(match_id)).await?.is_none() {
        return Err(CoordinatorError::UnknownMatch(match_id.to_string()));
    }
    if round > 1 {
        let previous = read_round(store, match_id, round - 1).await?;
        if previous.outcome.is_none() {
            return Err(CoordinatorError::RoundNotOpen { round });
        }
    }

    let current = read_round(store, match_id, round).await?;
    if let Some(existing) = current.submission(role) {
        if existing == action {
            // Retried delivery of the same choice; committed state unchanged.
            debug!("[Rounds] {role} re-submitted round {round} of {match_id}; no-op");
            return Ok(());
        }
        return Err(CoordinatorError::AlreadySubmitted { round, role });
    }
    if current.outcome.is_some() {
        // Resolved without us; a late first submission cannot land.
        return Err(CoordinatorError::RoundNotOpen { round });
    }

    let path = paths::round(match_id, round);
    let mut partial = Map::new();
    partial.insert(role.key().to_string(), schema::encode(action)?);
    store.update(&path, Value::Object(partial)).await?;

    // Read back. The only competing writer for this key is a retry of this
    // same client, so anything else stored is a committed different choice.
    let stored = read_round(store, match_id, round).await?;
    match stored.submission(role) {
        Some(stored_action) if stored_action == action => {
            debug!("[Rounds] {role} submitted {action} for round {round} of {match_id}");
            Ok(())
        }
        _ => Err(CoordinatorError::AlreadySubmitted { round, role }),
    }
}

/// Read a round, resolving its outcome if both submissions are in.
///
/// Both clients race through here; the payoff is a pure function of the two
/// submissions, so a redundant write stores the identical value. The write
/// is still gated on a fresh absence check to avoid needless traffic.
pub async fn poll_round<S: Store>(
    store: &S,
    cfg: &GameConfig,
    match_id: &str,
    round: u32,
) -> Result<RoundView> {
    let mut record = read_round(store, match_id, round).await?;
    if record.outcome.is_none() {
        if let (Some(a1), Some(a2)) = (record.p1.clone(), record.p2.clone()) {
            let pair = payoff::payoff(cfg, &a1, &a2)?;
            let fresh = read_round(store, match_id, round).await?;
            if fresh.outcome.is_none() {
                store
                    .update(
                        &paths::round(match_id, round),
                        serde_json::json!({ "outcome": pair }),
                    )
                    .await?;
                info!(
                    "[Rounds] round {round} of {match_id} resolved: ({a1}, {a2}) -> ({}, {})",
                    pair.p1, pair.p2
                );
            }
            record.outcome = Some(pair);
        }
    }
    // Completion is re-checked on every poll of the final round, so a client
    // that crashed between writing the outcome and flipping the status does
    // not leave the match ACTIVE forever.
    if record.outcome.is_some() && round >= cfg.rounds {
        complete_match(store, match_id).await?;
    }
    Ok(RoundView::from_record(record))
}

/// Flip the match to COMPLETE once the final round resolves.
///
/// Idempotent: the first observer stamps `completed_at`; later callers see
/// COMPLETE and leave the record alone.
async fn complete_match<S: Store>(store: &S, match_id: &str) -> Result<()> {
    let path = paths::match_state(match_id);
    let Some(value) = store.get(&path).await? else {
        return Ok(());
    };
    let record: MatchRecord = schema::decode(&path, value)?;
    if record.status == MatchStatus::Complete {
        return Ok(());
    }
    store
        .update(
            &path,
            serde_json::json!({ "status": MatchStatus::Complete, "completed_at": Utc::now() }),
        )
        .await?;
    info!("[Rounds] match {match_id} complete");
    Ok(())
}

/// The lowest unresolved round, or `rounds` once everything has resolved.
pub async fn current_round<S: Store>(store: &S, cfg: &GameConfig, match_id: &str) -> Result<u32> {
    for k in 1..=cfg.rounds {
        if read_round(store, match_id, k).await?.outcome.is_none() {
            return Ok(k);
        }
    }
    Ok(cfg.rounds)
}

/// True once the final round's outcome is present.
pub async fn is_complete<S: Store>(store: &S, cfg: &GameConfig, match_id: &str) -> Result<bool> {
    Ok(read_round(store, match_id, cfg.rounds)
        .await?
        .outcome
        .is_some())
}

/// Snapshot for the rendering layer: this client's seat and where the match
/// state machine stands from its point of view.
pub async fn match_view<S: Store>(
    store: &S,
    cfg: &GameConfig,
    match_id: &str,
    self_id: &str,
) -> Result<MatchView> {
    let path = paths::match_state(match_id);
    let Some(value) = store.get(&path).await? else {
        return Err(CoordinatorError::UnknownMatch(match_id.to_string()));
    };
    let record: MatchRecord = schema::decode(&path, value)?;
    let role = record
        .role_of(self_id)
        .ok_or_else(|| CoordinatorError::UnknownPlayer(self_id.to_string()))?;
    let state = if is_complete(store, cfg, match_id).await? {
        MatchState::Complete
    } else {
        MatchState::AwaitingRound(current_round(store, cfg, match_id).await?)
    };
    Ok(MatchView {
        match_id: match_id.to_string(),
        role,
        state,
    })
}
