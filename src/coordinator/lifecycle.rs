//! Match teardown.
//!
//! The hazard here is deleting while the slower participant is still reading
//! results, so deletion is gated on match completion and on the configured
//! policy. It never fires against a merely-active match.

use chrono::{TimeDelta, Utc};
use log::{debug, info};
use serde_json::Value;

use crate::config::game::{CleanupPolicy, GameConfig};
use crate::error::Result;
use crate::game::types::Role;
use crate::store::schema::{self, MatchRecord, MatchStatus};
use crate::store::{Store, paths};

/// Record that `role` has seen the final outcome. Write-once in effect: a
/// repeated ack stores the same value.
pub async fn acknowledge<S: Store>(store: &S, match_id: &str, role: Role) -> Result<()> {
    store
        .set(&paths::ack(match_id, role), Value::Bool(true))
        .await?;
    debug!("[Lifecycle] {role} acknowledged completion of {match_id}");
    Ok(())
}

/// Delete the match subtree and both player records if the configured policy
/// allows it. Returns whether anything was deleted; `Ok(false)` means "not
/// eligible yet", not failure.
pub async fn cleanup_match<S: Store>(store: &S, cfg: &GameConfig, match_id: &str) -> Result<bool> {
    let path = paths::match_state(match_id);
    let Some(value) = store.get(&path).await? else {
        return Ok(false);
    };
    let record: MatchRecord = schema::decode(&path, value)?;
    if record.status != MatchStatus::Complete {
        debug!("[Lifecycle] {match_id} still active; not cleaning");
        return Ok(false);
    }
    if !eligible(store, cfg, &record).await? {
        return Ok(false);
    }
    for id in &record.pair {
        store.delete(&paths::player(id)).await?;
    }
    store.delete(&paths::match_root(match_id)).await?;
    info!("[Lifecycle] {match_id} cleaned up");
    Ok(true)
}

async fn eligible<S: Store>(store: &S, cfg: &GameConfig, record: &MatchRecord) -> Result<bool> {
    match cfg.cleanup {
        CleanupPolicy::Immediate => Ok(true),
        CleanupPolicy::OnAck => {
            for role in [Role::P1, Role::P2] {
                if store
                    .get(&paths::ack(&record.match_id, role))
                    .await?
                    .is_none()
                {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        CleanupPolicy::Ttl(ttl) => {
            let Some(completed_at) = record.completed_at else {
                return Ok(false);
            };
            let age = Utc::now().signed_duration_since(completed_at);
            Ok(age >= TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX))
        }
    }
}
