//! Player registry: who has joined, and who is still waiting for a partner.

use chrono::Utc;
use log::debug;
use serde_json::Value;

use crate::config::game::GameConfig;
use crate::coordinator::views::RegistryView;
use crate::error::{CoordinatorError, Result};
use crate::game::types::{PlayerId, Role};
use crate::store::schema::{self, PlayerRecord};
use crate::store::{Store, paths};

/// Ids become store path segments, so they must be non-empty and slash-free.
fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || id.contains('/') {
        return Err(CoordinatorError::InvalidPlayerId(id.to_string()));
    }
    Ok(())
}

/// Register `id` in the live registry.
///
/// A fresh id gets a new record. An id that is already waiting is either
/// refreshed (rejoin allowed) or rejected with `DuplicateId`. A paired
/// player's record is left untouched so a returning client can recover its
/// match instead of losing it.
pub async fn join<S: Store>(store: &S, cfg: &GameConfig, id: &str) -> Result<PlayerRecord> {
    validate_id(id)?;
    let path = paths::player(id);
    match store.get(&path).await? {
        Some(value) => {
            let existing: PlayerRecord = schema::decode(&path, value)?;
            if existing.paired {
                debug!("[Registry] {id} rejoined while paired; keeping binding");
                return Ok(existing);
            }
            if !cfg.allow_rejoin {
                return Err(CoordinatorError::DuplicateId(id.to_string()));
            }
            let refreshed = PlayerRecord {
                joined_at: Utc::now(),
                ..existing
            };
            store.set(&path, schema::encode(&refreshed)?).await?;
            debug!("[Registry] {id} rejoined; record refreshed");
            Ok(refreshed)
        }
        None => {
            let record = PlayerRecord::joined_now();
            store.set(&path, schema::encode(&record)?).await?;
            debug!("[Registry] {id} joined");
            Ok(record)
        }
    }
}

pub async fn get_player<S: Store>(store: &S, id: &str) -> Result<Option<PlayerRecord>> {
    let path = paths::player(id);
    match store.get(&path).await? {
        Some(value) => Ok(Some(schema::decode(&path, value)?)),
        None => Ok(None),
    }
}

/// All waiting players, sorted by id.
///
/// The lexicographic sort is the deterministic tie-break both clients rely
/// on to converge on the same candidate from the same unpaired set.
pub async fn list_unpaired<S: Store>(store: &S) -> Result<Vec<(PlayerId, PlayerRecord)>> {
    let Some(tree) = store.get(paths::PLAYERS).await? else {
        return Ok(Vec::new());
    };
    let Value::Object(map) = tree else {
        return Err(CoordinatorError::Schema {
            path: paths::PLAYERS.to_string(),
            reason: "expected an object of player records".to_string(),
        });
    };
    let mut waiting = Vec::new();
    for (id, value) in map {
        let record: PlayerRecord = schema::decode(&paths::player(&id), value)?;
        if !record.paired {
            waiting.push((id, record));
        }
    }
    waiting.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(waiting)
}

/// Bind `id` to `(role, match_id)`.
///
/// Idempotent for the same binding; a different binding is a `RoleConflict`.
pub async fn mark_paired<S: Store>(store: &S, id: &str, role: Role, match_id: &str) -> Result<()> {
    let path = paths::player(id);
    let Some(value) = store.get(&path).await? else {
        return Err(CoordinatorError::UnknownPlayer(id.to_string()));
    };
    let record: PlayerRecord = schema::decode(&path, value)?;
    if record.paired {
        if record.role == Some(role) && record.match_id.as_deref() == Some(match_id) {
            return Ok(());
        }
        return Err(CoordinatorError::RoleConflict { id: id.to_string() });
    }
    store
        .update(
            &path,
            serde_json::json!({ "paired": true, "role": role, "match_id": match_id }),
        )
        .await?;
    debug!("[Registry] {id} marked paired as {role} in {match_id}");
    Ok(())
}

pub async fn registry_view<S: Store>(store: &S, id: &str) -> Result<RegistryView> {
    let waiting = match get_player(store, id).await? {
        Some(record) => !record.paired,
        None => false,
    };
    Ok(RegistryView { waiting })
}
