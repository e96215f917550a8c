//! Shared store boundary.
//!
//! The store is the only shared mutable resource between the two clients: a
//! tree-shaped key-value store with `get`/`set`/`update`/`delete`, no
//! transactions, and no compare-and-swap. Correctness above this boundary
//! comes from deterministic key derivation, write-once fields, and
//! read-after-write confirmation, never from locking.

pub mod memory;
pub mod schema;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Transient outage; callers retry via their polling loop.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store refused a write (bad path, non-mergeable value).
    #[error("store rejected write at `{path}`: {reason}")]
    Rejected { path: String, reason: String },
}

/// Async adapter over the shared store.
///
/// Paths are `/`-separated. Reading a parent path returns the object of its
/// children (`get("players")` yields every player record keyed by id).
/// `update` merges the given object's top-level keys into the target — a
/// `null` value removes the key — and is not atomic across keys.
#[allow(async_fn_in_trait)]
pub trait Store {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError>;
    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError>;
    async fn update(&self, path: &str, partial: Value) -> Result<(), StoreError>;
    async fn delete(&self, path: &str) -> Result<(), StoreError>;
}

/// Store path layout, shared by every component.
pub mod paths {
    use crate::game::types::Role;

    pub const PLAYERS: &str = "players";
    pub const MATCHES: &str = "matches";

    pub fn player(id: &str) -> String {
        format!("{PLAYERS}/{id}")
    }

    pub fn match_root(match_id: &str) -> String {
        format!("{MATCHES}/{match_id}")
    }

    pub fn match_state(match_id: &str) -> String {
        format!("{MATCHES}/{match_id}/state")
    }

    pub fn match_claim(match_id: &str) -> String {
        format!("{MATCHES}/{match_id}/claim")
    }

    pub fn round(match_id: &str, round: u32) -> String {
        format!("{MATCHES}/{match_id}/rounds/{round}")
    }

    pub fn ack(match_id: &str, role: Role) -> String {
        format!("{MATCHES}/{match_id}/acks/{}", role.key())
    }
}
