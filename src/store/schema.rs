//! Typed records for everything the coordinator writes to the store.
//!
//! A small tagged schema in place of loose nested objects: every value is
//! decoded and validated here, at the adapter boundary, so malformed store
//! contents surface as schema errors instead of silent misreads. Wire names
//! (`players/{id}`, `{a}_vs_{b}`, `P1`/`P2` submission keys) are the layout
//! both clients derive independently.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{CoordinatorError, Result};
use crate::game::types::{Action, PayoffPair, PlayerId, Role};

/// Registry entry at `players/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub joined: bool,
    pub joined_at: DateTime<Utc>,
    pub paired: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<String>,
}

impl PlayerRecord {
    pub fn joined_now() -> Self {
        Self {
            joined: true,
            joined_at: Utc::now(),
            paired: false,
            role: None,
            match_id: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchStatus {
    Active,
    Complete,
}

/// Canonical match record at `matches/{match_id}/state`.
///
/// `pair` keeps the sorted ordering the match id was derived from; role
/// assignment is always re-derived from it, never from a cached reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub pair: [PlayerId; 2],
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl MatchRecord {
    /// First in sort order is P1.
    pub fn role_of(&self, id: &str) -> Option<Role> {
        if self.pair[0] == id {
            Some(Role::P1)
        } else if self.pair[1] == id {
            Some(Role::P2)
        } else {
            None
        }
    }
}

/// Creation claim at `matches/{match_id}/claim`.
///
/// Simulates create-if-absent: a client writes its token, reads back, and
/// owns the match id only if its token survived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub owner: PlayerId,
    pub token: Uuid,
    pub claimed_at: DateTime<Utc>,
}

/// One simultaneous-move stage at `matches/{match_id}/rounds/{k}`.
///
/// Submissions are write-once per role; `outcome` is write-once and derived
/// from the two submissions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundRecord {
    #[serde(default, rename = "P1", skip_serializing_if = "Option::is_none")]
    pub p1: Option<Action>,
    #[serde(default, rename = "P2", skip_serializing_if = "Option::is_none")]
    pub p2: Option<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<PayoffPair>,
}

impl RoundRecord {
    pub fn submission(&self, role: Role) -> Option<&Action> {
        match role {
            Role::P1 => self.p1.as_ref(),
            Role::P2 => self.p2.as_ref(),
        }
    }
}

pub fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| CoordinatorError::Schema {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

pub fn encode<T: Serialize>(record: &T) -> Result<Value> {
    serde_json::to_value(record).map_err(|e| CoordinatorError::Schema {
        path: String::new(),
        reason: e.to_string(),
    })
}
