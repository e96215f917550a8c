//! Read-only snapshots for the rendering layer.
//!
//! The coordinator never calls into rendering; the UI polls these plain
//! serializable values and decides for itself what to show.

use serde::Serialize;

use crate::game::types::{Action, PayoffPair, Role};
use crate::store::schema::RoundRecord;

/// Client-local position in the match state machine. Advance is implicit:
/// observing round k's outcome moves the view to awaiting round k+1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchState {
    AwaitingRound(u32),
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundView {
    pub p1: Option<Action>,
    pub p2: Option<Action>,
    pub outcome: Option<PayoffPair>,
}

impl RoundView {
    pub(crate) fn from_record(record: RoundRecord) -> Self {
        Self {
            p1: record.p1,
            p2: record.p2,
            outcome: record.outcome,
        }
    }

    pub fn submission(&self, role: Role) -> Option<&Action> {
        match role {
            Role::P1 => self.p1.as_ref(),
            Role::P2 => self.p2.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchView {
    pub match_id: String,
    pub role: Role,
    pub state: MatchState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistryView {
    /// True while the player is joined and still unpaired.
    pub waiting: bool,
}
