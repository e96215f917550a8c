//! Error taxonomy for the coordinator.
//!
//! Committed state is never corrupted by an error path: validation failures
//! are rejected before any write, and write-once conflicts are reported
//! without touching what is already stored. Losing the match-creation race
//! is not represented here at all; it is recovered silently by adopting the
//! winning match.

use thiserror::Error;

use crate::game::types::{Action, Role};
use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, CoordinatorError>;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// Empty or path-unsafe player id. Rejected before any write.
    #[error("invalid player id `{0}`")]
    InvalidPlayerId(String),

    /// Action outside the submitting role's configured domain. Rejected
    /// locally, never written.
    #[error("invalid action `{action}` for {role}")]
    InvalidAction { role: Role, action: Action },

    /// The id is already waiting in the registry and rejoin is disallowed.
    #[error("player `{0}` has already joined")]
    DuplicateId(String),

    #[error("player `{0}` has not joined")]
    UnknownPlayer(String),

    #[error("unknown match `{0}`")]
    UnknownMatch(String),

    #[error("player `{0}` is not paired yet")]
    NotPaired(String),

    /// The write-once submission slot already holds a different action. An
    /// identical retry is a no-op, not this error.
    #[error("{role} has already submitted for round {round}")]
    AlreadySubmitted { round: u32, role: Role },

    /// A player record is already bound to a different role or match.
    #[error("player `{id}` is already bound to another seat")]
    RoleConflict { id: String },

    /// Round out of range, not yet opened by the previous outcome, or
    /// already resolved.
    #[error("round {round} is not open for submission")]
    RoundNotOpen { round: u32 },

    /// Action pair allowed by the domains but absent from the payoff matrix.
    /// Indicates a configuration bug.
    #[error("no payoff defined for ({a1}, {a2})")]
    UndefinedOutcome { a1: Action, a2: Action },

    /// Stored value did not match the expected record schema.
    #[error("malformed record at `{path}`: {reason}")]
    Schema { path: String, reason: String },

    /// Store outage; the caller's polling loop retries with backoff.
    #[error(transparent)]
    Store(#[from] StoreError),
}
