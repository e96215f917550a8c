//! Matchmaking and synchronized-round coordination for a two-player,
//! N-round simultaneous-move game over a shared key-value store.
//!
//! Two independent clients poll a shared mutable store with no transactions
//! and no push notifications. They discover each other in the player
//! registry, converge on a match id derived from the sorted pair of names,
//! and play rounds whose submissions and outcomes are write-once store
//! fields. Correctness is convergent by construction: deterministic key
//! derivation, idempotent writes, and read-after-write confirmation instead
//! of locks or critical sections.
//!
//! The rendering layer (forms, charts, reports) sits outside this crate and
//! consumes the read-only views in [`coordinator::views`].

pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod game;
pub mod store;

#[cfg(test)]
mod tests;

pub use client::MatchClient;
pub use config::game::{CleanupPolicy, GameConfig};
pub use config::retry::{Progress, RetryPolicy};
pub use coordinator::matchmaking::{PairOutcome, Seat};
pub use coordinator::views::{MatchState, MatchView, RegistryView, RoundView};
pub use error::CoordinatorError;
pub use game::types::{Action, PayoffPair, Role};
pub use store::memory::MemoryStore;
pub use store::{Store, StoreError};
