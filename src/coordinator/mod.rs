//! Coordination layer over the shared store.
//!
//! This is where the two clients' independent call sequences converge:
//! - Player registry: join, the unpaired set, pairing marks
//! - Matchmaking: deterministic pairing, creation claims, role assignment
//! - Rounds: write-once submissions and derived outcomes
//! - Lifecycle: acknowledgements and policy-gated cleanup
//! - Views: read-only snapshots for the rendering layer

pub mod lifecycle;
pub mod matchmaking;
pub mod registry;
pub mod rounds;
pub mod views;
