//! Game configuration: round count, per-role action domains, the payoff
//! matrix, and the cleanup policy. All static; none of it is game state.

use std::collections::HashMap;
use std::time::Duration;

use crate::game::types::{Action, PayoffPair, Role};

/// Number of rounds in the reference game.
pub const DEFAULT_ROUNDS: u32 = 2;

/// How long a match-id claim may sit without a match record before other
/// clients may treat it as abandoned and claim again (claimant presumed
/// crashed between claiming and creating).
pub const CLAIM_GRACE_SECS: i64 = 30;

/// When completed match and player state may be deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupPolicy {
    /// Delete as soon as the match completes. The slower participant may
    /// lose its final read; only suitable for throwaway sessions and tests.
    Immediate,
    /// Delete only after both roles have acknowledged the final outcome.
    OnAck,
    /// Delete once the match has been complete for the given duration.
    Ttl(Duration),
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub rounds: u32,
    pub role1_actions: Vec<Action>,
    pub role2_actions: Vec<Action>,
    /// Keyed by `(P1 action, P2 action)`.
    pub payoff_matrix: HashMap<(Action, Action), PayoffPair>,
    /// Whether an unpaired id may join again (refreshing its record).
    pub allow_rejoin: bool,
    pub cleanup: CleanupPolicy,
}

impl GameConfig {
    /// The reference two-round game: P1 plays {A, B}, P2 plays {X, Y, Z}.
    ///
    /// ```text
    ///         X       Y       Z
    ///   A  (4, 3)  (0, 0)  (1, 4)
    ///   B  (0, 0)  (2, 1)  (0, 0)
    /// ```
    pub fn reference() -> Self {
        let entries = [
            ("A", "X", 4, 3),
            ("A", "Y", 0, 0),
            ("A", "Z", 1, 4),
            ("B", "X", 0, 0),
            ("B", "Y", 2, 1),
            ("B", "Z", 0, 0),
        ];
        let payoff_matrix = entries
            .into_iter()
            .map(|(a1, a2, p1, p2)| ((Action::from(a1), Action::from(a2)), PayoffPair::new(p1, p2)))
            .collect();
        Self {
            rounds: DEFAULT_ROUNDS,
            role1_actions: vec![Action::from("A"), Action::from("B")],
            role2_actions: vec![Action::from("X"), Action::from("Y"), Action::from("Z")],
            payoff_matrix,
            allow_rejoin: true,
            cleanup: CleanupPolicy::OnAck,
        }
    }

    pub fn domain(&self, role: Role) -> &[Action] {
        match role {
            Role::P1 => &self.role1_actions,
            Role::P2 => &self.role2_actions,
        }
    }

    pub fn is_allowed(&self, role: Role, action: &Action) -> bool {
        self.domain(role).contains(action)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::reference()
    }
}
