//! Payoff engine: checked lookup into the configured matrix.

use log::error;

use crate::config::game::GameConfig;
use crate::error::{CoordinatorError, Result};
use crate::game::types::{Action, PayoffPair};

/// Look up the payoff pair for one simultaneous move.
///
/// Pure: repeated calls with the same actions return the same pair, which is
/// what makes redundant outcome writes by racing clients harmless. An action
/// combination that passed domain validation but is missing from the matrix
/// is a configuration bug; it is logged and surfaced, never stored.
pub fn payoff(cfg: &GameConfig, a1: &Action, a2: &Action) -> Result<PayoffPair> {
    match cfg.payoff_matrix.get(&(a1.clone(), a2.clone())) {
        Some(&pair) => Ok(pair),
        None => {
            error!("[Payoff] no matrix entry for ({a1}, {a2}); check the configured domains");
            Err(CoordinatorError::UndefinedOutcome {
                a1: a1.clone(),
                a2: a2.clone(),
            })
        }
    }
}
