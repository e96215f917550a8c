//! Game domain: roles, actions, payoffs.

pub mod payoff;
pub mod types;
