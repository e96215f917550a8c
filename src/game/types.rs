use std::fmt;

use serde::{Deserialize, Serialize};

/// Display name a participant joins under. Unique across the live registry.
pub type PlayerId = String;

/// The two fixed seats in a match.
///
/// The first player in the sorted pair ordering is always `P1`; the wire
/// names ("P1"/"P2") are also the submission keys in round records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    P1,
    P2,
}

impl Role {
    pub fn key(&self) -> &'static str {
        match self {
            Role::P1 => "P1",
            Role::P2 => "P2",
        }
    }

    pub fn opponent(&self) -> Role {
        match self {
            Role::P1 => Role::P2,
            Role::P2 => Role::P1,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A participant's move in one round, drawn from the role's configured
/// finite domain (`A`/`B` for P1, `X`/`Y`/`Z` for P2 in the reference game).
/// Domains are configuration, so this stays an open string rather than a
/// hardcoded enum; validation happens at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(pub String);

impl Action {
    pub fn new(label: impl Into<String>) -> Self {
        Action(label.into())
    }
}

impl From<&str> for Action {
    fn from(label: &str) -> Self {
        Action(label.to_string())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered pair of numeric payoffs, `(P1, P2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoffPair {
    pub p1: i32,
    pub p2: i32,
}

impl PayoffPair {
    pub fn new(p1: i32, p2: i32) -> Self {
        Self { p1, p2 }
    }

    pub fn for_role(&self, role: Role) -> i32 {
        match role {
            Role::P1 => self.p1,
            Role::P2 => self.p2,
        }
    }
}
