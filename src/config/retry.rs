//! Bounded polling policy.
//!
//! Every cross-client wait (opponent discovery, the partner's submission) is
//! a bounded poll: a fixed number of attempts with a sleep and a little
//! jitter between them. Exhausting the attempts yields [`Progress::Pending`],
//! never an error and never an unbounded block; the caller re-enters the
//! coordinator on its next tick and resumes from whatever the store holds.

use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;

/// Default number of poll attempts before reporting `Pending`.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 15;

/// Default delay between poll attempts, in milliseconds.
pub const DEFAULT_DELAY_MS: u64 = 2000;

/// Default upper bound for per-attempt jitter, in milliseconds. Spreads the
/// two clients' polls apart so they stop hammering the store in lockstep.
pub const DEFAULT_JITTER_MS: u64 = 250;

/// Outcome of a bounded wait: the value, or "not yet" with nothing held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress<T> {
    Ready(T),
    Pending,
}

impl<T> Progress<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Progress::Ready(value) => Some(value),
            Progress::Pending => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Progress::Pending)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            jitter: Duration::from_millis(DEFAULT_JITTER_MS),
        }
    }
}

impl RetryPolicy {
    /// Tight policy for tests: near-immediate retries, few attempts.
    pub fn fast(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            delay: Duration::from_millis(1),
            jitter: Duration::ZERO,
        }
    }

    /// Poll `f` until it yields a value or the attempt budget runs out.
    ///
    /// `Ok(None)` from `f` means "not yet"; errors propagate immediately and
    /// are left to the caller's own retry loop.
    pub async fn poll<T, E, F>(&self, mut f: F) -> Result<Progress<T>, E>
    where
        F: AsyncFnMut() -> Result<Option<T>, E>,
    {
        for attempt in 1..=self.max_attempts {
            if let Some(value) = f().await? {
                return Ok(Progress::Ready(value));
            }
            if attempt < self.max_attempts {
                self.pause().await;
            }
        }
        Ok(Progress::Pending)
    }

    async fn pause(&self) {
        let jitter_ms = self.jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            0
        } else {
            rand::rng().random_range(0..=jitter_ms)
        };
        sleep(self.delay + Duration::from_millis(jitter)).await;
    }
}
