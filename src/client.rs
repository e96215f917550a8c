//! Polling client driver.
//!
//! One [`MatchClient`] is one participant's strictly synchronous call
//! sequence against the shared store: join, pair, submit, poll. Every wait
//! is a bounded poll that hands [`Progress::Pending`] back to the caller
//! instead of blocking; re-entering the same call resumes from whatever the
//! store holds. There is no global state: the client is the explicit handle
//! carrying store, config, and retry policy into every component call.

use log::debug;

use crate::config::game::GameConfig;
use crate::config::retry::{Progress, RetryPolicy};
use crate::coordinator::matchmaking::{self, PairOutcome, Seat};
use crate::coordinator::registry;
use crate::coordinator::rounds;
use crate::coordinator::views::{MatchView, RegistryView, RoundView};
use crate::coordinator::lifecycle;
use crate::error::{CoordinatorError, Result};
use crate::game::types::{Action, PayoffPair, PlayerId};
use crate::store::Store;

pub struct MatchClient<S: Store> {
    store: S,
    config: GameConfig,
    retry: RetryPolicy,
    id: PlayerId,
    seat: Option<Seat>,
}

impl<S: Store> MatchClient<S> {
    pub fn new(store: S, config: GameConfig, retry: RetryPolicy, id: impl Into<PlayerId>) -> Self {
        Self {
            store,
            config,
            retry,
            id: id.into(),
            seat: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The seat from the most recent successful pairing, if any. The store
    /// record, not this cache, is ground truth; `pair()` re-derives it.
    pub fn seat(&self) -> Option<&Seat> {
        self.seat.as_ref()
    }

    fn require_seat(&self) -> Result<&Seat> {
        self.seat
            .as_ref()
            .ok_or_else(|| CoordinatorError::NotPaired(self.id.clone()))
    }

    /// Register in the shared registry.
    pub async fn join(&self) -> Result<()> {
        registry::join(&self.store, &self.config, &self.id).await?;
        Ok(())
    }

    /// Poll for a partner until paired or the retry budget runs out.
    pub async fn pair(&mut self) -> Result<Progress<Seat>> {
        let retry = self.retry;
        let progress = retry
            .poll::<_, CoordinatorError, _>(async || {
                match matchmaking::try_pair(&self.store, &self.config, &self.id).await? {
                    PairOutcome::Paired(seat) => Ok(Some(seat)),
                    PairOutcome::Waiting => Ok(None),
                }
            })
            .await?;
        if let Progress::Ready(seat) = &progress {
            debug!("[Client] {} seated as {} in {}", self.id, seat.role, seat.match_id);
            self.seat = Some(seat.clone());
        }
        Ok(progress)
    }

    /// Submit this client's action for the given round.
    pub async fn submit(&self, round: u32, action: impl Into<Action>) -> Result<()> {
        let seat = self.require_seat()?;
        rounds::submit_action(
            &self.store,
            &self.config,
            &seat.match_id,
            round,
            seat.role,
            &action.into(),
        )
        .await
    }

    /// Current view of a round; resolves the outcome if both actions are in.
    pub async fn round_view(&self, round: u32) -> Result<RoundView> {
        let seat = self.require_seat()?;
        rounds::poll_round(&self.store, &self.config, &seat.match_id, round).await
    }

    /// Poll a round until its outcome is present.
    pub async fn await_outcome(&self, round: u32) -> Result<Progress<PayoffPair>> {
        let seat = self.require_seat()?;
        let retry = self.retry;
        retry
            .poll::<_, CoordinatorError, _>(async || {
                let view =
                    rounds::poll_round(&self.store, &self.config, &seat.match_id, round).await?;
                Ok(view.outcome)
            })
            .await
    }

    pub async fn match_view(&self) -> Result<MatchView> {
        let seat = self.require_seat()?;
        rounds::match_view(&self.store, &self.config, &seat.match_id, &self.id).await
    }

    pub async fn is_complete(&self) -> Result<bool> {
        let seat = self.require_seat()?;
        rounds::is_complete(&self.store, &self.config, &seat.match_id).await
    }

    pub async fn registry_view(&self) -> Result<RegistryView> {
        registry::registry_view(&self.store, &self.id).await
    }

    /// Acknowledge the final outcome (feeds the on-ack cleanup policy).
    pub async fn acknowledge(&self) -> Result<()> {
        let seat = self.require_seat()?;
        lifecycle::acknowledge(&self.store, &seat.match_id, seat.role).await
    }

    /// Attempt cleanup under the configured policy.
    pub async fn cleanup(&self) -> Result<bool> {
        let seat = self.require_seat()?;
        lifecycle::cleanup_match(&self.store, &self.config, &seat.match_id).await
    }
}
