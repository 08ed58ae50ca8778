//! Cancellable bot reveal timer.
//!
//! The turn-based controller does not sleep. It schedules the bot's reveal
//! with a ticket and is advanced by elapsed wall time; a restart cancels the
//! pending reveal so a stale ticket can never resolve a turn of a new match.

use std::time::Duration;

use dukshi_common::MatchId;

use crate::config::TurnRules;
use crate::rng::RandomSource;

/// A reveal waiting to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledReveal {
    /// Match the reveal belongs to
    pub ticket: MatchId,
    /// Time left before it fires
    pub remaining: Duration,
}

/// Holds at most one pending reveal.
#[derive(Debug, Clone, Default)]
pub struct RevealSchedule {
    pending: Option<ScheduledReveal>,
}

impl RevealSchedule {
    /// Creates an empty schedule.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Schedules a reveal, replacing any pending one.
    pub fn schedule(&mut self, ticket: MatchId, delay: Duration) {
        self.pending = Some(ScheduledReveal {
            ticket,
            remaining: delay,
        });
    }

    /// Drops the pending reveal. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Checks if a reveal is waiting.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left on the pending reveal.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.pending.map(|p| p.remaining)
    }

    /// Advances the clock. Returns the ticket once its delay has elapsed.
    pub fn advance(&mut self, elapsed: Duration) -> Option<MatchId> {
        let pending = self.pending.as_mut()?;
        pending.remaining = pending.remaining.saturating_sub(elapsed);
        if pending.remaining.is_zero() {
            self.pending.take().map(|p| p.ticket)
        } else {
            None
        }
    }

    /// Fires the pending reveal immediately.
    pub fn fire_now(&mut self) -> Option<MatchId> {
        self.pending.take().map(|p| p.ticket)
    }
}

/// Draws a jittered "thinking" delay for the bot.
pub fn reveal_delay<R: RandomSource + ?Sized>(rules: &TurnRules, rng: &mut R) -> Duration {
    let jitter = rules.reveal_jitter();
    if jitter.is_zero() {
        return rules.reveal_delay_min();
    }
    rules.reveal_delay_min() + jitter.mul_f32(rng.next_f32().clamp(0.0, 1.0))
}
