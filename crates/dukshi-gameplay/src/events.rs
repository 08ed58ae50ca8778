//! Duel event stream for presentation adapters.
//!
//! Controllers publish what happened; front-ends drain the bus and render.
//! Nothing in the core reads these events back.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use dukshi_common::{MatchId, RejectReason, Side};

use crate::actions::TurnAction;
use crate::judge::AnimationKind;
use crate::melee::Strike;

/// How long a finished match lasted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchLength {
    /// Turn-based: turns played, counting the final one.
    Turns(u32),
    /// Real-time: ticks simulated, counting the final one.
    Ticks(u64),
}

impl std::fmt::Display for MatchLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Turns(1) => f.write_str("1 turn"),
            Self::Turns(n) => write!(f, "{n} turns"),
            Self::Ticks(n) => write!(f, "{n} ticks"),
        }
    }
}

/// Result of a finished match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    /// Match that ended
    pub match_id: MatchId,
    /// Side left standing
    pub winner: Side,
    /// Match length
    pub length: MatchLength,
}

impl MatchSummary {
    /// Whether the human side won.
    #[must_use]
    pub fn player_won(&self) -> bool {
        self.winner == Side::Player
    }
}

impl std::fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} wins after {}", self.winner, self.length)
    }
}

/// Event types published by the match controllers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DuelEvent {
    /// A turn-based turn was resolved.
    TurnResolved {
        /// Match the turn belongs to
        match_id: MatchId,
        /// Turn number
        turn: u32,
        /// Player's action
        player_action: TurnAction,
        /// Bot's action
        bot_action: TurnAction,
        /// Damage taken by the player
        player_damage: u32,
        /// Damage taken by the bot
        bot_damage: u32,
        /// Narration line
        message: String,
        /// Animation to play
        animation: AnimationKind,
    },
    /// A submission or press was refused.
    ActionRejected {
        /// Side that tried to act
        side: Side,
        /// Display name of the action
        action: String,
        /// Why it was refused
        reason: RejectReason,
    },
    /// A real-time swing connected.
    HitLanded {
        /// Match the hit belongs to
        match_id: MatchId,
        /// Tick of the hit
        tick: u64,
        /// The hit
        strike: Strike,
    },
    /// A real-time guard went up.
    BlockStarted {
        /// Side that blocked
        side: Side,
        /// Tick the guard went up
        tick: u64,
    },
    /// A real-time guard came down.
    BlockEnded {
        /// Side that blocked
        side: Side,
        /// Tick the guard came down
        tick: u64,
        /// Whether it ran out rather than being released
        expired: bool,
    },
    /// A match finished.
    MatchOver {
        /// Final result
        summary: MatchSummary,
    },
    /// A new match replaced the previous one.
    MatchRestarted {
        /// The new match
        match_id: MatchId,
    },
}

/// Event bus for broadcasting duel events to front-ends.
#[derive(Debug)]
pub struct EventBus {
    sender: Sender<DuelEvent>,
    receiver: Receiver<DuelEvent>,
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event. Dropped if the bus is full.
    pub fn publish(&self, event: DuelEvent) {
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<DuelEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<DuelEvent> {
        self.sender.clone()
    }
}

/// Consumer of drained duel events.
pub trait EventHandler {
    /// Handles an event.
    fn handle(&mut self, event: &DuelEvent);
}

/// Publishes through an optional sender, dropping the event when full or
/// unattached.
pub(crate) fn emit(sender: Option<&Sender<DuelEvent>>, event: DuelEvent) {
    if let Some(sender) = sender {
        let _ = sender.try_send(event);
    }
}
