//! Turn-based match controller.
//!
//! A turn goes through three steps:
//! 1. The player submits an action. Illegal submissions are refused without
//!    touching any state.
//! 2. The bot's reveal is scheduled after a short jittered delay. No further
//!    input is accepted while it is pending.
//! 3. On reveal the bot decides, both actions are paid for, the judge
//!    resolves the pair, damage and streaks are applied and the match is
//!    checked for a winner.
//!
//! The player's defeat is checked first, so a simultaneous defeat is a loss.

use std::time::Duration;

use crossbeam_channel::Sender;
use dukshi_common::{DuelError, DuelResult, MatchId, Side};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::actions::{ActionSet, TurnAction};
use crate::combatant::CombatantState;
use crate::config::{DuelConfig, TurnRules};
use crate::events::{emit, DuelEvent, MatchLength, MatchSummary};
use crate::judge::{Judge, Outcome};
use crate::policy::{Difficulty, Policy};
use crate::rng::{FastRng, RandomSource};
use crate::schedule::{reveal_delay, RevealSchedule};

/// Where a turn-based match stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Waiting for the player's action.
    AwaitingPlayer,
    /// The player has committed; the bot's reveal is pending.
    Revealing,
    /// Someone won.
    Over(MatchSummary),
}

/// Everything that happened in one resolved turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Match the turn belongs to
    pub match_id: MatchId,
    /// Turn number, starting at 1
    pub turn: u32,
    /// Player's action
    pub player_action: TurnAction,
    /// Bot's action
    pub bot_action: TurnAction,
    /// Judged result
    pub outcome: Outcome,
    /// Player state after the turn
    pub player: CombatantState,
    /// Bot state after the turn
    pub bot: CombatantState,
    /// Set when the turn ended the match
    pub summary: Option<MatchSummary>,
}

/// A human-vs-bot turn-based match.
#[derive(Debug)]
pub struct TurnMatch<R: RandomSource = FastRng> {
    id: MatchId,
    rules: TurnRules,
    judge: Judge,
    policy: Policy,
    player: CombatantState,
    bot: CombatantState,
    turn: u32,
    phase: MatchPhase,
    pending: Option<TurnAction>,
    schedule: RevealSchedule,
    rng: R,
    events: Option<Sender<DuelEvent>>,
}

impl TurnMatch<FastRng> {
    /// Creates a match from configuration.
    #[must_use]
    pub fn from_config(config: &DuelConfig) -> Self {
        Self::new(
            config.turn.clone(),
            config.difficulty,
            FastRng::from_seed(config.seed),
        )
    }
}

impl<R: RandomSource> TurnMatch<R> {
    /// Creates a match with both combatants fresh.
    pub fn new(rules: TurnRules, difficulty: Difficulty, rng: R) -> Self {
        let id = MatchId::new();
        info!("Starting turn-based {} against a {} bot", id, difficulty);
        Self {
            id,
            judge: Judge::new(&rules),
            policy: Policy::new(difficulty),
            player: CombatantState::new(&rules),
            bot: CombatantState::new(&rules),
            rules,
            turn: 1,
            phase: MatchPhase::AwaitingPlayer,
            pending: None,
            schedule: RevealSchedule::new(),
            rng,
            events: None,
        }
    }

    /// Publishes events through `sender`.
    #[must_use]
    pub fn with_events(mut self, sender: Sender<DuelEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Replaces both combatants' states.
    #[must_use]
    pub fn with_states(mut self, player: CombatantState, bot: CombatantState) -> Self {
        self.player = player;
        self.bot = bot;
        self
    }

    // === Accessors ===

    /// Current match id.
    #[must_use]
    pub const fn id(&self) -> MatchId {
        self.id
    }

    /// Turn about to be played (or the final turn once over).
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Player's state.
    #[must_use]
    pub const fn player(&self) -> &CombatantState {
        &self.player
    }

    /// Bot's state.
    #[must_use]
    pub const fn bot(&self) -> &CombatantState {
        &self.bot
    }

    /// Bot policy.
    #[must_use]
    pub const fn policy(&self) -> Policy {
        self.policy
    }

    /// Final result, once the match is over.
    #[must_use]
    pub const fn summary(&self) -> Option<MatchSummary> {
        match self.phase {
            MatchPhase::Over(summary) => Some(summary),
            _ => None,
        }
    }

    /// Checks if the match has ended.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        matches!(self.phase, MatchPhase::Over(_))
    }

    /// Time left before the pending reveal.
    #[must_use]
    pub fn reveal_remaining(&self) -> Option<Duration> {
        self.schedule.remaining()
    }

    /// Actions the player may submit right now.
    ///
    /// Empty while a reveal is pending or after the match ended.
    #[must_use]
    pub fn available_actions(&self) -> ActionSet {
        match self.phase {
            MatchPhase::AwaitingPlayer => self.player.legal_actions(),
            _ => ActionSet::EMPTY,
        }
    }

    // === Turn flow ===

    /// Commits the player's action and schedules the bot's reveal.
    ///
    /// Returns the delay before the reveal fires.
    pub fn submit(&mut self, action: TurnAction) -> DuelResult<Duration> {
        self.stage(action)?;
        let delay = reveal_delay(&self.rules, &mut self.rng);
        self.schedule.schedule(self.id, delay);
        debug!("Player committed {} on turn {}, reveal in {:?}", action, self.turn, delay);
        Ok(delay)
    }

    /// Advances the reveal clock and resolves the turn once it fires.
    pub fn advance(&mut self, elapsed: Duration) -> Option<TurnReport> {
        let ticket = self.schedule.advance(elapsed)?;
        self.reveal(ticket)
    }

    /// Resolves the pending turn without waiting out the delay.
    pub fn resolve_pending(&mut self) -> Option<TurnReport> {
        let ticket = self.schedule.fire_now()?;
        self.reveal(ticket)
    }

    /// Submits and resolves a turn immediately.
    pub fn play_turn(&mut self, action: TurnAction) -> DuelResult<TurnReport> {
        self.stage(action)?;
        Ok(self.resolve_turn(action))
    }

    /// Starts a new match, dropping any pending reveal.
    pub fn restart(&mut self) {
        if self.schedule.cancel() {
            debug!("Cancelled pending reveal of {}", self.id);
        }
        self.id = MatchId::new();
        self.player.reset();
        self.bot.reset();
        self.turn = 1;
        self.phase = MatchPhase::AwaitingPlayer;
        self.pending = None;

        info!("Restarted as {}", self.id);
        emit(
            self.events.as_ref(),
            DuelEvent::MatchRestarted { match_id: self.id },
        );
    }

    fn stage(&mut self, action: TurnAction) -> DuelResult<()> {
        match self.phase {
            MatchPhase::Over(_) => return Err(DuelError::MatchOver),
            MatchPhase::Revealing => return Err(DuelError::TurnInProgress),
            MatchPhase::AwaitingPlayer => {},
        }

        if let Err(reason) = self.player.check(action) {
            emit(
                self.events.as_ref(),
                DuelEvent::ActionRejected {
                    side: Side::Player,
                    action: action.display_name().to_string(),
                    reason,
                },
            );
            return Err(DuelError::Rejected {
                action: action.display_name(),
                reason,
            });
        }

        self.pending = Some(action);
        self.phase = MatchPhase::Revealing;
        Ok(())
    }

    fn reveal(&mut self, ticket: MatchId) -> Option<TurnReport> {
        if ticket != self.id {
            debug!("Ignoring stale reveal for {}", ticket);
            return None;
        }
        let action = self.pending.take()?;
        Some(self.resolve_turn(action))
    }

    fn resolve_turn(&mut self, player_action: TurnAction) -> TurnReport {
        self.pending = None;
        let bot_action = self.policy.decide(&self.bot, &self.player, &mut self.rng);

        if let Err(e) = self.player.perform(player_action) {
            warn!("Player action could not be paid: {e}");
        }
        if let Err(e) = self.bot.perform(bot_action) {
            warn!("Bot action could not be paid: {e}");
        }

        let outcome = self.judge.judge(
            player_action,
            bot_action,
            &self.player,
            &self.bot,
            &mut self.rng,
        );
        self.player.take_damage(outcome.player_damage);
        self.bot.take_damage(outcome.bot_damage);
        self.player.record_streaks(player_action);
        self.bot.record_streaks(bot_action);

        let turn = self.turn;
        let winner = if !self.player.is_alive() {
            Some(Side::Bot)
        } else if !self.bot.is_alive() {
            Some(Side::Player)
        } else {
            None
        };
        let summary = winner.map(|winner| MatchSummary {
            match_id: self.id,
            winner,
            length: MatchLength::Turns(turn),
        });

        emit(
            self.events.as_ref(),
            DuelEvent::TurnResolved {
                match_id: self.id,
                turn,
                player_action,
                bot_action,
                player_damage: outcome.player_damage,
                bot_damage: outcome.bot_damage,
                message: outcome.message.clone(),
                animation: outcome.animation,
            },
        );

        match summary {
            Some(summary) => {
                self.phase = MatchPhase::Over(summary);
                info!("{} over: {}", self.id, summary);
                emit(self.events.as_ref(), DuelEvent::MatchOver { summary });
            },
            None => {
                self.turn += 1;
                self.phase = MatchPhase::AwaitingPlayer;
            },
        }

        TurnReport {
            match_id: self.id,
            turn,
            player_action,
            bot_action,
            outcome,
            player: self.player,
            bot: self.bot,
            summary,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
