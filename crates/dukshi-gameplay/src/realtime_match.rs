//! Real-time match controller.
//!
//! One `step` advances both fighters by a fixed tick:
//! inputs, motion, fighter collision, hits, timers, then the winner check
//! (player first, so a double knockout is a loss).

use crossbeam_channel::Sender;
use dukshi_common::{DuelError, DuelResult, MatchId, Side};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::arena::resolve_pair;
use crate::bot_brain::BotBrain;
use crate::config::{DuelConfig, RealtimeRules};
use crate::events::{emit, DuelEvent, MatchLength, MatchSummary};
use crate::fighter::{Fighter, FighterEvent, FighterInput};
use crate::melee::{resolve_strike, Strike};
use crate::policy::Difficulty;
use crate::rng::{FastRng, RandomSource};

/// Everything that happened in one tick.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameReport {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Swings that connected
    pub strikes: Vec<Strike>,
    /// Fighter state changes and refused presses
    pub events: Vec<(Side, FighterEvent)>,
    /// Set when the tick ended the match
    pub summary: Option<MatchSummary>,
}

/// A human-vs-bot real-time match.
#[derive(Debug)]
pub struct RealtimeMatch<R: RandomSource = FastRng> {
    id: MatchId,
    rules: RealtimeRules,
    player: Fighter,
    bot: Fighter,
    brain: BotBrain,
    rng: R,
    tick: u64,
    summary: Option<MatchSummary>,
    events: Option<Sender<DuelEvent>>,
}

impl RealtimeMatch<FastRng> {
    /// Creates a match from configuration.
    #[must_use]
    pub fn from_config(config: &DuelConfig) -> Self {
        Self::new(
            config.realtime.clone(),
            config.difficulty,
            FastRng::from_seed(config.seed),
        )
    }
}

impl<R: RandomSource> RealtimeMatch<R> {
    /// Creates a match with both fighters on their spawn points.
    pub fn new(rules: RealtimeRules, difficulty: Difficulty, rng: R) -> Self {
        let id = MatchId::new();
        info!("Starting real-time {} against a {} bot", id, difficulty);
        Self {
            id,
            player: Fighter::player(&rules),
            bot: Fighter::bot(&rules),
            brain: BotBrain::new(difficulty),
            rules,
            rng,
            tick: 0,
            summary: None,
            events: None,
        }
    }

    /// Publishes events through `sender`.
    #[must_use]
    pub fn with_events(mut self, sender: Sender<DuelEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Replaces both fighters.
    #[must_use]
    pub fn with_fighters(mut self, player: Fighter, bot: Fighter) -> Self {
        self.player = player;
        self.bot = bot;
        self
    }

    /// Current match id.
    #[must_use]
    pub const fn id(&self) -> MatchId {
        self.id
    }

    /// Ticks simulated so far.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Player's fighter.
    #[must_use]
    pub const fn player(&self) -> &Fighter {
        &self.player
    }

    /// Bot's fighter.
    #[must_use]
    pub const fn bot(&self) -> &Fighter {
        &self.bot
    }

    /// Active rules.
    #[must_use]
    pub const fn rules(&self) -> &RealtimeRules {
        &self.rules
    }

    /// Final result, once the match is over.
    #[must_use]
    pub const fn summary(&self) -> Option<MatchSummary> {
        self.summary
    }

    /// Checks if the match has ended.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.summary.is_some()
    }

    /// Advances one tick with the bot driven by its brain.
    pub fn tick(&mut self, player_input: FighterInput) -> DuelResult<FrameReport> {
        if self.is_over() {
            return Err(DuelError::MatchOver);
        }
        let bot_input = self
            .brain
            .tick(&self.bot, &self.player, &self.rules, &mut self.rng);
        self.step(player_input, bot_input)
    }

    /// Advances one tick with explicit input for both sides.
    pub fn step(
        &mut self,
        player_input: FighterInput,
        bot_input: FighterInput,
    ) -> DuelResult<FrameReport> {
        if self.is_over() {
            return Err(DuelError::MatchOver);
        }
        self.tick += 1;
        let mut report = FrameReport {
            tick: self.tick,
            ..FrameReport::default()
        };

        let player_events = self.player.apply_input(player_input, &self.rules);
        let bot_events = self.bot.apply_input(bot_input, &self.rules);
        report.record(Side::Player, player_events);
        report.record(Side::Bot, bot_events);

        self.player.advance_motion(&self.rules);
        self.bot.advance_motion(&self.rules);
        if let Some(axis) = resolve_pair(self.player.body(), self.bot.body(), &self.rules) {
            debug!("Fighters collided ({:?}) on tick {}", axis, self.tick);
            self.player.keep_in_arena(&self.rules);
            self.bot.keep_in_arena(&self.rules);
        }

        report.strikes.extend(resolve_strike(
            Side::Player,
            &mut self.player,
            &mut self.bot,
            &self.rules,
        ));
        report.strikes.extend(resolve_strike(
            Side::Bot,
            &mut self.bot,
            &mut self.player,
            &self.rules,
        ));

        let player_events = self.player.tick_timers(&self.rules);
        let bot_events = self.bot.tick_timers(&self.rules);
        report.record(Side::Player, player_events);
        report.record(Side::Bot, bot_events);

        let winner = if !self.player.is_alive() {
            Some(Side::Bot)
        } else if !self.bot.is_alive() {
            Some(Side::Player)
        } else {
            None
        };
        report.summary = winner.map(|winner| MatchSummary {
            match_id: self.id,
            winner,
            length: MatchLength::Ticks(self.tick),
        });
        self.summary = report.summary;

        self.publish(&report);
        if let Some(summary) = report.summary {
            info!("{} over: {}", self.id, summary);
        }
        Ok(report)
    }

    /// Starts a new match with both fighters back on their spawn points.
    pub fn restart(&mut self) {
        self.id = MatchId::new();
        self.player.reset(&self.rules);
        self.bot.reset(&self.rules);
        self.brain.reset();
        self.tick = 0;
        self.summary = None;

        info!("Restarted as {}", self.id);
        emit(
            self.events.as_ref(),
            DuelEvent::MatchRestarted { match_id: self.id },
        );
    }

    fn publish(&self, report: &FrameReport) {
        let sender = self.events.as_ref();
        if sender.is_none() {
            return;
        }

        for (side, event) in &report.events {
            let side = *side;
            let event = match *event {
                FighterEvent::BlockStarted => DuelEvent::BlockStarted {
                    side,
                    tick: report.tick,
                },
                FighterEvent::BlockEnded { expired } => DuelEvent::BlockEnded {
                    side,
                    tick: report.tick,
                    expired,
                },
                FighterEvent::Rejected { action, reason } => DuelEvent::ActionRejected {
                    side,
                    action: action.display_name().to_string(),
                    reason,
                },
                FighterEvent::SwingStarted { .. } => continue,
            };
            emit(sender, event);
        }
        for strike in &report.strikes {
            emit(
                sender,
                DuelEvent::HitLanded {
                    match_id: self.id,
                    tick: report.tick,
                    strike: *strike,
                },
            );
        }
        if let Some(summary) = report.summary {
            emit(sender, DuelEvent::MatchOver { summary });
        }
    }
}

impl FrameReport {
    fn record(&mut self, side: Side, events: Vec<FighterEvent>) {
        self.events.extend(events.into_iter().map(|e| (side, e)));
    }
}

// ============================================================================
// Tests
// ============================================================================
