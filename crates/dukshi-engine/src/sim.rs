//! Headless bot-vs-bot runs of both duel variants.
//!
//! The player seat is driven by a second policy (turn-based) or a second
//! brain (real-time), so difficulty pairings can be compared over many
//! matches.

use serde::Serialize;
use tracing::{debug, info};

use dukshi_common::Side;
use dukshi_gameplay::{
    BotBrain, Difficulty, DuelConfig, EventHandler, EventBus, FastRng, MatchSummary, Policy,
    RealtimeMatch, TurnMatch,
};

/// Turns after which a turn-based match is abandoned as a draw.
pub const TURN_LIMIT: u32 = 500;

/// Results of a series of turn-based matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesStats {
    /// Difficulty driving the player seat
    pub challenger: String,
    /// Difficulty driving the bot seat
    pub defender: String,
    /// Matches played
    pub matches: u32,
    /// Matches won by the player seat
    pub player_wins: u32,
    /// Matches won by the bot seat
    pub bot_wins: u32,
    /// Matches abandoned at the turn limit
    pub draws: u32,
    /// Turns played across all decided matches
    pub total_turns: u64,
    /// Shortest decided match
    pub shortest: Option<u32>,
    /// Longest decided match
    pub longest: Option<u32>,
}

impl SeriesStats {
    fn record(&mut self, summary: &MatchSummary, turns: u32) {
        match summary.winner {
            Side::Player => self.player_wins += 1,
            Side::Bot => self.bot_wins += 1,
        }
        self.total_turns += u64::from(turns);
        self.shortest = Some(self.shortest.map_or(turns, |s| s.min(turns)));
        self.longest = Some(self.longest.map_or(turns, |l| l.max(turns)));
    }

    /// Share of matches won by the player seat, in percent.
    #[must_use]
    pub fn player_win_rate(&self) -> f32 {
        if self.matches == 0 {
            0.0
        } else {
            self.player_wins as f32 / self.matches as f32 * 100.0
        }
    }

    /// Mean length of decided matches.
    #[must_use]
    pub fn average_turns(&self) -> f32 {
        let decided = self.player_wins + self.bot_wins;
        if decided == 0 {
            0.0
        } else {
            self.total_turns as f32 / decided as f32
        }
    }
}

impl std::fmt::Display for SeriesStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (player seat) vs {} (bot seat): {} matches, {} / {} / {} draws, player win rate {:.1}%, avg {:.1} turns",
            self.challenger,
            self.defender,
            self.matches,
            self.player_wins,
            self.bot_wins,
            self.draws,
            self.player_win_rate(),
            self.average_turns(),
        )
    }
}

/// Plays `matches` turn-based matches with `challenger` in the player seat.
pub fn run_turn_series<H: EventHandler>(
    config: &DuelConfig,
    challenger: Difficulty,
    matches: u32,
    handler: Option<&mut H>,
) -> SeriesStats {
    let bus = EventBus::default();
    let mut duel = TurnMatch::from_config(config).with_events(bus.sender());
    let player = Policy::new(challenger);
    let mut rng = FastRng::from_seed(config.seed.map(|s| s.wrapping_add(1)));
    let mut handler = handler;

    let mut stats = SeriesStats {
        challenger: challenger.to_string(),
        defender: config.difficulty.to_string(),
        ..SeriesStats::default()
    };

    for index in 0..matches {
        if index > 0 {
            duel.restart();
        }
        while !duel.is_over() && duel.turn() <= TURN_LIMIT {
            let action = player.decide(duel.player(), duel.bot(), &mut rng);
            if let Err(e) = duel.play_turn(action) {
                debug!("Challenger move refused: {e}");
                break;
            }
            drain(&bus, handler.as_deref_mut());
        }
        drain(&bus, handler.as_deref_mut());

        stats.matches += 1;
        match duel.summary() {
            Some(summary) => stats.record(&summary, duel.turn()),
            None => stats.draws += 1,
        }
    }

    info!("{}", stats);
    stats
}

/// Result of one headless real-time match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealtimeResult {
    /// Final result, if someone won before the tick limit
    pub summary: Option<MatchSummary>,
    /// Ticks simulated
    pub ticks: u64,
    /// Player seat health at the end
    pub player_health: u32,
    /// Bot seat health at the end
    pub bot_health: u32,
}

/// Runs one real-time match with `challenger` driving the player seat.
///
/// `on_tick` is called after every tick; returning `false` stops early.
pub fn run_realtime<H: EventHandler>(
    config: &DuelConfig,
    challenger: Difficulty,
    max_ticks: u64,
    handler: Option<&mut H>,
    mut on_tick: impl FnMut(&RealtimeMatch) -> bool,
) -> RealtimeResult {
    let bus = EventBus::default();
    let mut duel = RealtimeMatch::from_config(config).with_events(bus.sender());
    let mut brain = BotBrain::new(challenger);
    let mut rng = FastRng::from_seed(config.seed.map(|s| s.wrapping_add(1)));
    let mut handler = handler;

    while duel.tick_count() < max_ticks {
        let input = brain.tick(duel.player(), duel.bot(), duel.rules(), &mut rng);
        let report = match duel.tick(input) {
            Ok(report) => report,
            Err(e) => {
                debug!("Stopped: {e}");
                break;
            },
        };
        drain(&bus, handler.as_deref_mut());
        if report.summary.is_some() || !on_tick(&duel) {
            break;
        }
    }
    drain(&bus, handler.as_deref_mut());

    RealtimeResult {
        summary: duel.summary(),
        ticks: duel.tick_count(),
        player_health: duel.player().health(),
        bot_health: duel.bot().health(),
    }
}

/// Feeds pending events to the handler, or discards them.
pub fn drain<H: EventHandler>(bus: &EventBus, handler: Option<&mut H>) {
    let events = bus.drain();
    if let Some(handler) = handler {
        for event in &events {
            handler.handle(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::EventPrinter;

    fn seeded(seed: u64, difficulty: Difficulty) -> DuelConfig {
        DuelConfig {
            seed: Some(seed),
            difficulty,
            ..DuelConfig::default()
        }
    }

    #[test]
    fn test_series_accounts_for_every_match() {
        let stats = run_turn_series::<EventPrinter<Vec<u8>>>(
            &seeded(1, Difficulty::Hard),
            Difficulty::Easy,
            20,
            None,
        );
        assert_eq!(stats.matches, 20);
        assert_eq!(stats.player_wins + stats.bot_wins + stats.draws, 20);
        assert!(stats.shortest <= stats.longest);
    }

    #[test]
    fn test_series_is_reproducible() {
        let config = seeded(5, Difficulty::Normal);
        let a = run_turn_series::<EventPrinter<Vec<u8>>>(&config, Difficulty::Hard, 10, None);
        let b = run_turn_series::<EventPrinter<Vec<u8>>>(&config, Difficulty::Hard, 10, None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_series_streams_events() {
        let mut printer = EventPrinter::new(Vec::new(), false);
        let stats =
            run_turn_series(&seeded(2, Difficulty::Normal), Difficulty::Normal, 1, Some(&mut printer));
        let text = String::from_utf8(printer.into_inner()).expect("utf8");
        assert!(text.contains("Turn 1:"));
        // A stalled match stops at the turn limit without a result.
        if stats.draws == 0 {
            assert!(text.contains("Game over"));
        } else {
            assert!(!text.contains("Game over"));
            assert!(text.contains(&format!("Turn {TURN_LIMIT}:")));
        }
    }

    #[test]
    fn test_realtime_respects_tick_limit() {
        let result = run_realtime::<EventPrinter<Vec<u8>>>(
            &seeded(3, Difficulty::Normal),
            Difficulty::Normal,
            120,
            None,
            |_| true,
        );
        assert!(result.ticks <= 120);
        assert!(result.summary.is_some() || result.ticks == 120);
    }

    #[test]
    fn test_realtime_callback_can_stop() {
        let result = run_realtime::<EventPrinter<Vec<u8>>>(
            &seeded(4, Difficulty::Hard),
            Difficulty::Hard,
            10_000,
            None,
            |duel| duel.tick_count() < 30,
        );
        assert!(result.ticks <= 30);
    }
}
