//! # Dukshi Gameplay
//!
//! Rules engine for the Dukshi duel, free of any rendering or input layer.
//!
//! This crate provides:
//! - The action catalog and combatant state for the turn-based duel
//! - The turn-based judge and the rule-list bot policy
//! - Real-time fighters, arena physics, hit resolution and the bot brain
//! - Match controllers for both variants, with a cancellable reveal timer
//! - Configuration and an event bus for front-ends

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod actions;
pub mod arena;
pub mod bot_brain;
pub mod combatant;
pub mod config;
pub mod events;
pub mod fighter;
pub mod judge;
pub mod melee;
pub mod policy;
pub mod realtime_match;
pub mod rng;
pub mod schedule;
pub mod turn_match;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::actions::*;
    pub use crate::arena::*;
    pub use crate::bot_brain::*;
    pub use crate::combatant::*;
    pub use crate::config::*;
    pub use crate::events::*;
    pub use crate::fighter::*;
    pub use crate::judge::*;
    pub use crate::melee::*;
    pub use crate::policy::*;
    pub use crate::realtime_match::*;
    pub use crate::rng::*;
    pub use crate::schedule::*;
    pub use crate::turn_match::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use dukshi_common::Side;

    #[test]
    fn test_turn_match_ends_or_runs_out() {
        let config = DuelConfig {
            seed: Some(7),
            difficulty: Difficulty::Hard,
            ..DuelConfig::default()
        };
        let mut duel = TurnMatch::from_config(&config);
        let player = Policy::new(Difficulty::Normal);
        let mut rng = FastRng::seeded(8);

        for _ in 0..500 {
            if duel.is_over() {
                break;
            }
            let action = player.decide(duel.player(), duel.bot(), &mut rng);
            duel.play_turn(action).expect("policy picks legal actions");
        }

        // Both cascades can settle into a zero-damage guard/charge loop.
        match duel.summary() {
            Some(summary) => {
                let loser = match summary.winner {
                    Side::Player => duel.bot(),
                    Side::Bot => duel.player(),
                };
                assert_eq!(loser.life(), 0);
                assert_eq!(summary.length, MatchLength::Turns(duel.turn()));
            },
            None => {
                assert_eq!(duel.turn(), 501);
                assert!(duel.player().is_alive() && duel.bot().is_alive());
            },
        }
    }

    #[test]
    fn test_realtime_match_from_config() {
        let config = DuelConfig::default();
        let mut duel = RealtimeMatch::from_config(&config);
        let report = duel.tick(FighterInput::default()).expect("running");
        assert_eq!(report.tick, 1);
        assert_eq!(duel.player().position().x, config.realtime.player_spawn_x);
    }
}
