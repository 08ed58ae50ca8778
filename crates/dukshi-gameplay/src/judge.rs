//! Turn-based resolution.
//!
//! Turns the two simultaneously committed actions into damage for each side.
//! The table covers all nine action pairs; mirrored pairs resolve through the
//! same helpers with the sides swapped.

use dukshi_common::Side;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actions::TurnAction;
use crate::combatant::CombatantState;
use crate::config::TurnRules;
use crate::rng::RandomSource;

/// Presentation hint for a resolved turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationKind {
    /// Nothing to animate.
    None,
    /// A strike landed.
    Attack,
    /// Both sides guarded.
    Defense,
    /// Both sides charged.
    Charge,
}

/// What happened in a turn, independent of wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exchange {
    /// Both attacked; the stronger strike wins, equal strikes cancel.
    Clash {
        /// Side whose strike won, if any
        winner: Option<Side>,
    },
    /// An attack hit a barrier that held.
    BarrierHeld {
        /// Side behind the barrier
        defender: Side,
    },
    /// An attack broke through a tired barrier.
    BarrierBroken {
        /// Side behind the barrier
        defender: Side,
        /// Barriers in a row before this turn
        streak: u32,
    },
    /// An attack caught the other side charging.
    CaughtCharging {
        /// Side that was charging
        victim: Side,
    },
    /// Both sides raised barriers.
    MutualGuard,
    /// One side guarded while the other charged.
    GuardVersusCharge {
        /// Side behind the barrier
        defender: Side,
        /// Whether the defender was already on a barrier streak
        endured: bool,
    },
    /// Both sides charged.
    MutualCharge,
}

impl Exchange {
    /// Human-readable description of the exchange.
    #[must_use]
    pub fn message(&self) -> String {
        match *self {
            Self::Clash { winner: Some(side) } => {
                format!("{} lands the heavier blow and overpowers {}!", name(side), name(side.opponent()))
            },
            Self::Clash { winner: None } => {
                "Evenly matched strikes! Neither side takes damage".to_string()
            },
            Self::BarrierHeld { defender } => format!("{}'s barrier holds!", name(defender)),
            Self::BarrierBroken { defender, streak } => format!(
                "{}'s barrier shatters! Dukshi connects ({streak} barriers in a row)",
                name(defender)
            ),
            Self::CaughtCharging { victim } => {
                format!("{} is caught charging and takes a direct hit!", name(victim))
            },
            Self::MutualGuard => "Both sides dig in behind their barriers".to_string(),
            Self::GuardVersusCharge {
                defender,
                endured: true,
            } => format!(
                "{}'s steady guard endures while {} charges",
                name(defender),
                name(defender.opponent())
            ),
            Self::GuardVersusCharge { endured: false, .. } => {
                "Both hold back... nothing happens".to_string()
            },
            Self::MutualCharge => "Both sides charge. Power builds up".to_string(),
        }
    }

    /// Presentation hint for this exchange.
    #[must_use]
    pub fn animation(&self) -> AnimationKind {
        match self {
            Self::Clash { winner: Some(_) }
            | Self::BarrierBroken { .. }
            | Self::CaughtCharging { .. } => AnimationKind::Attack,
            Self::MutualGuard => AnimationKind::Defense,
            Self::MutualCharge => AnimationKind::Charge,
            Self::Clash { winner: None } | Self::BarrierHeld { .. } | Self::GuardVersusCharge { .. } => {
                AnimationKind::None
            },
        }
    }
}

fn name(side: Side) -> &'static str {
    match side {
        Side::Player => "Player",
        Side::Bot => "Bot",
    }
}

/// Result of judging one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Damage the player takes
    pub player_damage: u32,
    /// Damage the bot takes
    pub bot_damage: u32,
    /// What happened
    pub exchange: Exchange,
    /// Human-readable description
    pub message: String,
    /// Presentation hint
    pub animation: AnimationKind,
}

impl Outcome {
    fn new(exchange: Exchange) -> Self {
        Self {
            player_damage: 0,
            bot_damage: 0,
            exchange,
            message: exchange.message(),
            animation: exchange.animation(),
        }
    }

    fn damage(mut self, side: Side, amount: u32) -> Self {
        match side {
            Side::Player => self.player_damage = amount,
            Side::Bot => self.bot_damage = amount,
        }
        self
    }

    /// Damage the given side takes.
    #[must_use]
    pub const fn damage_to(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_damage,
            Side::Bot => self.bot_damage,
        }
    }
}

/// Resolves turn-based exchanges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Judge {
    fatigue_step: f32,
    fatigue_cap: f32,
}

impl Default for Judge {
    fn default() -> Self {
        Self::new(&TurnRules::default())
    }
}

impl Judge {
    /// Creates a judge for the given rules.
    #[must_use]
    pub fn new(rules: &TurnRules) -> Self {
        Self {
            fatigue_step: rules.fatigue_step,
            fatigue_cap: rules.fatigue_cap,
        }
    }

    /// Chance that an attack breaks a barrier held for `streak` turns before
    /// this one.
    #[must_use]
    pub fn break_chance(&self, streak: u32) -> f32 {
        (streak as f32 * self.fatigue_step).min(self.fatigue_cap)
    }

    /// Judges one turn.
    ///
    /// Both states are read as they stand after mana was paid but before this
    /// turn's streak counters are updated. The caller applies the damage.
    pub fn judge<R: RandomSource + ?Sized>(
        &self,
        player_action: TurnAction,
        bot_action: TurnAction,
        player: &CombatantState,
        bot: &CombatantState,
        rng: &mut R,
    ) -> Outcome {
        use TurnAction::{Attack, Barrier, Charge};

        let outcome = match (player_action, bot_action) {
            (Attack, Attack) => Self::clash(player, bot),
            (Attack, Barrier) => self.strike_barrier(Side::Player, player, bot, rng),
            (Barrier, Attack) => self.strike_barrier(Side::Bot, bot, player, rng),
            (Attack, Charge) => Self::strike_charger(Side::Player, player),
            (Charge, Attack) => Self::strike_charger(Side::Bot, bot),
            (Barrier, Barrier) => Outcome::new(Exchange::MutualGuard),
            (Barrier, Charge) => Self::guard_versus_charge(Side::Player, player),
            (Charge, Barrier) => Self::guard_versus_charge(Side::Bot, bot),
            (Charge, Charge) => Outcome::new(Exchange::MutualCharge),
        };

        debug!(
            "Judged {} vs {}: player -{} bot -{}",
            player_action, bot_action, outcome.player_damage, outcome.bot_damage
        );
        outcome
    }

    fn clash(player: &CombatantState, bot: &CombatantState) -> Outcome {
        let player_strike = player.strike_damage();
        let bot_strike = bot.strike_damage();

        match player_strike.cmp(&bot_strike) {
            std::cmp::Ordering::Greater => Outcome::new(Exchange::Clash {
                winner: Some(Side::Player),
            })
            .damage(Side::Bot, player_strike),
            std::cmp::Ordering::Less => Outcome::new(Exchange::Clash {
                winner: Some(Side::Bot),
            })
            .damage(Side::Player, bot_strike),
            std::cmp::Ordering::Equal => Outcome::new(Exchange::Clash { winner: None }),
        }
    }

    fn strike_barrier<R: RandomSource + ?Sized>(
        &self,
        attacker_side: Side,
        attacker: &CombatantState,
        defender: &CombatantState,
        rng: &mut R,
    ) -> Outcome {
        let defender_side = attacker_side.opponent();
        let streak = defender.consecutive_defense();

        if rng.chance(self.break_chance(streak)) {
            Outcome::new(Exchange::BarrierBroken {
                defender: defender_side,
                streak,
            })
            .damage(defender_side, attacker.strike_damage())
        } else {
            Outcome::new(Exchange::BarrierHeld {
                defender: defender_side,
            })
        }
    }

    fn strike_charger(attacker_side: Side, attacker: &CombatantState) -> Outcome {
        let victim = attacker_side.opponent();
        Outcome::new(Exchange::CaughtCharging { victim }).damage(victim, attacker.strike_damage())
    }

    fn guard_versus_charge(defender_side: Side, defender: &CombatantState) -> Outcome {
        // Cosmetic only: the streak changes the wording, never the numbers.
        Outcome::new(Exchange::GuardVersusCharge {
            defender: defender_side,
            endured: defender.consecutive_defense() > 1,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{FastRng, ScriptedRng};

    fn state() -> CombatantState {
        CombatantState::new(&TurnRules::default())
    }

    fn judge_with(
        p: TurnAction,
        b: TurnAction,
        ps: &CombatantState,
        bs: &CombatantState,
        draw: f32,
    ) -> Outcome {
        Judge::default().judge(p, b, ps, bs, &mut ScriptedRng::constant(draw))
    }

    #[test]
    fn test_attack_clash_tie() {
        let s = state().with_charge_bonus(1);
        let out = judge_with(TurnAction::Attack, TurnAction::Attack, &s, &s, 0.0);
        assert_eq!(out.player_damage, 0);
        assert_eq!(out.bot_damage, 0);
        assert_eq!(out.exchange, Exchange::Clash { winner: None });
    }

    #[test]
    fn test_attack_clash_bonus_wins() {
        let strong = state().with_charge_bonus(2);
        let weak = state();

        let out = judge_with(TurnAction::Attack, TurnAction::Attack, &strong, &weak, 0.0);
        assert_eq!(out.bot_damage, 3);
        assert_eq!(out.player_damage, 0);

        let out = judge_with(TurnAction::Attack, TurnAction::Attack, &weak, &strong, 0.0);
        assert_eq!(out.player_damage, 3);
        assert_eq!(out.bot_damage, 0);
        assert_eq!(out.animation, AnimationKind::Attack);
    }

    #[test]
    fn test_attack_versus_charge_always_lands() {
        let attacker = state().with_charge_bonus(1);
        let out = judge_with(TurnAction::Attack, TurnAction::Charge, &attacker, &state(), 0.99);
        assert_eq!(out.bot_damage, 2);

        let out = judge_with(TurnAction::Charge, TurnAction::Attack, &state(), &attacker, 0.99);
        assert_eq!(out.player_damage, 2);
        assert_eq!(out.exchange, Exchange::CaughtCharging { victim: Side::Player });
    }

    #[test]
    fn test_fresh_barrier_never_breaks() {
        let out = judge_with(TurnAction::Attack, TurnAction::Barrier, &state(), &state(), 0.0);
        assert_eq!(out.bot_damage, 0);
        assert_eq!(out.exchange, Exchange::BarrierHeld { defender: Side::Bot });
    }

    #[test]
    fn test_tired_barrier_breaks_on_low_draw() {
        let tired = state().with_consecutive_defense(2);
        let attacker = state().with_charge_bonus(1);

        let out = judge_with(TurnAction::Barrier, TurnAction::Attack, &tired, &attacker, 0.59);
        assert_eq!(out.player_damage, 2);
        assert_eq!(
            out.exchange,
            Exchange::BarrierBroken {
                defender: Side::Player,
                streak: 2
            }
        );

        let out = judge_with(TurnAction::Barrier, TurnAction::Attack, &tired, &attacker, 0.6);
        assert_eq!(out.player_damage, 0);
    }

    #[test]
    fn test_break_chance_curve() {
        let judge = Judge::default();
        assert_eq!(judge.break_chance(0), 0.0);
        assert!((judge.break_chance(1) - 0.4).abs() < 1e-6);
        assert!((judge.break_chance(2) - 0.6).abs() < 1e-6);
        assert!((judge.break_chance(3) - 0.6).abs() < 1e-6);
        assert!((judge.break_chance(10) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_break_rate_converges() {
        let judge = Judge::default();
        let mut rng = FastRng::seeded(2024);
        let attacker = state();
        let trials = 20_000;

        for (streak, expected) in [(0, 0.0), (1, 0.4), (2, 0.6), (3, 0.6), (10, 0.6)] {
            let defender = state().with_consecutive_defense(streak);
            let broken = (0..trials)
                .filter(|_| {
                    judge
                        .judge(TurnAction::Attack, TurnAction::Barrier, &attacker, &defender, &mut rng)
                        .bot_damage
                        > 0
                })
                .count();
            let rate = broken as f32 / trials as f32;
            assert!(
                (rate - expected).abs() < 0.02,
                "streak {streak}: rate {rate} expected {expected}"
            );
        }
    }

    #[test]
    fn test_guard_versus_charge_is_cosmetic() {
        let veteran = state().with_consecutive_defense(3);
        let out = judge_with(TurnAction::Charge, TurnAction::Barrier, &state(), &veteran, 0.0);
        assert_eq!(out.player_damage, 0);
        assert_eq!(out.bot_damage, 0);
        assert_eq!(
            out.exchange,
            Exchange::GuardVersusCharge {
                defender: Side::Bot,
                endured: true
            }
        );

        let out = judge_with(TurnAction::Barrier, TurnAction::Charge, &state(), &state(), 0.0);
        assert_eq!(out.player_damage + out.bot_damage, 0);
        assert!(matches!(
            out.exchange,
            Exchange::GuardVersusCharge { endured: false, .. }
        ));
    }

    #[test]
    fn test_every_pair_is_covered_and_mirrors() {
        let a = state().with_charge_bonus(1).with_consecutive_defense(2);
        let b = state().with_charge_bonus(2).with_consecutive_defense(1);

        for p in TurnAction::ALL {
            for q in TurnAction::ALL {
                let forward = judge_with(p, q, &a, &b, 0.1);
                let mirrored = judge_with(q, p, &b, &a, 0.1);
                assert_eq!(forward.player_damage, mirrored.bot_damage, "{p} vs {q}");
                assert_eq!(forward.bot_damage, mirrored.player_damage, "{p} vs {q}");
                assert!(!forward.message.is_empty());
            }
        }
    }

    #[test]
    fn test_quiet_pairs_deal_nothing() {
        let s = state();
        for (p, b) in [
            (TurnAction::Barrier, TurnAction::Barrier),
            (TurnAction::Charge, TurnAction::Charge),
        ] {
            let out = judge_with(p, b, &s, &s, 0.0);
            assert_eq!(out.player_damage + out.bot_damage, 0);
        }
        assert_eq!(
            judge_with(TurnAction::Charge, TurnAction::Charge, &s, &s, 0.0).animation,
            AnimationKind::Charge
        );
    }
}
