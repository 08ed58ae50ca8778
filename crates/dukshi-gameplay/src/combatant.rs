//! Turn-based combatant state.
//!
//! Life, mana and the two streak counters that drive the turn-based rules:
//! consecutive barriers (barrier fatigue) and banked charge bonus.

use dukshi_common::{DuelError, RejectReason};
use serde::{Deserialize, Serialize};

use crate::actions::{ActionSet, TurnAction};
use crate::config::TurnRules;

/// Resource and streak record for one side of a turn-based duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantState {
    life: u32,
    max_life: u32,
    mana: u32,
    max_mana: u32,
    initial_mana: u32,
    last_action: Option<TurnAction>,
    consecutive_defense: u32,
    charge_bonus: u32,
    charge_bonus_cap: u32,
}

impl CombatantState {
    /// Creates a combatant at full life with the rules' starting mana.
    #[must_use]
    pub fn new(rules: &TurnRules) -> Self {
        let initial_mana = rules.initial_mana.min(rules.max_mana);
        Self {
            life: rules.max_life,
            max_life: rules.max_life,
            mana: initial_mana,
            max_mana: rules.max_mana,
            initial_mana,
            last_action: None,
            consecutive_defense: 0,
            charge_bonus: 0,
            charge_bonus_cap: rules.charge_bonus_cap,
        }
    }

    /// Sets life, clamped to `[0, max_life]`.
    #[must_use]
    pub fn with_life(mut self, life: u32) -> Self {
        self.life = life.min(self.max_life);
        self
    }

    /// Sets mana, clamped to `[0, max_mana]`.
    #[must_use]
    pub fn with_mana(mut self, mana: u32) -> Self {
        self.mana = mana.min(self.max_mana);
        self
    }

    /// Sets the consecutive barrier count.
    #[must_use]
    pub fn with_consecutive_defense(mut self, count: u32) -> Self {
        self.consecutive_defense = count;
        self
    }

    /// Sets the banked charge bonus, clamped to the cap.
    #[must_use]
    pub fn with_charge_bonus(mut self, bonus: u32) -> Self {
        self.charge_bonus = bonus.min(self.charge_bonus_cap);
        self
    }

    /// Current life.
    #[must_use]
    pub const fn life(&self) -> u32 {
        self.life
    }

    /// Maximum life.
    #[must_use]
    pub const fn max_life(&self) -> u32 {
        self.max_life
    }

    /// Current mana.
    #[must_use]
    pub const fn mana(&self) -> u32 {
        self.mana
    }

    /// Maximum mana.
    #[must_use]
    pub const fn max_mana(&self) -> u32 {
        self.max_mana
    }

    /// Most recent committed action.
    #[must_use]
    pub const fn last_action(&self) -> Option<TurnAction> {
        self.last_action
    }

    /// Number of consecutive turns spent behind a barrier.
    #[must_use]
    pub const fn consecutive_defense(&self) -> u32 {
        self.consecutive_defense
    }

    /// Bonus damage banked for the next attack.
    #[must_use]
    pub const fn charge_bonus(&self) -> u32 {
        self.charge_bonus
    }

    /// Damage this combatant's attack deals right now.
    #[must_use]
    pub const fn strike_damage(&self) -> u32 {
        1 + self.charge_bonus
    }

    /// Checks whether an action may be selected, and why not.
    pub fn check(&self, action: TurnAction) -> Result<(), RejectReason> {
        if action == TurnAction::Charge {
            return if self.mana < self.max_mana {
                Ok(())
            } else {
                Err(RejectReason::ManaFull)
            };
        }
        if self.mana == 0 {
            return Err(RejectReason::ChargeOnly);
        }

        let required = action.spec().mana_cost.max(0) as u32;
        if self.mana < required {
            return Err(RejectReason::InsufficientMana {
                required,
                available: self.mana,
            });
        }
        Ok(())
    }

    /// Checks whether an action may be selected.
    #[must_use]
    pub fn can_perform(&self, action: TurnAction) -> bool {
        self.check(action).is_ok()
    }

    /// Every action this combatant may select now.
    #[must_use]
    pub fn legal_actions(&self) -> ActionSet {
        TurnAction::ALL
            .into_iter()
            .filter(|a| self.can_perform(*a))
            .collect()
    }

    /// Commits an action: pays (or refunds) its mana and records it.
    ///
    /// Nothing changes if the action is not legal. No damage is dealt here.
    pub fn perform(&mut self, action: TurnAction) -> Result<(), DuelError> {
        self.check(action).map_err(|reason| DuelError::Rejected {
            action: action.display_name(),
            reason,
        })?;

        let next = i64::from(self.mana) - i64::from(action.spec().mana_cost);
        self.mana = next.clamp(0, i64::from(self.max_mana)) as u32;
        self.last_action = Some(action);
        Ok(())
    }

    /// Updates the streak counters after a turn resolves.
    ///
    /// Barrier extends the defense streak; anything else ends it. Charge banks
    /// one bonus point up to the cap; anything else spends the bank.
    pub fn record_streaks(&mut self, action: TurnAction) {
        if action == TurnAction::Barrier {
            self.consecutive_defense += 1;
        } else {
            self.consecutive_defense = 0;
        }

        if action == TurnAction::Charge {
            self.charge_bonus = (self.charge_bonus + 1).min(self.charge_bonus_cap);
        } else {
            self.charge_bonus = 0;
        }
    }

    /// Applies damage, saturating at zero. Returns the life actually lost.
    pub fn take_damage(&mut self, damage: u32) -> u32 {
        let lost = damage.min(self.life);
        self.life -= lost;
        lost
    }

    /// Restores life up to the maximum. Returns the life actually gained.
    pub fn recover_life(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max_life - self.life);
        self.life += gained;
        gained
    }

    /// Checks if the combatant still has life.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Life as a percentage of the maximum.
    #[must_use]
    pub fn life_percentage(&self) -> f32 {
        percentage(self.life, self.max_life)
    }

    /// Mana as a percentage of the maximum.
    #[must_use]
    pub fn mana_percentage(&self) -> f32 {
        percentage(self.mana, self.max_mana)
    }

    /// Restores the state this combatant was created with.
    pub fn reset(&mut self) {
        self.life = self.max_life;
        self.mana = self.initial_mana;
        self.last_action = None;
        self.consecutive_defense = 0;
        self.charge_bonus = 0;
    }
}

fn percentage(value: u32, max: u32) -> f32 {
    if max == 0 {
        0.0
    } else {
        value as f32 / max as f32 * 100.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fresh() -> CombatantState {
        CombatantState::new(&TurnRules::default())
    }

    #[test]
    fn test_initial_state() {
        let c = fresh();
        assert_eq!(c.life(), 3);
        assert_eq!(c.mana(), 3);
        assert_eq!(c.last_action(), None);
        assert_eq!(c.consecutive_defense(), 0);
        assert_eq!(c.charge_bonus(), 0);
    }

    #[test]
    fn test_charge_illegal_at_full_mana() {
        let c = fresh();
        assert_eq!(c.check(TurnAction::Charge), Err(RejectReason::ManaFull));
        assert!(c.can_perform(TurnAction::Attack));
        assert!(c.can_perform(TurnAction::Barrier));
    }

    #[test]
    fn test_zero_mana_is_charge_only() {
        let mut c = fresh().with_mana(0);
        assert_eq!(c.check(TurnAction::Attack), Err(RejectReason::ChargeOnly));
        assert_eq!(c.check(TurnAction::Barrier), Err(RejectReason::ChargeOnly));

        let legal = c.legal_actions();
        assert_eq!(legal.len(), 1);
        assert!(legal.contains(TurnAction::Charge));

        let before = c;
        assert!(c.perform(TurnAction::Attack).is_err());
        assert_eq!(c, before);
    }

    #[test]
    fn test_perform_applies_cost() {
        let mut c = fresh();
        c.perform(TurnAction::Attack).expect("legal");
        assert_eq!(c.mana(), 2);
        assert_eq!(c.last_action(), Some(TurnAction::Attack));

        c.perform(TurnAction::Charge).expect("legal");
        assert_eq!(c.mana(), 3);
        assert_eq!(c.last_action(), Some(TurnAction::Charge));
    }

    #[test]
    fn test_defense_streak() {
        let mut c = fresh();
        c.record_streaks(TurnAction::Barrier);
        c.record_streaks(TurnAction::Barrier);
        assert_eq!(c.consecutive_defense(), 2);

        c.record_streaks(TurnAction::Charge);
        assert_eq!(c.consecutive_defense(), 0);

        c.record_streaks(TurnAction::Barrier);
        assert_eq!(c.consecutive_defense(), 1);
        c.record_streaks(TurnAction::Attack);
        assert_eq!(c.consecutive_defense(), 0);
    }

    #[test]
    fn test_charge_bonus_caps_and_resets_on_attack() {
        let mut c = fresh();
        for _ in 0..5 {
            c.record_streaks(TurnAction::Charge);
        }
        assert_eq!(c.charge_bonus(), 2);
        assert_eq!(c.strike_damage(), 3);

        c.record_streaks(TurnAction::Attack);
        assert_eq!(c.charge_bonus(), 0);
    }

    #[test]
    fn test_charge_bonus_needs_consecutive_charges() {
        let mut c = fresh();
        c.record_streaks(TurnAction::Charge);
        c.record_streaks(TurnAction::Barrier);
        assert_eq!(c.charge_bonus(), 0);
    }

    #[test]
    fn test_damage_and_recovery_clamp() {
        let mut c = fresh();
        assert_eq!(c.take_damage(2), 2);
        assert_eq!(c.take_damage(5), 1);
        assert_eq!(c.life(), 0);
        assert!(!c.is_alive());

        assert_eq!(c.recover_life(10), 3);
        assert_eq!(c.life(), 3);
    }

    #[test]
    fn test_percentages() {
        let c = fresh().with_life(1).with_mana(2);
        assert!((c.life_percentage() - 100.0 / 3.0).abs() < 1e-4);
        assert!((c.mana_percentage() - 200.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_reset_restores_construction_values() {
        let mut c = fresh();
        c.perform(TurnAction::Attack).expect("legal");
        c.record_streaks(TurnAction::Barrier);
        c.take_damage(2);
        let mut d = c.with_charge_bonus(2);
        d.reset();
        assert_eq!(d, fresh());
    }

    proptest! {
        #[test]
        fn prop_bounds_hold(actions in proptest::collection::vec(0usize..3, 0..64),
                            hits in proptest::collection::vec(0u32..4, 0..64)) {
            let mut c = fresh();
            for (i, idx) in actions.iter().enumerate() {
                let action = TurnAction::ALL[*idx];
                if c.perform(action).is_ok() {
                    c.record_streaks(action);
                }
                if let Some(h) = hits.get(i) {
                    c.take_damage(*h);
                }
                prop_assert!(c.life() <= c.max_life());
                prop_assert!(c.mana() <= c.max_mana());
                prop_assert!(c.charge_bonus() <= 2);
            }
        }
    }
}
