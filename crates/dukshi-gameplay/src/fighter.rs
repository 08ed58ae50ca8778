//! Real-time fighter state.
//!
//! This module provides:
//! - Per-tick input (`FighterInput`) with edge-triggered presses
//! - The block state machine (idle, blocking, cooling down)
//! - Swing timing (active window and cooldown) and mana spending
//! - Mana accumulation while charging
//! - Movement with gravity and arena clamping
//!
//! Block, charge and swing are mutually exclusive: entering one cancels the
//! others.

use dukshi_common::RejectReason;
use serde::{Deserialize, Serialize};

use crate::actions::RealtimeAction;
use crate::arena::{clamp_to_arena, Aabb, Body, Vec2};
use crate::config::RealtimeRules;

// ============================================================================
// Input
// ============================================================================

/// Direction a fighter faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Facing toward smaller x.
    Left,
    /// Facing toward larger x.
    Right,
}

impl Facing {
    /// Unit direction along x.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Controls held by a fighter during one tick.
///
/// `attack`, `mega_attack`, `block` and `jump` act on the tick they go from
/// released to pressed. `block` and `charge` last while held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FighterInput {
    /// -1 for left, 1 for right, 0 for none
    pub horizontal: i8,
    /// Explicit facing, overriding the move direction
    pub face: Option<Facing>,
    /// Jump key
    pub jump: bool,
    /// Attack key
    pub attack: bool,
    /// Mega attack key
    pub mega_attack: bool,
    /// Block key
    pub block: bool,
    /// Charge key
    pub charge: bool,
}

/// Something a fighter did in response to input or time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FighterEvent {
    /// A block was raised.
    BlockStarted,
    /// A block came down, either released or timed out.
    BlockEnded {
        /// Whether the block ran out rather than being released
        expired: bool,
    },
    /// A swing began.
    SwingStarted {
        /// Whether it was a mega attack
        mega: bool,
    },
    /// A press was refused.
    Rejected {
        /// Action that was pressed
        action: RealtimeAction,
        /// Why it was refused
        reason: RejectReason,
    },
}

/// Observable phase of the block state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockState {
    /// Block can be raised.
    Idle,
    /// Guard is up.
    Blocking {
        /// Ticks before the guard drops on its own
        remaining: u32,
    },
    /// Guard recently came down.
    Cooldown {
        /// Ticks before it can be raised again
        remaining: u32,
    },
}

// ============================================================================
// Fighter
// ============================================================================

/// One side of a real-time duel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    health: u32,
    max_health: u32,
    mana: u32,
    max_mana: u32,

    position: Vec2,
    velocity: Vec2,
    facing: Facing,
    grounded: bool,
    width: f32,
    height: f32,

    block_duration_remaining: u32,
    block_cooldown_remaining: u32,
    attack_active_remaining: u32,
    attack_cooldown_remaining: u32,
    is_blocking: bool,
    is_charging: bool,
    is_attacking: bool,
    is_mega_attacking: bool,
    attack_has_landed: bool,
    charge_timer: u32,

    held: FighterInput,
    spawn_x: f32,
    spawn_facing: Facing,
}

impl Fighter {
    /// Creates a grounded fighter at `spawn_x`.
    #[must_use]
    pub fn new(rules: &RealtimeRules, spawn_x: f32, facing: Facing) -> Self {
        Self {
            health: rules.max_health,
            max_health: rules.max_health,
            mana: rules.initial_mana.min(rules.max_mana),
            max_mana: rules.max_mana,
            position: Vec2::new(spawn_x, rules.floor_top()),
            velocity: Vec2::ZERO,
            facing,
            grounded: true,
            width: rules.fighter_width,
            height: rules.fighter_height,
            block_duration_remaining: 0,
            block_cooldown_remaining: 0,
            attack_active_remaining: 0,
            attack_cooldown_remaining: 0,
            is_blocking: false,
            is_charging: false,
            is_attacking: false,
            is_mega_attacking: false,
            attack_has_landed: false,
            charge_timer: 0,
            held: FighterInput::default(),
            spawn_x,
            spawn_facing: facing,
        }
    }

    /// Fighter on the player's spawn point.
    #[must_use]
    pub fn player(rules: &RealtimeRules) -> Self {
        Self::new(rules, rules.player_spawn_x, Facing::Right)
    }

    /// Fighter on the bot's spawn point.
    #[must_use]
    pub fn bot(rules: &RealtimeRules) -> Self {
        Self::new(rules, rules.bot_spawn_x, Facing::Left)
    }

    /// Moves the fighter's left edge to `x`.
    #[must_use]
    pub fn with_x(mut self, x: f32) -> Self {
        self.position.x = x;
        self
    }

    /// Sets mana, clamped to the maximum.
    #[must_use]
    pub fn with_mana(mut self, mana: u32) -> Self {
        self.mana = mana.min(self.max_mana);
        self
    }

    /// Sets health, clamped to the maximum.
    #[must_use]
    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health.min(self.max_health);
        self
    }

    /// Sets facing.
    #[must_use]
    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    /// Restores spawn state.
    pub fn reset(&mut self, rules: &RealtimeRules) {
        *self = Self::new(rules, self.spawn_x, self.spawn_facing);
    }

    // === Accessors ===

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.max_health
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

    /// Top-left corner.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Velocity per tick.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Facing direction.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Whether the fighter stands on the floor.
    #[must_use]
    pub const fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Whether the guard is up.
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        self.is_blocking
    }

    /// Whether the fighter is charging mana.
    #[must_use]
    pub const fn is_charging(&self) -> bool {
        self.is_charging
    }

    /// Whether a swing is in its active window.
    #[must_use]
    pub const fn is_attacking(&self) -> bool {
        self.is_attacking
    }

    /// Whether the active swing is a mega attack.
    #[must_use]
    pub const fn is_mega_attacking(&self) -> bool {
        self.is_mega_attacking
    }

    /// Whether the active swing already connected.
    #[must_use]
    pub const fn attack_has_landed(&self) -> bool {
        self.attack_has_landed
    }

    /// Ticks left in the active swing window.
    #[must_use]
    pub const fn attack_active_remaining(&self) -> u32 {
        self.attack_active_remaining
    }

    /// Ticks until the next swing.
    #[must_use]
    pub const fn attack_cooldown_remaining(&self) -> u32 {
        self.attack_cooldown_remaining
    }

    /// Ticks until a block can be raised again.
    #[must_use]
    pub const fn block_cooldown_remaining(&self) -> u32 {
        self.block_cooldown_remaining
    }

    /// Ticks before the current block drops.
    #[must_use]
    pub const fn block_duration_remaining(&self) -> u32 {
        self.block_duration_remaining
    }

    /// Phase of the block state machine.
    #[must_use]
    pub const fn block_state(&self) -> BlockState {
        if self.is_blocking {
            BlockState::Blocking {
                remaining: self.block_duration_remaining,
            }
        } else if self.block_cooldown_remaining > 0 {
            BlockState::Cooldown {
                remaining: self.block_cooldown_remaining,
            }
        } else {
            BlockState::Idle
        }
    }

    /// Hitbox in arena space.
    #[must_use]
    pub fn hitbox(&self) -> Aabb {
        Aabb::from_corner(self.position, self.width, self.height)
    }

    /// Horizontal center.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.position.x + self.width / 2.0
    }

    /// Horizontal distance between centers.
    #[must_use]
    pub fn distance_to(&self, other: &Fighter) -> f32 {
        (other.center_x() - self.center_x()).abs()
    }

    /// Whether `other` is in front of this fighter.
    #[must_use]
    pub fn is_facing(&self, other: &Fighter) -> bool {
        match self.facing {
            Facing::Right => other.center_x() >= self.center_x(),
            Facing::Left => other.center_x() <= self.center_x(),
        }
    }

    /// Checks if the fighter still has health.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Health as a percentage of the maximum.
    #[must_use]
    pub fn health_percentage(&self) -> f32 {
        if self.max_health == 0 {
            0.0
        } else {
            self.health as f32 / self.max_health as f32 * 100.0
        }
    }

    /// Mana as a percentage of the maximum.
    #[must_use]
    pub fn mana_percentage(&self) -> f32 {
        if self.max_mana == 0 {
            0.0
        } else {
            self.mana as f32 / self.max_mana as f32 * 100.0
        }
    }

    // === Eligibility ===

    /// Checks whether a swing may start now.
    pub fn check_attack(&self, mega: bool, rules: &RealtimeRules) -> Result<(), RejectReason> {
        if mega && !rules.mega_attack_enabled {
            return Err(RejectReason::Disabled);
        }
        if self.attack_cooldown_remaining > 0 {
            return Err(RejectReason::OnCooldown {
                remaining: self.attack_cooldown_remaining,
            });
        }
        if self.is_attacking {
            return Err(RejectReason::AlreadyActive);
        }
        let required = swing_action(mega).mana_cost();
        if self.mana < required {
            return Err(RejectReason::InsufficientMana {
                required,
                available: self.mana,
            });
        }
        Ok(())
    }

    /// Checks whether a block may be raised now.
    pub fn check_block(&self) -> Result<(), RejectReason> {
        if self.is_blocking {
            return Err(RejectReason::AlreadyActive);
        }
        if self.block_cooldown_remaining > 0 {
            return Err(RejectReason::OnCooldown {
                remaining: self.block_cooldown_remaining,
            });
        }
        Ok(())
    }

    // === Actions ===

    /// Starts a swing, spending its mana.
    pub fn start_attack(&mut self, mega: bool, rules: &RealtimeRules) -> Result<(), RejectReason> {
        self.check_attack(mega, rules)?;

        self.release_block(rules);
        self.stop_charge();

        self.mana -= swing_action(mega).mana_cost();
        self.is_attacking = true;
        self.is_mega_attacking = mega;
        self.attack_has_landed = false;
        self.attack_active_remaining = rules.attack_duration;
        self.attack_cooldown_remaining = if mega {
            rules.mega_cooldown()
        } else {
            rules.attack_cooldown
        };
        Ok(())
    }

    /// Raises the guard.
    pub fn block(&mut self, rules: &RealtimeRules) -> Result<(), RejectReason> {
        self.check_block()?;

        self.cancel_swing();
        self.stop_charge();

        self.is_blocking = true;
        self.block_duration_remaining = rules.max_blocking_time;
        Ok(())
    }

    /// Lowers the guard and starts its cooldown. Returns whether it was up.
    pub fn release_block(&mut self, rules: &RealtimeRules) -> bool {
        if !self.is_blocking {
            return false;
        }
        self.is_blocking = false;
        self.block_duration_remaining = 0;
        self.block_cooldown_remaining = rules.block_cooldown_time;
        true
    }

    /// Begins charging mana.
    pub fn start_charge(&mut self, rules: &RealtimeRules) {
        if self.is_charging {
            return;
        }
        self.release_block(rules);
        self.cancel_swing();
        self.is_charging = true;
        self.charge_timer = 0;
    }

    /// Stops charging.
    pub fn stop_charge(&mut self) {
        self.is_charging = false;
        self.charge_timer = 0;
    }

    fn cancel_swing(&mut self) {
        self.is_attacking = false;
        self.is_mega_attacking = false;
        self.attack_active_remaining = 0;
    }

    pub(crate) fn mark_landed(&mut self) {
        self.attack_has_landed = true;
    }

    /// Applies damage, saturating at zero. Returns the health actually lost.
    pub fn take_damage(&mut self, damage: u32) -> u32 {
        let lost = damage.min(self.health);
        self.health -= lost;
        lost
    }

    // === Per-tick update ===

    /// Applies one tick of input: presses, facing and horizontal speed.
    pub fn apply_input(&mut self, input: FighterInput, rules: &RealtimeRules) -> Vec<FighterEvent> {
        let mut events = Vec::new();
        let held = self.held;
        self.held = input;

        let mega_pressed = input.mega_attack && !held.mega_attack;
        let attack_pressed = input.attack && !held.attack;
        let block_pressed = input.block && !held.block;

        if mega_pressed || attack_pressed {
            let mega = mega_pressed;
            let guarding = self.is_blocking;
            match self.start_attack(mega, rules) {
                Ok(()) => {
                    // The swing drops a held guard.
                    if guarding {
                        events.push(FighterEvent::BlockEnded { expired: false });
                    }
                    events.push(FighterEvent::SwingStarted { mega });
                },
                Err(reason) => events.push(FighterEvent::Rejected {
                    action: swing_action(mega),
                    reason,
                }),
            }
        } else if block_pressed {
            match self.block(rules) {
                Ok(()) => events.push(FighterEvent::BlockStarted),
                Err(reason) => events.push(FighterEvent::Rejected {
                    action: RealtimeAction::Block,
                    reason,
                }),
            }
        }

        if !input.block && self.release_block(rules) {
            events.push(FighterEvent::BlockEnded { expired: false });
        }

        if input.charge && !self.is_attacking && !self.is_blocking {
            self.start_charge(rules);
        } else if !input.charge {
            self.stop_charge();
        }

        if let Some(face) = input.face {
            self.facing = face;
        } else if input.horizontal < 0 {
            self.facing = Facing::Left;
        } else if input.horizontal > 0 {
            self.facing = Facing::Right;
        }

        let rooted = self.is_blocking || self.is_charging;
        if !rooted && input.horizontal != 0 {
            self.velocity.x = f32::from(input.horizontal.signum()) * rules.move_speed;
        } else {
            self.velocity.x *= rules.friction;
        }

        if input.jump && !held.jump && self.grounded && !rooted {
            self.velocity.y = -rules.jump_velocity;
            self.grounded = false;
        }

        events
    }

    /// Integrates velocity with gravity and keeps the fighter in the arena.
    pub fn advance_motion(&mut self, rules: &RealtimeRules) {
        if !self.grounded {
            self.velocity.y += rules.gravity;
        }
        self.position += self.velocity;
        self.keep_in_arena(rules);
    }

    /// Clamps the fighter inside the walls and onto the floor.
    pub fn keep_in_arena(&mut self, rules: &RealtimeRules) {
        let contact = clamp_to_arena(&mut self.position, &mut self.velocity, rules);
        self.grounded = contact.floor;
    }

    /// Mutable body handles for collision resolution.
    pub(crate) fn body(&mut self) -> Body<'_> {
        Body {
            position: &mut self.position,
            velocity: &mut self.velocity,
        }
    }

    /// Counts down swing, block and charge timers by one tick.
    pub fn tick_timers(&mut self, rules: &RealtimeRules) -> Vec<FighterEvent> {
        let mut events = Vec::new();

        self.attack_cooldown_remaining = self.attack_cooldown_remaining.saturating_sub(1);
        if self.is_attacking {
            self.attack_active_remaining = self.attack_active_remaining.saturating_sub(1);
            if self.attack_active_remaining == 0 {
                self.cancel_swing();
            }
        }

        if self.is_blocking {
            self.block_duration_remaining = self.block_duration_remaining.saturating_sub(1);
            if self.block_duration_remaining == 0 {
                self.release_block(rules);
                events.push(FighterEvent::BlockEnded { expired: true });
            }
        } else {
            self.block_cooldown_remaining = self.block_cooldown_remaining.saturating_sub(1);
        }

        if self.is_charging {
            self.charge_timer += 1;
            if self.charge_timer >= rules.charge_interval.max(1) {
                self.charge_timer = 0;
                self.mana = (self.mana + 1).min(self.max_mana);
            }
        }

        events
    }
}

const fn swing_action(mega: bool) -> RealtimeAction {
    if mega {
        RealtimeAction::MegaAttack
    } else {
        RealtimeAction::Attack
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> RealtimeRules {
        RealtimeRules::default()
    }

    fn press(f: impl FnOnce(&mut FighterInput)) -> FighterInput {
        let mut input = FighterInput::default();
        f(&mut input);
        input
    }

    #[test]
    fn test_spawn_state() {
        let rules = rules();
        let f = Fighter::player(&rules);
        assert_eq!(f.health(), 3);
        assert_eq!(f.mana(), 2);
        assert!(f.is_grounded());
        assert_eq!(f.position().y, rules.floor_top());
        assert_eq!(f.block_state(), BlockState::Idle);
    }

    #[test]
    fn test_block_state_machine() {
        let rules = rules();
        let mut f = Fighter::player(&rules);
        f.block(&rules).expect("idle block");
        assert_eq!(f.block_state(), BlockState::Blocking { remaining: 60 });
        assert_eq!(f.check_block(), Err(RejectReason::AlreadyActive));

        let mut expired = false;
        for _ in 0..60 {
            expired |= f
                .tick_timers(&rules)
                .contains(&FighterEvent::BlockEnded { expired: true });
        }
        assert!(expired);
        assert_eq!(f.block_state(), BlockState::Cooldown { remaining: 90 });
        assert_eq!(f.block(&rules), Err(RejectReason::OnCooldown { remaining: 90 }));

        for _ in 0..90 {
            f.tick_timers(&rules);
        }
        assert_eq!(f.block_state(), BlockState::Idle);
        assert!(f.block(&rules).is_ok());
    }

    #[test]
    fn test_release_starts_cooldown() {
        let rules = rules();
        let mut f = Fighter::player(&rules);
        f.apply_input(press(|i| i.block = true), &rules);
        assert!(f.is_blocking());

        let events = f.apply_input(FighterInput::default(), &rules);
        assert_eq!(events, vec![FighterEvent::BlockEnded { expired: false }]);
        assert_eq!(f.block_cooldown_remaining(), 90);
    }

    #[test]
    fn test_swing_spends_mana_and_times_out() {
        let rules = rules();
        let mut f = Fighter::player(&rules);
        f.start_attack(false, &rules).expect("ready");
        assert_eq!(f.mana(), 1);
        assert!(f.is_attacking());
        assert!(!f.attack_has_landed());

        for _ in 0..15 {
            f.tick_timers(&rules);
        }
        assert!(!f.is_attacking());
        assert_eq!(
            f.check_attack(false, &rules),
            Err(RejectReason::OnCooldown { remaining: 15 })
        );
    }

    #[test]
    fn test_mega_needs_mana_and_ruleset() {
        let rules = rules();
        let f = Fighter::player(&rules);
        assert_eq!(
            f.check_attack(true, &rules),
            Err(RejectReason::InsufficientMana {
                required: 3,
                available: 2
            })
        );

        let mut rich = f.with_mana(5);
        rich.start_attack(true, &rules).expect("mega");
        assert_eq!(rich.mana(), 2);
        assert_eq!(rich.attack_cooldown_remaining(), 45);
        assert!(rich.is_mega_attacking());

        let early = RealtimeRules::early();
        assert_eq!(
            Fighter::player(&early).with_mana(5).check_attack(true, &early),
            Err(RejectReason::Disabled)
        );
    }

    #[test]
    fn test_attack_is_edge_triggered() {
        let rules = rules();
        let mut f = Fighter::player(&rules).with_mana(5);
        let held = press(|i| i.attack = true);
        assert_eq!(
            f.apply_input(held, &rules),
            vec![FighterEvent::SwingStarted { mega: false }]
        );
        for _ in 0..40 {
            f.tick_timers(&rules);
            assert!(f.apply_input(held, &rules).is_empty());
        }
        assert_eq!(f.mana(), 4);
    }

    #[test]
    fn test_swing_cancels_block_and_charge() {
        let rules = rules();
        let mut f = Fighter::player(&rules);
        f.block(&rules).expect("block");
        f.start_attack(false, &rules).expect("swing");
        assert!(!f.is_blocking());
        assert_eq!(f.block_cooldown_remaining(), 90);

        let mut g = Fighter::player(&rules);
        g.start_charge(&rules);
        g.block(&rules).expect("block");
        assert!(!g.is_charging());
        assert!(g.is_blocking());
    }

    #[test]
    fn test_swing_from_guard_reports_guard_drop() {
        let rules = rules();
        let mut f = Fighter::player(&rules);
        assert_eq!(
            f.apply_input(press(|i| i.block = true), &rules),
            vec![FighterEvent::BlockStarted]
        );

        let events = f.apply_input(
            press(|i| {
                i.block = true;
                i.attack = true;
            }),
            &rules,
        );
        assert_eq!(
            events,
            vec![
                FighterEvent::BlockEnded { expired: false },
                FighterEvent::SwingStarted { mega: false },
            ]
        );
        assert!(!f.is_blocking());
        assert!(f.is_attacking());
    }

    #[test]
    fn test_charging_accumulates_mana() {
        let rules = rules();
        let mut f = Fighter::player(&rules);
        let hold = press(|i| i.charge = true);
        for _ in 0..30 {
            f.apply_input(hold, &rules);
            f.tick_timers(&rules);
        }
        assert_eq!(f.mana(), 3);

        for _ in 0..300 {
            f.apply_input(hold, &rules);
            f.tick_timers(&rules);
        }
        assert_eq!(f.mana(), 5);

        f.apply_input(FighterInput::default(), &rules);
        assert!(!f.is_charging());
    }

    #[test]
    fn test_charging_roots_in_place() {
        let rules = rules();
        let mut f = Fighter::player(&rules);
        f.apply_input(press(|i| {
            i.charge = true;
            i.horizontal = 1;
        }), &rules);
        assert_eq!(f.velocity().x, 0.0);
    }

    #[test]
    fn test_jump_and_land() {
        let rules = rules();
        let mut f = Fighter::player(&rules);
        f.apply_input(press(|i| i.jump = true), &rules);
        assert!(!f.is_grounded());

        let mut peak = f.position().y;
        for _ in 0..120 {
            f.advance_motion(&rules);
            peak = peak.min(f.position().y);
            f.apply_input(FighterInput::default(), &rules);
        }
        assert!(peak < rules.floor_top() - 100.0);
        assert!(f.is_grounded());
        assert_eq!(f.position().y, rules.floor_top());
    }

    #[test]
    fn test_facing_follows_movement() {
        let rules = rules();
        let mut f = Fighter::player(&rules);
        f.apply_input(press(|i| i.horizontal = -1), &rules);
        assert_eq!(f.facing(), Facing::Left);
        assert_eq!(f.velocity().x, -5.0);

        f.apply_input(press(|i| {
            i.horizontal = -1;
            i.face = Some(Facing::Right);
        }), &rules);
        assert_eq!(f.facing(), Facing::Right);
    }

    #[test]
    fn test_reset_returns_to_spawn() {
        let rules = rules();
        let mut f = Fighter::bot(&rules);
        f.apply_input(press(|i| i.horizontal = -1), &rules);
        f.advance_motion(&rules);
        f.take_damage(2);
        f.reset(&rules);
        assert_eq!(f, Fighter::bot(&rules));
    }
}
