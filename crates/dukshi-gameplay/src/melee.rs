//! Real-time hit resolution.
//!
//! A swing connects at most once. It lands when the attacker is inside its
//! active window, faces the defender and the horizontal distance between
//! centers is below the swing's reach. A blocking defender takes the blocked
//! fraction, rounded up.

use dukshi_common::Side;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RealtimeRules;
use crate::fighter::Fighter;

/// A swing that connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strike {
    /// Side that swung
    pub attacker: Side,
    /// Damage before blocking
    pub nominal: u32,
    /// Damage that went through
    pub dealt: u32,
    /// Whether the defender was blocking
    pub blocked: bool,
    /// Whether the swing was a mega attack
    pub mega: bool,
}

/// Reach of the attacker's current swing.
#[must_use]
pub fn swing_reach(attacker: &Fighter, rules: &RealtimeRules) -> f32 {
    if attacker.is_mega_attacking() {
        rules.mega_range()
    } else {
        rules.attack_range
    }
}

/// Damage a swing deals through a guard.
#[must_use]
pub fn blocked_damage(nominal: u32, rules: &RealtimeRules) -> u32 {
    (nominal as f32 * rules.block_reduction).ceil() as u32
}

/// Checks whether `attacker`'s swing would connect with `defender` now.
#[must_use]
pub fn in_strike_window(attacker: &Fighter, defender: &Fighter, rules: &RealtimeRules) -> bool {
    attacker.is_attacking()
        && !attacker.attack_has_landed()
        && attacker.is_facing(defender)
        && attacker.distance_to(defender) < swing_reach(attacker, rules)
}

/// Lands `attacker`'s swing on `defender` if it connects.
pub fn resolve_strike(
    side: Side,
    attacker: &mut Fighter,
    defender: &mut Fighter,
    rules: &RealtimeRules,
) -> Option<Strike> {
    if !in_strike_window(attacker, defender, rules) {
        return None;
    }

    let mega = attacker.is_mega_attacking();
    let nominal = if mega {
        rules.mega_damage()
    } else {
        rules.attack_damage
    };
    let blocked = defender.is_blocking();
    let dealt = if blocked {
        blocked_damage(nominal, rules)
    } else {
        nominal
    };

    attacker.mark_landed();
    defender.take_damage(dealt);
    debug!(
        "{} landed a {} for {} (blocked: {})",
        side,
        if mega { "mega attack" } else { "swing" },
        dealt,
        blocked
    );

    Some(Strike {
        attacker: side,
        nominal,
        dealt,
        blocked,
        mega,
    })
}
