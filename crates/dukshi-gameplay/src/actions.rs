//! Action catalog.
//!
//! Fixed costs and categories for every action in both game variants. This
//! module is pure data: it answers lookups and nothing else.

use serde::{Deserialize, Serialize};

// ============================================================================
// Categories and costs
// ============================================================================

/// Broad role of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionCategory {
    /// Deals damage.
    Attack,
    /// Mitigates damage.
    Defense,
    /// Restores mana.
    Recovery,
    /// Changes position.
    Movement,
}

/// Catalog entry for one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Mana spent when the action is committed. Negative values refund mana.
    pub mana_cost: i32,
    /// Role of the action.
    pub category: ActionCategory,
}

impl ActionSpec {
    const fn new(mana_cost: i32, category: ActionCategory) -> Self {
        Self {
            mana_cost,
            category,
        }
    }
}

// ============================================================================
// Turn-based actions
// ============================================================================

/// Action committed once per turn in the turn-based duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnAction {
    /// Strike the opponent ("Dukshi").
    Attack,
    /// Raise a barrier.
    Barrier,
    /// Recover one mana and build charge bonus.
    Charge,
}

impl TurnAction {
    /// All turn actions, in the order legality is enumerated.
    pub const ALL: [Self; 3] = [Self::Attack, Self::Barrier, Self::Charge];

    /// Catalog entry for this action.
    #[must_use]
    pub const fn spec(self) -> ActionSpec {
        match self {
            Self::Attack => ActionSpec::new(1, ActionCategory::Attack),
            Self::Barrier => ActionSpec::new(1, ActionCategory::Defense),
            Self::Charge => ActionSpec::new(-1, ActionCategory::Recovery),
        }
    }

    /// Name shown in action logs.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Attack => "Dukshi",
            Self::Barrier => "Barrier",
            Self::Charge => "Charge",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::Attack => 0b001,
            Self::Barrier => 0b010,
            Self::Charge => 0b100,
        }
    }
}

impl std::fmt::Display for TurnAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for TurnAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "attack" | "dukshi" => Ok(Self::Attack),
            "b" | "barrier" | "block" => Ok(Self::Barrier),
            "c" | "charge" => Ok(Self::Charge),
            other => Err(format!("unknown action: {other}")),
        }
    }
}

/// Small set of turn actions, iterated in [`TurnAction::ALL`] order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionSet(u8);

impl ActionSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Set containing every turn action.
    pub const FULL: Self = Self(0b111);

    /// Adds an action.
    pub fn insert(&mut self, action: TurnAction) {
        self.0 |= action.bit();
    }

    /// Checks membership.
    #[must_use]
    pub const fn contains(self, action: TurnAction) -> bool {
        self.0 & action.bit() != 0
    }

    /// Number of actions in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Checks if the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates members in catalog order.
    pub fn iter(self) -> impl Iterator<Item = TurnAction> {
        TurnAction::ALL.into_iter().filter(move |a| self.contains(*a))
    }

    /// Returns the `index`-th member in catalog order.
    #[must_use]
    pub fn nth(self, index: usize) -> Option<TurnAction> {
        self.iter().nth(index)
    }

    /// First member in catalog order.
    #[must_use]
    pub fn first(self) -> Option<TurnAction> {
        self.nth(0)
    }
}

impl FromIterator<TurnAction> for ActionSet {
    fn from_iter<I: IntoIterator<Item = TurnAction>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for action in iter {
            set.insert(action);
        }
        set
    }
}

// ============================================================================
// Real-time actions
// ============================================================================

/// Action requested by a fighter in the real-time duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RealtimeAction {
    /// Regular swing.
    Attack,
    /// Heavy swing with longer reach and cooldown.
    MegaAttack,
    /// Hold a guard that reduces incoming damage.
    Block,
    /// Stand still and accumulate mana.
    Charge,
    /// Walk left or right.
    Move,
    /// Leave the ground.
    Jump,
}

impl RealtimeAction {
    /// Catalog entry for this action.
    ///
    /// Block, Charge, Move and Jump are continuous and cost no mana.
    #[must_use]
    pub const fn spec(self) -> ActionSpec {
        match self {
            Self::Attack => ActionSpec::new(1, ActionCategory::Attack),
            Self::MegaAttack => ActionSpec::new(3, ActionCategory::Attack),
            Self::Block => ActionSpec::new(0, ActionCategory::Defense),
            Self::Charge => ActionSpec::new(0, ActionCategory::Recovery),
            Self::Move | Self::Jump => ActionSpec::new(0, ActionCategory::Movement),
        }
    }

    /// Name shown in logs.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Attack => "Attack",
            Self::MegaAttack => "Mega Attack",
            Self::Block => "Block",
            Self::Charge => "Charge",
            Self::Move => "Move",
            Self::Jump => "Jump",
        }
    }

    /// Mana cost as an unsigned amount (continuous actions cost nothing).
    #[must_use]
    pub const fn mana_cost(self) -> u32 {
        let cost = self.spec().mana_cost;
        if cost > 0 {
            cost as u32
        } else {
            0
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_costs() {
        assert_eq!(TurnAction::Attack.spec().mana_cost, 1);
        assert_eq!(TurnAction::Barrier.spec().mana_cost, 1);
        assert_eq!(TurnAction::Charge.spec().mana_cost, -1);
        assert_eq!(TurnAction::Charge.spec().category, ActionCategory::Recovery);
    }

    #[test]
    fn test_realtime_costs() {
        assert_eq!(RealtimeAction::Attack.mana_cost(), 1);
        assert_eq!(RealtimeAction::MegaAttack.mana_cost(), 3);
        assert_eq!(RealtimeAction::Block.mana_cost(), 0);
        assert_eq!(RealtimeAction::Jump.spec().category, ActionCategory::Movement);
    }

    #[test]
    fn test_action_set_order() {
        let set: ActionSet = [TurnAction::Charge, TurnAction::Attack].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.first(), Some(TurnAction::Attack));
        assert_eq!(set.nth(1), Some(TurnAction::Charge));
        assert!(!set.contains(TurnAction::Barrier));
        assert!(ActionSet::EMPTY.is_empty());
        assert_eq!(ActionSet::FULL.len(), 3);
    }

    #[test]
    fn test_parse_turn_action() {
        assert_eq!("dukshi".parse::<TurnAction>(), Ok(TurnAction::Attack));
        assert_eq!(" B ".parse::<TurnAction>(), Ok(TurnAction::Barrier));
        assert!("dance".parse::<TurnAction>().is_err());
    }
}
