//! Bot decision policy for the turn-based duel.
//!
//! Each difficulty is an ordered list of [`Rule`]s evaluated top to bottom.
//! The first rule that fires decides the action; if none fires, the
//! difficulty's [`Fallback`] picks. Rule order matters: thresholds are
//! conditional on every earlier rule having passed.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::actions::{ActionSet, TurnAction};
use crate::combatant::CombatantState;
use crate::rng::RandomSource;

// ============================================================================
// Difficulty
// ============================================================================

/// Bot difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Picks at random.
    Easy,
    /// Reads the opponent's streaks.
    #[default]
    Normal,
    /// Aggressive and kill-seeking.
    Hard,
}

impl Difficulty {
    /// All difficulties, easiest first.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Normal, Self::Hard];

    /// Ticks between re-decisions in the real-time duel.
    #[must_use]
    pub const fn redecision_interval(self) -> u32 {
        match self {
            Self::Easy => 90,
            Self::Normal => 60,
            Self::Hard => 30,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "normal" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

// ============================================================================
// Rules
// ============================================================================

/// One step of a decision cascade.
///
/// When `when` holds, the rule draws once against `chance` (certain rules
/// draw nothing). A draw below `chance` picks `then`; otherwise `otherwise`
/// is picked if present, else evaluation moves on to the next rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule<S, A> {
    /// Name for tracing
    pub name: &'static str,
    /// Whether the rule applies
    pub when: fn(&S) -> bool,
    /// Probability of firing once applicable
    pub chance: f32,
    /// Action picked when the rule fires
    pub then: A,
    /// Action picked when the draw fails
    pub otherwise: Option<A>,
}

impl<S, A: Copy> Rule<S, A> {
    /// Rule that always fires when applicable.
    #[must_use]
    pub const fn always(name: &'static str, when: fn(&S) -> bool, then: A) -> Self {
        Self {
            name,
            when,
            chance: 1.0,
            then,
            otherwise: None,
        }
    }

    /// Rule that fires with `chance` and otherwise falls through.
    #[must_use]
    pub const fn sometimes(name: &'static str, when: fn(&S) -> bool, chance: f32, then: A) -> Self {
        Self {
            name,
            when,
            chance,
            then,
            otherwise: None,
        }
    }

    /// Rule that fires with `chance` and otherwise picks `otherwise`.
    #[must_use]
    pub const fn either(
        name: &'static str,
        when: fn(&S) -> bool,
        chance: f32,
        then: A,
        otherwise: A,
    ) -> Self {
        Self {
            name,
            when,
            chance,
            then,
            otherwise: Some(otherwise),
        }
    }

    /// Evaluates this rule alone.
    pub fn evaluate<R: RandomSource + ?Sized>(&self, situation: &S, rng: &mut R) -> Option<A> {
        if !(self.when)(situation) {
            return None;
        }
        if self.chance >= 1.0 || rng.chance(self.chance) {
            Some(self.then)
        } else {
            self.otherwise
        }
    }
}

/// Runs rules in order and returns the first decision.
pub fn run_cascade<S, A: Copy + std::fmt::Debug, R: RandomSource + ?Sized>(
    rules: &[Rule<S, A>],
    situation: &S,
    rng: &mut R,
) -> Option<A> {
    rules.iter().find_map(|rule| {
        let picked = rule.evaluate(situation, rng);
        if let Some(action) = picked {
            trace!("Rule '{}' picked {:?}", rule.name, action);
        }
        picked
    })
}

// ============================================================================
// Turn-based policy
// ============================================================================

/// What the bot can see when deciding a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// The deciding combatant
    pub me: CombatantState,
    /// Its opponent
    pub opponent: CombatantState,
    /// Actions the deciding combatant may select
    pub legal: ActionSet,
}

impl Observation {
    /// Builds an observation for `me` facing `opponent`.
    #[must_use]
    pub fn new(me: &CombatantState, opponent: &CombatantState) -> Self {
        Self {
            me: *me,
            opponent: *opponent,
            legal: me.legal_actions(),
        }
    }

    fn can(&self, action: TurnAction) -> bool {
        self.legal.contains(action)
    }
}

/// Terminal choice when no rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Uniform over the legal set.
    Uniform,
    /// First legal entry of the list, else the first legal action.
    Prefer(&'static [TurnAction]),
    /// Uniform pick from the pattern; if illegal, uniform over the legal set.
    Pattern(&'static [TurnAction]),
}

impl Fallback {
    fn pick<R: RandomSource + ?Sized>(self, legal: ActionSet, rng: &mut R) -> Option<TurnAction> {
        match self {
            Self::Uniform => legal.nth(rng.pick_index(legal.len())),
            Self::Prefer(order) => order
                .iter()
                .copied()
                .find(|a| legal.contains(*a))
                .or_else(|| legal.first()),
            Self::Pattern(pattern) => {
                let choice = pattern.get(rng.pick_index(pattern.len())).copied();
                match choice {
                    Some(action) if legal.contains(action) => Some(action),
                    _ => legal.nth(rng.pick_index(legal.len())),
                }
            },
        }
    }
}

type TurnRule = Rule<Observation, TurnAction>;

fn out_of_mana(o: &Observation) -> bool {
    o.me.mana() == 0
}

fn critical_and_can_guard(o: &Observation) -> bool {
    o.me.life() == 1 && o.can(TurnAction::Barrier)
}

fn low_and_can_guard(o: &Observation) -> bool {
    o.me.life() <= 1 && o.can(TurnAction::Barrier)
}

fn opponent_turtling(o: &Observation) -> bool {
    o.opponent.consecutive_defense() >= 2 && o.can(TurnAction::Attack)
}

fn opponent_charged(o: &Observation) -> bool {
    o.opponent.charge_bonus() >= 1 && o.can(TurnAction::Barrier)
}

fn self_charged(o: &Observation) -> bool {
    o.me.charge_bonus() >= 1 && o.can(TurnAction::Attack)
}

fn mana_below_two(o: &Observation) -> bool {
    o.me.mana() < 2 && o.can(TurnAction::Charge)
}

fn can_attack(o: &Observation) -> bool {
    o.can(TurnAction::Attack)
}

fn opponent_at_one(o: &Observation) -> bool {
    o.opponent.life() == 1 && o.can(TurnAction::Attack)
}

fn opponent_at_one_and_charged(o: &Observation) -> bool {
    opponent_at_one(o) && o.me.charge_bonus() >= 1
}

fn healthier_than_opponent(o: &Observation) -> bool {
    o.me.life() > o.opponent.life() && o.can(TurnAction::Attack)
}

static NORMAL_RULES: [TurnRule; 7] = [
    Rule::always("out of mana", out_of_mana, TurnAction::Charge),
    Rule::either(
        "critical life",
        critical_and_can_guard,
        0.8,
        TurnAction::Barrier,
        TurnAction::Attack,
    ),
    Rule::sometimes("break turtle", opponent_turtling, 0.7, TurnAction::Attack),
    Rule::sometimes("brace for charge", opponent_charged, 0.6, TurnAction::Barrier),
    Rule::sometimes("cash in charge", self_charged, 0.8, TurnAction::Attack),
    Rule::always("refuel", mana_below_two, TurnAction::Charge),
    Rule::sometimes("pressure", can_attack, 0.55, TurnAction::Attack),
];

static HARD_RULES: [TurnRule; 9] = [
    Rule::always("out of mana", out_of_mana, TurnAction::Charge),
    Rule::always("critical life", low_and_can_guard, TurnAction::Barrier),
    Rule::always("charged finisher", opponent_at_one_and_charged, TurnAction::Attack),
    Rule::either(
        "go for the kill",
        opponent_at_one,
        0.7,
        TurnAction::Attack,
        TurnAction::Barrier,
    ),
    Rule::sometimes("break turtle", opponent_turtling, 0.85, TurnAction::Attack),
    Rule::sometimes("brace for charge", opponent_charged, 0.75, TurnAction::Barrier),
    Rule::sometimes("cash in charge", self_charged, 0.9, TurnAction::Attack),
    Rule::always("refuel", mana_below_two, TurnAction::Charge),
    Rule::sometimes("press advantage", healthier_than_opponent, 0.7, TurnAction::Attack),
];

const NORMAL_FALLBACK: Fallback = Fallback::Prefer(&[TurnAction::Barrier]);
const HARD_FALLBACK: Fallback =
    Fallback::Pattern(&[TurnAction::Attack, TurnAction::Attack, TurnAction::Barrier]);

/// Turn-based bot policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Policy {
    difficulty: Difficulty,
}

impl Policy {
    /// Creates a policy for a difficulty.
    #[must_use]
    pub const fn new(difficulty: Difficulty) -> Self {
        Self { difficulty }
    }

    /// The policy's difficulty.
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Rule list for this difficulty.
    #[must_use]
    pub fn rules(&self) -> &'static [TurnRule] {
        match self.difficulty {
            Difficulty::Easy => &[],
            Difficulty::Normal => &NORMAL_RULES,
            Difficulty::Hard => &HARD_RULES,
        }
    }

    /// Terminal choice for this difficulty.
    #[must_use]
    pub const fn fallback(&self) -> Fallback {
        match self.difficulty {
            Difficulty::Easy => Fallback::Uniform,
            Difficulty::Normal => NORMAL_FALLBACK,
            Difficulty::Hard => HARD_FALLBACK,
        }
    }

    /// Chooses the next action for `me` against `opponent`.
    ///
    /// The result is always legal for `me`, except that an empty legal set
    /// degrades to Charge.
    pub fn decide<R: RandomSource + ?Sized>(
        &self,
        me: &CombatantState,
        opponent: &CombatantState,
        rng: &mut R,
    ) -> TurnAction {
        let observation = Observation::new(me, opponent);
        if observation.legal.is_empty() {
            return TurnAction::Charge;
        }

        run_cascade(self.rules(), &observation, rng)
            .or_else(|| self.fallback().pick(observation.legal, rng))
            .unwrap_or(TurnAction::Charge)
    }
}

// ============================================================================
// Tests
// ============================================================================
