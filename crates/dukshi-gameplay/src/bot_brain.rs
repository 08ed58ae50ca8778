//! Real-time bot controller.
//!
//! The brain picks an [`Intent`] on a fixed cadence and holds it until the
//! next decision, translating it into a [`FighterInput`] every tick. Presses
//! (swing, block, jump) are only sent on the decision tick; held controls
//! (movement, block, charge) last for the whole interval.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RealtimeRules;
use crate::fighter::{Facing, Fighter, FighterInput};
use crate::policy::{run_cascade, Difficulty, Rule};
use crate::rng::RandomSource;

/// What the bot is trying to do until its next decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Walk toward the opponent.
    Approach,
    /// Back away while facing the opponent.
    Retreat,
    /// Swing.
    Attack,
    /// Heavy swing.
    MegaAttack,
    /// Hold a guard.
    Block,
    /// Stand and charge mana.
    Charge,
    /// Jump; away from a swinging opponent, toward otherwise.
    Jump,
    /// Do nothing.
    Idle,
}

impl Intent {
    /// Every intent.
    pub const ALL: [Self; 8] = [
        Self::Approach,
        Self::Retreat,
        Self::Attack,
        Self::MegaAttack,
        Self::Block,
        Self::Charge,
        Self::Jump,
        Self::Idle,
    ];
}

/// Distance band between the fighters, relative to swing reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceBand {
    /// Inside reach.
    Close,
    /// Inside two and a half reaches.
    Mid,
    /// Further away.
    Far,
}

impl DistanceBand {
    /// Classifies a center-to-center distance.
    #[must_use]
    pub fn classify(distance: f32, rules: &RealtimeRules) -> Self {
        if distance < rules.attack_range {
            Self::Close
        } else if distance < rules.attack_range * 2.5 {
            Self::Mid
        } else {
            Self::Far
        }
    }
}

/// Snapshot the rule tables read.
#[derive(Debug, Clone, Copy)]
pub struct Situation {
    /// The bot's fighter
    pub me: Fighter,
    /// Its opponent
    pub opponent: Fighter,
    /// Distance band
    pub band: DistanceBand,
    /// A regular swing may start now
    pub can_attack: bool,
    /// A mega attack may start now
    pub can_mega: bool,
    /// A block may be raised now
    pub can_block: bool,
}

impl Situation {
    /// Builds a snapshot for `me` facing `opponent`.
    #[must_use]
    pub fn new(me: &Fighter, opponent: &Fighter, rules: &RealtimeRules) -> Self {
        Self {
            me: *me,
            opponent: *opponent,
            band: DistanceBand::classify(me.distance_to(opponent), rules),
            can_attack: me.check_attack(false, rules).is_ok(),
            can_mega: me.check_attack(true, rules).is_ok(),
            can_block: me.check_block().is_ok(),
        }
    }

    /// Whether `intent` can be carried out right now.
    #[must_use]
    pub const fn allows(&self, intent: Intent) -> bool {
        match intent {
            Intent::Attack => self.can_attack,
            Intent::MegaAttack => self.can_mega,
            Intent::Block => self.can_block,
            Intent::Approach | Intent::Retreat | Intent::Charge | Intent::Jump | Intent::Idle => true,
        }
    }

    fn close(&self) -> bool {
        self.band == DistanceBand::Close
    }

    fn far(&self) -> bool {
        self.band == DistanceBand::Far
    }
}

type IntentRule = Rule<Situation, Intent>;

fn enemy_swing_close(s: &Situation) -> bool {
    s.opponent.is_attacking() && s.close() && s.can_block
}

fn enemy_mega_close(s: &Situation) -> bool {
    s.opponent.is_mega_attacking() && s.close()
}

fn dry_and_far(s: &Situation) -> bool {
    s.me.mana() == 0 && s.far()
}

fn dry(s: &Situation) -> bool {
    s.me.mana() == 0
}

fn mega_ready_close(s: &Situation) -> bool {
    s.close() && s.can_mega
}

fn swing_ready_close(s: &Situation) -> bool {
    s.close() && s.can_attack
}

fn low_mana_far(s: &Situation) -> bool {
    s.far() && s.me.mana() < 2
}

fn mid_range(s: &Situation) -> bool {
    s.band == DistanceBand::Mid
}

fn mid_range_with_mana(s: &Situation) -> bool {
    mid_range(s) && s.me.mana() > 0
}

fn not_close(s: &Situation) -> bool {
    !s.close()
}

fn cornered_at_one(s: &Situation) -> bool {
    s.me.health() == 1 && s.close() && !s.can_block
}

fn enemy_charging_at_range(s: &Situation) -> bool {
    s.opponent.is_charging() && !s.close()
}

static NORMAL_RULES: [IntentRule; 8] = [
    Rule::sometimes("block swing", enemy_swing_close, 0.6, Intent::Block),
    Rule::always("recharge", dry_and_far, Intent::Charge),
    Rule::always("disengage", dry, Intent::Retreat),
    Rule::sometimes("mega", mega_ready_close, 0.35, Intent::MegaAttack),
    Rule::sometimes("swing", swing_ready_close, 0.7, Intent::Attack),
    Rule::sometimes("top up", low_mana_far, 0.6, Intent::Charge),
    Rule::sometimes("hop", mid_range, 0.1, Intent::Jump),
    Rule::always("close in", not_close, Intent::Approach),
];

static HARD_RULES: [IntentRule; 11] = [
    Rule::sometimes("evade mega", enemy_mega_close, 0.85, Intent::Jump),
    Rule::sometimes("block swing", enemy_swing_close, 0.85, Intent::Block),
    Rule::sometimes("escape", cornered_at_one, 0.85, Intent::Retreat),
    Rule::always("punish charge", enemy_charging_at_range, Intent::Approach),
    Rule::always("recharge", dry_and_far, Intent::Charge),
    Rule::always("disengage", dry, Intent::Retreat),
    Rule::sometimes("mega", mega_ready_close, 0.6, Intent::MegaAttack),
    Rule::sometimes("swing", swing_ready_close, 0.9, Intent::Attack),
    Rule::sometimes("top up", low_mana_far, 0.85, Intent::Charge),
    Rule::sometimes("hop", mid_range_with_mana, 0.15, Intent::Jump),
    Rule::always("close in", not_close, Intent::Approach),
];

/// Bot controller for one real-time fighter.
#[derive(Debug, Clone)]
pub struct BotBrain {
    difficulty: Difficulty,
    decision_timer: u32,
    intent: Intent,
}

impl BotBrain {
    /// Creates a brain that decides on its first tick.
    #[must_use]
    pub const fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            decision_timer: 0,
            intent: Intent::Idle,
        }
    }

    /// The brain's difficulty.
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Intent currently held.
    #[must_use]
    pub const fn intent(&self) -> Intent {
        self.intent
    }

    /// Forgets the held intent.
    pub fn reset(&mut self) {
        self.decision_timer = 0;
        self.intent = Intent::Idle;
    }

    /// Picks an intent for the current situation.
    pub fn decide<R: RandomSource + ?Sized>(&self, situation: &Situation, rng: &mut R) -> Intent {
        let rules: &[IntentRule] = match self.difficulty {
            Difficulty::Easy => {
                let legal: Vec<Intent> = Intent::ALL
                    .into_iter()
                    .filter(|intent| situation.allows(*intent))
                    .collect();
                return legal
                    .get(rng.pick_index(legal.len()))
                    .copied()
                    .unwrap_or(Intent::Idle);
            },
            Difficulty::Normal => &NORMAL_RULES,
            Difficulty::Hard => &HARD_RULES,
        };
        run_cascade(rules, situation, rng).unwrap_or(Intent::Idle)
    }

    /// Produces this tick's input for `me`.
    pub fn tick<R: RandomSource + ?Sized>(
        &mut self,
        me: &Fighter,
        opponent: &Fighter,
        rules: &RealtimeRules,
        rng: &mut R,
    ) -> FighterInput {
        let fresh = self.decision_timer == 0;
        if fresh {
            let situation = Situation::new(me, opponent, rules);
            self.intent = self.decide(&situation, rng);
            self.decision_timer = self.difficulty.redecision_interval();
            debug!("Bot ({}) now intends {:?}", self.difficulty, self.intent);
        }
        self.decision_timer = self.decision_timer.saturating_sub(1);

        translate(self.intent, me, opponent, fresh)
    }
}

/// Turns an intent into controls for one tick.
#[must_use]
pub fn translate(intent: Intent, me: &Fighter, opponent: &Fighter, fresh: bool) -> FighterInput {
    let toward = if opponent.center_x() >= me.center_x() {
        Facing::Right
    } else {
        Facing::Left
    };
    let toward_step = toward.sign() as i8;

    let mut input = FighterInput {
        face: Some(toward),
        ..FighterInput::default()
    };
    match intent {
        Intent::Approach => input.horizontal = toward_step,
        Intent::Retreat => input.horizontal = -toward_step,
        Intent::Attack => input.attack = fresh,
        Intent::MegaAttack => input.mega_attack = fresh,
        Intent::Block => input.block = true,
        Intent::Charge => input.charge = true,
        Intent::Jump => {
            input.jump = fresh;
            input.horizontal = if opponent.is_attacking() {
                -toward_step
            } else {
                toward_step
            };
        },
        Intent::Idle => {},
    }
    input
}
