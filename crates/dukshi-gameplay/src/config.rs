//! Duel configuration.
//!
//! Tunable rules for both variants plus the bot difficulty. Configuration can
//! be loaded from and saved to a TOML file; a missing or broken file falls
//! back to defaults.

use dukshi_common::{ConfigError, SchemaVersion};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::arena::CollisionResponse;
use crate::policy::Difficulty;

/// Configuration file name.
pub const CONFIG_FILE: &str = "dukshi.toml";

/// Top-level duel configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    /// Layout version of the file
    pub version: SchemaVersion,
    /// Bot difficulty
    pub difficulty: Difficulty,
    /// Seed for all random draws (None = random)
    pub seed: Option<u64>,
    /// Turn-based rules
    pub turn: TurnRules,
    /// Real-time rules
    pub realtime: RealtimeRules,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            version: SchemaVersion::CONFIG,
            difficulty: Difficulty::Normal,
            seed: None,
            turn: TurnRules::default(),
            realtime: RealtimeRules::default(),
        }
    }
}

impl DuelConfig {
    /// Load configuration from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml(&contents) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    config
                },
                Err(e) => {
                    warn!("{e}");
                    Self::default()
                },
            },
            Err(e) => {
                warn!("Failed to read config file: {e}");
                Self::default()
            },
        }
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if !SchemaVersion::CONFIG.can_read(&config.version) {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                expected: SchemaVersion::CONFIG,
            });
        }
        Ok(config)
    }

    /// Serialize configuration to pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> dukshi_common::DuelResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(path, self.to_toml()?)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }
}

// ============================================================================
// Turn-based rules
// ============================================================================

/// Rules for the turn-based duel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnRules {
    /// Maximum (and starting) life
    pub max_life: u32,
    /// Maximum mana
    pub max_mana: u32,
    /// Mana at match start
    pub initial_mana: u32,
    /// Highest charge bonus a combatant can bank
    pub charge_bonus_cap: u32,
    /// Break-through chance added per consecutive barrier
    pub fatigue_step: f32,
    /// Upper bound on break-through chance
    pub fatigue_cap: f32,
    /// Shortest bot "thinking" delay in milliseconds
    pub reveal_delay_min_ms: u64,
    /// Longest bot "thinking" delay in milliseconds
    pub reveal_delay_max_ms: u64,
}

impl Default for TurnRules {
    fn default() -> Self {
        Self {
            max_life: 3,
            max_mana: 3,
            initial_mana: 3,
            charge_bonus_cap: 2,
            fatigue_step: 0.4,
            fatigue_cap: 0.6,
            reveal_delay_min_ms: 800,
            reveal_delay_max_ms: 1200,
        }
    }
}

impl TurnRules {
    /// Shortest reveal delay.
    #[must_use]
    pub fn reveal_delay_min(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_min_ms)
    }

    /// Width of the jitter window added to the shortest delay.
    #[must_use]
    pub fn reveal_jitter(&self) -> Duration {
        Duration::from_millis(
            self.reveal_delay_max_ms
                .saturating_sub(self.reveal_delay_min_ms),
        )
    }
}

// ============================================================================
// Real-time rules
// ============================================================================

/// Rules for the real-time duel. Distances are in pixels, times in ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeRules {
    // === Arena ===
    /// Arena width
    pub arena_width: f32,
    /// Y coordinate of the floor (y grows downward)
    pub ground_y: f32,
    /// Fighter hitbox width
    pub fighter_width: f32,
    /// Fighter hitbox height
    pub fighter_height: f32,
    /// Spawn x of the player (left edge)
    pub player_spawn_x: f32,
    /// Spawn x of the bot (left edge)
    pub bot_spawn_x: f32,

    // === Movement ===
    /// Horizontal speed while a move key is held
    pub move_speed: f32,
    /// Upward speed applied on jump
    pub jump_velocity: f32,
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Horizontal velocity kept per tick without move input
    pub friction: f32,
    /// What happens to velocity when the fighters bump
    pub collision: CollisionResponse,
    /// Fraction of speed kept when bouncing off the other fighter
    pub bounce_damping: f32,

    // === Resources ===
    /// Maximum (and starting) health
    pub max_health: u32,
    /// Maximum mana
    pub max_mana: u32,
    /// Mana at match start
    pub initial_mana: u32,
    /// Ticks of continuous charging per mana point
    pub charge_interval: u32,

    // === Attacks ===
    /// Damage of a regular swing
    pub attack_damage: u32,
    /// Reach of a regular swing (center to center)
    pub attack_range: f32,
    /// Ticks a swing can connect
    pub attack_duration: u32,
    /// Ticks between swings
    pub attack_cooldown: u32,
    /// Whether the mega attack is available
    pub mega_attack_enabled: bool,
    /// Damage multiplier of a mega attack
    pub mega_damage_multiplier: u32,
    /// Reach multiplier of a mega attack
    pub mega_range_multiplier: f32,
    /// Cooldown multiplier of a mega attack
    pub mega_cooldown_multiplier: f32,

    // === Blocking ===
    /// Ticks a block lasts before it drops on its own
    pub max_blocking_time: u32,
    /// Ticks before a block can be raised again
    pub block_cooldown_time: u32,
    /// Fraction of damage that still lands through a block
    pub block_reduction: f32,
}

impl Default for RealtimeRules {
    fn default() -> Self {
        Self {
            arena_width: 800.0,
            ground_y: 350.0,
            fighter_width: 50.0,
            fighter_height: 100.0,
            player_spawn_x: 200.0,
            bot_spawn_x: 550.0,

            move_speed: 5.0,
            jump_velocity: 15.0,
            gravity: 0.8,
            friction: 0.8,
            collision: CollisionResponse::Bounce,
            bounce_damping: 0.5,

            max_health: 3,
            max_mana: 5,
            initial_mana: 2,
            charge_interval: 30,

            attack_damage: 1,
            attack_range: 80.0,
            attack_duration: 15,
            attack_cooldown: 30,
            mega_attack_enabled: true,
            mega_damage_multiplier: 3,
            mega_range_multiplier: 1.5,
            mega_cooldown_multiplier: 1.5,

            max_blocking_time: 60,
            block_cooldown_time: 90,
            block_reduction: 0.4,
        }
    }
}

impl RealtimeRules {
    /// Rules of the early prototype: lighter block reduction, fighters stop
    /// dead on contact, no mega attack.
    #[must_use]
    pub fn early() -> Self {
        Self {
            collision: CollisionResponse::Stop,
            mega_attack_enabled: false,
            block_reduction: 0.3,
            ..Self::default()
        }
    }

    /// Cooldown of a mega attack in ticks.
    #[must_use]
    pub fn mega_cooldown(&self) -> u32 {
        (self.attack_cooldown as f32 * self.mega_cooldown_multiplier).ceil() as u32
    }

    /// Reach of a mega attack.
    #[must_use]
    pub fn mega_range(&self) -> f32 {
        self.attack_range * self.mega_range_multiplier
    }

    /// Damage of a mega attack.
    #[must_use]
    pub fn mega_damage(&self) -> u32 {
        self.attack_damage * self.mega_damage_multiplier
    }

    /// Y coordinate of a grounded fighter's top edge.
    #[must_use]
    pub fn floor_top(&self) -> f32 {
        self.ground_y - self.fighter_height
    }
}

// ============================================================================
// Tests
// ============================================================================
