//! Error types for the duel crates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for duel operations.
#[derive(Debug, Error)]
pub enum DuelError {
    /// The requested action is not legal for the combatant right now.
    #[error("{action} cannot be performed: {reason}")]
    Rejected {
        /// Display name of the rejected action
        action: &'static str,
        /// Why it was rejected
        reason: RejectReason,
    },

    /// A turn is already waiting on the bot's reveal.
    #[error("a turn is already being resolved")]
    TurnInProgress,

    /// The match has ended; restart before submitting.
    #[error("the match is over")]
    MatchOver,

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why an action was refused at the selection boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RejectReason {
    /// Not enough mana to pay the cost.
    #[error("not enough mana (need {required}, have {available})")]
    InsufficientMana {
        /// Mana the action costs
        required: u32,
        /// Mana currently held
        available: u32,
    },

    /// Mana is already full, so charging does nothing.
    #[error("mana is already full")]
    ManaFull,

    /// At zero mana the only legal action is Charge.
    #[error("out of mana, only Charge is allowed")]
    ChargeOnly,

    /// The action is still cooling down.
    #[error("on cooldown for {remaining} more ticks")]
    OnCooldown {
        /// Ticks until the action is available again
        remaining: u32,
    },

    /// The action is already in progress.
    #[error("already in progress")]
    AlreadyActive,

    /// The action is not part of the active ruleset.
    #[error("not available in this ruleset")]
    Disabled,
}

/// Configuration loading and saving errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// The config could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(String),

    /// The file was written by an incompatible release.
    #[error("config schema {found} is not readable by {expected}")]
    UnsupportedVersion {
        /// Version recorded in the file
        found: crate::SchemaVersion,
        /// Version this build writes
        expected: crate::SchemaVersion,
    },
}

/// Result type alias for duel operations.
pub type DuelResult<T> = Result<T, DuelError>;
