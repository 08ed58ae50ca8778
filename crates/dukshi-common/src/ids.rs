//! Identifier types for duel participants and matches.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for match IDs.
static MATCH_COUNTER: AtomicU64 = AtomicU64::new(1);

/// One of the two seats in a duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The human-controlled side.
    Player,
    /// The policy-controlled side.
    Bot,
}

impl Side {
    /// Returns the other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Bot,
            Self::Bot => Self::Player,
        }
    }

    /// Short label for logs and action readouts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Player => "YOU",
            Self::Bot => "BOT",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Unique identifier for one match.
///
/// A restart allocates a fresh id, so anything scheduled against the old id
/// can be recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchId(u64);

impl MatchId {
    /// Allocates a new unique match ID.
    #[must_use]
    pub fn new() -> Self {
        Self(MATCH_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates a match ID from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "match#{}", self.0)
    }
}
