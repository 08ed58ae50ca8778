//! # Dukshi Common
//!
//! Common types shared by the Dukshi duel crates:
//! - Seat and match identifiers
//! - Error and rejection types
//! - Schema versions for config and event output
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::version::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Player.opponent(), Side::Bot);
        assert_eq!(Side::Bot.opponent(), Side::Player);
        assert_eq!(Side::Player.opponent().opponent(), Side::Player);
    }

    #[test]
    fn test_match_id_generation() {
        let id1 = MatchId::new();
        let id2 = MatchId::new();
        assert_ne!(id1, id2);
        assert!(id2.raw() > id1.raw());
    }

    #[test]
    fn test_reject_reason_messages() {
        let err = DuelError::Rejected {
            action: "Dukshi",
            reason: RejectReason::InsufficientMana {
                required: 1,
                available: 0,
            },
        };
        assert_eq!(
            err.to_string(),
            "Dukshi cannot be performed: not enough mana (need 1, have 0)"
        );
        assert_eq!(
            RejectReason::OnCooldown { remaining: 12 }.to_string(),
            "on cooldown for 12 more ticks"
        );
    }
}
