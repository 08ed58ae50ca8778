//! # Dukshi Engine
//!
//! Terminal front-end and headless simulator for the Dukshi duel.
//!
//! - `play`: interactive turn-based duel over stdin/stdout
//! - `sim`: bot-vs-bot series and real-time runs
//! - `output`: text and JSON rendering of events
//! - `timing`: frame clock for wall-clock pacing

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod output;
pub mod play;
pub mod sim;
pub mod timing;
