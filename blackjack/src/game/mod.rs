//! Blackjack game engine - cards, scoring, and the round state machine.
//!
//! This module provides the foundational blackjack implementation including:
//! - Card, deck, and hand entities with ace-aware scoring
//! - A three-phase round state machine (player turn, dealer turn, resolved)
//! - Outcome resolution under the dealer-wins-ties rule

// Submodules
pub mod constants;
pub mod entities;

mod state_machine;

pub use state_machine::{GameError, Outcome, Phase, PlayerAction, Round};
