//! # Blackjack
//!
//! A single-deck blackjack (21) game engine implemented as a small, explicit
//! state machine.
//!
//! The core rules are: player versus dealer, dealer hits on 16 or less and
//! stands on 17 or more, aces count as 1 or 11 to best benefit the hand, face
//! cards are worth 10, and the dealer wins all ties. Betting, splitting, and
//! doubling down are out of scope.
//!
//! A round moves through three phases:
//!
//! - **PlayerTurn**: the player hits or stands; busting resolves the round
//!   immediately in the dealer's favor
//! - **DealerTurn**: the dealer draws by fixed policy until reaching 17+
//! - **Resolved**: terminal; the outcome can be read
//!
//! The engine performs no I/O. Console and web front ends drive it through
//! [`Round`] and render hands with its presentation helpers.
//!
//! ## Example
//!
//! ```
//! use blackjack::{Outcome, Phase, PlayerAction, Round};
//!
//! let mut round = Round::start(&mut rand::rng()).unwrap();
//! round.apply_player_action(PlayerAction::Stand).unwrap();
//! round.advance_dealer().unwrap();
//! assert_eq!(round.phase(), Phase::Resolved);
//! let _winner: Outcome = round.outcome().unwrap();
//! ```

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    GameError, Outcome, Phase, PlayerAction, Round,
    constants::{self, BUST_THRESHOLD, DEALER_STAND_VALUE, DECK_SIZE},
    entities::{Card, Deck, Hand, Rank, Suit},
};
