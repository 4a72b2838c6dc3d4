//! Rule constants shared across the engine.

/// Number of cards in a standard deck.
pub const DECK_SIZE: usize = 52;

/// Cards dealt to each participant at the start of a round.
pub const INITIAL_HAND_SIZE: usize = 2;

/// Highest hand value that is not a bust.
pub const BUST_THRESHOLD: u16 = 21;

/// The dealer stands at this value or above and hits below it.
pub const DEALER_STAND_VALUE: u16 = 17;

/// Amount subtracted when an ace is re-counted from 11 down to 1.
pub const ACE_ADJUSTMENT: u16 = 10;

/// Placeholder shown for the dealer's hole card while it is face down.
pub const HIDDEN_CARD: &str = "[hidden]";
