//! Cards, hands, and the deck.

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::{ACE_ADJUSTMENT, BUST_THRESHOLD, DECK_SIZE};
use super::state_machine::GameError;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
}

impl Suit {
    pub const ALL: [Self; 4] = [Self::Club, Self::Spade, Self::Diamond, Self::Heart];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Spade => "♠",
            Self::Diamond => "♦",
            Self::Heart => "♥",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Self; 13] = [
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Ten,
        Self::Jack,
        Self::Queen,
        Self::King,
        Self::Ace,
    ];

    /// Base scoring value. Aces count as 11 here; [`Hand::value`] lowers them
    /// to 1 as needed to avoid busting.
    #[must_use]
    pub const fn base_value(self) -> u16 {
        match self {
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
            Self::Nine => 9,
            Self::Ten | Self::Jack | Self::Queen | Self::King => 10,
            Self::Ace => 11,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
            Self::Ace => "A",
        };
        write!(f, "{repr}")
    }
}

/// A card is a rank and suit pair. A standard deck contains exactly one of
/// each of the 52 combinations.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Rank, pub Suit);

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.0, self.1)
    }
}

/// An ordered, append-only sequence of cards held by a participant.
///
/// A hand's value is always derived, never stored.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Best value of the hand. Aces are counted as 11, then lowered to 1 one
    /// by one while the total exceeds 21. A bust total is reported as-is so
    /// callers can detect it by threshold comparison. Card order is
    /// irrelevant.
    #[must_use]
    pub fn value(&self) -> u16 {
        let mut value = 0;
        let mut aces = 0;
        for Card(rank, _) in &self.cards {
            value += rank.base_value();
            if *rank == Rank::Ace {
                aces += 1;
            }
        }
        while value > BUST_THRESHOLD && aces > 0 {
            value -= ACE_ADJUSTMENT;
            aces -= 1;
        }
        value
    }

    #[must_use]
    pub fn is_busted(&self) -> bool {
        self.value() > BUST_THRESHOLD
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{card}")?;
        }
        Ok(())
    }
}

impl From<Vec<Card>> for Hand {
    fn from(cards: Vec<Card>) -> Self {
        Self { cards }
    }
}

/// An ordered sequence of cards, mutable only by drawing from the top.
///
/// Cards are stored bottom-to-top, so [`Deck::draw`] pops from the back.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The full 52-card set in deterministic suit-major, rank-minor order.
    #[must_use]
    pub fn ordered() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card(rank, suit));
            }
        }
        Self { cards }
    }

    /// A uniformly random permutation of the 52-card set.
    #[must_use]
    pub fn shuffled_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::ordered();
        deck.cards.shuffle(rng);
        deck
    }

    /// [`Deck::shuffled_with`] over the thread-local RNG.
    #[must_use]
    pub fn shuffled() -> Self {
        Self::shuffled_with(&mut rand::rng())
    }

    /// Removes and returns the top card.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DeckExhausted`] if the deck is empty. Unreachable
    /// within a standard round, but a pathological sequence of hits could get
    /// there, so the condition is checked rather than silently corrupting.
    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::DeckExhausted)
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl From<Vec<Card>> for Deck {
    fn from(cards: Vec<Card>) -> Self {
        Self { cards }
    }
}
