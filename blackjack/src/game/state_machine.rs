//! The round state machine: player turn, dealer turn, outcome resolution.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt};
use thiserror::Error;

use super::constants::{
    BUST_THRESHOLD, DEALER_STAND_VALUE, DECK_SIZE, HIDDEN_CARD, INITIAL_HAND_SIZE,
};
use super::entities::{Card, Deck, Hand};

/// Errors that can occur during a round.
///
/// Both conditions are local and recoverable: a rejected operation leaves the
/// round unchanged and the caller decides whether to reset or retry.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("no cards left in the deck")]
    DeckExhausted,
    #[error("invalid action for the current phase")]
    InvalidAction,
    #[error("corrupt round state: {0}")]
    CorruptState(String),
}

/// A decision available to the player during their turn.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerAction {
    Hit,
    Stand,
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Hit => "hit",
            Self::Stand => "stand",
        };
        write!(f, "{repr}")
    }
}

/// Lifecycle phase of a round.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Phase {
    PlayerTurn,
    DealerTurn,
    Resolved,
}

/// Winner of a resolved round.
///
/// There is no push variant: the dealer wins all ties by design, so a tie
/// outcome is unrepresentable.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Outcome {
    PlayerWins,
    DealerWins,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::PlayerWins => "player wins",
            Self::DealerWins => "dealer wins",
        };
        write!(f, "{repr}")
    }
}

/// One round of blackjack: the deck, both hands, and the current phase.
///
/// A round is created with a fresh deck and a 2+2 deal, mutated only by
/// drawing during the two turn phases, and frozen once resolved. Adapters
/// that persist a round across requests should call [`Round::validate`] after
/// deserializing it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Round {
    deck: Deck,
    player: Hand,
    dealer: Hand,
    phase: Phase,
}

impl Round {
    /// Starts a round with a freshly shuffled deck.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DeckExhausted`] if the initial deal cannot
    /// complete, which cannot happen with a full deck.
    pub fn start<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, GameError> {
        Self::with_deck(Deck::shuffled_with(rng))
    }

    /// Starts a round dealing from a caller-supplied deck. Used by adapters
    /// that seed their own RNG and by tests that rig the draw order.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DeckExhausted`] if the deck holds fewer than four
    /// cards.
    pub fn with_deck(mut deck: Deck) -> Result<Self, GameError> {
        let mut player = Hand::new();
        let mut dealer = Hand::new();
        for _ in 0..INITIAL_HAND_SIZE {
            player.push(deck.draw()?);
        }
        for _ in 0..INITIAL_HAND_SIZE {
            dealer.push(deck.draw()?);
        }
        debug!(
            "round started: player {} ({}), dealer shows {}",
            player,
            player.value(),
            dealer.cards()[0],
        );
        Ok(Self {
            deck,
            player,
            dealer,
            phase: Phase::PlayerTurn,
        })
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn player(&self) -> &Hand {
        &self.player
    }

    #[must_use]
    pub fn dealer(&self) -> &Hand {
        &self.dealer
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Applies a player decision. Hitting into a bust resolves the round
    /// immediately and the dealer turn is skipped; callers should check
    /// [`Round::phase`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidAction`] outside the player turn and
    /// [`GameError::DeckExhausted`] if there is nothing left to draw. The
    /// round is unchanged on error.
    pub fn apply_player_action(&mut self, action: PlayerAction) -> Result<(), GameError> {
        if self.phase != Phase::PlayerTurn {
            return Err(GameError::InvalidAction);
        }
        match action {
            PlayerAction::Hit => {
                let card = self.deck.draw()?;
                self.player.push(card);
                debug!("player drew {card}, hand value {}", self.player.value());
                if self.player.is_busted() {
                    self.phase = Phase::Resolved;
                }
            }
            PlayerAction::Stand => {
                self.phase = Phase::DealerTurn;
            }
        }
        Ok(())
    }

    /// Runs the dealer's deterministic policy to completion: hit at 16 or
    /// below, stand at 17 or above. Bust values also stop the loop since they
    /// exceed 17. Resolves the round afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidAction`] outside the dealer turn and
    /// [`GameError::DeckExhausted`] if the deck runs dry mid-policy.
    pub fn advance_dealer(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::DealerTurn {
            return Err(GameError::InvalidAction);
        }
        while self.dealer.value() < DEALER_STAND_VALUE {
            let card = self.deck.draw()?;
            self.dealer.push(card);
            debug!("dealer drew {card}, hand value {}", self.dealer.value());
        }
        self.phase = Phase::Resolved;
        Ok(())
    }

    /// Winner of the round. Player busts lose, dealer busts win for the
    /// player, and the dealer wins all ties.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidAction`] until the round is resolved.
    pub fn outcome(&self) -> Result<Outcome, GameError> {
        if self.phase != Phase::Resolved {
            return Err(GameError::InvalidAction);
        }
        let player = self.player.value();
        let dealer = self.dealer.value();
        let outcome = if player > BUST_THRESHOLD {
            Outcome::DealerWins
        } else if dealer > BUST_THRESHOLD {
            Outcome::PlayerWins
        } else if player > dealer {
            Outcome::PlayerWins
        } else {
            // Dealer wins ties as well as higher values.
            Outcome::DealerWins
        };
        Ok(outcome)
    }

    /// Value of the dealer's up card alone, shown while the hole card is
    /// face down.
    #[must_use]
    pub fn visible_dealer_value(&self) -> u16 {
        self.dealer.cards().first().map_or(0, |c| c.0.base_value())
    }

    #[must_use]
    pub fn render_player_hand(&self) -> String {
        self.player.to_string()
    }

    /// Renders the dealer hand. With `reveal_hole` false, every card but the
    /// first is masked; used while the phase is [`Phase::PlayerTurn`].
    #[must_use]
    pub fn render_dealer_hand(&self, reveal_hole: bool) -> String {
        if reveal_hole {
            return self.dealer.to_string();
        }
        let mut cards = self.dealer.cards().iter();
        let mut repr = cards.next().map(Card::to_string).unwrap_or_default();
        for _ in cards {
            repr.push(' ');
            repr.push_str(HIDDEN_CARD);
        }
        repr
    }

    /// Checks the round's structural invariants. Applied after deserializing
    /// persisted session state, before mutating it.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::CorruptState`] if the cards in play are not a
    /// subset of the 52-card set, the deal is incomplete, or the phase is
    /// inconsistent with a busted player hand.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.deck.len() + self.player.len() + self.dealer.len() > DECK_SIZE {
            return Err(GameError::CorruptState(
                "more than 52 cards in play".to_string(),
            ));
        }
        let mut seen = BTreeSet::new();
        let cards = self
            .deck
            .cards()
            .iter()
            .chain(self.player.cards())
            .chain(self.dealer.cards());
        for card in cards {
            if !seen.insert(card) {
                return Err(GameError::CorruptState(format!("duplicate card {card}")));
            }
        }
        if self.player.len() < INITIAL_HAND_SIZE || self.dealer.len() < INITIAL_HAND_SIZE {
            return Err(GameError::CorruptState(
                "hands are not fully dealt".to_string(),
            ));
        }
        if self.phase != Phase::Resolved && self.player.is_busted() {
            return Err(GameError::CorruptState(
                "busted player hand in an unresolved round".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::{Rank, Suit};

    // Builds a deck whose draws come out in the listed order.
    fn rigged(draw_order: &[(Rank, Suit)]) -> Deck {
        let mut cards: Vec<Card> = draw_order.iter().map(|&(r, s)| Card(r, s)).collect();
        cards.reverse();
        Deck::from(cards)
    }

    fn resolved_round(player: &[(Rank, Suit)], dealer: &[(Rank, Suit)]) -> Round {
        Round {
            deck: Deck::from(Vec::new()),
            player: Hand::from(player.iter().map(|&(r, s)| Card(r, s)).collect::<Vec<_>>()),
            dealer: Hand::from(dealer.iter().map(|&(r, s)| Card(r, s)).collect::<Vec<_>>()),
            phase: Phase::Resolved,
        }
    }

    #[test]
    fn start_deals_two_cards_each() {
        let round = Round::with_deck(Deck::ordered()).unwrap();
        assert_eq!(round.phase(), Phase::PlayerTurn);
        assert_eq!(round.player().len(), 2);
        assert_eq!(round.dealer().len(), 2);
        assert_eq!(round.deck().len(), 48);
    }

    #[test]
    fn start_fails_on_a_short_deck() {
        let deck = rigged(&[(Rank::Two, Suit::Club), (Rank::Three, Suit::Club)]);
        assert_eq!(Round::with_deck(deck), Err(GameError::DeckExhausted));
    }

    #[test]
    fn stand_moves_to_dealer_turn() {
        let mut round = Round::with_deck(Deck::ordered()).unwrap();
        round.apply_player_action(PlayerAction::Stand).unwrap();
        assert_eq!(round.phase(), Phase::DealerTurn);
    }

    #[test]
    fn hit_into_bust_resolves_immediately() {
        // Player: 10 + 9, then hits into a king for 29.
        let deck = rigged(&[
            (Rank::Ten, Suit::Club),
            (Rank::Nine, Suit::Club),
            (Rank::Six, Suit::Heart),
            (Rank::Nine, Suit::Heart),
            (Rank::King, Suit::Spade),
        ]);
        let mut round = Round::with_deck(deck).unwrap();
        round.apply_player_action(PlayerAction::Hit).unwrap();
        assert_eq!(round.phase(), Phase::Resolved);
        assert_eq!(round.outcome(), Ok(Outcome::DealerWins));
        // The round is frozen: no more hits.
        assert_eq!(
            round.apply_player_action(PlayerAction::Hit),
            Err(GameError::InvalidAction)
        );
    }

    #[test]
    fn dealer_draws_to_seventeen_or_above() {
        // Dealer: 6 + 9 = 15, must hit, draws a 2 for 17, then stands.
        let deck = rigged(&[
            (Rank::Ten, Suit::Club),
            (Rank::Nine, Suit::Club),
            (Rank::Six, Suit::Heart),
            (Rank::Nine, Suit::Heart),
            (Rank::Two, Suit::Spade),
        ]);
        let mut round = Round::with_deck(deck).unwrap();
        round.apply_player_action(PlayerAction::Stand).unwrap();
        round.advance_dealer().unwrap();
        assert_eq!(round.dealer().len(), 3);
        assert!(round.dealer().value() >= DEALER_STAND_VALUE);
        assert_eq!(round.dealer().value(), 17);
    }

    #[test]
    fn dealer_bust_also_stops_the_loop() {
        // Dealer: 10 + 6 = 16, hits into a king for 26.
        let deck = rigged(&[
            (Rank::Ten, Suit::Club),
            (Rank::Nine, Suit::Club),
            (Rank::Ten, Suit::Heart),
            (Rank::Six, Suit::Heart),
            (Rank::King, Suit::Spade),
        ]);
        let mut round = Round::with_deck(deck).unwrap();
        round.apply_player_action(PlayerAction::Stand).unwrap();
        round.advance_dealer().unwrap();
        assert!(round.dealer().is_busted());
        assert_eq!(round.outcome(), Ok(Outcome::PlayerWins));
    }

    #[test]
    fn advance_dealer_is_rejected_outside_dealer_turn() {
        let mut round = Round::with_deck(Deck::ordered()).unwrap();
        assert_eq!(round.advance_dealer(), Err(GameError::InvalidAction));
    }

    #[test]
    fn outcome_is_rejected_until_resolved() {
        let round = Round::with_deck(Deck::ordered()).unwrap();
        assert_eq!(round.outcome(), Err(GameError::InvalidAction));
    }

    #[test]
    fn rejected_action_leaves_the_round_unchanged() {
        let mut round = Round::with_deck(Deck::ordered()).unwrap();
        round.apply_player_action(PlayerAction::Stand).unwrap();
        let snapshot = round.clone();
        assert_eq!(
            round.apply_player_action(PlayerAction::Hit),
            Err(GameError::InvalidAction)
        );
        assert_eq!(round, snapshot);
    }

    #[test]
    fn dealer_wins_exact_ties() {
        let round = resolved_round(
            &[(Rank::King, Suit::Club), (Rank::Ace, Suit::Club)],
            &[(Rank::King, Suit::Heart), (Rank::Ace, Suit::Heart)],
        );
        assert_eq!(round.outcome(), Ok(Outcome::DealerWins));
    }

    #[test]
    fn player_bust_loses_even_against_a_lower_dealer_value() {
        let round = resolved_round(
            &[
                (Rank::King, Suit::Club),
                (Rank::Queen, Suit::Club),
                (Rank::Two, Suit::Club),
            ],
            &[(Rank::King, Suit::Heart), (Rank::Queen, Suit::Heart)],
        );
        assert_eq!(round.outcome(), Ok(Outcome::DealerWins));
    }

    #[test]
    fn dealer_bust_loses_to_a_standing_player() {
        let round = resolved_round(
            &[(Rank::King, Suit::Club), (Rank::Queen, Suit::Club)],
            &[
                (Rank::King, Suit::Heart),
                (Rank::Queen, Suit::Heart),
                (Rank::Two, Suit::Heart),
            ],
        );
        assert_eq!(round.outcome(), Ok(Outcome::PlayerWins));
    }

    #[test]
    fn higher_player_value_wins() {
        let round = resolved_round(
            &[(Rank::Ten, Suit::Club), (Rank::Nine, Suit::Club)],
            &[(Rank::Ten, Suit::Heart), (Rank::Eight, Suit::Heart)],
        );
        assert_eq!(round.outcome(), Ok(Outcome::PlayerWins));
    }

    #[test]
    fn hole_card_is_masked_until_revealed() {
        let deck = rigged(&[
            (Rank::Ten, Suit::Club),
            (Rank::Nine, Suit::Club),
            (Rank::Six, Suit::Heart),
            (Rank::Nine, Suit::Heart),
        ]);
        let round = Round::with_deck(deck).unwrap();
        assert_eq!(round.render_dealer_hand(false), "6♥ [hidden]");
        assert_eq!(round.render_dealer_hand(true), "6♥ 9♥");
        assert_eq!(round.visible_dealer_value(), 6);
        assert_eq!(round.render_player_hand(), "10♣ 9♣");
    }

    #[test]
    fn validate_accepts_a_fresh_round() {
        let round = Round::with_deck(Deck::ordered()).unwrap();
        round.validate().unwrap();
    }

    #[test]
    fn validate_rejects_duplicate_cards() {
        let round = resolved_round(
            &[(Rank::King, Suit::Club), (Rank::King, Suit::Club)],
            &[(Rank::King, Suit::Heart), (Rank::Queen, Suit::Heart)],
        );
        assert!(matches!(
            round.validate(),
            Err(GameError::CorruptState(_))
        ));
    }

    #[test]
    fn validate_rejects_an_incomplete_deal() {
        let round = resolved_round(
            &[(Rank::King, Suit::Club)],
            &[(Rank::King, Suit::Heart), (Rank::Queen, Suit::Heart)],
        );
        assert!(matches!(
            round.validate(),
            Err(GameError::CorruptState(_))
        ));
    }

    #[test]
    fn validate_rejects_an_unresolved_bust() {
        let mut round = resolved_round(
            &[
                (Rank::King, Suit::Club),
                (Rank::Queen, Suit::Club),
                (Rank::Five, Suit::Club),
            ],
            &[(Rank::King, Suit::Heart), (Rank::Queen, Suit::Heart)],
        );
        round.phase = Phase::PlayerTurn;
        assert!(matches!(
            round.validate(),
            Err(GameError::CorruptState(_))
        ));
    }

    #[test]
    fn pathological_hitting_exhausts_the_deck_loudly() {
        // 48 cards remain after the deal; the 49th hit must fail cleanly.
        let mut round = Round::with_deck(Deck::ordered()).unwrap();
        loop {
            // An all-low rigged deck would be fairer, but the ordered deck
            // busts quickly; reset the phase to keep hitting.
            match round.apply_player_action(PlayerAction::Hit) {
                Ok(()) => {
                    if round.phase == Phase::Resolved {
                        round.phase = Phase::PlayerTurn;
                    }
                }
                Err(err) => {
                    assert_eq!(err, GameError::DeckExhausted);
                    break;
                }
            }
        }
        assert!(round.deck().is_empty());
        assert_eq!(round.player().len(), 50);
    }
}
