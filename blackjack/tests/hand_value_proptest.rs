//! Property-based tests for hand scoring using proptest.
//!
//! These verify the ace soft/hard adjustment across arbitrary card sequences,
//! not just the handful of hands the unit tests pin down.

use blackjack::{BUST_THRESHOLD, Card, Hand, Rank, Suit};
use proptest::prelude::*;

fn card_strategy() -> impl Strategy<Value = Card> {
    (0usize..13, 0usize..4).prop_map(|(rank_idx, suit_idx)| {
        Card(Rank::ALL[rank_idx], Suit::ALL[suit_idx])
    })
}

// Scoring accepts arbitrary sequences; duplicates are deliberately allowed
// since value() has no single-deck precondition.
fn cards_strategy(max: usize) -> impl Strategy<Value = Vec<Card>> {
    prop::collection::vec(card_strategy(), 1..=max)
}

fn hand_and_permutation() -> impl Strategy<Value = (Vec<Card>, Vec<Card>)> {
    cards_strategy(10).prop_flat_map(|cards| {
        let original = cards.clone();
        Just(cards)
            .prop_shuffle()
            .prop_map(move |shuffled| (original.clone(), shuffled))
    })
}

/// Hard total with every ace counted as 1.
fn hard_total(cards: &[Card]) -> u16 {
    cards
        .iter()
        .map(|Card(rank, _)| if *rank == Rank::Ace { 1 } else { rank.base_value() })
        .sum()
}

fn ace_count(cards: &[Card]) -> u16 {
    cards.iter().filter(|Card(rank, _)| *rank == Rank::Ace).count() as u16
}

proptest! {
    #[test]
    fn value_is_invariant_under_reordering((original, shuffled) in hand_and_permutation()) {
        let a = Hand::from(original).value();
        let b = Hand::from(shuffled).value();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn value_is_deterministic(cards in cards_strategy(12)) {
        let hand = Hand::from(cards);
        prop_assert_eq!(hand.value(), hand.value());
    }

    #[test]
    fn value_stays_within_the_soft_hard_envelope(cards in cards_strategy(12)) {
        let hard = hard_total(&cards);
        let aces = ace_count(&cards);
        let value = Hand::from(cards).value();

        // Each ace contributes either 1 or 11, nothing else.
        prop_assert!(value >= hard);
        prop_assert!(value <= hard + 10 * aces);
        prop_assert_eq!((value - hard) % 10, 0);
    }

    #[test]
    fn value_busts_exactly_when_the_hard_total_busts(cards in cards_strategy(12)) {
        let hard = hard_total(&cards);
        let value = Hand::from(cards).value();
        prop_assert_eq!(value > BUST_THRESHOLD, hard > BUST_THRESHOLD);
        // A genuine bust is reported as the minimal possible total.
        if hard > BUST_THRESHOLD {
            prop_assert_eq!(value, hard);
        }
    }

    #[test]
    fn value_is_maximal_within_the_threshold(cards in cards_strategy(12)) {
        let value = Hand::from(cards.clone()).value();
        if value <= BUST_THRESHOLD {
            // Promoting one more ace from 1 to 11 would either be impossible
            // (all aces already soft) or push the total over the threshold.
            let hard = hard_total(&cards);
            let soft_aces = (value - hard) / 10;
            if soft_aces < ace_count(&cards) {
                prop_assert!(value + 10 > BUST_THRESHOLD);
            }
        }
    }
}
