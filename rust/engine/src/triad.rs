//! Three-card poker ranking.
//!
//! With three cards a straight is rarer than a flush, so the order differs
//! from five-card poker: High Card < Pair < Flush < Straight < Three of a
//! Kind < Straight Flush.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum TriadRank {
    HighCard = 0,
    Pair = 1,
    Flush = 2,
    Straight = 3,
    ThreeOfAKind = 4,
    StraightFlush = 5,
}

impl TriadRank {
    pub fn label(self) -> &'static str {
        match self {
            TriadRank::HighCard => "High Card",
            TriadRank::Pair => "Pair",
            TriadRank::Flush => "Flush",
            TriadRank::Straight => "Straight",
            TriadRank::ThreeOfAKind => "Three of a Kind",
            TriadRank::StraightFlush => "Straight Flush",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct TriadHand {
    pub rank: TriadRank,
    pub kickers: [u8; 3],
}

impl Ord for TriadHand {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| self.kickers.cmp(&other.kickers))
    }
}

impl PartialOrd for TriadHand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub fn evaluate_three(cards: &[Card; 3]) -> TriadHand {
    let mut values = [
        cards[0].rank.value(),
        cards[1].rank.value(),
        cards[2].rank.value(),
    ];
    values.sort_unstable_by(|a, b| b.cmp(a));

    let flush = cards[0].suit == cards[1].suit && cards[1].suit == cards[2].suit;
    let wheel = values == [14, 3, 2];
    let straight =
        wheel || (values[0] == values[1] + 1 && values[1] == values[2] + 1);
    // A-2-3 plays as a 3-high straight
    let straight_kickers = if wheel { [3, 2, 1] } else { values };

    if straight && flush {
        return TriadHand {
            rank: TriadRank::StraightFlush,
            kickers: straight_kickers,
        };
    }
    if values[0] == values[2] {
        return TriadHand {
            rank: TriadRank::ThreeOfAKind,
            kickers: values,
        };
    }
    if straight {
        return TriadHand {
            rank: TriadRank::Straight,
            kickers: straight_kickers,
        };
    }
    if flush {
        return TriadHand {
            rank: TriadRank::Flush,
            kickers: values,
        };
    }
    if values[0] == values[1] || values[1] == values[2] {
        let (pair, kicker) = if values[0] == values[1] {
            (values[0], values[2])
        } else {
            (values[1], values[0])
        };
        return TriadHand {
            rank: TriadRank::Pair,
            kickers: [pair, pair, kicker],
        };
    }
    TriadHand {
        rank: TriadRank::HighCard,
        kickers: values,
    }
}

/// A dealer plays only with Queen-high or better.
pub fn dealer_qualifies(hand: &TriadHand) -> bool {
    hand.rank > TriadRank::HighCard || hand.kickers[0] >= Rank::Queen.value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit as S;

    fn c(r: Rank, s: S) -> Card {
        Card::new(r, s)
    }

    #[test]
    fn straight_outranks_flush() {
        let straight = evaluate_three(&[
            c(Rank::Four, S::Clubs),
            c(Rank::Five, S::Hearts),
            c(Rank::Six, S::Spades),
        ]);
        let flush = evaluate_three(&[
            c(Rank::Ace, S::Hearts),
            c(Rank::Nine, S::Hearts),
            c(Rank::Two, S::Hearts),
        ]);
        assert_eq!(straight.rank, TriadRank::Straight);
        assert_eq!(flush.rank, TriadRank::Flush);
        assert!(straight > flush);
    }

    #[test]
    fn ace_two_three_is_lowest_straight() {
        let wheel = evaluate_three(&[
            c(Rank::Ace, S::Clubs),
            c(Rank::Two, S::Hearts),
            c(Rank::Three, S::Spades),
        ]);
        let two_three_four = evaluate_three(&[
            c(Rank::Two, S::Clubs),
            c(Rank::Three, S::Hearts),
            c(Rank::Four, S::Spades),
        ]);
        assert_eq!(wheel.rank, TriadRank::Straight);
        assert_eq!(wheel.kickers, [3, 2, 1]);
        assert!(two_three_four > wheel);
    }

    #[test]
    fn pair_kicker_breaks_ties() {
        let low_kicker = evaluate_three(&[
            c(Rank::Nine, S::Clubs),
            c(Rank::Nine, S::Hearts),
            c(Rank::Two, S::Spades),
        ]);
        let high_kicker = evaluate_three(&[
            c(Rank::Nine, S::Diamonds),
            c(Rank::Nine, S::Spades),
            c(Rank::King, S::Clubs),
        ]);
        assert_eq!(low_kicker.rank, TriadRank::Pair);
        assert!(high_kicker > low_kicker);
    }

    #[test]
    fn dealer_needs_queen_high() {
        let jack_high = evaluate_three(&[
            c(Rank::Jack, S::Clubs),
            c(Rank::Eight, S::Hearts),
            c(Rank::Two, S::Spades),
        ]);
        let queen_high = evaluate_three(&[
            c(Rank::Queen, S::Clubs),
            c(Rank::Eight, S::Hearts),
            c(Rank::Two, S::Spades),
        ]);
        assert!(!dealer_qualifies(&jack_high));
        assert!(dealer_qualifies(&queen_high));
    }
}
