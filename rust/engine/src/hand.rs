use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cards::{value_label, Card};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::OnePair => "One Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
        }
    }
}

const CATEGORY_WEIGHT: u64 = 100_000_000;
const TIEBREAK_BASE: u64 = 15;

/// Classification of a five-card poker hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandStrength {
    pub category: Category,
    // pattern ranks first, then kickers high -> low; a wheel straight reads [5]
    pub tiebreakers: Vec<u8>,
}

impl HandStrength {
    /// Single comparable number: `category * 10^8 + Σ tb[i] * 15^(5-i)`.
    ///
    /// Tiebreaker values never exceed 14, so the whole tiebreaker sum stays
    /// below 10^8 and the category always dominates.
    pub fn score(&self) -> u64 {
        let mut score = self.category as u64 * CATEGORY_WEIGHT;
        for (i, &v) in self.tiebreakers.iter().enumerate().take(5) {
            score += u64::from(v) * TIEBREAK_BASE.pow(5 - i as u32);
        }
        score
    }

    /// Human-readable description, e.g. `Full House (Ks over 2s)`.
    pub fn describe(&self) -> String {
        let tb = &self.tiebreakers;
        let at = |i: usize| value_label(tb.get(i).copied().unwrap_or(0));
        let list = |from: usize| {
            tb.iter()
                .skip(from)
                .map(|&v| value_label(v))
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self.category {
            Category::StraightFlush => format!("Straight Flush to {}", at(0)),
            Category::FourOfAKind => format!("Four of a Kind ({}s, kicker {})", at(0), at(1)),
            Category::FullHouse => format!("Full House ({}s over {}s)", at(0), at(1)),
            Category::Flush => format!("Flush ({})", list(0)),
            Category::Straight => format!("Straight to {}", at(0)),
            Category::ThreeOfAKind => {
                format!("Three of a Kind ({}s, kickers {})", at(0), list(1))
            }
            Category::TwoPair => {
                format!("Two Pair ({}s & {}s, kicker {})", at(0), at(1), at(2))
            }
            Category::OnePair => format!("Pair of {}s (kickers {})", at(0), list(1)),
            Category::HighCard => format!("High Card ({})", list(0)),
        }
    }
}

pub fn evaluate(cards: &[Card; 5]) -> HandStrength {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    let mut values: Vec<u8> = Vec::with_capacity(5);
    for &c in cards.iter() {
        let r = c.rank.value();
        rank_counts[r as usize] += 1;
        values.push(r);
    }
    values.sort_unstable_by(|a, b| b.cmp(a));

    let flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let straight = detect_straight_high(&rank_counts);

    if let (true, Some(high)) = (flush, straight) {
        return HandStrength {
            category: Category::StraightFlush,
            tiebreakers: vec![high],
        };
    }

    let groups = rank_groups(&rank_counts);
    let (top_rank, top_count) = groups[0];

    if top_count == 4 {
        return HandStrength {
            category: Category::FourOfAKind,
            tiebreakers: vec![top_rank, groups[1].0],
        };
    }
    if top_count == 3 && groups.get(1).map(|g| g.1) == Some(2) {
        return HandStrength {
            category: Category::FullHouse,
            tiebreakers: vec![top_rank, groups[1].0],
        };
    }
    if flush {
        return HandStrength {
            category: Category::Flush,
            tiebreakers: values,
        };
    }
    if let Some(high) = straight {
        return HandStrength {
            category: Category::Straight,
            tiebreakers: vec![high],
        };
    }
    if top_count == 3 {
        let mut tb = vec![top_rank];
        tb.extend(values.iter().copied().filter(|&v| v != top_rank));
        return HandStrength {
            category: Category::ThreeOfAKind,
            tiebreakers: tb,
        };
    }
    if top_count == 2 && groups[1].1 == 2 {
        // groups are sorted by count then rank, so groups[0] holds the higher pair
        let high = groups[0].0;
        let low = groups[1].0;
        return HandStrength {
            category: Category::TwoPair,
            tiebreakers: vec![high, low, groups[2].0],
        };
    }
    if top_count == 2 {
        let mut tb = vec![top_rank];
        tb.extend(values.iter().copied().filter(|&v| v != top_rank));
        return HandStrength {
            category: Category::OnePair,
            tiebreakers: tb,
        };
    }

    HandStrength {
        category: Category::HighCard,
        tiebreakers: values,
    }
}

pub fn compare_hands(a: &HandStrength, b: &HandStrength) -> Ordering {
    a.score().cmp(&b.score())
}

/// Indices of every hand sharing the best score. Empty input yields no winners.
pub fn winners(hands: &[HandStrength]) -> Vec<usize> {
    let Some(best) = hands.iter().map(HandStrength::score).max() else {
        return Vec::new();
    };
    hands
        .iter()
        .enumerate()
        .filter(|(_, h)| h.score() == best)
        .map(|(i, _)| i)
        .collect()
}

/// (rank, count) pairs ordered by count, then rank, both descending.
fn rank_groups(rank_counts: &[u8; 15]) -> Vec<(u8, u8)> {
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .filter(|&r| rank_counts[r as usize] > 0)
        .map(|r| (r, rank_counts[r as usize]))
        .collect();
    groups.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
    groups
}

/// High card of a five-distinct-rank straight; the wheel A-2-3-4-5 reads as 5.
fn detect_straight_high(rank_counts: &[u8; 15]) -> Option<u8> {
    let distinct: Vec<u8> = (2..=14u8)
        .filter(|&r| rank_counts[r as usize] > 0)
        .collect();
    if distinct.len() != 5 {
        return None;
    }
    let (low, high) = (distinct[0], distinct[4]);
    if high - low == 4 {
        return Some(high);
    }
    if distinct == [2, 3, 4, 5, 14] {
        return Some(5);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank as R, Suit as S};

    fn c(r: R, s: S) -> Card {
        Card::new(r, s)
    }

    #[test]
    fn two_pair_orders_pairs_high_first() {
        let hs = evaluate(&[
            c(R::Three, S::Clubs),
            c(R::Three, S::Hearts),
            c(R::Jack, S::Spades),
            c(R::Jack, S::Diamonds),
            c(R::Nine, S::Clubs),
        ]);
        assert_eq!(hs.category, Category::TwoPair);
        assert_eq!(hs.tiebreakers, vec![11, 3, 9]);
        assert_eq!(hs.describe(), "Two Pair (Js & 3s, kicker 9)");
    }

    #[test]
    fn score_matches_formula() {
        let hs = HandStrength {
            category: Category::OnePair,
            tiebreakers: vec![9, 14, 7, 3],
        };
        let expected = 100_000_000 + 9 * 15u64.pow(5) + 14 * 15u64.pow(4) + 7 * 15u64.pow(3)
            + 3 * 15u64.pow(2);
        assert_eq!(hs.score(), expected);
    }

    #[test]
    fn winners_reports_split() {
        let a = HandStrength {
            category: Category::Straight,
            tiebreakers: vec![9],
        };
        let b = HandStrength {
            category: Category::OnePair,
            tiebreakers: vec![14, 13, 12, 11],
        };
        assert_eq!(winners(&[a.clone(), b, a]), vec![0, 2]);
        assert!(winners(&[]).is_empty());
    }
}
