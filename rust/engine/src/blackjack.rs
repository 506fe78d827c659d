//! Blackjack totals and dealer policy.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};
use crate::deck::Deck;
use crate::errors::GameError;

pub const BLACKJACK: u8 = 21;
pub const DEALER_STANDS_ON: u8 = 17;

/// A hand total. `soft` is set while an ace is still counted as 11.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Total {
    pub value: u8,
    pub soft: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Player natural against a non-natural dealer.
    Blackjack,
    Win,
    Push,
    Loss,
}

pub fn card_value(rank: Rank) -> u8 {
    match rank {
        Rank::Ace => 11,
        Rank::Jack | Rank::Queen | Rank::King => 10,
        other => other.value(),
    }
}

/// Sums the hand with every ace at 11, then re-counts aces as 1 one at a
/// time while the total exceeds 21.
pub fn hand_total(cards: &[Card]) -> Total {
    let mut value: u32 = 0;
    let mut soft_aces = 0;
    for c in cards {
        value += u32::from(card_value(c.rank));
        if c.rank == Rank::Ace {
            soft_aces += 1;
        }
    }
    while value > u32::from(BLACKJACK) && soft_aces > 0 {
        value -= 10;
        soft_aces -= 1;
    }
    Total {
        value: value.min(u32::from(u8::MAX)) as u8,
        soft: soft_aces > 0,
    }
}

/// Exactly two cards totalling 21.
pub fn is_natural(cards: &[Card]) -> bool {
    cards.len() == 2 && hand_total(cards).value == BLACKJACK
}

pub fn is_bust(cards: &[Card]) -> bool {
    hand_total(cards).value > BLACKJACK
}

/// Dealer hits below 17 and stands on any 17, soft or hard.
pub fn dealer_should_hit(total: Total) -> bool {
    total.value < DEALER_STANDS_ON
}

pub fn play_dealer(hand: &mut Vec<Card>, deck: &mut Deck) -> Result<Total, GameError> {
    let mut total = hand_total(hand);
    while dealer_should_hit(total) {
        hand.push(deck.draw()?);
        total = hand_total(hand);
    }
    Ok(total)
}

/// Outcome of the opening deal when either side holds a natural.
pub fn natural_outcome(player: &[Card], dealer: &[Card]) -> Option<Outcome> {
    match (is_natural(player), is_natural(dealer)) {
        (true, true) => Some(Outcome::Push),
        (true, false) => Some(Outcome::Blackjack),
        (false, true) => Some(Outcome::Loss),
        (false, false) => None,
    }
}

/// Outcome once the player stood and the dealer finished drawing.
pub fn settle(player: &[Card], dealer: &[Card]) -> Outcome {
    let p = hand_total(player).value;
    let d = hand_total(dealer).value;
    if p > BLACKJACK {
        Outcome::Loss
    } else if d > BLACKJACK || p > d {
        Outcome::Win
    } else if p < d {
        Outcome::Loss
    } else {
        Outcome::Push
    }
}
