//! Baccarat point totals and the standard third-card tableau.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};
use crate::deck::Deck;
use crate::errors::GameError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Player,
    Banker,
    Tie,
}

/// Ace counts 1, tens and faces 0, everything else its face value.
pub fn point_value(rank: Rank) -> u8 {
    match rank {
        Rank::Ace => 1,
        Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 0,
        other => other.value(),
    }
}

pub fn hand_total(cards: &[Card]) -> u8 {
    cards
        .iter()
        .fold(0, |sum, c| (sum + point_value(c.rank)) % 10)
}

/// An initial two-card total of 8 or 9.
pub fn is_natural(total: u8) -> bool {
    total >= 8
}

pub fn player_draws(player_total: u8) -> bool {
    player_total <= 5
}

/// Banker's third-card decision. `player_third` is the point value of the
/// player's third card, or `None` when the player stood.
pub fn banker_draws(banker_total: u8, player_third: Option<u8>) -> bool {
    let Some(v) = player_third else {
        return banker_total <= 5;
    };
    match banker_total {
        0..=2 => true,
        3 => v != 8,
        4 => (2..=7).contains(&v),
        5 => (4..=7).contains(&v),
        6 => v == 6 || v == 7,
        _ => false,
    }
}

/// A fully played coup: both final hands and the winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coup {
    pub player: Vec<Card>,
    pub banker: Vec<Card>,
    pub player_total: u8,
    pub banker_total: u8,
    pub outcome: Outcome,
}

impl Coup {
    /// Deals player, player, banker, banker, then applies the tableau.
    pub fn deal(deck: &mut Deck) -> Result<Self, GameError> {
        let player = deck.draw_many(2)?;
        let banker = deck.draw_many(2)?;
        Self::play(player, banker, deck)
    }

    pub fn play(
        mut player: Vec<Card>,
        mut banker: Vec<Card>,
        deck: &mut Deck,
    ) -> Result<Self, GameError> {
        let player_initial = hand_total(&player);
        let banker_initial = hand_total(&banker);

        if !is_natural(player_initial) && !is_natural(banker_initial) {
            let mut player_third = None;
            if player_draws(player_initial) {
                let card = deck.draw()?;
                player_third = Some(point_value(card.rank));
                player.push(card);
            }
            if banker_draws(banker_initial, player_third) {
                banker.push(deck.draw()?);
            }
        }

        let player_total = hand_total(&player);
        let banker_total = hand_total(&banker);
        let outcome = match player_total.cmp(&banker_total) {
            std::cmp::Ordering::Greater => Outcome::Player,
            std::cmp::Ordering::Less => Outcome::Banker,
            std::cmp::Ordering::Equal => Outcome::Tie,
        };
        Ok(Self {
            player,
            banker,
            player_total,
            banker_total,
            outcome,
        })
    }
}
