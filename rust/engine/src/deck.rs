use crate::cards::{full_deck, Card};
use crate::errors::GameError;
use crate::rng::GameRng;

/// A single-use 52-card shoe. Built fresh for each round and dropped with it.
///
/// Cards come off the end of the vector, so the last element is the top card.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Unshuffled deck in base order.
    pub fn fresh() -> Self {
        Self { cards: full_deck() }
    }

    pub fn shuffled(rng: &mut GameRng) -> Self {
        let mut deck = Self::fresh();
        deck.shuffle(rng);
        deck
    }

    /// A deck whose draw order is fixed by the caller: the first card in
    /// `draw_order` is drawn first.
    pub fn stacked(mut draw_order: Vec<Card>) -> Self {
        draw_order.reverse();
        Self { cards: draw_order }
    }

    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
    }

    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::DeckExhausted {
            requested: 1,
            remaining: 0,
        })
    }

    pub fn draw_many(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        if n > self.cards.len() {
            return Err(GameError::DeckExhausted {
                requested: n,
                remaining: self.cards.len(),
            });
        }
        Ok((0..n).filter_map(|_| self.cards.pop()).collect())
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
