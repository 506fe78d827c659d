use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Deck exhausted: {requested} card(s) requested, {remaining} remaining")]
    DeckExhausted { requested: usize, remaining: usize },
    #[error("Invalid hold position {index}, a hand has {size} cards")]
    InvalidHold { index: usize, size: usize },
    #[error("Weights must be finite, non-negative and sum to more than zero")]
    InvalidWeights,
    #[error("Invalid dice: {0:?}")]
    InvalidDice(Vec<u8>),
}
