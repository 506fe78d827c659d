use arcade_engine::GameError;
use thiserror::Error;

use crate::round::{GameId, Tone};

/// User-facing failures of the floor. None of them are fatal: every
/// variant is a rejected request that leaves state untouched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FloorError {
    #[error("Invalid stake: {reason}")]
    InvalidStake { reason: String },
    #[error("Insufficient balance: stake {stake} exceeds {balance} credits")]
    InsufficientBalance { stake: u64, balance: u64 },
    #[error("Illegal action for {game}: {reason}")]
    IllegalAction { game: GameId, reason: String },
    #[error("Invalid option for {game}: {reason}")]
    InvalidOption { game: GameId, reason: String },
    #[error("Floor state lock poisoned")]
    StoragePoisoned,
    #[error(transparent)]
    Game(#[from] GameError),
}

impl FloorError {
    pub fn illegal(game: GameId, reason: impl Into<String>) -> Self {
        FloorError::IllegalAction {
            game,
            reason: reason.into(),
        }
    }

    pub fn option(game: GameId, reason: impl Into<String>) -> Self {
        FloorError::InvalidOption {
            game,
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            FloorError::InvalidStake { .. } => "invalid_stake",
            FloorError::InsufficientBalance { .. } => "insufficient_balance",
            FloorError::IllegalAction { .. } => "illegal_action",
            FloorError::InvalidOption { .. } => "invalid_option",
            FloorError::StoragePoisoned => "storage_poisoned",
            FloorError::Game(_) => "game_error",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            FloorError::IllegalAction { .. } => Tone::Neutral,
            _ => Tone::Negative,
        }
    }
}
