//! # arcade-engine: card, dice and evaluator core
//!
//! Pure game logic for the arcade floor. Nothing here performs I/O,
//! logs, or touches a bankroll; every function takes its entropy from a
//! [`rng::GameRng`] or a caller-supplied [`deck::Deck`].
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and base deck order
//! - [`deck`] - Single-use shoe with Fisher–Yates shuffling
//! - [`rng`] - Seedable ChaCha20 entropy, dice and weighted choice
//! - [`hand`] - Five-card poker classification, scoring and descriptions
//! - [`triad`] - Three-card poker ranking
//! - [`baccarat`] - Point totals and the third-card tableau
//! - [`blackjack`] - Soft-ace totals and dealer policy
//! - [`dice`] - Craps pass-line and cee-lo readings
//! - [`errors`] - Error types for engine operations
//!
//! ## Quick Start
//!
//! ```rust
//! use arcade_engine::cards::{Card, Rank, Suit};
//! use arcade_engine::hand::{evaluate, Category};
//!
//! let royal = [
//!     Card::new(Rank::Ten, Suit::Spades),
//!     Card::new(Rank::Jack, Suit::Spades),
//!     Card::new(Rank::Queen, Suit::Spades),
//!     Card::new(Rank::King, Suit::Spades),
//!     Card::new(Rank::Ace, Suit::Spades),
//! ];
//! let strength = evaluate(&royal);
//! assert_eq!(strength.category, Category::StraightFlush);
//! assert_eq!(strength.describe(), "Straight Flush to A");
//! ```
//!
//! ## Deterministic Play
//!
//! ```rust
//! use arcade_engine::deck::Deck;
//! use arcade_engine::rng::GameRng;
//!
//! let mut a = Deck::shuffled(&mut GameRng::seeded(42));
//! let mut b = Deck::shuffled(&mut GameRng::seeded(42));
//! assert_eq!(a.draw().unwrap(), b.draw().unwrap());
//! ```

pub mod baccarat;
pub mod blackjack;
pub mod cards;
pub mod deck;
pub mod dice;
pub mod errors;
pub mod hand;
pub mod rng;
pub mod triad;

pub use errors::GameError;
