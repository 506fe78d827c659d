use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::errors::GameError;

/// Entropy source shared by every game on a floor.
///
/// A seeded `GameRng` replays the same sequence of shuffles, rolls and
/// draws, which is how tests pin an outcome without scripting a deck.
#[derive(Debug, Clone)]
pub struct GameRng {
    inner: ChaCha20Rng,
    seed: u64,
}

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: ChaCha20Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_entropy() -> Self {
        Self::seeded(rand::random::<u64>())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.inner.random::<f64>()
    }

    /// Uniform index in `[0, n)`. `n` must be non-zero.
    pub fn below(&mut self, n: usize) -> usize {
        self.inner.random_range(0..n)
    }

    pub fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    pub fn roll_die(&mut self) -> u8 {
        self.inner.random_range(1..=6)
    }

    pub fn roll_dice(&mut self, n: usize) -> Vec<u8> {
        (0..n).map(|_| self.roll_die()).collect()
    }

    /// Picks index `i` with probability `weights[i] / sum(weights)`.
    ///
    /// Draws `roll` in `[0, sum)` and walks the cumulative weights; if
    /// floating-point residue leaves the walk unresolved the last index with
    /// a positive weight wins.
    pub fn weighted_choice(&mut self, weights: &[f64]) -> Result<usize, GameError> {
        if weights.is_empty() || weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(GameError::InvalidWeights);
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(GameError::InvalidWeights);
        }
        let roll = self.unit() * total;
        walk_weights(weights, roll).ok_or(GameError::InvalidWeights)
    }

    /// Fisher–Yates: from the last index down to 1, swap with a uniformly
    /// chosen index in `0..=i`.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.inner.random_range(0..=i);
            items.swap(i, j);
        }
    }
}

fn walk_weights(weights: &[f64], mut roll: f64) -> Option<usize> {
    for (i, w) in weights.iter().enumerate() {
        if roll < *w {
            return Some(i);
        }
        roll -= w;
    }
    weights.iter().rposition(|w| *w > 0.0)
}
