//! The single six-sided die.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lowest face
pub const MIN_ROLL: u8 = 1;

/// Highest face; rolling it lets a piece leave the pool and repeats the turn
pub const MAX_ROLL: u8 = 6;

/// Anything that can produce die rolls for the engine
pub trait DiceSource {
    /// A value in `MIN_ROLL..=MAX_ROLL`
    fn roll(&mut self) -> u8;
}

/// A fair die backed by a seedable RNG
#[derive(Debug, Clone)]
pub struct Dice {
    rng: StdRng,
}

impl Dice {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for Dice {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceSource for Dice {
    fn roll(&mut self) -> u8 {
        self.rng.gen_range(MIN_ROLL..=MAX_ROLL)
    }
}

/// Returns the given values in order, then cycles.
#[derive(Debug, Clone)]
pub struct LoadedDice {
    values: Vec<u8>,
    next: usize,
}

impl LoadedDice {
    /// Dice that roll `values` in a loop. An empty list always rolls
    /// [`MIN_ROLL`].
    pub fn new(values: Vec<u8>) -> Self {
        let values = if values.is_empty() {
            vec![MIN_ROLL]
        } else {
            values
        };
        Self { values, next: 0 }
    }
}

impl DiceSource for LoadedDice {
    fn roll(&mut self) -> u8 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}
