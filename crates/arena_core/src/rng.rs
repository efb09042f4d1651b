//! Seedable randomness seam.
//!
//! Every random decision in the core (weapon draw, name draw, bracket
//! shuffle, hit roll, ad revenue) goes through [`RandomSource`]. Any
//! [`rand::Rng`] qualifies; [`SeededRng`] is the production source.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Production random source.
pub type SeededRng = ChaCha8Rng;

/// Build the production random source from a seed.
#[must_use]
pub fn seeded(seed: u64) -> SeededRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Source of the random decisions the simulation makes.
pub trait RandomSource {
    /// Uniform roll in `0..100`.
    fn roll_percent(&mut self) -> u32;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Uniform in `low..=high`.
    fn roll_between(&mut self, low: u64, high: u64) -> u64;

    /// Uniformly permute `items` in place.
    fn shuffle<T>(&mut self, items: &mut [T]);
}

impl<R: Rng> RandomSource for R {
    fn roll_percent(&mut self) -> u32 {
        self.gen_range(0..100)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }

    fn roll_between(&mut self, low: u64, high: u64) -> u64 {
        self.gen_range(low..=high)
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(self);
    }
}

/// Draw `count` distinct indices from `0..len` (partial Fisher-Yates).
pub(crate) fn sample_indices<D: RandomSource>(dice: &mut D, len: usize, count: usize) -> Vec<usize> {
    let mut pool: Vec<usize> = (0..len).collect();
    let count = count.min(len);
    for i in 0..count {
        let j = i + dice.pick_index(len - i);
        pool.swap(i, j);
    }
    pool.truncate(count);
    pool
}

#[cfg(test)]
pub(crate) mod test_dice {
    use super::RandomSource;

    /// Scripted dice for unit tests: cycles through fixed percent rolls,
    /// always picks index 0 and leaves slices in order.
    #[derive(Debug, Clone)]
    pub struct ScriptedDice {
        rolls: Vec<u32>,
        cursor: usize,
    }

    impl ScriptedDice {
        pub fn new(rolls: Vec<u32>) -> Self {
            Self { rolls, cursor: 0 }
        }

        pub fn always(roll: u32) -> Self {
            Self::new(vec![roll])
        }
    }

    impl RandomSource for ScriptedDice {
        fn roll_percent(&mut self) -> u32 {
            let roll = self.rolls[self.cursor % self.rolls.len()];
            self.cursor += 1;
            roll
        }

        fn pick_index(&mut self, _len: usize) -> usize {
            0
        }

        fn roll_between(&mut self, low: u64, _high: u64) -> u64 {
            low
        }

        fn shuffle<T>(&mut self, _items: &mut [T]) {}
    }
}
