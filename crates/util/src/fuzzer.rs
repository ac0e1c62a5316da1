use rand::seq::SliceRandom;
use rand::{rngs::OsRng, Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use crate::trace::{Op, Trace};

/// Seeded random source for tree tests.
///
/// Uses the xoshiro256** PRNG so a run can be reproduced from its
/// [`seed`](Fuzzer::seed).
///
/// # Examples
///
/// ```
/// use avl_tree_util::Fuzzer;
///
/// let mut fuzzer = Fuzzer::new(Some([7; 32]));
/// let keys = fuzzer.distinct_keys(10, 0, 99);
/// assert_eq!(keys.len(), 10);
/// assert!(keys.iter().all(|k| (0..=99).contains(k)));
/// ```
pub struct Fuzzer {
    pub seed: [u8; 32],
    rng: Xoshiro256StarStar,
}

impl Fuzzer {
    /// Creates a fuzzer; without a seed one is drawn from `OsRng`.
    pub fn new(seed: Option<[u8; 32]>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            let mut bytes = [0u8; 32];
            OsRng.fill_bytes(&mut bytes);
            bytes
        });
        Self {
            seed,
            rng: Xoshiro256StarStar::from_seed(seed),
        }
    }

    /// Integer in `[min, max]`.
    pub fn random_int(&mut self, min: i64, max: i64) -> i64 {
        self.rng.gen_range(min..=max)
    }

    pub fn random_bool(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability)
    }

    pub fn pick<'a, T>(&mut self, elements: &'a [T]) -> &'a T {
        &elements[self.rng.gen_range(0..elements.len())]
    }

    pub fn shuffle<T>(&mut self, elements: &mut [T]) {
        elements.shuffle(&mut self.rng);
    }

    /// `count` keys drawn from `[min, max]`, duplicates allowed.
    pub fn keys(&mut self, count: usize, min: i64, max: i64) -> Vec<i64> {
        (0..count).map(|_| self.random_int(min, max)).collect()
    }

    /// `count` different keys from `[min, max]` in random order.
    ///
    /// Panics when the range holds fewer than `count` keys.
    pub fn distinct_keys(&mut self, count: usize, min: i64, max: i64) -> Vec<i64> {
        let mut all: Vec<i64> = (min..=max).collect();
        assert!(all.len() >= count, "range too small for {count} distinct keys");
        self.shuffle(&mut all);
        all.truncate(count);
        all
    }

    /// Random script of `len` operations over keys in `[0, key_max]`.
    ///
    /// Each step removes with probability `remove_ratio`, otherwise inserts.
    /// Removal keys are picked from the keys inserted so far when possible, so
    /// most removals hit. A `clear` is mixed in rarely.
    pub fn trace(&mut self, len: usize, key_max: i64, remove_ratio: f64) -> Trace {
        let mut ops = Vec::with_capacity(len);
        let mut inserted: Vec<i64> = Vec::new();
        for _ in 0..len {
            if self.random_bool(0.005) {
                ops.push(Op::Clear);
                inserted.clear();
            } else if self.random_bool(remove_ratio) {
                let key = if !inserted.is_empty() && self.random_bool(0.9) {
                    *self.pick(&inserted)
                } else {
                    self.random_int(0, key_max)
                };
                ops.push(Op::Remove(key));
            } else {
                let key = self.random_int(0, key_max);
                inserted.push(key);
                ops.push(Op::Insert(key));
            }
        }
        Trace {
            seed: self.seed.to_vec(),
            ops,
        }
    }
}
