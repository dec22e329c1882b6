//! Random source used by trials.
//!
//! Every sampling operation takes the generator as `&mut R`, so a stream is
//! owned by exactly one series at a time. Any [`rand::Rng`] qualifies; the
//! simulators use `SmallRng` seeded per series.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Uniform sampling over finite index sets.
pub trait RandomSource {
    /// Uniform integer in `[0, bound)`. `bound` must be positive.
    fn uniform_int(&mut self, bound: usize) -> usize;

    /// `k` distinct integers from `[0, n)`, in random order. Requires `k <= n`.
    fn choose_without_replacement(&mut self, n: usize, k: usize) -> Vec<usize>;

    /// Uniform pick from `pool`, `None` when it is empty.
    fn pick(&mut self, pool: &[usize]) -> Option<usize> {
        if pool.is_empty() {
            None
        } else {
            Some(pool[self.uniform_int(pool.len())])
        }
    }
}

impl<R: Rng + ?Sized> RandomSource for R {
    #[inline]
    fn uniform_int(&mut self, bound: usize) -> usize {
        self.random_range(0..bound)
    }

    fn choose_without_replacement(&mut self, n: usize, k: usize) -> Vec<usize> {
        rand::seq::index::sample(self, n, k).into_vec()
    }
}

/// Seeded generator, or one drawn from OS entropy when `seed` is `None`.
pub fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    }
}
