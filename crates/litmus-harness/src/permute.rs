//! Thread-id permutation between sessions.
//!
//! Rotating the worker set and handing out test thread ids in a fresh order
//! migrates each logical thread across OS threads (and so, usually, cores),
//! shaking loose interleavings a fixed assignment would never hit.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Reorders the thread-id assignment for the next session.
pub trait Permuter: Send {
    fn permute(&mut self, tids: &mut [usize]);
}

/// Uniformly random shuffle.
pub struct Shuffle {
    rng: StdRng,
}

impl Shuffle {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Permuter for Shuffle {
    fn permute(&mut self, tids: &mut [usize]) {
        tids.shuffle(&mut self.rng);
    }
}

/// Keeps the assignment fixed. Useful when reproducing a run exactly.
pub struct Nop;

impl Permuter for Nop {
    fn permute(&mut self, _tids: &mut [usize]) {}
}

/// Which permuter a run uses.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PermuteStrategy {
    #[default]
    Random,
    Ordered,
}

impl PermuteStrategy {
    /// Builds a permuter, seeding the random one from `seed` when given.
    pub fn build(self, seed: Option<u64>) -> Box<dyn Permuter> {
        match self {
            Self::Random => match seed {
                Some(seed) => Box::new(Shuffle::new(seed)),
                None => Box::new(Shuffle::from_entropy()),
            },
            Self::Ordered => Box::new(Nop),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut shuffle = Shuffle::new(7);
        let mut tids: Vec<usize> = (0..8).collect();
        shuffle.permute(&mut tids);
        let mut sorted = tids.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let mut a: Vec<usize> = (0..8).collect();
        let mut b = a.clone();
        Shuffle::new(42).permute(&mut a);
        Shuffle::new(42).permute(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_nop_keeps_order() {
        let mut tids: Vec<usize> = (0..4).collect();
        PermuteStrategy::Ordered.build(None).permute(&mut tids);
        assert_eq!(tids, vec![0, 1, 2, 3]);
    }
}
