use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Seed used by [`seeded_default`] so tests and demos can replay a whole match.
pub const DEFAULT_SEED: u64 = 3819201;

/// Game-flavoured helpers on top of any [`Rng`].
///
/// Every rule that needs chance takes the generator as an argument instead of owning one, so a
/// single stream threaded through the search makes sibling branches diverge.
pub trait RandomGenerator: Rng {
    /// A uniform value in `from..=to`.
    fn next_range(&mut self, from: u8, to: u8) -> u8 {
        self.random_range(from..=to)
    }

    /// One six-sided die.
    fn roll_die(&mut self) -> u8 {
        self.next_range(1, 6)
    }

    /// A uniform index into a collection of `len` items, or `None` when it is empty.
    fn pick_index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.random_range(0..len))
    }

    /// Uniform Fisher–Yates shuffle.
    fn shuffle_slice<K>(&mut self, items: &mut [K]) {
        items.shuffle(self);
    }

    /// Returns `true` with probability `p`, clamped to `[0, 1]`.
    fn chance(&mut self, p: f64) -> bool {
        self.random_bool(p.clamp(0.0, 1.0))
    }
}

impl<R: Rng + ?Sized> RandomGenerator for R {}

/// A reproducible generator for the given seed.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn seeded_default() -> StdRng {
    seeded(DEFAULT_SEED)
}

/// A generator seeded from the operating system.
pub fn from_entropy() -> StdRng {
    StdRng::from_os_rng()
}
