//! The engine's single injected RNG source.
//!
//! `spec.md §9` calls out the reference implementation's ambient/global RNG
//! as a design smell and asks for one injected, seedable source so the
//! engine is replayable in tests. Every pseudo-random choice in the four
//! updaters goes through this type — no updater calls `rand::thread_rng()`
//! directly.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct EngineRng {
    inner: ChaCha8Rng,
}

impl EngineRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
        }
    }

    /// Uniform float in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Uniform float in `[lo, hi)`. Returns `lo` if `hi <= lo`.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        self.inner.gen_range(lo..hi)
    }

    /// `true` with probability `p` (clamped to `[0, 1]`).
    pub fn chance(&mut self, p: f64) -> bool {
        self.inner.gen::<f64>() < p.clamp(0.0, 1.0)
    }

    /// Uniform random sign, `+1.0` or `-1.0`.
    pub fn sign(&mut self) -> f64 {
        if self.inner.gen_bool(0.5) {
            1.0
        } else {
            -1.0
        }
    }

    /// Index into `0..len`, or `None` if `len == 0`.
    pub fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.inner.gen_range(0..len))
        }
    }

    /// Pick a uniformly random element from a non-empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.index(items.len()).map(|i| &items[i])
    }

    /// A fresh positive species id, used whenever a mutation or spawn
    /// crosses the "new species" threshold.
    pub fn species_id(&mut self) -> u32 {
        self.inner.gen_range(1..=u32::MAX)
    }

    /// A random display color (`r, g, b`).
    pub fn color(&mut self) -> (u8, u8, u8) {
        (self.inner.gen(), self.inner.gen(), self.inner.gen())
    }
}
