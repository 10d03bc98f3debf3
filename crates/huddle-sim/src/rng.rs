use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// Source of randomness for the generator.
///
/// Everything random in the feed goes through this trait, so tests can
/// substitute a reproducible sequence.
pub trait RandomSource {
    /// Next pseudo-random `u64`.
    fn next_u64(&mut self) -> u64;

    /// Next value in `[0, upper_exclusive)`.
    fn next_bounded(&mut self, upper_exclusive: u64) -> u64 {
        if upper_exclusive == 0 {
            return 0;
        }
        self.next_u64() % upper_exclusive
    }

    /// Bernoulli trial with integer percent.
    fn hit_rate_percent(&mut self, percent: u8) -> bool {
        if percent == 0 {
            return false;
        }
        if percent >= 100 {
            return true;
        }
        self.next_bounded(100) < u64::from(percent)
    }

    /// Uniform pick from `items`; `None` when empty.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        let len = u64::try_from(items.len()).unwrap_or(u64::MAX);
        let index = usize::try_from(self.next_bounded(len)).unwrap_or(0);
        items.get(index)
    }
}

/// Tiny deterministic RNG.
///
/// This is intentionally simple and reproducible across platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    /// Create a new deterministic RNG from a seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }
}

impl RandomSource for DeterministicRng {
    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        // The low bits of an LCG cycle quickly; hand out the high half mixed in.
        self.state ^ (self.state >> 33)
    }
}

/// OS-seeded randomness for live runs.
#[derive(Debug, Clone)]
pub struct ThreadRandom {
    inner: StdRng,
}

impl ThreadRandom {
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for ThreadRandom {
    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn next_bounded(&mut self, upper_exclusive: u64) -> u64 {
        if upper_exclusive == 0 {
            return 0;
        }
        self.inner.gen_range(0..upper_exclusive)
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Handy for pinning the generator to an exact branch in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedRandom {
    values: Vec<u64>,
    cursor: usize,
}

impl ScriptedRandom {
    #[must_use]
    pub const fn new(values: Vec<u64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// How many values have been handed out.
    #[must_use]
    pub const fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_u64(&mut self) -> u64 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = DeterministicRng::new(42);
        let mut b = DeterministicRng::new(42);
        for _ in 0..32 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
        let mut c = DeterministicRng::new(43);
        assert_ne!(DeterministicRng::new(42).next_u64(), c.next_u64());
    }

    #[test]
    fn bounded_and_rate_edges() {
        let mut rng = DeterministicRng::new(7);
        assert_eq!(rng.next_bounded(0), 0);
        for _ in 0..100 {
            assert!(rng.next_bounded(4) < 4);
            assert!(!rng.hit_rate_percent(0));
            assert!(rng.hit_rate_percent(100));
        }
    }

    #[test]
    fn deterministic_rate_is_roughly_fair() {
        let mut rng = DeterministicRng::new(1);
        let hits = (0..10_000).filter(|_| rng.hit_rate_percent(30)).count();
        assert!((2_500..3_500).contains(&hits), "hits = {hits}");
    }

    #[test]
    fn pick_handles_empty_and_scripted_index() {
        let mut rng = ScriptedRandom::new(vec![2, 5]);
        let items = ["a", "b", "c"];
        assert_eq!(rng.pick(&items), Some(&"c"));
        assert_eq!(rng.pick(&items), Some(&"c"), "5 % 3 == 2");
        let empty: [&str; 0] = [];
        assert_eq!(rng.pick(&empty), None);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn thread_random_stays_in_bounds() {
        let mut rng = ThreadRandom::from_entropy();
        for _ in 0..100 {
            assert!(rng.next_bounded(7) < 7);
        }
    }
}
