//! Random sources for bot decisions and combat rolls.
//!
//! Everything random in the duel draws through [`RandomSource`], so tests can
//! swap in a [`ScriptedRng`] and assert exactly which branch was taken.

/// Source of uniform random draws.
pub trait RandomSource {
    /// Returns a uniform value in `[0, 1)`.
    fn next_f32(&mut self) -> f32;

    /// Returns a uniform index in `0..len`. `len` must be nonzero.
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f32() * len as f32) as usize).min(len - 1)
    }

    /// Returns true with probability `chance`.
    fn chance(&mut self, chance: f32) -> bool {
        self.next_f32() < chance
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f32(&mut self) -> f32 {
        (**self).next_f32()
    }

    fn pick_index(&mut self, len: usize) -> usize {
        (**self).pick_index(len)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_f32(&mut self) -> f32 {
        (**self).next_f32()
    }

    fn pick_index(&mut self, len: usize) -> usize {
        (**self).pick_index(len)
    }
}

/// Production random source backed by `fastrand`.
#[derive(Debug, Clone)]
pub struct FastRng(fastrand::Rng);

impl FastRng {
    /// Creates a randomly seeded source.
    #[must_use]
    pub fn new() -> Self {
        Self(fastrand::Rng::new())
    }

    /// Creates a deterministic source from a seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }

    /// Creates a source from an optional seed.
    #[must_use]
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::seeded)
    }
}

impl Default for FastRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for FastRng {
    fn next_f32(&mut self) -> f32 {
        self.0.f32()
    }

    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.0.usize(..len)
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    draws: Vec<f32>,
    cursor: usize,
}

impl ScriptedRng {
    /// Creates a scripted source. An empty script always yields `0.0`.
    #[must_use]
    pub fn new(draws: impl Into<Vec<f32>>) -> Self {
        Self {
            draws: draws.into(),
            cursor: 0,
        }
    }

    /// Source that always returns the same value.
    #[must_use]
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    /// Number of draws consumed so far.
    #[must_use]
    pub fn draws_taken(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRng {
    fn next_f32(&mut self) -> f32 {
        let value = if self.draws.is_empty() {
            0.0
        } else {
            self.draws[self.cursor % self.draws.len()]
        };
        self.cursor += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_cycles() {
        let mut rng = ScriptedRng::new(vec![0.1, 0.9]);
        assert_eq!(rng.next_f32(), 0.1);
        assert_eq!(rng.next_f32(), 0.9);
        assert_eq!(rng.next_f32(), 0.1);
        assert_eq!(rng.draws_taken(), 3);
    }

    #[test]
    fn test_scripted_pick_index() {
        let mut rng = ScriptedRng::new(vec![0.0, 0.5, 0.99]);
        assert_eq!(rng.pick_index(3), 0);
        assert_eq!(rng.pick_index(3), 1);
        assert_eq!(rng.pick_index(3), 2);
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let mut a = FastRng::seeded(42);
        let mut b = FastRng::seeded(42);
        for _ in 0..16 {
            assert_eq!(a.next_f32(), b.next_f32());
        }
    }

    #[test]
    fn test_fast_rng_range() {
        let mut rng = FastRng::seeded(7);
        for _ in 0..1000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v));
            assert!(rng.pick_index(3) < 3);
        }
    }

    #[test]
    fn test_chance_threshold() {
        let mut rng = ScriptedRng::new(vec![0.69, 0.7]);
        assert!(rng.chance(0.7));
        assert!(!rng.chance(0.7));
    }
}
