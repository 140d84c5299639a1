//! RNG module - multiplicand pool generation
//!
//! A round draws its multiplicands from a "pool": the numbers 1 through 10,
//! shuffled once when the round starts and consumed in order. Every factor
//! appears exactly once per round.
//!
//! Also provides a simple LCG so rounds are reproducible from a seed.

use crate::types::MAX_MULTIPLICAND;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of a power-of-two LCG have short periods
    /// and would make coin flips alternate.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Generate random value in range [lo, hi]
    pub fn next_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        lo + self.next_range(hi - lo + 1)
    }

    /// Fair coin flip
    pub fn next_bool(&mut self) -> bool {
        self.next_u32() >> 31 == 1
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current internal state (reseeding with it continues the sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Shuffled multiplicands for one round
#[derive(Debug, Clone)]
pub struct MultiplicandPool {
    values: [u8; MAX_MULTIPLICAND as usize],
    next: usize,
}

impl MultiplicandPool {
    /// Deal a fresh permutation of 1..=10
    pub fn shuffled(rng: &mut SimpleRng) -> Self {
        let mut values = [0u8; MAX_MULTIPLICAND as usize];
        for (i, v) in values.iter_mut().enumerate() {
            *v = (i + 1) as u8;
        }
        rng.shuffle(&mut values);
        Self { values, next: 0 }
    }

    /// Next multiplicand, or `None` once all ten are used
    pub fn draw(&mut self) -> Option<u8> {
        let v = self.values.get(self.next).copied()?;
        self.next += 1;
        Some(v)
    }

    /// Peek at the next multiplicand without consuming it
    pub fn peek(&self) -> Option<u8> {
        self.values.get(self.next).copied()
    }

    pub fn remaining(&self) -> usize {
        self.values.len() - self.next
    }

    /// The full dealt order, consumed or not
    pub fn order(&self) -> &[u8] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_is_usable() {
        let mut rng = SimpleRng::new(0);
        assert_ne!(rng.next_u32(), rng.next_u32());
    }

    #[test]
    fn test_next_inclusive_stays_in_bounds() {
        let mut rng = SimpleRng::new(7);
        let mut seen_lo = false;
        let mut seen_hi = false;
        for _ in 0..2000 {
            let v = rng.next_inclusive(1, 15);
            assert!((1..=15).contains(&v));
            seen_lo |= v == 1;
            seen_hi |= v == 15;
        }
        assert!(seen_lo && seen_hi);
    }

    #[test]
    fn test_next_bool_produces_both_sides() {
        let mut rng = SimpleRng::new(99);
        let heads = (0..1000).filter(|_| rng.next_bool()).count();
        assert!(heads > 350 && heads < 650, "heads={heads}");
    }

    #[test]
    fn test_pool_is_permutation() {
        for seed in 1..50 {
            let mut rng = SimpleRng::new(seed);
            let mut pool = MultiplicandPool::shuffled(&mut rng);

            let mut drawn = Vec::new();
            while let Some(m) = pool.draw() {
                drawn.push(m);
            }
            drawn.sort_unstable();
            assert_eq!(drawn, (1..=10).collect::<Vec<u8>>());
        }
    }

    #[test]
    fn test_pool_exhausts() {
        let mut rng = SimpleRng::new(1);
        let mut pool = MultiplicandPool::shuffled(&mut rng);
        assert_eq!(pool.remaining(), 10);

        for _ in 0..10 {
            assert!(pool.draw().is_some());
        }
        assert_eq!(pool.remaining(), 0);
        assert_eq!(pool.draw(), None);
        assert_eq!(pool.peek(), None);
    }

    #[test]
    fn test_pool_peek_matches_draw() {
        let mut rng = SimpleRng::new(3);
        let mut pool = MultiplicandPool::shuffled(&mut rng);

        let peeked = pool.peek();
        assert_eq!(peeked, pool.draw());
        assert_eq!(pool.order()[0], peeked.unwrap());
    }

    #[test]
    fn test_different_seeds_deal_different_orders() {
        let a = MultiplicandPool::shuffled(&mut SimpleRng::new(12345));
        let b = MultiplicandPool::shuffled(&mut SimpleRng::new(54321));
        assert_ne!(a.order(), b.order());
    }
}
