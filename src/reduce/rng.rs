//! Tiny deterministic RNG for fuzz-mode decisions.
//!
//! XorShift64: simple, fast, and deterministic (same seed, same
//! sequence), which keeps fuzz runs reproducible when the seed is
//! pinned. Not `Copy`, so an RNG stream cannot be duplicated by
//! accident; clone explicitly if a second stream is wanted.

/// Deterministic RNG for the fuzz-mode coin flips.
#[derive(Clone, Debug)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Seed 0 is mapped to a non-zero value to avoid the all-zero
    /// lockup state.
    #[inline]
    pub fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state: seed }
    }

    /// Shift constants (13, 7, 17) are from Marsaglia's "Xorshift RNGs"
    /// paper and give a full-period generator.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Returns true with probability `numerator / denominator`.
    ///
    /// # Panics
    /// Panics in debug builds if `denominator` is 0 or
    /// `numerator > denominator`.
    #[inline]
    pub fn chance(&mut self, numerator: u32, denominator: u32) -> bool {
        debug_assert!(denominator > 0, "denominator must be > 0");
        debug_assert!(numerator <= denominator, "numerator must be <= denominator");
        // High bits: XorShift's low bits are the weaker ones.
        let x = (self.next_u64() >> 32) as u32;
        (x as u64 * denominator as u64 >> 32) < numerator as u64
    }
}

impl Default for XorShift64 {
    fn default() -> Self {
        Self::new(0)
    }
}
