/// Deterministic RNG based on splitmix64. One generator per trial, never shared.

#[inline]
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Seed for trial `index` of a batch started from `seed`.
/// Distinct indices give unrelated streams.
#[inline]
pub fn trial_seed(seed: u64, salt: u64, index: u64) -> u64 {
    splitmix64(splitmix64(seed ^ salt) ^ index.wrapping_mul(0xD1B54A32D192ED03))
}

pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = splitmix64(self.state);
        self.state
    }

    /// Uniform in `[0, max)`. Uses Lemire's multiply-shift reduction so small
    /// ranges carry no modulo bias worth measuring.
    pub fn range_usize(&mut self, max: usize) -> usize {
        debug_assert!(max > 0);
        ((self.next_u64() as u128 * max as u128) >> 64) as usize
    }

    /// Uniform in `[lo, hi]`.
    pub fn range_inclusive(&mut self, lo: usize, hi: usize) -> usize {
        lo + self.range_usize(hi - lo + 1)
    }
}
