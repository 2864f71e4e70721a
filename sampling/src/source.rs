use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_core::{CryptoRng, RngCore};

const MAXF64: f64 = 9007199254740992.0;

/// Seedable CSPRNG stream backing every sampler of the workspace.
pub struct Source {
    source: ChaCha8Rng,
}

/// Draws a fresh 32-byte seed from the thread-local OS-seeded generator.
pub fn new_seed() -> [u8; 32] {
    let mut seed = [0u8; 32];
    rand::rng().fill_bytes(&mut seed);
    seed
}

impl Source {
    pub fn new(seed: [u8; 32]) -> Source {
        Source {
            source: ChaCha8Rng::from_seed(seed),
        }
    }

    pub fn new_seed(&mut self) -> [u8; 32] {
        let mut seed: [u8; 32] = [0u8; 32];
        self.source.fill_bytes(&mut seed);
        seed
    }

    /// Returns an independent stream seeded from this one.
    pub fn branch(&mut self) -> Self {
        Source::new(self.new_seed())
    }

    /// Returns a uniform value in [0, max) by rejection on `mask`,
    /// which must cover max-1.
    #[inline(always)]
    pub fn next_u64n(&mut self, max: u64, mask: u64) -> u64 {
        debug_assert!(max != 0 && mask >= max - 1, "invalid mask={} for max={}", mask, max);
        let mut x: u64 = self.next_u64() & mask;
        while x >= max {
            x = self.next_u64() & mask;
        }
        x
    }

    /// Returns a uniform value in [min, max) with 53 bits of precision.
    #[inline(always)]
    pub fn next_f64(&mut self, min: f64, max: f64) -> f64 {
        min + ((self.next_u64() << 11 >> 11) as f64) / MAXF64 * (max - min)
    }

    /// Returns -1 or 1 with probability prob/2 each, 0 otherwise.
    #[inline(always)]
    pub fn next_ternary(&mut self, prob: f64) -> i64 {
        if self.next_f64(0.0, 1.0) < prob {
            if self.next_u64() & 1 == 1 { -1 } else { 1 }
        } else {
            0
        }
    }
}

impl RngCore for Source {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.source.next_u32()
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.source.next_u64()
    }

    #[inline(always)]
    fn fill_bytes(&mut self, bytes: &mut [u8]) {
        self.source.fill_bytes(bytes)
    }
}

impl CryptoRng for Source {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a: Source = Source::new([7u8; 32]);
        let mut b: Source = Source::new([7u8; 32]);
        (0..64).for_each(|_| assert_eq!(a.next_u64(), b.next_u64()));
    }

    #[test]
    fn branches_diverge() {
        let mut source: Source = Source::new([0u8; 32]);
        let mut a: Source = source.branch();
        let mut b: Source = source.branch();
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn next_u64n_in_range() {
        let mut source: Source = Source::new([1u8; 32]);
        let max: u64 = 12289;
        let mask: u64 = (1 << 14) - 1;
        (0..4096).for_each(|_| assert!(source.next_u64n(max, mask) < max));
    }

    #[test]
    fn next_ternary_density() {
        let mut source: Source = Source::new([2u8; 32]);
        let samples: Vec<i64> = (0..20000).map(|_| source.next_ternary(0.5)).collect();
        assert!(samples.iter().all(|x| (-1..=1).contains(x)));
        let nonzero: usize = samples.iter().filter(|x| **x != 0).count();
        assert!((9000..11000).contains(&nonzero), "nonzero={}", nonzero);
    }
}
