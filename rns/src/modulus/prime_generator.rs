use primality_test::is_prime;

/// Enumerates primes q = 1 mod nth_root within half a bit of 2^bit_size,
/// walking upward from 2^bit_size+1 and/or downward from 2^bit_size+1-nth_root.
pub struct NTTFriendlyPrimesGenerator {
    size: f64,
    next_prime: u64,
    prev_prime: u64,
    nth_root: u64,
    check_next_prime: bool,
    check_prev_prime: bool,
}

impl NTTFriendlyPrimesGenerator {
    pub fn new(bit_size: u64, nth_root: u64) -> Self {
        assert!(
            (2..62).contains(&bit_size),
            "invalid bit_size={}: must be in [2, 62)",
            bit_size
        );
        assert!(
            nth_root.is_power_of_two(),
            "invalid nth_root={}: not a power of two",
            nth_root
        );

        let next_prime: u64 = (1 << bit_size) + 1;
        let check_prev_prime: bool = next_prime > nth_root;
        let prev_prime: u64 = if check_prev_prime { next_prime - nth_root } else { 0 };

        Self {
            size: bit_size as f64,
            next_prime,
            prev_prime,
            nth_root,
            check_next_prime: true,
            check_prev_prime,
        }
    }

    pub fn next_upstream_primes(&mut self, k: usize) -> Option<Vec<u64>> {
        (0..k).map(|_| self.next_upstream_prime()).collect()
    }

    pub fn next_downstream_primes(&mut self, k: usize) -> Option<Vec<u64>> {
        (0..k).map(|_| self.next_downstream_prime()).collect()
    }

    pub fn next_alternating_primes(&mut self, k: usize) -> Option<Vec<u64>> {
        (0..k).map(|_| self.next_alternating_prime()).collect()
    }

    /// Returns the next prime above 2^bit_size, or None once the
    /// candidates leave the half-bit window.
    pub fn next_upstream_prime(&mut self) -> Option<u64> {
        while self.check_next_prime {
            if let Some(prime) = self.step_upstream() {
                return Some(prime);
            }
        }
        None
    }

    /// Returns the next prime below 2^bit_size, or None once the
    /// candidates leave the half-bit window or drop below nth_root.
    pub fn next_downstream_prime(&mut self) -> Option<u64> {
        while self.check_prev_prime {
            if let Some(prime) = self.step_downstream() {
                return Some(prime);
            }
        }
        None
    }

    /// Returns primes alternately above and below 2^bit_size, which keeps
    /// the product of consecutive primes close to a power of two.
    pub fn next_alternating_prime(&mut self) -> Option<u64> {
        while self.check_next_prime || self.check_prev_prime {
            if self.check_next_prime {
                if let Some(prime) = self.step_upstream() {
                    return Some(prime);
                }
            }
            if self.check_prev_prime {
                if let Some(prime) = self.step_downstream() {
                    return Some(prime);
                }
            }
        }
        None
    }

    fn step_upstream(&mut self) -> Option<u64> {
        if (self.next_prime as f64).log2() - self.size >= 0.5
            || self.next_prime > u64::MAX - self.nth_root
        {
            self.check_next_prime = false;
            return None;
        }
        let candidate: u64 = self.next_prime;
        self.next_prime += self.nth_root;
        is_prime(candidate).then_some(candidate)
    }

    fn step_downstream(&mut self) -> Option<u64> {
        if self.size - (self.prev_prime as f64).log2() >= 0.5 || self.prev_prime < self.nth_root {
            self.check_prev_prime = false;
            return None;
        }
        let candidate: u64 = self.prev_prime;
        self.prev_prime -= self.nth_root;
        is_prime(candidate).then_some(candidate)
    }
}
