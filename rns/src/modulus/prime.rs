use crate::modulus::barrett::BarrettPrecomp;
use primality_test::is_prime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prime<O> {
    pub q: O,
    pub barrett: BarrettPrecomp<O>,
    /// q-1
    pub phi: O,
}

impl Prime<u64> {
    /// Returns a new instance of Prime<u64>.
    /// Panics if q is not a prime > 2 or if q >= 2^62.
    pub fn new(q: u64) -> Self {
        assert!(q > 2 && is_prime(q), "invalid argument q={}: not an odd prime", q);
        Self::new_unchecked(q)
    }

    /// Returns a new instance of Prime<u64>.
    /// Does not check if q is a prime.
    pub fn new_unchecked(q: u64) -> Self {
        Self {
            q,
            barrett: BarrettPrecomp::new(q),
            phi: q - 1,
        }
    }

    #[inline(always)]
    pub fn q(&self) -> u64 {
        self.q
    }

    /// Returns x^exponent mod q.
    pub fn pow(&self, x: u64, exponent: u64) -> u64 {
        let mut y: u64 = 1;
        let mut x: u64 = self.barrett.reduce(x);
        let mut i: u64 = exponent;
        while i > 0 {
            if i & 1 == 1 {
                y = self.barrett.mul_mod(y, x);
            }
            x = self.barrett.mul_mod(x, x);
            i >>= 1;
        }
        y
    }

    /// Returns x^-1 mod q.
    /// User must ensure that x is not divisible by q.
    #[inline(always)]
    pub fn inv(&self, x: u64) -> u64 {
        debug_assert!(x % self.q != 0, "invalid argument x={}: not invertible mod q={}", x, self.q);
        self.pow(x, self.phi - 1)
    }

    /// Returns the smallest primitive nth_root-th root of unity mod q.
    /// nth_root must be a power of two dividing q-1.
    pub fn primitive_nth_root(&self, nth_root: u64) -> u64 {
        assert!(
            nth_root.is_power_of_two() && nth_root >= 2,
            "invalid nth_root={}: not a power of two",
            nth_root
        );
        assert!(
            self.q & (nth_root - 1) == 1,
            "invalid prime: q = {} % nth_root = {} = {} != 1",
            self.q,
            nth_root,
            self.q & (nth_root - 1)
        );

        let exponent: u64 = self.phi / nth_root;
        let minus_one: u64 = self.q - 1;

        // psi has order dividing nth_root; psi^(nth_root/2) = -1 pins it to exactly nth_root.
        let mut candidate: u64 = 2;
        loop {
            let psi: u64 = self.pow(candidate, exponent);
            if self.pow(psi, nth_root >> 1) == minus_one {
                return psi;
            }
            candidate += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pow_inv() {
        let prime: Prime<u64> = Prime::new(0x1fffffffffe00001u64);
        let x: u64 = 0x123456789abcdef;
        assert_eq!(prime.barrett.mul_mod(x, prime.inv(x)), 1);
        assert_eq!(prime.pow(x, prime.phi), 1);
        assert_eq!(prime.pow(x, 0), 1);
        assert_eq!(prime.pow(3, 4), 81);
    }

    #[test]
    fn primitive_nth_root() {
        let prime: Prime<u64> = Prime::new(0x1fffffffffe00001u64);
        let nth_root: u64 = 1 << 16;
        let psi: u64 = prime.primitive_nth_root(nth_root);
        assert_eq!(prime.pow(psi, nth_root), 1);
        assert_eq!(prime.pow(psi, nth_root >> 1), prime.q - 1);
    }
}
