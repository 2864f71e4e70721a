use crate::modulus::ReduceOnce;

use num_bigint::BigUint;
use num_traits::ToPrimitive;

/// A constant v < q paired with floor(v * 2^64 / q) for Shoup-style products.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Barrett<O>(pub O, pub O);

impl<O> Barrett<O> {
    #[inline(always)]
    pub fn value(&self) -> &O {
        &self.0
    }

    #[inline(always)]
    pub fn quotient(&self) -> &O {
        &self.1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarrettPrecomp<O> {
    pub q: O,
    pub two_q: O,
    pub lo: O,
    pub hi: O,
    pub one: Barrett<O>,
}

impl BarrettPrecomp<u64> {
    pub fn new(q: u64) -> BarrettPrecomp<u64> {
        assert!(
            q > 2 && q < 1 << 62,
            "invalid modulus q={}: must satisfy 2 < q < 2^62",
            q
        );
        let big_r: BigUint = (BigUint::from(1u64) << (u64::BITS << 1)) / BigUint::from(q);
        let lo: u64 = (&big_r & BigUint::from(u64::MAX)).to_u64().unwrap_or_default();
        let hi: u64 = (big_r >> u64::BITS).to_u64().unwrap_or_default();
        let mut precomp: BarrettPrecomp<u64> = Self {
            q,
            two_q: q << 1,
            lo,
            hi,
            one: Barrett(0, 0),
        };
        precomp.one = precomp.prepare(1);
        precomp
    }

    #[inline(always)]
    pub fn one(&self) -> Barrett<u64> {
        self.one
    }

    /// Returns x mod q for x < 2^124 using the precomputed floor(2^128/q).
    #[inline(always)]
    pub fn reduce_u128(&self, x: u128) -> u64 {
        let (x_lo, x_hi) = (x as u64 as u128, x >> 64);
        let (r_lo, r_hi) = (self.lo as u128, self.hi as u128);
        let mid: u128 = x_hi * r_lo + x_lo * r_hi + ((x_lo * r_lo) >> 64);
        let quotient: u128 = x_hi * r_hi + (mid >> 64);
        let mut r: u64 = (x - quotient * self.q as u128) as u64;
        while r >= self.q {
            r -= self.q;
        }
        r
    }

    #[inline(always)]
    pub fn reduce(&self, x: u64) -> u64 {
        self.reduce_u128(x as u128)
    }

    /// Returns a * b mod q.
    #[inline(always)]
    pub fn mul_mod(&self, a: u64, b: u64) -> u64 {
        self.reduce_u128(a as u128 * b as u128)
    }

    #[inline(always)]
    pub fn add_mod(&self, a: u64, b: u64) -> u64 {
        (a + b).reduce_once(self.q)
    }

    #[inline(always)]
    pub fn sub_mod(&self, a: u64, b: u64) -> u64 {
        (a + self.q - b).reduce_once(self.q)
    }

    #[inline(always)]
    pub fn prepare(&self, v: u64) -> Barrett<u64> {
        debug_assert!(v < self.q);
        let quotient: u64 = (((v as u128) << 64) / self.q as u128) as _;
        Barrett(v, quotient)
    }

    /// Returns lhs * rhs mod q, rhs being any u64.
    #[inline(always)]
    pub fn mul_external(&self, lhs: Barrett<u64>, rhs: u64) -> u64 {
        let mut r: u64 = rhs;
        self.mul_external_assign(lhs, &mut r);
        r
    }

    #[inline(always)]
    pub fn mul_external_assign(&self, lhs: Barrett<u64>, rhs: &mut u64) {
        let t: u64 = ((*lhs.quotient() as u128 * *rhs as u128) >> 64) as _;
        *rhs = (rhs.wrapping_mul(*lhs.value())).wrapping_sub(self.q.wrapping_mul(t));
        rhs.reduce_once_assign(self.q);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modulus::WordOps;
    use sampling::source::Source;

    #[test]
    fn reduce_u128_matches_remainder() {
        let mut source: Source = Source::new([0u8; 32]);
        for q in [0x1fffffffffe00001u64, 0xffffffffffc0001u64, 0x800000000004001u64, 65537u64] {
            let precomp: BarrettPrecomp<u64> = BarrettPrecomp::new(q);
            for _ in 0..1024 {
                let a: u64 = source.next_u64n(q, q.mask());
                let b: u64 = source.next_u64n(q, q.mask());
                assert_eq!(
                    precomp.mul_mod(a, b),
                    ((a as u128 * b as u128) % q as u128) as u64
                );
            }
            assert_eq!(precomp.reduce(q), 0);
            assert_eq!(precomp.reduce(u64::MAX), u64::MAX % q);
        }
    }

    #[test]
    fn mul_external_matches_remainder() {
        let q: u64 = 0x1fffffffffe00001u64;
        let precomp: BarrettPrecomp<u64> = BarrettPrecomp::new(q);
        let mut source: Source = Source::new([1u8; 32]);
        for _ in 0..1024 {
            let v: u64 = source.next_u64n(q, q.mask());
            let x: u64 = source.next_u64n(u64::MAX, u64::MAX);
            assert_eq!(
                precomp.mul_external(precomp.prepare(v), x),
                ((v as u128 * x as u128) % q as u128) as u64
            );
        }
    }
}
