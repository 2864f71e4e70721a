use crate::modulus::prime::Prime;
use crate::poly::{Poly, PolyRNS};
use crate::ring::{Ring, RingRNS};
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, ToPrimitive};
use rayon::prelude::*;
use std::sync::Arc;

/// Returns one ring per modulus, all of degree n.
pub fn new_rings(n: usize, moduli: &[u64]) -> Vec<Arc<Ring<u64>>> {
    assert!(!moduli.is_empty(), "moduli cannot be empty");
    moduli.iter().map(|q| Arc::new(Ring::new(n, *q))).collect()
}

impl RingRNS<u64> {
    pub fn from_moduli(n: usize, moduli: &[u64]) -> Self {
        RingRNS::new(new_rings(n, moduli))
    }

    /// Returns prod q_i.
    pub fn modulus(&self) -> BigUint {
        self.0
            .iter()
            .fold(BigUint::one(), |acc, r| acc * BigUint::from(r.modulus.q))
    }

    pub fn from_bigint_inplace(&self, coeffs: &[BigInt], step: usize, a: &mut PolyRNS<u64>) {
        assert!(
            self.level() <= a.level(),
            "invalid level: self.level()={} > a.level()={}",
            self.level(),
            a.level()
        );
        self.0
            .par_iter()
            .zip(a.0.par_iter_mut())
            .for_each(|(ring, a)| ring.from_bigint(coeffs, step, a));
    }

    /// Reconstructs the coefficients at indexes 0, step, 2*step, ... as
    /// integers in [-Q/2, Q/2).
    pub fn to_bigint_inplace(&self, a: &PolyRNS<u64>, step: usize, coeffs: &mut [BigInt]) {
        assert!(
            self.level() <= a.level(),
            "invalid level: self.level()={} > a.level()={}",
            self.level(),
            a.level()
        );
        assert!(step <= a.n(), "invalid step: step={} > a.n()={}", step, a.n());
        assert!(
            coeffs.len() <= a.n() / step,
            "invalid coeffs: coeffs.len()={} > a.n()/step={}",
            coeffs.len(),
            a.n() / step
        );

        let q_big: BigInt = BigInt::from(self.modulus());
        let q_big_half: BigInt = &q_big >> 1;

        // (Q/q_i) * [(Q/q_i)^-1]_{q_i}
        let inv_crt: Vec<BigInt> = self
            .0
            .iter()
            .enumerate()
            .map(|(i, ring)| {
                let prime: &Prime<u64> = &ring.modulus;
                let q_hat_mod_qi: u64 = self
                    .0
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .fold(1u64, |acc, (_, r)| prime.barrett.mul_mod(acc, prime.barrett.reduce(r.modulus.q)));
                (&q_big / BigInt::from(prime.q)) * BigInt::from(prime.inv(q_hat_mod_qi))
            })
            .collect();

        coeffs
            .par_iter_mut()
            .enumerate()
            .for_each(|(j, c)| {
                let i: usize = j * step;
                let mut acc: BigInt = BigInt::default();
                inv_crt
                    .iter()
                    .enumerate()
                    .for_each(|(k, w)| acc += w * BigInt::from(a.at(k).0[i]));
                acc = acc.mod_floor(&q_big);
                if acc >= q_big_half {
                    acc -= &q_big;
                }
                *c = acc;
            });
    }

    /// Returns [c]_{q_i} for every limb.
    pub fn bigint_to_rns(&self, c: &BigInt) -> Vec<u64> {
        self.0
            .iter()
            .map(|r| {
                c.mod_floor(&BigInt::from(r.modulus.q))
                    .to_u64()
                    .unwrap_or_default()
            })
            .collect()
    }
}

impl RingRNS<u64> {
    pub fn ntt_inplace(&self, a: &mut PolyRNS<u64>) {
        self.0
            .par_iter()
            .zip(a.0.par_iter_mut())
            .for_each(|(ring, a)| ring.ntt_inplace(a));
    }

    pub fn intt_inplace(&self, a: &mut PolyRNS<u64>) {
        self.0
            .par_iter()
            .zip(a.0.par_iter_mut())
            .for_each(|(ring, a)| ring.intt_inplace(a));
    }

    pub fn ntt(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        self.0
            .par_iter()
            .zip(b.0.par_iter_mut())
            .enumerate()
            .for_each(|(i, (ring, b))| ring.ntt(a.at(i), b));
    }

    pub fn intt(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        self.0
            .par_iter()
            .zip(b.0.par_iter_mut())
            .enumerate()
            .for_each(|(i, (ring, b))| ring.intt(a.at(i), b));
    }
}

impl RingRNS<u64> {
    #[inline(always)]
    pub fn add(&self, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        debug_assert!(b.level() >= self.level(), "b.level()={} < self.level()={}", b.level(), self.level());
        debug_assert!(c.level() >= self.level(), "c.level()={} < self.level()={}", c.level(), self.level());
        self.0
            .par_iter()
            .zip(c.0.par_iter_mut())
            .enumerate()
            .for_each(|(i, (ring, c))| ring.add(a.at(i), b.at(i), c));
    }

    #[inline(always)]
    pub fn add_inplace(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        debug_assert!(b.level() >= self.level(), "b.level()={} < self.level()={}", b.level(), self.level());
        self.0
            .par_iter()
            .zip(b.0.par_iter_mut())
            .enumerate()
            .for_each(|(i, (ring, b))| ring.add_inplace(a.at(i), b));
    }

    #[inline(always)]
    pub fn sub(&self, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        debug_assert!(b.level() >= self.level(), "b.level()={} < self.level()={}", b.level(), self.level());
        debug_assert!(c.level() >= self.level(), "c.level()={} < self.level()={}", c.level(), self.level());
        self.0
            .par_iter()
            .zip(c.0.par_iter_mut())
            .enumerate()
            .for_each(|(i, (ring, c))| ring.sub(a.at(i), b.at(i), c));
    }

    #[inline(always)]
    pub fn sub_inplace(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        debug_assert!(b.level() >= self.level(), "b.level()={} < self.level()={}", b.level(), self.level());
        self.0
            .par_iter()
            .zip(b.0.par_iter_mut())
            .enumerate()
            .for_each(|(i, (ring, b))| ring.sub_inplace(a.at(i), b));
    }

    #[inline(always)]
    pub fn neg(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        debug_assert!(b.level() >= self.level(), "b.level()={} < self.level()={}", b.level(), self.level());
        self.0
            .par_iter()
            .zip(b.0.par_iter_mut())
            .enumerate()
            .for_each(|(i, (ring, b))| ring.neg(a.at(i), b));
    }

    #[inline(always)]
    pub fn neg_inplace(&self, a: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        self.0
            .par_iter()
            .zip(a.0.par_iter_mut())
            .for_each(|(ring, a)| ring.neg_inplace(a));
    }

    #[inline(always)]
    pub fn mul(&self, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        debug_assert!(b.level() >= self.level(), "b.level()={} < self.level()={}", b.level(), self.level());
        debug_assert!(c.level() >= self.level(), "c.level()={} < self.level()={}", c.level(), self.level());
        self.0
            .par_iter()
            .zip(c.0.par_iter_mut())
            .enumerate()
            .for_each(|(i, (ring, c))| ring.mul(a.at(i), b.at(i), c));
    }

    #[inline(always)]
    pub fn mul_inplace(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        debug_assert!(b.level() >= self.level(), "b.level()={} < self.level()={}", b.level(), self.level());
        self.0
            .par_iter()
            .zip(b.0.par_iter_mut())
            .enumerate()
            .for_each(|(i, (ring, b))| ring.mul_inplace(a.at(i), b));
    }

    #[inline(always)]
    pub fn mul_add(&self, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        debug_assert!(b.level() >= self.level(), "b.level()={} < self.level()={}", b.level(), self.level());
        debug_assert!(c.level() >= self.level(), "c.level()={} < self.level()={}", c.level(), self.level());
        self.0
            .par_iter()
            .zip(c.0.par_iter_mut())
            .enumerate()
            .for_each(|(i, (ring, c))| ring.mul_add(a.at(i), b.at(i), c));
    }

    /// b <- a * scalars[i] on limb i.
    #[inline(always)]
    pub fn mul_scalar_rns(&self, a: &PolyRNS<u64>, scalars: &[u64], b: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        debug_assert!(b.level() >= self.level(), "b.level()={} < self.level()={}", b.level(), self.level());
        debug_assert!(scalars.len() > self.level(), "scalars.len()={} <= self.level()={}", scalars.len(), self.level());
        self.0
            .par_iter()
            .zip(b.0.par_iter_mut())
            .enumerate()
            .for_each(|(i, (ring, b))| ring.mul_scalar(a.at(i), scalars[i], b));
    }

    #[inline(always)]
    pub fn mul_scalar_rns_inplace(&self, scalars: &[u64], a: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        debug_assert!(scalars.len() > self.level(), "scalars.len()={} <= self.level()={}", scalars.len(), self.level());
        self.0
            .par_iter()
            .zip(a.0.par_iter_mut())
            .enumerate()
            .for_each(|(i, (ring, a))| ring.mul_scalar_inplace(scalars[i], a));
    }

    #[inline(always)]
    pub fn mul_scalar_inplace(&self, b: u64, a: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        self.0
            .par_iter()
            .zip(a.0.par_iter_mut())
            .for_each(|(ring, a)| ring.mul_scalar_inplace(b, a));
    }

    /// Lifts a single residue polynomial mod q_in, centered, onto every limb.
    pub fn center_lift(&self, a: &Poly<u64>, q_in: u64, b: &mut PolyRNS<u64>) {
        debug_assert!(b.level() >= self.level(), "b.level()={} < self.level()={}", b.level(), self.level());
        self.0
            .par_iter()
            .zip(b.0.par_iter_mut())
            .for_each(|(ring, b)| ring.center_lift(a, q_in, b));
    }

    /// Writes the small signed integers coeffs on every limb of a.
    pub fn from_i64(&self, coeffs: &[i64], a: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        self.0
            .par_iter()
            .zip(a.0.par_iter_mut())
            .for_each(|(ring, a)| ring.from_i64(coeffs, a));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bigint_roundtrip() {
        let n: usize = 16;
        let ring: RingRNS<u64> = RingRNS::from_moduli(n, &[0x1fffffffffe00001u64, 0x1fffffffffc80001u64]);
        let q_big: BigInt = BigInt::from(ring.modulus());
        let coeffs: Vec<BigInt> = (0..n as i64 - 1)
            .map(|i| (&q_big >> 1u32) - BigInt::from(i * 1_000_003) - 1)
            .chain(std::iter::once(BigInt::from(-42)))
            .collect();
        let mut a: PolyRNS<u64> = ring.new_polyrns();
        ring.from_bigint_inplace(&coeffs, 1, &mut a);
        let mut have: Vec<BigInt> = vec![BigInt::default(); n];
        ring.to_bigint_inplace(&a, 1, &mut have);
        assert_eq!(have, coeffs);
    }

    #[test]
    fn to_bigint_with_step() {
        let n: usize = 16;
        let ring: RingRNS<u64> = RingRNS::from_moduli(n, &[0x800000000004001u64, 0x1fffffffffe00001u64]);
        let mut a: PolyRNS<u64> = ring.new_polyrns();
        ring.from_i64(&(0..n as i64).map(|i| i - 8).collect::<Vec<i64>>(), &mut a);
        let mut have: Vec<BigInt> = vec![BigInt::default(); n / 4];
        ring.to_bigint_inplace(&a, 4, &mut have);
        let want: Vec<BigInt> = [-8i64, -4, 0, 4].iter().map(|x| BigInt::from(*x)).collect();
        assert_eq!(have, want);
    }

    #[test]
    fn bigint_to_rns_beyond_i128() {
        let moduli: [u64; 2] = [0x800000000004001u64, 0x1fffffffffe00001u64];
        let ring: RingRNS<u64> = RingRNS::from_moduli(16, &moduli);
        for c in [
            BigInt::from(1u8) << 140u32,
            -(BigInt::from(3u8) << 200u32) + 7,
            BigInt::from(-1),
        ] {
            let want: Vec<u64> = moduli
                .iter()
                .map(|q| c.mod_floor(&BigInt::from(*q)).to_u64().unwrap())
                .collect();
            assert_eq!(ring.bigint_to_rns(&c), want);
        }
        assert_eq!(
            ring.bigint_to_rns(&BigInt::from(-1)),
            moduli.iter().map(|q| q - 1).collect::<Vec<u64>>()
        );
        assert_eq!(
            ring.bigint_to_rns(&(BigInt::from(1u8) << 140u32)),
            ring.0.iter().map(|r| r.modulus.pow(2, 140)).collect::<Vec<u64>>()
        );
    }
}
