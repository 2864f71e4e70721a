use crate::dft::ntt::Table;
use crate::modulus::barrett::Barrett;
use crate::modulus::prime::Prime;
use crate::poly::Poly;
use crate::ring::Ring;
use itertools::izip;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::ToPrimitive;

impl Ring<u64> {
    /// Panics if n is not a power of two or if q is not a prime = 1 mod 2n.
    pub fn new(n: usize, q: u64) -> Self {
        assert!(
            n.is_power_of_two() && n >= 2,
            "invalid n={}: not a power-of-two >= 2",
            n
        );
        let prime: Prime<u64> = Prime::<u64>::new(q);
        Self {
            n,
            modulus: prime.clone(),
            dft: Box::new(Table::<u64>::new(prime, (2 * n) as u64)),
        }
    }

    /// Writes coeffs[i] mod q at index i*step of a.
    pub fn from_bigint(&self, coeffs: &[BigInt], step: usize, a: &mut Poly<u64>) {
        assert!(
            step <= a.n(),
            "invalid step: step={} > a.n()={}",
            step,
            a.n()
        );
        assert!(
            coeffs.len() <= a.n() / step,
            "invalid coeffs: coeffs.len()={} > a.n()/step={}",
            coeffs.len(),
            a.n() / step
        );
        let q_big: BigInt = BigInt::from(self.modulus.q);
        izip!(a.0.iter_mut().step_by(step), coeffs.iter())
            .for_each(|(v, c)| *v = c.mod_floor(&q_big).to_u64().unwrap_or_default());
    }

    /// a[i] <- coeffs[i] mod q.
    pub fn from_i64(&self, coeffs: &[i64], a: &mut Poly<u64>) {
        debug_assert!(coeffs.len() == a.n(), "coeffs.len()={} != a.n()={}", coeffs.len(), a.n());
        let barrett = &self.modulus.barrett;
        izip!(a.0.iter_mut(), coeffs.iter()).for_each(|(v, c)| {
            let r: u64 = barrett.reduce(c.unsigned_abs());
            *v = if *c < 0 { barrett.sub_mod(0, r) } else { r };
        });
    }
}

impl Ring<u64> {
    #[inline(always)]
    pub fn ntt_inplace(&self, a: &mut Poly<u64>) {
        self.dft.forward_inplace(&mut a.0)
    }

    #[inline(always)]
    pub fn intt_inplace(&self, a: &mut Poly<u64>) {
        self.dft.backward_inplace(&mut a.0)
    }

    pub fn ntt(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        b.0.copy_from_slice(&a.0);
        self.dft.forward_inplace(&mut b.0)
    }

    pub fn intt(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        b.0.copy_from_slice(&a.0);
        self.dft.backward_inplace(&mut b.0)
    }
}

impl Ring<u64> {
    /// c <- a + b
    #[inline(always)]
    pub fn add(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        let barrett = &self.modulus.barrett;
        izip!(a.0.iter(), b.0.iter(), c.0.iter_mut()).for_each(|(a, b, c)| *c = barrett.add_mod(*a, *b));
    }

    /// b <- b + a
    #[inline(always)]
    pub fn add_inplace(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        let barrett = &self.modulus.barrett;
        izip!(a.0.iter(), b.0.iter_mut()).for_each(|(a, b)| *b = barrett.add_mod(*a, *b));
    }

    /// c <- a - b
    #[inline(always)]
    pub fn sub(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        let barrett = &self.modulus.barrett;
        izip!(a.0.iter(), b.0.iter(), c.0.iter_mut()).for_each(|(a, b, c)| *c = barrett.sub_mod(*a, *b));
    }

    /// b <- b - a
    #[inline(always)]
    pub fn sub_inplace(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        let barrett = &self.modulus.barrett;
        izip!(a.0.iter(), b.0.iter_mut()).for_each(|(a, b)| *b = barrett.sub_mod(*b, *a));
    }

    /// b <- -a
    #[inline(always)]
    pub fn neg(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        let barrett = &self.modulus.barrett;
        izip!(a.0.iter(), b.0.iter_mut()).for_each(|(a, b)| *b = barrett.sub_mod(0, *a));
    }

    #[inline(always)]
    pub fn neg_inplace(&self, a: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        let barrett = &self.modulus.barrett;
        a.0.iter_mut().for_each(|a| *a = barrett.sub_mod(0, *a));
    }

    /// c <- a * b, pointwise (NTT domain).
    #[inline(always)]
    pub fn mul(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        let barrett = &self.modulus.barrett;
        izip!(a.0.iter(), b.0.iter(), c.0.iter_mut()).for_each(|(a, b, c)| *c = barrett.mul_mod(*a, *b));
    }

    /// b <- b * a, pointwise (NTT domain).
    #[inline(always)]
    pub fn mul_inplace(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        let barrett = &self.modulus.barrett;
        izip!(a.0.iter(), b.0.iter_mut()).for_each(|(a, b)| *b = barrett.mul_mod(*a, *b));
    }

    /// c <- c + a * b, pointwise (NTT domain).
    #[inline(always)]
    pub fn mul_add(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        let barrett = &self.modulus.barrett;
        izip!(a.0.iter(), b.0.iter(), c.0.iter_mut())
            .for_each(|(a, b, c)| *c = barrett.add_mod(*c, barrett.mul_mod(*a, *b)));
    }

    /// c <- a * b mod q.
    #[inline(always)]
    pub fn mul_scalar(&self, a: &Poly<u64>, b: u64, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        let barrett = &self.modulus.barrett;
        let b: Barrett<u64> = barrett.prepare(barrett.reduce(b));
        izip!(a.0.iter(), c.0.iter_mut()).for_each(|(a, c)| *c = barrett.mul_external(b, *a));
    }

    #[inline(always)]
    pub fn mul_scalar_inplace(&self, b: u64, a: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        let barrett = &self.modulus.barrett;
        let b: Barrett<u64> = barrett.prepare(barrett.reduce(b));
        a.0.iter_mut().for_each(|a| barrett.mul_external_assign(b, a));
    }

    /// Maps residues mod q_in, read as centered integers in (-q_in/2, q_in/2],
    /// to residues mod q.
    pub fn center_lift(&self, a: &Poly<u64>, q_in: u64, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        let barrett = &self.modulus.barrett;
        let half: u64 = q_in >> 1;
        izip!(a.0.iter(), b.0.iter_mut()).for_each(|(a, b)| {
            *b = if *a > half {
                barrett.sub_mod(0, barrett.reduce(q_in - *a))
            } else {
                barrett.reduce(*a)
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_lift() {
        let ring_in: Ring<u64> = Ring::new(8, 17);
        let ring: Ring<u64> = Ring::new(8, 0x800000000004001);
        let q: u64 = ring.modulus.q;
        let a: Poly<u64> = Poly((0..8u64).map(|i| i * 2 + 1).collect());
        let mut b: Poly<u64> = ring.new_poly();
        ring.center_lift(&a, ring_in.modulus.q, &mut b);
        // 1, 3, 5, 7 are kept; 9, 11, 13, 15 are -8, -6, -4, -2.
        assert_eq!(b.0, vec![1, 3, 5, 7, q - 8, q - 6, q - 4, q - 2]);
    }

    #[test]
    fn from_i64() {
        let ring: Ring<u64> = Ring::new(4, 17);
        let mut a: Poly<u64> = ring.new_poly();
        ring.from_i64(&[0, -1, 18, -17], &mut a);
        assert_eq!(a.0, vec![0, 16, 1, 0]);
    }
}
