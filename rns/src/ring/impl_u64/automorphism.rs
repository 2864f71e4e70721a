use crate::automorphism::{AutoPerm, SIGN_BIT};
use crate::modulus::WordOps;
use crate::poly::{Poly, PolyRNS};
use crate::ring::{Ring, RingRNS};
use rayon::prelude::*;

impl Ring<u64> {
    /// b <- a(X^gal_el) mod X^n+1, in the coefficient domain.
    /// Panics if gal_el is even.
    pub fn automorphism(&self, a: &Poly<u64>, gal_el: usize, b: &mut Poly<u64>) {
        debug_assert!(
            a.n() == b.n(),
            "invalid inputs: a.n() = {} != b.n() = {}",
            a.n(),
            b.n()
        );
        assert!(
            gal_el & 1 == 1,
            "invalid gal_el={}: not coprime with nth_root={}",
            gal_el,
            self.n() << 1
        );

        let n: usize = a.n();
        let mask: usize = n - 1;
        let log_n: usize = n.log2();
        let q: u64 = self.modulus.q();
        a.0.iter().enumerate().for_each(|(i, ai)| {
            let gal_el_i: usize = i * gal_el;
            let sign: u64 = ((gal_el_i >> log_n) & 1) as u64;
            let i_out: usize = gal_el_i & mask;
            b.0[i_out] = if sign == 1 && *ai != 0 { q - ai } else { *ai };
        });
    }

    pub fn automorphism_from_perm(&self, a: &Poly<u64>, perm: &AutoPerm, b: &mut Poly<u64>) {
        debug_assert!(
            a.n() == b.n(),
            "invalid inputs: a.n() = {} != b.n() = {}",
            a.n(),
            b.n()
        );
        debug_assert!(
            perm.permutation.len() == a.n(),
            "invalid perm: perm.permutation.len()={} != a.n()={}",
            perm.permutation.len(),
            a.n()
        );
        let q: u64 = self.modulus.q();
        a.0.iter()
            .zip(perm.permutation.iter())
            .for_each(|(ai, idx)| {
                let negate: bool = idx & SIGN_BIT != 0;
                b.0[idx & !SIGN_BIT] = if negate && *ai != 0 { q - ai } else { *ai };
            });
    }
}

impl RingRNS<u64> {
    pub fn automorphism(&self, a: &PolyRNS<u64>, gal_el: usize, b: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        debug_assert!(b.level() >= self.level(), "b.level()={} < self.level()={}", b.level(), self.level());
        self.0
            .par_iter()
            .zip(b.0.par_iter_mut())
            .enumerate()
            .for_each(|(i, (ring, b))| ring.automorphism(a.at(i), gal_el, b));
    }

    pub fn automorphism_from_perm(&self, a: &PolyRNS<u64>, perm: &AutoPerm, b: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        debug_assert!(b.level() >= self.level(), "b.level()={} < self.level()={}", b.level(), self.level());
        self.0
            .par_iter()
            .zip(b.0.par_iter_mut())
            .enumerate()
            .for_each(|(i, (ring, b))| ring.automorphism_from_perm(a.at(i), perm, b));
    }
}
