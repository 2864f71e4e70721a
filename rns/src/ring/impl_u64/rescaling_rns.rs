use crate::poly::{Poly, PolyRNS};
use crate::ring::RingRNS;
use rayon::prelude::*;

impl RingRNS<u64> {
    /// Updates b to round(a / q[self.level()]) over the limbs [0, self.level()-1].
    /// Expects a and b to be in the NTT domain.
    pub fn div_round_by_last_modulus_ntt(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        let level: usize = self.level();
        assert!(level >= 1, "invalid self.level()=0: no modulus left to divide by");
        assert!(
            a.level() >= level,
            "invalid input a: a.level()={} < self.level()={}",
            a.level(),
            level
        );
        assert!(
            b.level() >= level - 1,
            "invalid input b: b.level()={} < self.level()-1={}",
            b.level(),
            level - 1
        );

        let last = &self.0[level];
        let q_last: u64 = last.modulus.q;
        let mut a_last: Poly<u64> = last.new_poly();
        last.intt(a.at(level), &mut a_last);

        // Centering [a]_{q_last} turns the floor of (a - [a]_{q_last}) / q_last
        // into a rounding of a / q_last.
        self.0[..level]
            .par_iter()
            .zip(b.0.par_iter_mut())
            .enumerate()
            .for_each(|(i, (ring, b))| {
                let mut r: Poly<u64> = ring.new_poly();
                ring.center_lift(&a_last, q_last, &mut r);
                ring.ntt_inplace(&mut r);
                ring.sub(a.at(i), &r, b);
                let q_last_inv: u64 = ring.modulus.inv(ring.modulus.barrett.reduce(q_last));
                ring.mul_scalar_inplace(q_last_inv, b);
            });
    }

    /// Updates a to round(a / q[self.level()]) and drops its last limb.
    /// Expects a to be in the NTT domain.
    pub fn div_round_by_last_modulus_ntt_inplace(&self, a: &mut PolyRNS<u64>) {
        let level: usize = self.level();
        assert!(level >= 1, "invalid self.level()=0: no modulus left to divide by");
        let (head, tail) = a.split_at_mut(level);

        let last = &self.0[level];
        let q_last: u64 = last.modulus.q;
        let mut a_last: Poly<u64> = tail[0].clone();
        last.intt_inplace(&mut a_last);

        self.0[..level]
            .par_iter()
            .zip(head.par_iter_mut())
            .for_each(|(ring, a)| {
                let mut r: Poly<u64> = ring.new_poly();
                ring.center_lift(&a_last, q_last, &mut r);
                ring.ntt_inplace(&mut r);
                ring.sub_inplace(&r, a);
                let q_last_inv: u64 = ring.modulus.inv(ring.modulus.barrett.reduce(q_last));
                ring.mul_scalar_inplace(q_last_inv, a);
            });

        a.truncate(level - 1);
    }
}
