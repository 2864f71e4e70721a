use crate::modulus::WordOps;
use crate::poly::{Poly, PolyRNS};
use crate::ring::{Ring, RingRNS};
use rand_distr::Distribution;
use sampling::source::Source;

impl Ring<u64> {
    pub fn fill_uniform(&self, source: &mut Source, a: &mut Poly<u64>) {
        let max: u64 = self.modulus.q;
        let mask: u64 = max.mask();
        a.0.iter_mut()
            .for_each(|a| *a = source.next_u64n(max, mask));
    }
}

impl RingRNS<u64> {
    /// Samples every limb independently, i.e. a uniform element of Z_Q[X]/(X^n+1).
    pub fn fill_uniform(&self, source: &mut Source, a: &mut PolyRNS<u64>) {
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, r)| r.fill_uniform(source, a.at_mut(i)));
    }

    /// Samples a ternary polynomial with P[+1] = P[-1] = prob/2 and writes the
    /// same integer coefficients on every limb.
    pub fn fill_ternary_prob(&self, prob: f64, source: &mut Source, a: &mut PolyRNS<u64>) {
        assert!(
            (0.0..=1.0).contains(&prob),
            "invalid prob={}: not in [0, 1]",
            prob
        );
        let coeffs: Vec<i64> = (0..self.n()).map(|_| source.next_ternary(prob)).collect();
        self.from_i64(&coeffs, a);
    }

    /// Samples round(x) with x drawn from dist and |x| <= bound (by rejection),
    /// and writes the same integer coefficients on every limb.
    pub fn fill_dist_f64<D: Distribution<f64>>(
        &self,
        source: &mut Source,
        dist: &D,
        bound: f64,
        a: &mut PolyRNS<u64>,
    ) {
        let coeffs: Vec<i64> = (0..self.n())
            .map(|_| {
                let mut x: f64 = dist.sample(source);
                while x.abs() > bound {
                    x = dist.sample(source);
                }
                x.round() as i64
            })
            .collect();
        self.from_i64(&coeffs, a);
    }
}
