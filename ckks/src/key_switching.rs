use crate::keys::SwitchingKey;
use crate::parameters::Parameters;
use rayon::prelude::*;
use rns::poly::{Poly, PolyRNS};
use rns::ring::RingRNS;

/// Returns (u0, u1) over q_0 * ... * q_level such that u0 + u1*s_to = d*s_from + e,
/// for the s_from -> s_to switching key `key`. Expects d in the NTT domain.
pub(crate) fn key_switch(params: &Parameters, level: usize, d: &PolyRNS<u64>, key: &SwitchingKey) -> [PolyRNS<u64>; 2] {
    debug_assert!(d.level() >= level, "d.level()={} < level={}", d.level(), level);
    debug_assert!(key.rows.len() > level, "key.rows()={} <= level={}", key.rows.len(), level);

    let ring_q: RingRNS<u64> = params.ring_q(level);
    let ring_qp: RingRNS<u64> = params.ring_qp(level);
    let special: usize = params.max_level() + 1;

    let mut d_coeffs: PolyRNS<u64> = ring_q.new_polyrns();
    ring_q.intt(d, &mut d_coeffs);

    // [d]_{q_i} lifted onto q_0 * ... * q_level * P.
    let digits: Vec<PolyRNS<u64>> = (0..=level)
        .into_par_iter()
        .map(|i| {
            let mut digit: PolyRNS<u64> = ring_qp.new_polyrns();
            ring_qp.center_lift(d_coeffs.at(i), ring_q.0[i].modulus.q, &mut digit);
            ring_qp.ntt_inplace(&mut digit);
            digit
        })
        .collect();

    let mut u0: PolyRNS<u64> = ring_qp.new_polyrns();
    let mut u1: PolyRNS<u64> = ring_qp.new_polyrns();

    ring_qp
        .0
        .par_iter()
        .zip(u0.0.par_iter_mut().zip(u1.0.par_iter_mut()))
        .enumerate()
        .for_each(|(j, (ring, (u0, u1)))| {
            let k: usize = if j <= level { j } else { special };
            digits.iter().zip(key.rows.iter()).for_each(|(digit, row)| {
                ring.mul_add(digit.at(j), row[0].at(k), u0);
                ring.mul_add(digit.at(j), row[1].at(k), u1);
            });
        });

    ring_qp.div_round_by_last_modulus_ntt_inplace(&mut u0);
    ring_qp.div_round_by_last_modulus_ntt_inplace(&mut u1);

    [u0, u1]
}

/// b[i] += (P mod q_i) * s_from[i] for every q_i. Together with the
/// encryption under s_to already held in b, this makes row i an encryption
/// of P * g_i * s_from, g_i the CRT idempotent of q_i.
pub(crate) fn add_gadget(params: &Parameters, row: usize, s_from: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
    let ring_q: RingRNS<u64> = params.ring_q(params.max_level());
    let ring = &ring_q.0[row];
    let p: u64 = ring.modulus.barrett.reduce(params.special_modulus());
    let mut ps: Poly<u64> = ring.new_poly();
    ring.mul_scalar(s_from.at(row), p, &mut ps);
    ring.add_inplace(&ps, b.at_mut(row));
}
