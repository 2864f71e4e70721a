use crate::ciphertext::Ciphertext;
use crate::error::{Error, Result};
use crate::key_switching::key_switch;
use crate::keys::{EvalMultKey, RotationKeySet};
use crate::noise;
use crate::parameters::{Feature, Parameters};
use crate::plaintext::Plaintext;
use num_bigint::BigInt;
use num_traits::FromPrimitive;
use rns::automorphism::galois_element;
use rns::poly::PolyRNS;
use rns::ring::RingRNS;
use tracing::instrument;

/// Homomorphic operations. Operands are never modified: every operation
/// returns a fresh ciphertext.
pub struct Evaluator {
    params: Parameters,
}

impl Evaluator {
    pub fn new(params: &Parameters) -> Result<Self> {
        params.require(Feature::LeveledShe)?;
        Ok(Self {
            params: params.clone(),
        })
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    fn check_key_domain(a: &Ciphertext, b: &Ciphertext) -> Result<()> {
        if a.key_id != b.key_id {
            return Err(Error::KeyDomainMismatch {
                lhs: a.key_id,
                rhs: b.key_id,
            });
        }
        Ok(())
    }

    /// Applies f limb-wise to the pairs (a_i, b_i) at level min(a, b).
    fn binary<F>(&self, a: &Ciphertext, b: &Ciphertext, f: F) -> Ciphertext
    where
        F: Fn(&RingRNS<u64>, &PolyRNS<u64>, &PolyRNS<u64>, &mut PolyRNS<u64>),
    {
        let level: usize = a.level().min(b.level());
        let ring: RingRNS<u64> = self.params.ring_q(level);
        let value: Vec<PolyRNS<u64>> = a
            .value
            .iter()
            .zip(b.value.iter())
            .map(|(a, b)| {
                let mut c: PolyRNS<u64> = ring.new_polyrns();
                f(&ring, a, b, &mut c);
                c
            })
            .collect();
        Ciphertext {
            value,
            scale: a.scale.max(b.scale),
            key_id: a.key_id,
            slots: a.slots,
            noise: a.noise + b.noise,
        }
    }

    #[instrument(level = "debug", skip_all, fields(key = %a.key_id, level = a.level().min(b.level())))]
    pub fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        Self::check_key_domain(a, b)?;
        Ok(self.binary(a, b, |ring, a, b, c| ring.add(a, b, c)))
    }

    #[instrument(level = "debug", skip_all, fields(key = %a.key_id, level = a.level().min(b.level())))]
    pub fn sub(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        Self::check_key_domain(a, b)?;
        Ok(self.binary(a, b, |ring, a, b, c| ring.sub(a, b, c)))
    }

    pub fn negate(&self, a: &Ciphertext) -> Ciphertext {
        let ring: RingRNS<u64> = self.params.ring_q(a.level());
        let mut c: Ciphertext = a.clone();
        c.value.iter_mut().for_each(|c| ring.neg_inplace(c));
        c
    }

    /// Returns the ciphertext and the NTT of the plaintext, both at the
    /// lowest of their two levels.
    fn align_plain(&self, a: &Ciphertext, pt: &Plaintext) -> (Ciphertext, PolyRNS<u64>) {
        let level: usize = a.level().min(pt.level());
        let ring: RingRNS<u64> = self.params.ring_q(level);
        let mut p: PolyRNS<u64> = ring.new_polyrns();
        ring.ntt(&pt.value, &mut p);
        let c: Ciphertext = if a.level() > level {
            a.truncated(level)
        } else {
            a.clone()
        };
        (c, p)
    }

    #[instrument(level = "debug", skip_all, fields(key = %a.key_id, level = a.level()))]
    pub fn add_plain(&self, a: &Ciphertext, pt: &Plaintext) -> Ciphertext {
        let (mut c, p) = self.align_plain(a, pt);
        let ring: RingRNS<u64> = self.params.ring_q(c.level());
        ring.add_inplace(&p, &mut c.value[0]);
        c.scale = c.scale.max(pt.scale);
        c.noise += pt.noise;
        c
    }

    /// Multiplies by pt and rescales.
    #[instrument(level = "debug", skip_all, fields(key = %a.key_id, level = a.level()))]
    pub fn mul_plain(&self, a: &Ciphertext, pt: &Plaintext) -> Result<Ciphertext> {
        let (mut c, p) = self.align_plain(a, pt);
        let level: usize = c.level();
        if level == 0 {
            return Err(Error::DepthExhausted);
        }
        let ring: RingRNS<u64> = self.params.ring_q(level);
        c.value.iter_mut().for_each(|c| ring.mul_inplace(&p, c));
        let q: f64 = self.q(level);
        c.noise = noise::mul_then_rescale(&self.params, c.noise, c.scale, pt.noise, pt.scale, 0.0, q);
        c.scale = c.scale * pt.scale / q;
        self.rescale_inplace(&mut c);
        Ok(c)
    }

    /// Multiplies by round(x * q_level) and rescales, which keeps the scale.
    #[instrument(level = "debug", skip_all, fields(key = %a.key_id, level = a.level()))]
    pub fn mul_scalar(&self, a: &Ciphertext, x: f64) -> Result<Ciphertext> {
        if !x.is_finite() {
            return Err(Error::NonFiniteValue { index: 0 });
        }
        let level: usize = a.level();
        if level == 0 {
            return Err(Error::DepthExhausted);
        }
        let ring: RingRNS<u64> = self.params.ring_q(level);
        let k: BigInt =
            BigInt::from_f64((x * self.q(level)).round()).ok_or(Error::NonFiniteValue { index: 0 })?;
        let scalars: Vec<u64> = ring.bigint_to_rns(&k);

        let mut c: Ciphertext = a.clone();
        c.value
            .iter_mut()
            .for_each(|c| ring.mul_scalar_rns_inplace(&scalars, c));
        self.rescale_inplace(&mut c);
        c.noise = x.abs().max(1.0) * a.noise + noise::rescale(&self.params);
        Ok(c)
    }

    /// Tensors, relinearizes with evk and rescales.
    #[instrument(level = "debug", skip_all, fields(key = %a.key_id, level = a.level().min(b.level())))]
    pub fn mul(&self, a: &Ciphertext, b: &Ciphertext, evk: &EvalMultKey) -> Result<Ciphertext> {
        Self::check_key_domain(a, b)?;
        if evk.owner != a.key_id {
            return Err(Error::KeyDomainMismatch {
                lhs: evk.owner,
                rhs: a.key_id,
            });
        }
        let level: usize = a.level().min(b.level());
        if level == 0 {
            return Err(Error::DepthExhausted);
        }

        let ring: RingRNS<u64> = self.params.ring_q(level);
        let (a0, a1) = (&a.value[0], &a.value[1]);
        let (b0, b1) = (&b.value[0], &b.value[1]);

        let mut d0: PolyRNS<u64> = ring.new_polyrns();
        let mut d1: PolyRNS<u64> = ring.new_polyrns();
        let mut d2: PolyRNS<u64> = ring.new_polyrns();
        ring.mul(a0, b0, &mut d0);
        ring.mul(a0, b1, &mut d1);
        ring.mul_add(a1, b0, &mut d1);
        ring.mul(a1, b1, &mut d2);

        let [u0, u1] = key_switch(&self.params, level, &d2, &evk.key);
        ring.add_inplace(&u0, &mut d0);
        ring.add_inplace(&u1, &mut d1);

        let q: f64 = self.q(level);
        let mut c: Ciphertext = Ciphertext {
            value: vec![d0, d1],
            scale: a.scale * b.scale / q,
            key_id: a.key_id,
            slots: a.slots,
            noise: noise::mul_then_rescale(
                &self.params,
                a.noise,
                a.scale,
                b.noise,
                b.scale,
                noise::key_switch(&self.params, level),
                q,
            ),
        };
        self.rescale_inplace(&mut c);
        Ok(c)
    }

    /// Rotates the slots left by k (right for k < 0), cyclically over slots.
    #[instrument(level = "debug", skip_all, fields(key = %a.key_id, level = a.level(), shift = k))]
    pub fn rotate(&self, a: &Ciphertext, k: i64, keys: &RotationKeySet) -> Result<Ciphertext> {
        if keys.owner != a.key_id {
            return Err(Error::KeyDomainMismatch {
                lhs: keys.owner,
                rhs: a.key_id,
            });
        }
        let shift: usize = keys.normalize(k);
        if shift == 0 {
            return Ok(a.clone());
        }
        let gal_el: usize = galois_element(shift as i64, self.params.n() << 1);
        let (key, perm) = keys
            .get(k)
            .zip(keys.perm(gal_el))
            .ok_or(Error::MissingRotationKey(k))?;

        let level: usize = a.level();
        let ring: RingRNS<u64> = self.params.ring_q(level);

        let rotated: Vec<PolyRNS<u64>> = a
            .value
            .iter()
            .map(|c| {
                let mut tmp: PolyRNS<u64> = ring.new_polyrns();
                let mut res: PolyRNS<u64> = ring.new_polyrns();
                ring.intt(c, &mut tmp);
                ring.automorphism_from_perm(&tmp, perm, &mut res);
                ring.ntt_inplace(&mut res);
                res
            })
            .collect();

        let [mut c0, c1] = key_switch(&self.params, level, &rotated[1], key);
        ring.add_inplace(&rotated[0], &mut c0);

        Ok(Ciphertext {
            value: vec![c0, c1],
            scale: a.scale,
            key_id: a.key_id,
            slots: a.slots,
            noise: a.noise + noise::key_switch(&self.params, level),
        })
    }

    /// Drops the moduli above `level` without touching scale or message.
    pub fn drop_to_level(&self, a: &Ciphertext, level: usize) -> Result<Ciphertext> {
        if level > a.level() {
            return Err(Error::LevelMismatch {
                expected: a.level(),
                found: level,
            });
        }
        Ok(a.truncated(level))
    }

    fn q(&self, level: usize) -> f64 {
        self.params.modulus(level) as f64
    }

    fn rescale_inplace(&self, c: &mut Ciphertext) {
        let ring: RingRNS<u64> = self.params.ring_q(c.level());
        c.value
            .iter_mut()
            .for_each(|c| ring.div_round_by_last_modulus_ntt_inplace(c));
    }
}
