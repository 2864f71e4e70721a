use crate::error::{Error, Result};
use crate::noise;
use crate::parameters::Parameters;
use crate::plaintext::Plaintext;
use num_bigint::BigInt;
use num_complex::Complex64;
use num_traits::{FromPrimitive, ToPrimitive};
use rns::automorphism::GALOIS_GENERATOR;
use rns::poly::PolyRNS;
use rns::ring::RingRNS;
use std::f64::consts::PI;

/// Maps slot vectors to scaled integer polynomials and back.
///
/// Slot j holds the evaluation of the message at zeta^(5^j), zeta a primitive
/// (4 * slots)-th root of unity, so that X -> X^(5^k) rotates the slots to
/// the left by k. With fewer than n/2 slots the message lives in the
/// subring generated by X^gap, gap = n / (2 * slots).
pub struct Encoder {
    params: Parameters,
    /// exp(2*pi*i*j/M), M = 2n, for j in [0, M].
    ksi_pows: Vec<Complex64>,
    /// 5^j mod M
    rot_group: Vec<usize>,
}

impl Encoder {
    pub fn new(params: &Parameters) -> Self {
        let m: usize = params.n() << 1;
        let ksi_pows: Vec<Complex64> = (0..=m)
            .map(|j| Complex64::from_polar(1.0, 2.0 * PI * j as f64 / m as f64))
            .collect();
        let mut rot_group: Vec<usize> = Vec::with_capacity(params.n() >> 1);
        let mut g: usize = 1;
        for _ in 0..params.n() >> 1 {
            rot_group.push(g);
            g = (g * GALOIS_GENERATOR) % m;
        }
        Self {
            params: params.clone(),
            ksi_pows,
            rot_group,
        }
    }

    fn gap(&self) -> usize {
        (self.params.n() >> 1) / self.params.slots()
    }

    /// Encodes at the top level with scale 2^scaling_mod_bits.
    pub fn encode(&self, values: &[f64]) -> Result<Plaintext> {
        self.encode_at(values, self.params.max_level(), self.params.default_scale())
    }

    pub fn encode_at(&self, values: &[f64], level: usize, scale: f64) -> Result<Plaintext> {
        let slots: usize = self.params.slots();
        if values.len() > slots {
            return Err(Error::SlotOverflow {
                len: values.len(),
                slots,
            });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(Error::NonFiniteValue { index });
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::InvalidParameters(format!(
                "scale={} must be finite and > 0",
                scale
            )));
        }
        if level > self.params.max_level() {
            return Err(Error::LevelMismatch {
                expected: self.params.max_level(),
                found: level,
            });
        }

        let mut z: Vec<Complex64> = vec![Complex64::default(); slots];
        z.iter_mut()
            .zip(values.iter())
            .for_each(|(z, v)| *z = Complex64::new(*v, 0.0));
        self.fft_special_inv(&mut z);

        let to_int = |x: f64| {
            BigInt::from_f64((x * scale).round()).ok_or_else(|| {
                Error::InvalidParameters(format!("scale={} overflows the encoded coefficients", scale))
            })
        };
        let coeffs: Vec<BigInt> = z
            .iter()
            .map(|z| to_int(z.re))
            .chain(z.iter().map(|z| to_int(z.im)))
            .collect::<Result<Vec<BigInt>>>()?;

        let ring: RingRNS<u64> = self.params.ring_q(level);
        let mut value: PolyRNS<u64> = ring.new_polyrns();
        ring.from_bigint_inplace(&coeffs, self.gap(), &mut value);

        Ok(Plaintext {
            value,
            scale,
            slots,
            noise: noise::encoding(&self.params),
        })
    }

    /// Returns the real parts of the first min(len, slots) slots.
    pub fn decode(&self, pt: &Plaintext, len: usize) -> Vec<f64> {
        let slots: usize = pt.slots;
        let ring: RingRNS<u64> = self.params.ring_q(pt.level());
        let mut coeffs: Vec<BigInt> = vec![BigInt::default(); slots << 1];
        ring.to_bigint_inplace(&pt.value, self.gap(), &mut coeffs);

        let to_f64 = |c: &BigInt| c.to_f64().unwrap_or(f64::NAN) / pt.scale;
        let mut z: Vec<Complex64> = (0..slots)
            .map(|i| Complex64::new(to_f64(&coeffs[i]), to_f64(&coeffs[slots + i])))
            .collect();
        self.fft_special(&mut z);

        z.iter().take(len.min(slots)).map(|z| z.re).collect()
    }

    /// Evaluates the message at zeta^(5^j) for every slot j.
    fn fft_special(&self, vals: &mut [Complex64]) {
        let size: usize = vals.len();
        let m: usize = self.params.n() << 1;
        bit_reverse(vals);
        let mut len: usize = 2;
        while len <= size {
            let (lenh, lenq) = (len >> 1, len << 2);
            for i in (0..size).step_by(len) {
                for j in 0..lenh {
                    let idx: usize = (self.rot_group[j] % lenq) * m / lenq;
                    let u: Complex64 = vals[i + j];
                    let v: Complex64 = vals[i + j + lenh] * self.ksi_pows[idx];
                    vals[i + j] = u + v;
                    vals[i + j + lenh] = u - v;
                }
            }
            len <<= 1;
        }
    }

    /// Inverse of [Encoder::fft_special].
    fn fft_special_inv(&self, vals: &mut [Complex64]) {
        let size: usize = vals.len();
        let m: usize = self.params.n() << 1;
        let mut len: usize = size;
        while len >= 2 {
            let (lenh, lenq) = (len >> 1, len << 2);
            for i in (0..size).step_by(len) {
                for j in 0..lenh {
                    let idx: usize = (lenq - (self.rot_group[j] % lenq)) * m / lenq;
                    let u: Complex64 = vals[i + j] + vals[i + j + lenh];
                    let v: Complex64 = (vals[i + j] - vals[i + j + lenh]) * self.ksi_pows[idx];
                    vals[i + j] = u;
                    vals[i + j + lenh] = v;
                }
            }
            len >>= 1;
        }
        bit_reverse(vals);
        let inv: f64 = 1.0 / size as f64;
        vals.iter_mut().for_each(|v| *v *= inv);
    }
}

fn bit_reverse<T>(vals: &mut [T]) {
    let n: usize = vals.len();
    let mut j: usize = 0;
    for i in 1..n {
        let mut bit: usize = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            vals.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{ParametersLiteral, SecurityLevel};
    use rns::automorphism::galois_element;

    fn params(batch_size: usize) -> Parameters {
        Parameters::new(&ParametersLiteral {
            mult_depth: 2,
            scaling_mod_bits: 40,
            batch_size,
            ring_dimension: Some(1 << 6),
            security_level: SecurityLevel::NotSet,
            ..Default::default()
        })
        .unwrap()
    }

    fn assert_close(have: &[f64], want: &[f64], eps: f64) {
        assert_eq!(have.len(), want.len());
        have.iter()
            .zip(want.iter())
            .for_each(|(h, w)| assert!((h - w).abs() < eps, "have={:?} want={:?}", have, want));
    }

    #[test]
    fn encode_decode() {
        for batch_size in [1, 4, 32] {
            let params: Parameters = params(batch_size);
            let encoder: Encoder = Encoder::new(&params);
            let values: Vec<f64> = (0..batch_size).map(|i| i as f64 * 0.25 - 1.5).collect();
            let pt: Plaintext = encoder.encode(&values).unwrap();
            assert_eq!(pt.level(), 2);
            assert_close(&encoder.decode(&pt, batch_size), &values, 1e-6);
        }
    }

    #[test]
    fn padding_and_truncation() {
        let params: Parameters = params(8);
        let encoder: Encoder = Encoder::new(&params);
        let pt: Plaintext = encoder.encode(&[1.0, -2.0]).unwrap();
        assert_close(&encoder.decode(&pt, 100), &[1.0, -2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 1e-6);
        assert_close(&encoder.decode(&pt, 1), &[1.0], 1e-6);
    }

    #[test]
    fn encode_errors() {
        let params: Parameters = params(4);
        let encoder: Encoder = Encoder::new(&params);
        assert_eq!(
            encoder.encode(&[0.0; 5]).unwrap_err(),
            Error::SlotOverflow { len: 5, slots: 4 }
        );
        assert_eq!(
            encoder.encode(&[0.0, f64::INFINITY]).unwrap_err(),
            Error::NonFiniteValue { index: 1 }
        );
        assert_eq!(
            encoder.encode_at(&[0.0], 3, 1e6).unwrap_err(),
            Error::LevelMismatch {
                expected: 2,
                found: 3
            }
        );
        let is_invalid = |r: Result<Plaintext>| matches!(r, Err(Error::InvalidParameters(_)));
        for scale in [f64::NAN, f64::INFINITY, 0.0, -1e6] {
            assert!(is_invalid(encoder.encode_at(&[1.0, 2.0], 2, scale)), "scale={}", scale);
        }
        assert!(is_invalid(encoder.encode_at(&[1e10, 1e10], 2, f64::MAX)));
    }

    #[test]
    fn automorphism_rotates_slots_left() {
        let params: Parameters = params(8);
        let encoder: Encoder = Encoder::new(&params);
        let values: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let pt: Plaintext = encoder.encode(&values).unwrap();
        let ring: RingRNS<u64> = params.ring_q(pt.level());
        for k in [1i64, 3, -1] {
            let mut rotated: Plaintext = pt.clone();
            ring.automorphism(&pt.value, galois_element(k, params.n() << 1), &mut rotated.value);
            let want: Vec<f64> = (0..8)
                .map(|i| values[(i as i64 + k).rem_euclid(8) as usize])
                .collect();
            assert_close(&encoder.decode(&rotated, 8), &want, 1e-6);
        }
    }
}
