//! Heuristic canonical-embedding bounds on the error carried by plaintexts
//! and ciphertexts, in units of the underlying integer coefficients.

use crate::parameters::Parameters;

/// Rounding of scaled slot values to integer coefficients.
pub fn encoding(params: &Parameters) -> f64 {
    (3.0 * params.n() as f64).sqrt()
}

/// e*u + e0 + e1*s for a public-key encryption.
pub fn fresh_public(params: &Parameters) -> f64 {
    let n: f64 = params.n() as f64;
    let sigma: f64 = params.xe();
    let h: f64 = params.xs() * n;
    8.0 * std::f64::consts::SQRT_2 * sigma * n + 6.0 * sigma * n.sqrt() + 16.0 * sigma * (h * n).sqrt()
}

/// e for a secret-key encryption.
pub fn fresh_secret(params: &Parameters) -> f64 {
    6.0 * params.xe() * (params.n() as f64).sqrt()
}

/// Rounding error of a division by one modulus.
pub fn rescale(params: &Parameters) -> f64 {
    let n: f64 = params.n() as f64;
    let h: f64 = params.xs() * n;
    (n / 3.0).sqrt() * (3.0 + 8.0 * h.sqrt())
}

/// Additive error of a key switch at `level`.
pub fn key_switch(params: &Parameters, level: usize) -> f64 {
    let n: f64 = params.n() as f64;
    let q_max: f64 = (0..=level)
        .map(|i| params.modulus(i) as f64)
        .fold(0.0, f64::max);
    let p: f64 = params.special_modulus() as f64;
    (level as f64 + 1.0) * 8.0 * params.xe() * n * q_max / (3f64.sqrt() * p) + rescale(params)
}

/// Additive error of a re-encryption at `level`. The rows of a re-encryption
/// key carry e0 + v*e + e1*s_to instead of a single fresh error.
pub fn reencryption(params: &Parameters, level: usize) -> f64 {
    let h: f64 = params.xs() * params.n() as f64;
    (key_switch(params, level) - rescale(params)) * (1.0 + 2.0 * h.sqrt()) + rescale(params)
}

/// Error of a product of two messages with errors n1, n2 at scales s1, s2,
/// followed by a division by q.
pub fn mul_then_rescale(params: &Parameters, n1: f64, s1: f64, n2: f64, s2: f64, extra: f64, q: f64) -> f64 {
    (n1 * s2 + n2 * s1 + n1 * n2 + extra) / q + rescale(params)
}

/// log2(scale / noise).
pub fn precision_bits(scale: f64, noise: f64) -> f64 {
    (scale / noise.max(1.0)).log2()
}
