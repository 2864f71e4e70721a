use crate::error::{Error, Result};
use rand_distr::Normal;
use rns::modulus::prime_generator::NTTFriendlyPrimesGenerator;
use rns::ring::RingRNS;
use tracing::{debug, info};

pub const MIN_LOG_N: usize = 3;
pub const MAX_LOG_N: usize = 17;

/// Default bit size of q_0.
pub const DEFAULT_FIRST_MOD_BITS: usize = 60;
pub const DEFAULT_SIGMA: f64 = 3.19;
pub const DEFAULT_TERNARY_DENSITY: f64 = 2.0 / 3.0;

/// Maximum log2(QP) for log_n = 10..=17 with a ternary secret
/// (homomorphicencryption.org standard).
const MAX_LOG_QP_128: [usize; 8] = [27, 54, 109, 218, 438, 881, 1761, 3524];
const MAX_LOG_QP_192: [usize; 8] = [19, 37, 75, 152, 305, 611, 1220, 2441];
const MAX_LOG_QP_256: [usize; 8] = [14, 29, 58, 118, 237, 476, 956, 1915];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SecurityLevel {
    /// No lower bound on the ring dimension. For tests only.
    NotSet,
    #[default]
    Classic128,
    Classic192,
    Classic256,
}

impl SecurityLevel {
    /// Smallest log_n whose standard bound admits log_qp bits.
    fn min_log_n(&self, log_qp: usize) -> Option<usize> {
        let table: &[usize; 8] = match self {
            SecurityLevel::NotSet => return Some(MIN_LOG_N),
            SecurityLevel::Classic128 => &MAX_LOG_QP_128,
            SecurityLevel::Classic192 => &MAX_LOG_QP_192,
            SecurityLevel::Classic256 => &MAX_LOG_QP_256,
        };
        table
            .iter()
            .position(|max| *max >= log_qp)
            .map(|i| i + 10)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    Pke,
    KeySwitch,
    LeveledShe,
    Pre,
}

impl Feature {
    fn bit(&self) -> u8 {
        match self {
            Feature::Pke => 1,
            Feature::KeySwitch => 2,
            Feature::LeveledShe => 4,
            Feature::Pre => 8,
        }
    }
}

/// Capabilities unlocked for a parameter set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeatureSet(u8);

impl FeatureSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Self::empty()
            .with(Feature::Pke)
            .with(Feature::KeySwitch)
            .with(Feature::LeveledShe)
            .with(Feature::Pre)
    }

    pub fn with(mut self, feature: Feature) -> Self {
        self.enable(feature);
        self
    }

    pub fn enable(&mut self, feature: Feature) {
        self.0 |= feature.bit()
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.0 & feature.bit() != 0
    }
}

pub struct ParametersLiteral {
    pub mult_depth: usize,
    pub scaling_mod_bits: usize,
    pub first_mod_bits: usize,
    /// Number of slots; 0 selects n/2.
    pub batch_size: usize,
    pub ring_dimension: Option<usize>,
    pub security_level: SecurityLevel,
    pub xe: f64,
    pub xs: f64,
    pub features: FeatureSet,
}

impl Default for ParametersLiteral {
    fn default() -> Self {
        Self {
            mult_depth: 1,
            scaling_mod_bits: 50,
            first_mod_bits: DEFAULT_FIRST_MOD_BITS,
            batch_size: 0,
            ring_dimension: None,
            security_level: SecurityLevel::default(),
            xe: DEFAULT_SIGMA,
            xs: DEFAULT_TERNARY_DENSITY,
            features: FeatureSet::empty(),
        }
    }
}

/// Immutable scheme parameters.
///
/// The modulus chain is q_0, q_1, ..., q_L with L = mult_depth, followed by
/// the special modulus P used only inside key switching. Level l refers to
/// the ring modulo q_0 * ... * q_l.
#[derive(Clone, Debug)]
pub struct Parameters {
    log_n: usize,
    slots: usize,
    mult_depth: usize,
    scaling_mod_bits: usize,
    first_mod_bits: usize,
    security_level: SecurityLevel,
    xe: f64,
    xs: f64,
    normal: Normal<f64>,
    features: FeatureSet,
    ring_qp: RingRNS<u64>,
}

impl Parameters {
    /// Builds parameters from the three high-level knobs, with every
    /// feature enabled and 128-bit security.
    pub fn build(mult_depth: usize, scaling_mod_bits: usize, batch_size: usize) -> Result<Self> {
        Self::new(&ParametersLiteral {
            mult_depth,
            scaling_mod_bits,
            batch_size,
            features: FeatureSet::all(),
            ..Default::default()
        })
    }

    pub fn new(p: &ParametersLiteral) -> Result<Self> {
        if p.mult_depth == 0 {
            return Err(Error::InvalidParameters("mult_depth must be > 0".into()));
        }
        if !(20..=60).contains(&p.scaling_mod_bits) {
            return Err(Error::InvalidParameters(format!(
                "scaling_mod_bits={} not in [20, 60]",
                p.scaling_mod_bits
            )));
        }
        if p.first_mod_bits < p.scaling_mod_bits || p.first_mod_bits > 60 {
            return Err(Error::InvalidParameters(format!(
                "first_mod_bits={} not in [scaling_mod_bits={}, 60]",
                p.first_mod_bits, p.scaling_mod_bits
            )));
        }
        if !p.xe.is_finite() || p.xe <= 0.0 {
            return Err(Error::InvalidParameters(format!("xe={} must be finite and > 0", p.xe)));
        }
        if !(p.xs > 0.0 && p.xs <= 1.0) {
            return Err(Error::InvalidParameters(format!("xs={} not in (0, 1]", p.xs)));
        }
        if p.batch_size != 0 && !p.batch_size.is_power_of_two() {
            return Err(Error::InvalidParameters(format!(
                "batch_size={} is not a power of two",
                p.batch_size
            )));
        }

        // q_0 + L scaling primes + P
        let log_qp: usize = p
            .mult_depth
            .checked_mul(p.scaling_mod_bits)
            .and_then(|bits| bits.checked_add(2 * p.first_mod_bits + 1))
            .ok_or_else(|| {
                Error::InvalidParameters(format!(
                    "mult_depth={} overflows the modulus chain size",
                    p.mult_depth
                ))
            })?;
        if log_qp > MAX_LOG_QP_128[MAX_LOG_N - 10] {
            return Err(Error::InvalidParameters(format!(
                "log_qp={} exceeds {} bits, the largest chain a 2^{} ring holds",
                log_qp,
                MAX_LOG_QP_128[MAX_LOG_N - 10],
                MAX_LOG_N
            )));
        }

        let log_n_batch: usize = (p.batch_size.max(1) << 1).trailing_zeros() as usize;
        let log_n_security: usize = p.security_level.min_log_n(log_qp).ok_or_else(|| {
            Error::InvalidParameters(format!(
                "log_qp={} exceeds the {:?} bound of every supported ring dimension",
                log_qp, p.security_level
            ))
        })?;
        let log_n_min: usize = log_n_batch.max(log_n_security).max(MIN_LOG_N);

        let log_n: usize = match p.ring_dimension {
            Some(n) => {
                if !n.is_power_of_two() {
                    return Err(Error::InvalidParameters(format!(
                        "ring_dimension={} is not a power of two",
                        n
                    )));
                }
                let log_n: usize = n.trailing_zeros() as usize;
                if log_n < log_n_min {
                    return Err(Error::InvalidParameters(format!(
                        "ring_dimension={} below the required 2^{} (batch_size={}, log_qp={}, {:?})",
                        n, log_n_min, p.batch_size, log_qp, p.security_level
                    )));
                }
                log_n
            }
            None => log_n_min,
        };

        if log_n > MAX_LOG_N {
            return Err(Error::InvalidParameters(format!(
                "required ring dimension 2^{} exceeds 2^{}",
                log_n, MAX_LOG_N
            )));
        }

        let n: usize = 1 << log_n;
        let slots: usize = if p.batch_size == 0 { n >> 1 } else { p.batch_size };

        let moduli: Vec<u64> = generate_moduli(n, p.mult_depth, p.scaling_mod_bits, p.first_mod_bits)?;
        debug!(?moduli, "generated modulus chain");

        let normal: Normal<f64> = Normal::new(0.0, p.xe)
            .map_err(|e| Error::InvalidParameters(format!("xe={}: {}", p.xe, e)))?;

        let params: Parameters = Self {
            log_n,
            slots,
            mult_depth: p.mult_depth,
            scaling_mod_bits: p.scaling_mod_bits,
            first_mod_bits: p.first_mod_bits,
            security_level: p.security_level,
            xe: p.xe,
            xs: p.xs,
            normal,
            features: p.features,
            ring_qp: RingRNS::from_moduli(n, &moduli),
        };

        info!(
            n,
            slots,
            mult_depth = p.mult_depth,
            log_qp = params.log_qp(),
            "parameters built"
        );

        Ok(params)
    }

    pub fn require(&self, feature: Feature) -> Result<()> {
        if self.features.contains(feature) {
            Ok(())
        } else {
            Err(Error::FeatureDisabled(feature))
        }
    }

    pub fn n(&self) -> usize {
        1 << self.log_n
    }

    pub fn log_n(&self) -> usize {
        self.log_n
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn max_level(&self) -> usize {
        self.mult_depth
    }

    pub fn mult_depth(&self) -> usize {
        self.mult_depth
    }

    pub fn scaling_mod_bits(&self) -> usize {
        self.scaling_mod_bits
    }

    pub fn first_mod_bits(&self) -> usize {
        self.first_mod_bits
    }

    pub fn security_level(&self) -> SecurityLevel {
        self.security_level
    }

    /// q_level.
    pub fn modulus(&self, level: usize) -> u64 {
        self.ring_qp.0[level].modulus.q
    }

    /// q_0, ..., q_L.
    pub fn moduli(&self) -> Vec<u64> {
        self.ring_qp.0[..=self.mult_depth]
            .iter()
            .map(|r| r.modulus.q)
            .collect()
    }

    pub fn special_modulus(&self) -> u64 {
        self.ring_qp.0[self.mult_depth + 1].modulus.q
    }

    /// Ring modulo q_0 * ... * q_level.
    pub fn ring_q(&self, level: usize) -> RingRNS<u64> {
        self.ring_qp.at_level(level)
    }

    /// Ring modulo q_0 * ... * q_level * P.
    pub fn ring_qp(&self, level: usize) -> RingRNS<u64> {
        if level == self.mult_depth {
            return self.ring_qp.clone();
        }
        self.ring_qp
            .at_level(level)
            .extended_with(self.ring_qp.0[self.mult_depth + 1].clone())
    }

    pub fn default_scale(&self) -> f64 {
        (self.scaling_mod_bits as f64).exp2()
    }

    /// log2(q_0 * ... * q_L * P).
    pub fn log_qp(&self) -> f64 {
        self.ring_qp
            .0
            .iter()
            .map(|r| (r.modulus.q as f64).log2())
            .sum()
    }

    /// Standard deviation of the error distribution.
    pub fn xe(&self) -> f64 {
        self.xe
    }

    /// Probability of a non-zero secret coefficient.
    pub fn xs(&self) -> f64 {
        self.xs
    }

    pub fn normal(&self) -> &Normal<f64> {
        &self.normal
    }

    /// Rejection bound of the error sampler.
    pub fn error_bound(&self) -> f64 {
        6.0 * self.xe
    }

    pub fn features(&self) -> FeatureSet {
        self.features
    }
}

/// Returns [q_0, q_1, ..., q_L, P], all distinct and = 1 mod 2n.
fn generate_moduli(n: usize, mult_depth: usize, scaling_mod_bits: usize, first_mod_bits: usize) -> Result<Vec<u64>> {
    let nth_root: u64 = (n << 1) as u64;
    let exhausted = |bits: usize| {
        Error::InvalidParameters(format!(
            "not enough {}-bit primes = 1 mod {} for mult_depth={}",
            bits, nth_root, mult_depth
        ))
    };

    let scaling: Vec<u64> = NTTFriendlyPrimesGenerator::new(scaling_mod_bits as u64, nth_root)
        .next_alternating_primes(mult_depth)
        .ok_or_else(|| exhausted(scaling_mod_bits))?;

    let mut generator: NTTFriendlyPrimesGenerator = NTTFriendlyPrimesGenerator::new(first_mod_bits as u64, nth_root);
    let q0: u64 = loop {
        match generator.next_alternating_prime() {
            Some(q) if scaling.contains(&q) => continue,
            Some(q) => break q,
            None => return Err(exhausted(first_mod_bits)),
        }
    };

    let p: u64 = NTTFriendlyPrimesGenerator::new(first_mod_bits as u64 + 1, nth_root)
        .next_alternating_prime()
        .ok_or_else(|| exhausted(first_mod_bits + 1))?;

    let mut moduli: Vec<u64> = Vec::with_capacity(mult_depth + 2);
    moduli.push(q0);
    moduli.extend(scaling);
    moduli.push(p);
    Ok(moduli)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_reproduces_reference_dimension() {
        // 60 + 6*50 + 61 = 421 bits fits 2^14 at 128-bit security.
        let params: Parameters = Parameters::build(6, 50, 4).unwrap();
        assert_eq!(params.n(), 1 << 14);
        assert_eq!(params.slots(), 4);
        assert_eq!(params.moduli().len(), 7);
        assert_eq!(params.max_level(), 6);
        assert!(params.log_qp() <= 438.0);
        assert!(params.features().contains(Feature::Pre));
    }

    #[test]
    fn moduli_are_distinct_and_ntt_friendly() {
        let params: Parameters = Parameters::new(&ParametersLiteral {
            mult_depth: 4,
            scaling_mod_bits: 40,
            batch_size: 8,
            security_level: SecurityLevel::NotSet,
            ring_dimension: Some(1 << 11),
            ..Default::default()
        })
        .unwrap();
        let nth_root: u64 = (params.n() << 1) as u64;
        let mut all: Vec<u64> = params.moduli();
        all.push(params.special_modulus());
        for (i, q) in all.iter().enumerate() {
            assert_eq!(q % nth_root, 1);
            assert!(!all[..i].contains(q));
        }
        assert!(((params.moduli()[0] as f64).log2() - 60.0).abs() < 0.5);
        assert!(((params.special_modulus() as f64).log2() - 61.0).abs() < 0.5);
        params.moduli()[1..]
            .iter()
            .for_each(|q| assert!(((*q as f64).log2() - 40.0).abs() < 0.5));
        (0..=params.max_level()).for_each(|l| assert_eq!(params.modulus(l), params.moduli()[l]));
        assert!(!params.features().contains(Feature::Pke));
    }

    #[test]
    fn invalid_parameters() {
        let is_invalid = |r: Result<Parameters>| matches!(r, Err(Error::InvalidParameters(_)));
        assert!(is_invalid(Parameters::build(0, 50, 4)));
        assert!(is_invalid(Parameters::build(2, 10, 4)));
        assert!(is_invalid(Parameters::build(2, 50, 3)));
        // The batch needs n = 2^18.
        assert!(is_invalid(Parameters::build(1, 50, 1 << 17)));
        // No 128-bit secure dimension holds 60 * 70 bits.
        assert!(is_invalid(Parameters::build(70, 60, 4)));
        assert!(is_invalid(Parameters::build(usize::MAX / 8, 50, 4)));
        assert!(is_invalid(Parameters::new(&ParametersLiteral {
            mult_depth: usize::MAX,
            security_level: SecurityLevel::NotSet,
            ..Default::default()
        })));
        assert!(is_invalid(Parameters::new(&ParametersLiteral {
            mult_depth: 1 << 20,
            security_level: SecurityLevel::NotSet,
            ..Default::default()
        })));
        assert!(is_invalid(Parameters::new(&ParametersLiteral {
            mult_depth: 6,
            scaling_mod_bits: 50,
            ring_dimension: Some(1 << 12),
            ..Default::default()
        })));
        assert!(is_invalid(Parameters::new(&ParametersLiteral {
            ring_dimension: Some(3000),
            ..Default::default()
        })));
        assert!(is_invalid(Parameters::new(&ParametersLiteral {
            xe: f64::NAN,
            ..Default::default()
        })));
    }

    #[test]
    fn batch_drives_dimension() {
        let params: Parameters = Parameters::new(&ParametersLiteral {
            mult_depth: 1,
            scaling_mod_bits: 30,
            first_mod_bits: 40,
            batch_size: 1 << 12,
            security_level: SecurityLevel::NotSet,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(params.n(), 1 << 13);
        assert_eq!(params.slots(), 1 << 12);
    }

    #[test]
    fn require_feature() {
        let params: Parameters = Parameters::new(&ParametersLiteral {
            security_level: SecurityLevel::NotSet,
            ring_dimension: Some(1 << 10),
            features: FeatureSet::empty().with(Feature::Pke),
            ..Default::default()
        })
        .unwrap();
        assert!(params.require(Feature::Pke).is_ok());
        assert_eq!(
            params.require(Feature::Pre),
            Err(Error::FeatureDisabled(Feature::Pre))
        );
    }
}
