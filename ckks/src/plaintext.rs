use crate::noise;
use rns::poly::PolyRNS;

/// Encoded slot vector: coefficient-domain polynomial over q_0 * ... * q_level.
#[derive(Clone, Debug)]
pub struct Plaintext {
    pub(crate) value: PolyRNS<u64>,
    pub(crate) scale: f64,
    pub(crate) slots: usize,
    pub(crate) noise: f64,
}

impl Plaintext {
    pub fn level(&self) -> usize {
        self.value.level()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn log_scale(&self) -> f64 {
        self.scale.log2()
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn value(&self) -> &PolyRNS<u64> {
        &self.value
    }

    pub fn noise(&self) -> f64 {
        self.noise
    }

    pub fn estimated_precision_bits(&self) -> f64 {
        noise::precision_bits(self.scale, self.noise)
    }
}
