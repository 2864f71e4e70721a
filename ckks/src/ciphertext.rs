use crate::keys::KeyId;
use crate::noise;
use rns::poly::PolyRNS;

/// (c0, c1) with c0 + c1*s = m + e, NTT domain over q_0 * ... * q_level.
#[derive(Clone, Debug)]
pub struct Ciphertext {
    pub(crate) value: Vec<PolyRNS<u64>>,
    pub(crate) scale: f64,
    pub(crate) key_id: KeyId,
    pub(crate) slots: usize,
    pub(crate) noise: f64,
}

impl Ciphertext {
    pub fn level(&self) -> usize {
        self.value[0].level()
    }

    /// Number of components minus one.
    pub fn degree(&self) -> usize {
        self.value.len() - 1
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn log_scale(&self) -> f64 {
        self.scale.log2()
    }

    pub fn key_id(&self) -> KeyId {
        self.key_id
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn at(&self, i: usize) -> &PolyRNS<u64> {
        &self.value[i]
    }

    pub fn noise(&self) -> f64 {
        self.noise
    }

    pub fn estimated_precision_bits(&self) -> f64 {
        noise::precision_bits(self.scale, self.noise)
    }

    /// Drops the limbs above `level` of every component.
    pub(crate) fn truncated(&self, level: usize) -> Ciphertext {
        Ciphertext {
            value: self.value.iter().map(|c| c.truncated(level)).collect(),
            scale: self.scale,
            key_id: self.key_id,
            slots: self.slots,
            noise: self.noise,
        }
    }
}
