use crate::ciphertext::Ciphertext;
use crate::keys::SecretKey;
use crate::parameters::Parameters;
use crate::plaintext::Plaintext;
use rns::poly::PolyRNS;
use rns::ring::RingRNS;

/// Stateless: the secret key is passed per call, so one decryptor serves
/// every key pair of a parameter set.
pub struct Decryptor {
    params: Parameters,
}

impl Decryptor {
    pub fn new(params: &Parameters) -> Self {
        Self {
            params: params.clone(),
        }
    }

    /// Returns sum_i c_i * s^i in the coefficient domain. A key other than
    /// the one named by ct.key_id() yields an unrelated plaintext.
    pub fn decrypt(&self, sk: &SecretKey, ct: &Ciphertext) -> Plaintext {
        let level: usize = ct.level();
        let ring: RingRNS<u64> = self.params.ring_q(level);

        // Horner: ((c_d * s + c_{d-1}) * s + ...) + c_0
        let mut m: PolyRNS<u64> = ct.value[ct.degree()].truncated(level);
        let mut tmp: PolyRNS<u64> = ring.new_polyrns();
        ct.value[..ct.degree()].iter().rev().for_each(|c| {
            ring.mul(&m, &sk.value, &mut tmp);
            ring.add(&tmp, c, &mut m);
        });
        ring.intt_inplace(&mut m);

        Plaintext {
            value: m,
            scale: ct.scale,
            slots: ct.slots,
            noise: ct.noise,
        }
    }
}
