use crate::ciphertext::Ciphertext;
use crate::error::{Error, Result};
use crate::key_switching::key_switch;
use crate::keys::ReEncryptionKey;
use crate::noise;
use crate::parameters::{Feature, Parameters};
use rns::ring::RingRNS;
use tracing::instrument;

/// Moves ciphertexts between key domains with re-encryption keys, without
/// ever decrypting. A hop is a pure function of (ciphertext, key), so
/// multi-hop chains are successive calls.
pub struct ReEncryptor {
    params: Parameters,
}

impl ReEncryptor {
    pub fn new(params: &Parameters) -> Result<Self> {
        params.require(Feature::Pre)?;
        Ok(Self {
            params: params.clone(),
        })
    }

    /// Returns (c0 + u0, u1) with (u0, u1) the switch of c1 under rk. Level
    /// and scale are unchanged.
    #[instrument(level = "debug", skip_all, fields(source = %rk.source, destination = %rk.destination, level = ct.level()))]
    pub fn reencrypt(&self, ct: &Ciphertext, rk: &ReEncryptionKey) -> Result<Ciphertext> {
        if rk.source != ct.key_id {
            return Err(Error::IncompatibleKeyDomain {
                expected: rk.source,
                found: ct.key_id,
            });
        }

        let level: usize = ct.level();
        let ring: RingRNS<u64> = self.params.ring_q(level);
        let [mut c0, c1] = key_switch(&self.params, level, &ct.value[1], &rk.key);
        ring.add_inplace(&ct.value[0], &mut c0);

        Ok(Ciphertext {
            value: vec![c0, c1],
            scale: ct.scale,
            key_id: rk.destination,
            slots: ct.slots,
            noise: ct.noise + noise::reencryption(&self.params, level),
        })
    }
}
