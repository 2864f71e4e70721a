use crate::ciphertext::Ciphertext;
use crate::error::Result;
use crate::keys::{PublicKey, SecretKey};
use crate::noise;
use crate::parameters::{Feature, Parameters};
use crate::plaintext::Plaintext;
use rns::poly::PolyRNS;
use rns::ring::RingRNS;
use sampling::source::{Source, new_seed};
use tracing::instrument;

pub struct Encryptor {
    params: Parameters,
    /// Uniform masks and ephemeral ternary secrets.
    source_xa: Source,
    /// Errors.
    source_xe: Source,
}

impl Encryptor {
    pub fn new(params: &Parameters) -> Result<Self> {
        Self::with_seed(params, new_seed())
    }

    pub fn with_seed(params: &Parameters, seed: [u8; 32]) -> Result<Self> {
        params.require(Feature::Pke)?;
        let mut source: Source = Source::new(seed);
        Ok(Self {
            params: params.clone(),
            source_xa: source.branch(),
            source_xe: source.branch(),
        })
    }

    pub fn seed_source_xa(&mut self, seed: [u8; 32]) {
        self.source_xa = Source::new(seed)
    }

    pub fn seed_source_xe(&mut self, seed: [u8; 32]) {
        self.source_xe = Source::new(seed)
    }

    /// NTT(m + e) at the level of m.
    fn noisy_message(&mut self, ring: &RingRNS<u64>, pt: &Plaintext) -> PolyRNS<u64> {
        let mut m: PolyRNS<u64> = ring.new_polyrns();
        ring.fill_dist_f64(&mut self.source_xe, self.params.normal(), self.params.error_bound(), &mut m);
        ring.add_inplace(&pt.value, &mut m);
        ring.ntt_inplace(&mut m);
        m
    }

    /// (b*u + e0 + m, a*u + e1) with u ternary, at the level of pt.
    #[instrument(level = "debug", skip_all, fields(key = %pk.id, level = pt.level()))]
    pub fn encrypt(&mut self, pk: &PublicKey, pt: &Plaintext) -> Ciphertext {
        let ring: RingRNS<u64> = self.params.ring_q(pt.level());

        let mut u: PolyRNS<u64> = ring.new_polyrns();
        ring.fill_ternary_prob(self.params.xs(), &mut self.source_xa, &mut u);
        ring.ntt_inplace(&mut u);

        let mut c0: PolyRNS<u64> = self.noisy_message(&ring, pt);
        ring.mul_add(&pk.value[0], &u, &mut c0);

        let mut c1: PolyRNS<u64> = ring.new_polyrns();
        ring.fill_dist_f64(&mut self.source_xe, self.params.normal(), self.params.error_bound(), &mut c1);
        ring.ntt_inplace(&mut c1);
        ring.mul_add(&pk.value[1], &u, &mut c1);

        Ciphertext {
            value: vec![c0, c1],
            scale: pt.scale,
            key_id: pk.id,
            slots: pt.slots,
            noise: pt.noise + noise::fresh_public(&self.params),
        }
    }

    /// (-a*s + e + m, a) with a uniform, at the level of pt.
    #[instrument(level = "debug", skip_all, fields(key = %sk.id, level = pt.level()))]
    pub fn encrypt_sk(&mut self, sk: &SecretKey, pt: &Plaintext) -> Ciphertext {
        let ring: RingRNS<u64> = self.params.ring_q(pt.level());

        let mut c1: PolyRNS<u64> = ring.new_polyrns();
        ring.fill_uniform(&mut self.source_xa, &mut c1);

        let mut c0: PolyRNS<u64> = self.noisy_message(&ring, pt);
        let mut as_: PolyRNS<u64> = ring.new_polyrns();
        ring.mul(&c1, &sk.value, &mut as_);
        ring.sub_inplace(&as_, &mut c0);

        Ciphertext {
            value: vec![c0, c1],
            scale: pt.scale,
            key_id: sk.id,
            slots: pt.slots,
            noise: pt.noise + noise::fresh_secret(&self.params),
        }
    }
}
