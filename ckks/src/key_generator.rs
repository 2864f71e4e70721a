use crate::error::Result;
use crate::key_switching::add_gadget;
use crate::keys::{
    EvalMultKey, KeyId, KeyPair, PublicKey, ReEncryptionKey, RotationKeySet, SecretKey, SwitchingKey,
};
use crate::parameters::{Feature, Parameters};
use rns::automorphism::{AutoPerm, AutoPermMap, galois_element};
use rns::poly::PolyRNS;
use rns::ring::RingRNS;
use rand_core::RngCore;
use sampling::source::{Source, new_seed};
use tracing::{debug, instrument};
use utils::map::Map;

/// Samples every key of the scheme. All keys live in the NTT domain over
/// the full chain q_0 * ... * q_L * P.
pub struct KeyGenerator {
    params: Parameters,
    source: Source,
}

impl KeyGenerator {
    pub fn new(params: &Parameters) -> Result<Self> {
        Self::with_seed(params, new_seed())
    }

    /// Deterministic generator, for tests and reproducible benchmarks.
    pub fn with_seed(params: &Parameters, seed: [u8; 32]) -> Result<Self> {
        params.require(Feature::Pke)?;
        Ok(Self {
            params: params.clone(),
            source: Source::new(seed),
        })
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    fn ring(&self) -> RingRNS<u64> {
        self.params.ring_qp(self.params.max_level())
    }

    /// e sampled from the bounded discrete Gaussian, NTT domain.
    fn gen_error(&self, source: &mut Source) -> PolyRNS<u64> {
        let ring: RingRNS<u64> = self.ring();
        let mut e: PolyRNS<u64> = ring.new_polyrns();
        ring.fill_dist_f64(source, self.params.normal(), self.params.error_bound(), &mut e);
        ring.ntt_inplace(&mut e);
        e
    }

    fn gen_ternary(&self, source: &mut Source) -> PolyRNS<u64> {
        let ring: RingRNS<u64> = self.ring();
        let mut s: PolyRNS<u64> = ring.new_polyrns();
        ring.fill_ternary_prob(self.params.xs(), source, &mut s);
        ring.ntt_inplace(&mut s);
        s
    }

    /// (-a*s + e, a) with a uniform.
    fn gen_rlwe_zero(&mut self, s: &PolyRNS<u64>) -> [PolyRNS<u64>; 2] {
        let ring: RingRNS<u64> = self.ring();
        let mut source_xa: Source = self.source.branch();
        let mut source_xe: Source = self.source.branch();

        let mut a: PolyRNS<u64> = ring.new_polyrns();
        ring.fill_uniform(&mut source_xa, &mut a);

        let mut b: PolyRNS<u64> = self.gen_error(&mut source_xe);
        let mut as_: PolyRNS<u64> = ring.new_polyrns();
        ring.mul(&a, s, &mut as_);
        ring.sub_inplace(&as_, &mut b);
        [b, a]
    }

    #[instrument(level = "debug", skip_all)]
    pub fn gen_key_pair(&mut self) -> KeyPair {
        let id: KeyId = KeyId(self.source.next_u64());
        let mut source_xs: Source = self.source.branch();
        let s: PolyRNS<u64> = self.gen_ternary(&mut source_xs);
        let pk: [PolyRNS<u64>; 2] = self.gen_rlwe_zero(&s);
        debug!(%id, "generated key pair");
        KeyPair {
            public_key: PublicKey { id, value: pk },
            secret_key: SecretKey { id, value: s },
        }
    }

    /// Rows i = 0..=L, row i encrypting P * g_i * s_from under s_to.
    pub(crate) fn gen_switching_key(&mut self, s_from: &SecretKey, s_to: &SecretKey) -> SwitchingKey {
        self.gen_switching_key_from_poly(&s_from.value, &s_to.value)
    }

    fn gen_switching_key_from_poly(&mut self, s_from: &PolyRNS<u64>, s_to: &PolyRNS<u64>) -> SwitchingKey {
        let rows: Vec<[PolyRNS<u64>; 2]> = (0..=self.params.max_level())
            .map(|i| {
                let [mut b, a] = self.gen_rlwe_zero(s_to);
                add_gadget(&self.params, i, s_from, &mut b);
                [b, a]
            })
            .collect();
        SwitchingKey { rows }
    }

    /// Relinearization key s^2 -> s.
    #[instrument(level = "debug", skip_all, fields(owner = %sk.id))]
    pub fn gen_eval_mult_key(&mut self, sk: &SecretKey) -> Result<EvalMultKey> {
        self.params.require(Feature::KeySwitch)?;
        self.params.require(Feature::LeveledShe)?;
        let ring: RingRNS<u64> = self.ring();
        let mut s2: PolyRNS<u64> = ring.new_polyrns();
        ring.mul(&sk.value, &sk.value, &mut s2);
        Ok(EvalMultKey {
            owner: sk.id,
            key: self.gen_switching_key_from_poly(&s2, &sk.value),
        })
    }

    /// One key phi_{5^k}(s) -> s per distinct non-zero k mod slots.
    #[instrument(level = "debug", skip_all, fields(owner = %sk.id, ?shifts))]
    pub fn gen_rotation_keys(&mut self, sk: &SecretKey, shifts: &[i64]) -> Result<RotationKeySet> {
        self.params.require(Feature::KeySwitch)?;
        self.params.require(Feature::LeveledShe)?;

        let mut set: RotationKeySet = RotationKeySet {
            owner: sk.id,
            slots: self.params.slots(),
            keys: Map::new(),
            perms: AutoPermMap::new(),
        };

        let ring: RingRNS<u64> = self.ring();
        let mut s: PolyRNS<u64> = ring.new_polyrns();
        ring.intt(&sk.value, &mut s);

        for shift in shifts {
            let k: usize = set.normalize(*shift);
            if k == 0 || set.keys.contains_key(&k) {
                continue;
            }
            let perm: AutoPerm = AutoPerm::new(self.params.n(), galois_element(k as i64, self.params.n() << 1));
            let mut s_rot: PolyRNS<u64> = ring.new_polyrns();
            ring.automorphism_from_perm(&s, &perm, &mut s_rot);
            ring.ntt_inplace(&mut s_rot);
            let key: SwitchingKey = self.gen_switching_key_from_poly(&s_rot, &sk.value);
            set.keys.insert(k, key);
            set.perms.insert(perm);
        }

        debug!(shifts = ?set.shifts(), "generated rotation keys");
        Ok(set)
    }

    /// Key moving ciphertexts from sk_from to the owner of pk_to, built from
    /// the public key alone: row i = (b_to*v_i + e0 + P*g_i*s_from, a_to*v_i + e1)
    /// with v_i ternary.
    #[instrument(level = "debug", skip_all, fields(source = %sk_from.id, destination = %pk_to.id))]
    pub fn gen_reencryption_key(&mut self, sk_from: &SecretKey, pk_to: &PublicKey) -> Result<ReEncryptionKey> {
        self.params.require(Feature::Pre)?;
        let ring: RingRNS<u64> = self.ring();

        let rows: Vec<[PolyRNS<u64>; 2]> = (0..=self.params.max_level())
            .map(|i| {
                let mut source_xv: Source = self.source.branch();
                let mut source_xe: Source = self.source.branch();
                let v: PolyRNS<u64> = self.gen_ternary(&mut source_xv);

                let mut b: PolyRNS<u64> = self.gen_error(&mut source_xe);
                ring.mul_add(&pk_to.value[0], &v, &mut b);
                add_gadget(&self.params, i, &sk_from.value, &mut b);

                let mut a: PolyRNS<u64> = self.gen_error(&mut source_xe);
                ring.mul_add(&pk_to.value[1], &v, &mut a);
                [b, a]
            })
            .collect();

        Ok(ReEncryptionKey {
            source: sk_from.id,
            destination: pk_to.id,
            key: SwitchingKey { rows },
        })
    }
}
