use rns::automorphism::{AutoPerm, AutoPermMap};
use rns::poly::PolyRNS;
use std::fmt;
use utils::map::Map;

/// Logical identifier of a key pair, carried by every derived key and by
/// every ciphertext to name the key that currently decrypts it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(pub u64);

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key-{:016x}", self.0)
    }
}

/// Ternary secret, NTT domain over q_0 * ... * q_L * P.
#[derive(Clone)]
pub struct SecretKey {
    pub(crate) id: KeyId,
    pub(crate) value: PolyRNS<u64>,
}

impl SecretKey {
    pub fn id(&self) -> KeyId {
        self.id
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey").field("id", &self.id).finish_non_exhaustive()
    }
}

/// (b, a) = (-a*s + e, a), NTT domain over q_0 * ... * q_L * P.
#[derive(Clone)]
pub struct PublicKey {
    pub(crate) id: KeyId,
    pub(crate) value: [PolyRNS<u64>; 2],
}

impl PublicKey {
    pub fn id(&self) -> KeyId {
        self.id
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey").field("id", &self.id).finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub secret_key: SecretKey,
}

impl KeyPair {
    pub fn id(&self) -> KeyId {
        self.secret_key.id
    }
}

/// Hybrid key-switching key: row i encrypts P * g_i * s_from, with g_i the
/// CRT idempotent of q_i, under s_to. Rows are NTT domain over QP.
#[derive(Clone)]
pub struct SwitchingKey {
    pub(crate) rows: Vec<[PolyRNS<u64>; 2]>,
}

impl SwitchingKey {
    pub fn rows(&self) -> usize {
        self.rows.len()
    }
}

impl fmt::Debug for SwitchingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchingKey").field("rows", &self.rows.len()).finish()
    }
}

/// Relinearization key s^2 -> s.
#[derive(Clone, Debug)]
pub struct EvalMultKey {
    pub(crate) owner: KeyId,
    pub(crate) key: SwitchingKey,
}

impl EvalMultKey {
    pub fn owner(&self) -> KeyId {
        self.owner
    }
}

/// Rotation keys phi_{5^k}(s) -> s, indexed by k mod slots.
#[derive(Clone)]
pub struct RotationKeySet {
    pub(crate) owner: KeyId,
    pub(crate) slots: usize,
    pub(crate) keys: Map<usize, SwitchingKey>,
    pub(crate) perms: AutoPermMap,
}

impl RotationKeySet {
    pub fn owner(&self) -> KeyId {
        self.owner
    }

    pub(crate) fn normalize(&self, shift: i64) -> usize {
        shift.rem_euclid(self.slots as i64) as usize
    }

    pub fn get(&self, shift: i64) -> Option<&SwitchingKey> {
        self.keys.get(&self.normalize(shift))
    }

    /// Coefficient permutation of X -> X^gal_el, cached at generation.
    pub(crate) fn perm(&self, gal_el: usize) -> Option<&AutoPerm> {
        self.perms.get(&gal_el)
    }

    pub fn contains(&self, shift: i64) -> bool {
        self.normalize(shift) == 0 || self.keys.contains_key(&self.normalize(shift))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Normalized shifts with a key, ascending.
    pub fn shifts(&self) -> Vec<usize> {
        let mut shifts: Vec<usize> = self.keys.keys().copied().collect();
        shifts.sort_unstable();
        shifts
    }
}

impl fmt::Debug for RotationKeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotationKeySet")
            .field("owner", &self.owner)
            .field("shifts", &self.shifts())
            .finish()
    }
}

/// Delegates decryption from `source` to `destination`.
#[derive(Clone, Debug)]
pub struct ReEncryptionKey {
    pub(crate) source: KeyId,
    pub(crate) destination: KeyId,
    pub(crate) key: SwitchingKey,
}

impl ReEncryptionKey {
    pub fn source(&self) -> KeyId {
        self.source
    }

    pub fn destination(&self) -> KeyId {
        self.destination
    }
}
