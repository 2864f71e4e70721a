use crate::keys::KeyId;
use crate::parameters::Feature;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("slot overflow: {len} values > {slots} slots")]
    SlotOverflow { len: usize, slots: usize },

    #[error("non-finite value at index {index}")]
    NonFiniteValue { index: usize },

    #[error("level mismatch: expected at most {expected}, found {found}")]
    LevelMismatch { expected: usize, found: usize },

    #[error("key domain mismatch: {lhs} != {rhs}")]
    KeyDomainMismatch { lhs: KeyId, rhs: KeyId },

    #[error("incompatible key domain: re-encryption key expects {expected}, ciphertext is under {found}")]
    IncompatibleKeyDomain { expected: KeyId, found: KeyId },

    #[error("multiplicative depth exhausted")]
    DepthExhausted,

    #[error("missing rotation key for shift {0}")]
    MissingRotationKey(i64),

    #[error("feature {0:?} is not enabled")]
    FeatureDisabled(Feature),
}

pub type Result<T> = std::result::Result<T, Error>;
