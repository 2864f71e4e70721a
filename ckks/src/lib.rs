pub mod ciphertext;
pub mod decryptor;
pub mod encoding;
pub mod encryptor;
pub mod error;
pub mod evaluator;
pub mod key_generator;
pub mod keys;
pub mod noise;
pub mod parameters;
pub mod plaintext;
pub mod reencryption;

mod key_switching;

pub use error::{Error, Result};
