//! Field-level encryption for cipherdoc.
//!
//! Two pieces, used together by the mapper for every encrypted field:
//! - [`scalar`] turns one primitive value into a self-describing byte string
//!   (one tag byte followed by a big-endian layout) and back.
//! - [`cipher`] encrypts those bytes with AES in CBC mode under a static key,
//!   prefixing a fresh random IV to every ciphertext.
//!
//! The tag byte is what lets a decrypted payload be turned back into the
//! right scalar kind without consulting any schema.

pub mod cipher;
mod config;
mod error;
mod key;
pub mod scalar;

pub use cipher::{FieldCipher, BLOCK_SIZE, IV_SIZE};
pub use config::CipherConfig;
pub use error::{CryptoError, CryptoResult};
pub use key::{FieldKey, KeySize};
pub use scalar::{deserialize, serialize, Scalar};
