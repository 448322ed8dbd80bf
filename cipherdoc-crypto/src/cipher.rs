//! Field encryption using AES in CBC mode with PKCS#7 padding.
//!
//! Every call draws a fresh 16-byte IV from the OS random source and builds
//! its own cipher context from the shared key, so one [`FieldCipher`] can be
//! used from many threads at once without locking.
//!
//! Blob layout: `[iv: 16 bytes] || ciphertext`.

use crate::config::CipherConfig;
use crate::error::{CryptoError, CryptoResult};
use crate::key::{FieldKey, KeySize};
use crate::scalar::{self, Scalar};
use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use rand::RngCore;

/// Size of the IV prefixed to every ciphertext.
pub const IV_SIZE: usize = 16;

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Symmetric cipher for individual field values.
#[derive(Clone, Debug)]
pub struct FieldCipher {
    key: FieldKey,
}

impl FieldCipher {
    pub fn new(key: FieldKey) -> Self {
        Self { key }
    }

    /// Builds a cipher from a deserialized [`CipherConfig`].
    pub fn from_config(config: &CipherConfig) -> CryptoResult<Self> {
        Ok(Self::new(config.key()?))
    }

    pub fn key_size(&self) -> KeySize {
        self.key.size()
    }

    /// Encrypts `plaintext`, returning `iv || ciphertext`.
    pub fn encrypt(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        let mut iv = [0u8; IV_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut iv);

        let key = self.key.as_bytes();
        let encryption = |e: cbc::cipher::InvalidLength| CryptoError::Encryption(e.to_string());
        let ciphertext = match self.key.size() {
            KeySize::Aes128 => cbc::Encryptor::<Aes128>::new_from_slices(key, &iv)
                .map_err(encryption)?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            KeySize::Aes192 => cbc::Encryptor::<Aes192>::new_from_slices(key, &iv)
                .map_err(encryption)?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            KeySize::Aes256 => cbc::Encryptor::<Aes256>::new_from_slices(key, &iv)
                .map_err(encryption)?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        };

        let mut blob = Vec::with_capacity(IV_SIZE + ciphertext.len());
        blob.extend_from_slice(&iv);
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }

    /// Decrypts a blob produced by [`FieldCipher::encrypt`].
    pub fn decrypt(&self, blob: &[u8]) -> CryptoResult<Vec<u8>> {
        if blob.len() < IV_SIZE + BLOCK_SIZE {
            return Err(CryptoError::Decryption(format!(
                "data too short: {} bytes",
                blob.len()
            )));
        }
        let (iv, ciphertext) = blob.split_at(IV_SIZE);
        if ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(CryptoError::Decryption(format!(
                "ciphertext of {} bytes is not block aligned",
                ciphertext.len()
            )));
        }

        let key = self.key.as_bytes();
        let init = |e: cbc::cipher::InvalidLength| CryptoError::Decryption(e.to_string());
        let plaintext = match self.key.size() {
            KeySize::Aes128 => cbc::Decryptor::<Aes128>::new_from_slices(key, iv)
                .map_err(init)?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
            KeySize::Aes192 => cbc::Decryptor::<Aes192>::new_from_slices(key, iv)
                .map_err(init)?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
            KeySize::Aes256 => cbc::Decryptor::<Aes256>::new_from_slices(key, iv)
                .map_err(init)?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        };

        plaintext.map_err(|_| {
            CryptoError::Decryption("bad padding (wrong key or tampered data)".to_string())
        })
    }

    /// Serializes a scalar with its tag and encrypts the result.
    pub fn encrypt_scalar(&self, value: &Scalar) -> CryptoResult<Vec<u8>> {
        self.encrypt(&scalar::serialize(value)?)
    }

    /// Decrypts a blob and decodes the tagged scalar inside it.
    pub fn decrypt_scalar(&self, blob: &[u8]) -> CryptoResult<Scalar> {
        scalar::deserialize(&self.decrypt(blob)?)
    }
}
