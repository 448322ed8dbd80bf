//! Error types for the encryption layer.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in scalar encoding and cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Tagged scalar bytes could not be decoded.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// A value is too large for its tagged layout.
    #[error("value too large: {0}")]
    ValueTooLarge(String),

    /// Encryption failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed (wrong key, truncated or tampered data).
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Key is not 16, 24 or 32 bytes long.
    #[error("invalid key length: expected 16, 24 or 32 bytes, got {actual}")]
    InvalidKeyLength { actual: usize },

    /// Cipher configuration could not be loaded.
    #[error("invalid cipher config: {0}")]
    InvalidConfig(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
