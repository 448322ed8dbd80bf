//! Error types for the mapping engine.

use cipherdoc_crypto::CryptoError;
use cipherdoc_model::FieldError;
use thiserror::Error;

/// Result type for encode/decode operations.
pub type MapperResult<T> = Result<T, MapperError>;

/// Errors raised while mapping records to documents and back.
///
/// All of them abort the enclosing encode or decode; nothing is retried.
#[derive(Debug, Error)]
pub enum MapperError {
    /// No registry codec for a declared type, or a value that has no
    /// mapping (encrypting a non-scalar, an enum name outside its type).
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// A value to be encrypted is too long for its tagged encoding.
    #[error("value too large: {0}")]
    ValueTooLarge(String),

    /// The tagged payload inside an encrypted value could not be decoded.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Encryption or decryption failed, or no cipher is configured.
    #[error("crypto failure: {0}")]
    CryptoFailure(String),

    /// The document could not be turned into a record of `type_name`.
    #[error("cannot decode {type_name}: {reason}")]
    DecodeFailure { type_name: String, reason: String },

    /// The identifier is neither an object id nor object-id text.
    #[error("identifier type mismatch: {0}")]
    IdentifierTypeMismatch(String),

    /// A value of the wrong kind for its declared type.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: &'static str },

    /// Writing a field of a caller-owned record failed.
    #[error("field {field}: {source}")]
    Field { field: String, source: FieldError },
}

impl MapperError {
    pub(crate) fn mismatch(expected: impl ToString, found: &'static str) -> Self {
        Self::TypeMismatch {
            expected: expected.to_string(),
            found,
        }
    }
}

impl From<CryptoError> for MapperError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::MalformedPayload(msg) => Self::MalformedPayload(msg),
            CryptoError::ValueTooLarge(msg) => Self::ValueTooLarge(msg),
            other => Self::CryptoFailure(other.to_string()),
        }
    }
}
