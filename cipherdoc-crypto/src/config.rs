//! Loadable cipher configuration.

use crate::error::{CryptoError, CryptoResult};
use crate::key::FieldKey;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Serialized form of the field-cipher settings.
///
/// ```json
/// { "key": "<base64 of 16, 24 or 32 bytes>" }
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct CipherConfig {
    /// Standard base64 of the raw key bytes.
    pub key: String,
}

impl CipherConfig {
    /// Creates a config holding `key` encoded as base64.
    pub fn from_key(key: &FieldKey) -> Self {
        Self {
            key: STANDARD.encode(key.as_bytes()),
        }
    }

    /// Parses a config from JSON.
    pub fn from_json(json: &str) -> CryptoResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decodes the configured key.
    pub fn key(&self) -> CryptoResult<FieldKey> {
        let mut bytes = STANDARD
            .decode(self.key.trim())
            .map_err(|e| CryptoError::InvalidConfig(format!("key is not base64: {e}")))?;
        let key = FieldKey::from_bytes(&bytes);
        bytes.zeroize();
        key
    }
}

impl std::fmt::Debug for CipherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherConfig")
            .field("key", &"[REDACTED]")
            .finish()
    }
}
