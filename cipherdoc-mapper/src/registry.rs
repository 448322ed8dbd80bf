//! Codec lookup by declared value type.
//!
//! The mapper depends on `Arc<dyn CodecRegistry>` and never on a concrete
//! registry. [`ProviderRegistry`] asks a chain of [`CodecProvider`]s in
//! order; the first one that knows the key wins. Callers put their own
//! providers in front of [`ValueCodecProvider`] to override scalar mappings.

use crate::error::MapperResult;
use crate::value_codecs::ValueCodecProvider;
use cipherdoc_model::{FieldValue, TypeKey};
use cipherdoc_types::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Encode/decode pair for one value type.
pub trait Codec: Send + Sync {
    fn encode(&self, value: &FieldValue) -> MapperResult<Value>;

    fn decode(&self, value: &Value) -> MapperResult<FieldValue>;
}

/// A source of codecs, consulted in order by [`ProviderRegistry`].
pub trait CodecProvider: Send + Sync {
    fn get(&self, key: &TypeKey) -> Option<Arc<dyn Codec>>;
}

/// Resolves a type key to its codec.
///
/// Lookups may be expensive; the mapper remembers misses for its own
/// lifetime, so the set of resolvable keys must not change while a mapper
/// uses the registry.
pub trait CodecRegistry: Send + Sync {
    fn lookup(&self, key: &TypeKey) -> Option<Arc<dyn Codec>>;
}

/// Registry backed by an ordered provider chain.
#[derive(Clone)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn CodecProvider>>,
}

impl ProviderRegistry {
    pub fn new(providers: Vec<Arc<dyn CodecProvider>>) -> Self {
        Self { providers }
    }

    /// A registry holding only the scalar value codecs.
    pub fn with_defaults() -> Self {
        Self::new(vec![Arc::new(ValueCodecProvider::new())])
    }

    /// Puts `provider` in front of the existing chain.
    pub fn with_provider(mut self, provider: impl CodecProvider + 'static) -> Self {
        self.providers.insert(0, Arc::new(provider));
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl CodecRegistry for ProviderRegistry {
    fn lookup(&self, key: &TypeKey) -> Option<Arc<dyn Codec>> {
        self.providers.iter().find_map(|p| p.get(key))
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.providers.len())
            .finish()
    }
}

/// Provider for codecs registered by key.
#[derive(Clone, Default)]
pub struct CodecMap {
    codecs: HashMap<TypeKey, Arc<dyn Codec>>,
}

impl CodecMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, key: TypeKey, codec: impl Codec + 'static) -> Self {
        self.codecs.insert(key, Arc::new(codec));
        self
    }

    pub fn contains(&self, key: &TypeKey) -> bool {
        self.codecs.contains_key(key)
    }
}

impl CodecProvider for CodecMap {
    fn get(&self, key: &TypeKey) -> Option<Arc<dyn Codec>> {
        self.codecs.get(key).cloned()
    }
}

impl fmt::Debug for CodecMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.codecs.keys()).finish()
    }
}
