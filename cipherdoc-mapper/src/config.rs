//! Engine configuration shared by every [`EntityCodec`](crate::EntityCodec).

use crate::id::{IdGenerator, ObjectIdGenerator};
use crate::registry::{CodecRegistry, ProviderRegistry};
use cipherdoc_crypto::FieldCipher;
use std::fmt;
use std::sync::Arc;

/// Registry, field cipher and identifier generator used by the mapper.
///
/// Built once and handed to codecs as `Arc<MapperConfig>`.
pub struct MapperConfig {
    registry: Arc<dyn CodecRegistry>,
    cipher: Option<FieldCipher>,
    id_generator: Arc<dyn IdGenerator>,
}

impl MapperConfig {
    pub fn builder() -> MapperConfigBuilder {
        MapperConfigBuilder::default()
    }

    pub fn registry(&self) -> &dyn CodecRegistry {
        self.registry.as_ref()
    }

    /// The field cipher; `None` when no encrypted field may be mapped.
    pub fn cipher(&self) -> Option<&FieldCipher> {
        self.cipher.as_ref()
    }

    pub fn id_generator(&self) -> &dyn IdGenerator {
        self.id_generator.as_ref()
    }
}

impl Default for MapperConfig {
    fn default() -> Self {
        MapperConfigBuilder::default().finish()
    }
}

impl fmt::Debug for MapperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperConfig")
            .field("cipher", &self.cipher.as_ref().map(FieldCipher::key_size))
            .finish_non_exhaustive()
    }
}

/// Builder for [`MapperConfig`].
#[derive(Default)]
pub struct MapperConfigBuilder {
    registry: Option<Arc<dyn CodecRegistry>>,
    cipher: Option<FieldCipher>,
    id_generator: Option<Arc<dyn IdGenerator>>,
}

impl MapperConfigBuilder {
    /// Replaces the default [`ProviderRegistry::with_defaults`].
    pub fn registry(mut self, registry: impl CodecRegistry + 'static) -> Self {
        self.registry = Some(Arc::new(registry));
        self
    }

    /// Shares an existing registry.
    pub fn shared_registry(mut self, registry: Arc<dyn CodecRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn cipher(mut self, cipher: FieldCipher) -> Self {
        self.cipher = Some(cipher);
        self
    }

    /// Replaces the default [`ObjectIdGenerator`].
    pub fn id_generator(mut self, generator: impl IdGenerator + 'static) -> Self {
        self.id_generator = Some(Arc::new(generator));
        self
    }

    pub fn build(self) -> Arc<MapperConfig> {
        Arc::new(self.finish())
    }

    fn finish(self) -> MapperConfig {
        MapperConfig {
            registry: self
                .registry
                .unwrap_or_else(|| Arc::new(ProviderRegistry::with_defaults())),
            cipher: self.cipher,
            id_generator: self
                .id_generator
                .unwrap_or_else(|| Arc::new(ObjectIdGenerator)),
        }
    }
}
