use cipherdoc_model::TypeKey;
use dashmap::DashSet;
use tracing::debug;

/// Type keys the registry could not resolve.
///
/// Only misses are remembered; hits are cheap to look up again. Inserts from
/// concurrent encodes only contend on the shard holding the key.
#[derive(Debug, Default)]
pub(crate) struct MissingCodecs {
    keys: DashSet<TypeKey>,
}

impl MissingCodecs {
    pub(crate) fn contains(&self, key: &TypeKey) -> bool {
        self.keys.contains(key)
    }

    pub(crate) fn insert(&self, key: TypeKey, record: &str) {
        if self.keys.insert(key) {
            debug!(type_key = %key, record, "no codec registered, caching miss");
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }
}
