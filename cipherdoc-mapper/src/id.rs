use cipherdoc_types::ObjectId;

/// Source of identifiers for records that do not have one yet.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> ObjectId;
}

/// Generates fresh [`ObjectId`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectIdGenerator;

impl IdGenerator for ObjectIdGenerator {
    fn generate(&self) -> ObjectId {
        ObjectId::new()
    }
}
