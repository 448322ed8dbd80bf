//! Record model for cipherdoc.
//!
//! Defines how application records describe themselves to the mapper:
//! - [`Entity`]: implemented by every mapped record type
//! - [`EntitySchema`]: the per-type field table (names, flags, accessors)
//! - [`FieldInfo`] / [`ValueType`]: type-erased metadata the mapper walks
//! - [`FieldValue`] / [`RecordValue`]: in-memory values read from and
//!   written to records
//! - [`FieldType`] / [`EnumMember`]: typed conversions used by accessors
//!
//! Field access goes through plain function pointers registered when the
//! schema is built; there is no name-based lookup at encode time.

mod error;
mod field;
mod schema;
mod value;

pub use error::{FieldError, SchemaError};
pub use field::{EnumMember, FieldType};
pub use schema::{
    Entity, EntitySchema, EntitySchemaBuilder, EnumType, FieldInfo, RecordType, TypeKey,
    ValueType,
};
pub use value::{FieldValue, RecordValue};
