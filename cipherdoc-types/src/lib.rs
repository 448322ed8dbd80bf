//! Core type definitions for cipherdoc.
//!
//! This crate defines the storage-facing value model shared by every other
//! crate in the workspace:
//! - [`Document`] / [`Value`]: the schemaless, self-describing document tree
//! - [`Binary`] / [`BinarySubtype`]: tagged binary blobs, including the
//!   reserved subtype for encrypted scalars
//! - [`ObjectId`]: 12-byte time-ordered document identifiers
//!
//! Nothing here knows about records, schemas or encryption; those live in
//! `cipherdoc-model`, `cipherdoc-crypto` and `cipherdoc-mapper`.

mod document;
mod ids;

pub use document::{Binary, BinarySubtype, Document, Value};
pub use ids::ObjectId;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, TypesError>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum TypesError {
    #[error("invalid object id `{input}`: {reason}")]
    InvalidObjectId { input: String, reason: String },
}
