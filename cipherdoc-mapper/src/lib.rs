//! Maps typed records to schemaless documents and back.
//!
//! An [`EntityCodec`] walks a record's schema field by field:
//! - scalar and custom fields go through the [`CodecRegistry`], with misses
//!   cached per codec;
//! - nested records, lists and maps recurse with the declared element type;
//! - enumerations are stored by member name;
//! - fields flagged `encrypted` are tagged, encrypted with the configured
//!   [`FieldCipher`](cipherdoc_crypto::FieldCipher) and stored as binaries of
//!   the encrypted subtype.
//!
//! Encrypted values use AES-CBC, which carries no authentication tag. A
//! wrong key is nearly always caught by the padding check or the tag reader,
//! but an encrypted bytes field can occasionally decrypt to garbage and
//! decode without an error.
//!
//! Everything the engine needs is passed in through one [`MapperConfig`];
//! there is no process-wide state.

mod cache;
mod codec;
mod config;
mod error;
mod id;
mod registry;
mod value_codecs;

pub use codec::{EntityCodec, ID_FIELD};
pub use config::{MapperConfig, MapperConfigBuilder};
pub use error::{MapperError, MapperResult};
pub use id::{IdGenerator, ObjectIdGenerator};
pub use registry::{Codec, CodecMap, CodecProvider, CodecRegistry, ProviderRegistry};
pub use value_codecs::{ValueCodec, ValueCodecProvider};
