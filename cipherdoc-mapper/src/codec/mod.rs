//! Typed entry point: encode records of one type, decode documents into them.

mod encrypted;
mod walker;

pub use walker::ID_FIELD;

use crate::cache::MissingCodecs;
use crate::config::MapperConfig;
use crate::error::{MapperError, MapperResult};
use cipherdoc_model::{Entity, FieldError, FieldValue, ValueType};
use cipherdoc_types::{Document, ObjectId, Value};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use walker::Walker;

/// Maps records of type `T` to documents and back.
///
/// One codec can be shared between threads. Registry misses are cached for
/// the codec's lifetime.
///
/// ```ignore
/// let config = MapperConfig::builder().cipher(cipher).build();
/// let codec = EntityCodec::<Person>::new(config);
/// let doc = codec.encode(&person)?;
/// let back = codec.decode_document(&doc)?;
/// ```
pub struct EntityCodec<T> {
    config: Arc<MapperConfig>,
    missing: MissingCodecs,
    _record: PhantomData<fn() -> T>,
}

impl<T: Entity> EntityCodec<T> {
    pub fn new(config: Arc<MapperConfig>) -> Self {
        Self {
            config,
            missing: MissingCodecs::default(),
            _record: PhantomData,
        }
    }

    pub fn config(&self) -> &Arc<MapperConfig> {
        &self.config
    }

    /// Number of type keys remembered as having no codec.
    pub fn cached_misses(&self) -> usize {
        self.missing.len()
    }

    /// Encodes `record` into a new document.
    ///
    /// Null fields flagged required are omitted; other null fields are written
    /// as explicit nulls. The identifier is stored under [`ID_FIELD`] and only
    /// when it is set.
    pub fn encode(&self, record: &T) -> MapperResult<Document> {
        let schema = T::schema();
        self.walker()
            .encode_record(schema.name(), schema.fields(), &schema.snapshot(record))
    }

    /// Encodes an optional record; `None` becomes a null value.
    pub fn encode_value(&self, record: Option<&T>) -> MapperResult<Value> {
        match record {
            Some(record) => self.encode(record).map(Value::Document),
            None => Ok(Value::Null),
        }
    }

    /// Decodes a tree value; null decodes to `None`.
    pub fn decode(&self, value: &Value) -> MapperResult<Option<T>> {
        match value {
            Value::Null => Ok(None),
            Value::Document(doc) => self.decode_document(doc).map(Some),
            other => Err(MapperError::DecodeFailure {
                type_name: T::schema().name().to_string(),
                reason: format!("expected a document, found {}", other.kind()),
            }),
        }
    }

    /// Decodes a document into a freshly constructed record.
    ///
    /// Keys the schema does not declare are ignored; declared fields missing
    /// from the document keep their default value.
    pub fn decode_document(&self, doc: &Document) -> MapperResult<T> {
        let schema = T::schema();
        let values = self
            .walker()
            .decode_record(schema.name(), schema.fields(), doc)?;
        schema
            .restore(values)
            .map_err(|e| MapperError::DecodeFailure {
                type_name: schema.name().to_string(),
                reason: e.to_string(),
            })
    }

    /// Whether `record` has a non-null identifier.
    pub fn document_has_id(&self, record: &T) -> bool {
        T::schema()
            .get_id(record)
            .is_some_and(|id| !id.is_null())
    }

    /// Assigns a generated identifier when `record` has none.
    ///
    /// Object-id fields get the id itself, text fields its hex form. Records
    /// without an identifier field are left untouched.
    pub fn generate_id_if_absent(&self, record: &mut T) -> MapperResult<()> {
        let schema = T::schema();
        let Some(info) = schema.id_field() else {
            return Ok(());
        };
        if self.document_has_id(record) {
            return Ok(());
        }

        let id = self.config.id_generator().generate();
        let value = match &info.value_type {
            ValueType::ObjectId | ValueType::Any => FieldValue::ObjectId(id),
            ValueType::Text => FieldValue::Text(id.to_hex()),
            other => {
                return Err(MapperError::IdentifierTypeMismatch(format!(
                    "cannot generate an identifier for a {other} field"
                )));
            }
        };
        schema.set_id(record, value).map_err(|source| field_error(info.name, source))
    }

    /// Reads the identifier as an [`ObjectId`], parsing hex text.
    pub fn document_id(&self, record: &T) -> MapperResult<ObjectId> {
        let schema = T::schema();
        match schema.get_id(record) {
            Some(FieldValue::ObjectId(id)) => Ok(id),
            Some(FieldValue::Text(text)) => ObjectId::parse_str(&text).map_err(|e| {
                MapperError::IdentifierTypeMismatch(format!(
                    "identifier text is not an object id: {e}"
                ))
            }),
            Some(other) => Err(MapperError::IdentifierTypeMismatch(format!(
                "identifier must be an object id or text, found {}",
                other.kind()
            ))),
            None => Err(MapperError::IdentifierTypeMismatch(format!(
                "{} has no identifier field",
                schema.name()
            ))),
        }
    }

    fn walker(&self) -> Walker<'_> {
        Walker {
            config: &self.config,
            missing: &self.missing,
        }
    }
}

fn field_error(field: &str, source: FieldError) -> MapperError {
    // set_id already names the field; unwrap it to avoid saying it twice.
    let source = match source {
        FieldError::InField { source, .. } => *source,
        other => other,
    };
    MapperError::Field {
        field: field.to_string(),
        source,
    }
}

impl<T> fmt::Debug for EntityCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityCodec")
            .field("record", &std::any::type_name::<T>())
            .field("cached_misses", &self.missing.len())
            .finish()
    }
}
