//! Natural mapping between scalar field values and tree values.
//!
//! | value type          | tree value                       |
//! |---------------------|----------------------------------|
//! | `Bool`              | `Bool`                           |
//! | `Int8`/`Int16`/`Int32` | `Int32`                       |
//! | `Int64`             | `Int64`                          |
//! | `Float32`/`Float64` | `Double`                         |
//! | `Text`              | `String`                         |
//! | `Bytes`             | `Binary` (generic)               |
//! | `ObjectId`          | `ObjectId`                       |
//! | `Uuid`              | `Binary` (UUID subtype)          |
//! | `DateTime`          | `DateTime` (epoch milliseconds)  |
//!
//! [`ValueCodecProvider`] exposes these as registry codecs. The mapper also
//! uses them directly for builtin kinds a registry does not cover.

use crate::error::{MapperError, MapperResult};
use crate::registry::{Codec, CodecProvider};
use chrono::{DateTime, Utc};
use cipherdoc_model::{FieldValue, TypeKey, ValueType};
use cipherdoc_types::{Binary, BinarySubtype, ObjectId, Value};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Every scalar kind with a natural mapping.
pub(crate) fn builtin_types() -> [ValueType; 12] {
    [
        ValueType::Bool,
        ValueType::Int8,
        ValueType::Int16,
        ValueType::Int32,
        ValueType::Int64,
        ValueType::Float32,
        ValueType::Float64,
        ValueType::Text,
        ValueType::Bytes,
        ValueType::ObjectId,
        ValueType::Uuid,
        ValueType::DateTime,
    ]
}

pub(crate) fn encode_natural(value_type: &ValueType, value: &FieldValue) -> MapperResult<Value> {
    let encoded = match (value_type, value) {
        (_, FieldValue::Null) => Value::Null,
        (ValueType::Bool, FieldValue::Bool(v)) => Value::Bool(*v),
        (ValueType::Int8, FieldValue::Int8(v)) => Value::Int32((*v).into()),
        (ValueType::Int16, FieldValue::Int16(v)) => Value::Int32((*v).into()),
        (ValueType::Int32, FieldValue::Int32(v)) => Value::Int32(*v),
        (ValueType::Int64, FieldValue::Int64(v)) => Value::Int64(*v),
        (ValueType::Float32, FieldValue::Float32(v)) => Value::Double((*v).into()),
        (ValueType::Float64, FieldValue::Float64(v)) => Value::Double(*v),
        (ValueType::Text, FieldValue::Text(v)) => Value::String(v.clone()),
        (ValueType::Bytes, FieldValue::Bytes(v)) => Value::Binary(Binary::generic(v.clone())),
        (ValueType::ObjectId, FieldValue::ObjectId(v)) => Value::ObjectId(*v),
        (ValueType::Uuid, FieldValue::Uuid(v)) => {
            Value::Binary(Binary::new(BinarySubtype::Uuid, v.as_bytes().to_vec()))
        }
        (ValueType::DateTime, FieldValue::DateTime(v)) => Value::DateTime(v.timestamp_millis()),
        (expected, other) => return Err(MapperError::mismatch(expected, other.kind())),
    };
    Ok(encoded)
}

pub(crate) fn decode_natural(value_type: &ValueType, value: &Value) -> MapperResult<FieldValue> {
    let decoded = match (value_type, value) {
        (_, Value::Null) => FieldValue::Null,
        (ValueType::Bool, Value::Bool(v)) => FieldValue::Bool(*v),
        (ValueType::Int8, Value::Int32(v)) => FieldValue::Int8(narrow(*v, value_type)?),
        (ValueType::Int16, Value::Int32(v)) => FieldValue::Int16(narrow(*v, value_type)?),
        (ValueType::Int32, Value::Int32(v)) => FieldValue::Int32(*v),
        (ValueType::Int32, Value::Int64(v)) => FieldValue::Int32(narrow(*v, value_type)?),
        (ValueType::Int64, Value::Int64(v)) => FieldValue::Int64(*v),
        (ValueType::Int64, Value::Int32(v)) => FieldValue::Int64((*v).into()),
        (ValueType::Float32, Value::Double(v)) => FieldValue::Float32(*v as f32),
        (ValueType::Float64, Value::Double(v)) => FieldValue::Float64(*v),
        (ValueType::Float64, Value::Int32(v)) => FieldValue::Float64((*v).into()),
        (ValueType::Text, Value::String(v)) => FieldValue::Text(v.clone()),
        (ValueType::Text, Value::ObjectId(id)) => FieldValue::Text(id.to_hex()),
        (ValueType::Bytes, Value::Binary(b)) => FieldValue::Bytes(b.bytes.clone()),
        (ValueType::ObjectId, Value::ObjectId(id)) => FieldValue::ObjectId(*id),
        (ValueType::ObjectId, Value::String(s)) => FieldValue::ObjectId(
            ObjectId::parse_str(s).map_err(|_| MapperError::mismatch(value_type, "text"))?,
        ),
        (ValueType::Uuid, Value::Binary(b)) if b.subtype.is_uuid() => FieldValue::Uuid(
            Uuid::from_slice(&b.bytes).map_err(|_| MapperError::mismatch(value_type, "binary"))?,
        ),
        (ValueType::DateTime, Value::DateTime(ms)) => FieldValue::DateTime(
            DateTime::<Utc>::from_timestamp_millis(*ms)
                .ok_or_else(|| MapperError::mismatch(value_type, "dateTime out of range"))?,
        ),
        (expected, other) => return Err(MapperError::mismatch(expected, other.kind())),
    };
    Ok(decoded)
}

fn narrow<S, N: TryFrom<S>>(value: S, value_type: &ValueType) -> MapperResult<N> {
    N::try_from(value).map_err(|_| MapperError::mismatch(value_type, "integer out of range"))
}

/// Scalar type of an in-memory value; `None` for null and structural values.
pub(crate) fn type_of_field(value: &FieldValue) -> Option<ValueType> {
    let value_type = match value {
        FieldValue::Bool(_) => ValueType::Bool,
        FieldValue::Int8(_) => ValueType::Int8,
        FieldValue::Int16(_) => ValueType::Int16,
        FieldValue::Int32(_) => ValueType::Int32,
        FieldValue::Int64(_) => ValueType::Int64,
        FieldValue::Float32(_) => ValueType::Float32,
        FieldValue::Float64(_) => ValueType::Float64,
        FieldValue::Text(_) => ValueType::Text,
        FieldValue::Bytes(_) => ValueType::Bytes,
        FieldValue::ObjectId(_) => ValueType::ObjectId,
        FieldValue::Uuid(_) => ValueType::Uuid,
        FieldValue::DateTime(_) => ValueType::DateTime,
        FieldValue::Null
        | FieldValue::Enum(_)
        | FieldValue::List(_)
        | FieldValue::Map(_)
        | FieldValue::Record(_) => return None,
    };
    Some(value_type)
}

/// Scalar type a tree value decodes to when nothing is declared.
pub(crate) fn type_of_value(value: &Value) -> Option<ValueType> {
    let value_type = match value {
        Value::Bool(_) => ValueType::Bool,
        Value::Int32(_) => ValueType::Int32,
        Value::Int64(_) => ValueType::Int64,
        Value::Double(_) => ValueType::Float64,
        Value::String(_) => ValueType::Text,
        Value::ObjectId(_) => ValueType::ObjectId,
        Value::DateTime(_) => ValueType::DateTime,
        Value::Binary(b) if b.subtype.is_uuid() => ValueType::Uuid,
        Value::Binary(_) => ValueType::Bytes,
        Value::Null | Value::Document(_) | Value::Array(_) => return None,
    };
    Some(value_type)
}

/// Registry codec for one scalar kind using the natural mapping.
#[derive(Debug, Clone)]
pub struct ValueCodec {
    value_type: ValueType,
}

impl ValueCodec {
    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }
}

impl Codec for ValueCodec {
    fn encode(&self, value: &FieldValue) -> MapperResult<Value> {
        encode_natural(&self.value_type, value)
    }

    fn decode(&self, value: &Value) -> MapperResult<FieldValue> {
        decode_natural(&self.value_type, value)
    }
}

/// Provides a [`ValueCodec`] for every builtin scalar kind.
#[derive(Clone)]
pub struct ValueCodecProvider {
    codecs: HashMap<TypeKey, Arc<dyn Codec>>,
}

impl ValueCodecProvider {
    pub fn new() -> Self {
        let codecs = builtin_types()
            .into_iter()
            .filter_map(|value_type| {
                let key = value_type.lookup_key()?;
                let codec: Arc<dyn Codec> = Arc::new(ValueCodec { value_type });
                Some((key, codec))
            })
            .collect();
        Self { codecs }
    }
}

impl Default for ValueCodecProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CodecProvider for ValueCodecProvider {
    fn get(&self, key: &TypeKey) -> Option<Arc<dyn Codec>> {
        self.codecs.get(key).cloned()
    }
}

impl std::fmt::Debug for ValueCodecProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueCodecProvider")
            .field("codecs", &self.codecs.len())
            .finish()
    }
}
