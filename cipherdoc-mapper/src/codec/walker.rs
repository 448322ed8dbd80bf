//! Recursive field walk shared by encode and decode.
//!
//! Records are walked through their type-erased [`FieldInfo`] tables, so a
//! nested record is handled by the same code as the top-level one. Decoding
//! only builds a [`RecordValue`] tree here; turning it into typed records is
//! the schema's job.

use super::encrypted;
use crate::cache::MissingCodecs;
use crate::config::MapperConfig;
use crate::error::{MapperError, MapperResult};
use crate::registry::Codec;
use crate::value_codecs::{decode_natural, encode_natural, type_of_field, type_of_value};
use cipherdoc_model::{FieldInfo, FieldValue, RecordValue, ValueType};
use cipherdoc_types::{Document, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Document key holding the record identifier.
pub const ID_FIELD: &str = "_id";

pub(crate) struct Walker<'a> {
    pub(crate) config: &'a MapperConfig,
    pub(crate) missing: &'a MissingCodecs,
}

impl Walker<'_> {
    // ── Encode ──────────────────────────────────────────────────────

    pub(crate) fn encode_record(
        &self,
        record: &str,
        fields: &[FieldInfo],
        values: &RecordValue,
    ) -> MapperResult<Document> {
        let mut doc = Document::new();
        for info in fields {
            let value = values.get(info.name).unwrap_or(&FieldValue::Null);

            if info.identifier {
                // An absent id is left for the store to assign.
                if !value.is_null() {
                    doc.insert(ID_FIELD, self.encode_value(record, &info.value_type, value)?);
                }
                continue;
            }

            if value.is_null() {
                if !info.required {
                    doc.insert(info.name, Value::Null);
                }
                continue;
            }

            let encoded = if info.encrypted {
                encrypted::encrypt(self.config.cipher(), info.name, value)?
            } else {
                self.encode_value(record, &info.value_type, value)?
            };
            doc.insert(info.name, encoded);
        }
        Ok(doc)
    }

    fn encode_value(
        &self,
        record: &str,
        value_type: &ValueType,
        value: &FieldValue,
    ) -> MapperResult<Value> {
        match (value_type, value) {
            (_, FieldValue::Null) => Ok(Value::Null),
            (ValueType::Record(nested), FieldValue::Record(values)) => Ok(Value::Document(
                self.encode_record(nested.name(), nested.fields(), values)?,
            )),
            (ValueType::List(element), FieldValue::List(items)) => items
                .iter()
                .map(|item| self.encode_value(record, element, item))
                .collect::<MapperResult<Vec<_>>>()
                .map(Value::Array),
            (ValueType::Map(element), FieldValue::Map(entries)) => {
                let mut doc = Document::new();
                for (key, item) in entries {
                    doc.insert(key.clone(), self.encode_value(record, element, item)?);
                }
                Ok(Value::Document(doc))
            }
            (ValueType::Enum(enum_type), FieldValue::Enum(name) | FieldValue::Text(name)) => {
                if enum_type.contains(name) {
                    Ok(Value::String(name.clone()))
                } else {
                    Err(MapperError::UnsupportedType(format!(
                        "{name:?} is not a member of {}",
                        enum_type.name
                    )))
                }
            }
            (ValueType::Any, value) => self.encode_dynamic(record, value),
            (
                ValueType::Record(_) | ValueType::List(_) | ValueType::Map(_) | ValueType::Enum(_),
                other,
            ) => Err(MapperError::mismatch(value_type, other.kind())),
            (_, value) => match self.codec_for(record, value_type)? {
                Some(codec) => codec.encode(value),
                None => encode_natural(value_type, value),
            },
        }
    }

    /// Encodes a value with no declared type by its own kind.
    fn encode_dynamic(&self, record: &str, value: &FieldValue) -> MapperResult<Value> {
        match value {
            FieldValue::Enum(name) => Ok(Value::String(name.clone())),
            FieldValue::List(items) => items
                .iter()
                .map(|item| self.encode_dynamic(record, item))
                .collect::<MapperResult<Vec<_>>>()
                .map(Value::Array),
            FieldValue::Map(entries) => {
                let mut doc = Document::new();
                for (key, item) in entries {
                    doc.insert(key.clone(), self.encode_dynamic(record, item)?);
                }
                Ok(Value::Document(doc))
            }
            FieldValue::Record(values) => {
                let mut doc = Document::new();
                for (key, item) in values.iter() {
                    doc.insert(key, self.encode_dynamic(record, item)?);
                }
                Ok(Value::Document(doc))
            }
            other => match type_of_field(other) {
                Some(value_type) => self.encode_value(record, &value_type, other),
                None => Ok(Value::Null),
            },
        }
    }

    // ── Decode ──────────────────────────────────────────────────────

    pub(crate) fn decode_record(
        &self,
        record: &str,
        fields: &[FieldInfo],
        doc: &Document,
    ) -> MapperResult<RecordValue> {
        let mut values = RecordValue::new();
        for (key, value) in doc.iter() {
            let info = if key == ID_FIELD {
                fields.iter().find(|f| f.identifier)
            } else {
                fields.iter().find(|f| f.name == key && !f.identifier)
            };
            let Some(info) = info else {
                debug!(record, key, "skipping undeclared document key");
                continue;
            };
            values.insert(info.name, self.decode_value(record, &info.value_type, value)?);
        }
        Ok(values)
    }

    fn decode_value(
        &self,
        record: &str,
        value_type: &ValueType,
        value: &Value,
    ) -> MapperResult<FieldValue> {
        match (value_type, value) {
            (_, Value::Null) => Ok(FieldValue::Null),
            (_, Value::Binary(blob)) if blob.is_encrypted() => {
                encrypted::decrypt(self.config.cipher(), blob)
            }
            (ValueType::Record(nested), Value::Document(doc)) => Ok(FieldValue::Record(
                self.decode_record(nested.name(), nested.fields(), doc)?,
            )),
            (ValueType::List(element), Value::Array(items)) => items
                .iter()
                .map(|item| self.decode_value(record, element, item))
                .collect::<MapperResult<Vec<_>>>()
                .map(FieldValue::List),
            (ValueType::Map(element), Value::Document(doc)) => doc
                .iter()
                .map(|(key, item)| -> MapperResult<(String, FieldValue)> {
                    Ok((key.to_string(), self.decode_value(record, element, item)?))
                })
                .collect::<MapperResult<BTreeMap<_, _>>>()
                .map(FieldValue::Map),
            // Membership is checked when the record is restored.
            (ValueType::Enum(_), Value::String(name)) => Ok(FieldValue::Enum(name.clone())),
            (ValueType::Any, value) => self.decode_dynamic(record, value),
            (
                ValueType::Record(_) | ValueType::List(_) | ValueType::Map(_) | ValueType::Enum(_),
                other,
            ) => Err(MapperError::mismatch(value_type, other.kind())),
            (_, value) => match self.codec_for(record, value_type)? {
                Some(codec) => codec.decode(value),
                None => decode_natural(value_type, value),
            },
        }
    }

    /// Decodes a value with no declared type by its tree kind.
    ///
    /// UUID binaries go to the `uuid` codec, other plain binaries become
    /// bytes; encrypted ones were already handled by the caller.
    fn decode_dynamic(&self, record: &str, value: &Value) -> MapperResult<FieldValue> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| self.decode_value(record, &ValueType::Any, item))
                .collect::<MapperResult<Vec<_>>>()
                .map(FieldValue::List),
            Value::Document(doc) => doc
                .iter()
                .map(|(key, item)| -> MapperResult<(String, FieldValue)> {
                    Ok((key.to_string(), self.decode_value(record, &ValueType::Any, item)?))
                })
                .collect::<MapperResult<BTreeMap<_, _>>>()
                .map(FieldValue::Map),
            other => match type_of_value(other) {
                Some(value_type) => self.decode_value(record, &value_type, other),
                None => Ok(FieldValue::Null),
            },
        }
    }

    // ── Codec lookup ────────────────────────────────────────────────

    /// Resolves the registry codec for a scalar or custom type.
    ///
    /// `Ok(None)` means the caller should use the natural mapping; custom
    /// types have none and fail instead.
    fn codec_for(
        &self,
        record: &str,
        value_type: &ValueType,
    ) -> MapperResult<Option<Arc<dyn Codec>>> {
        let Some(key) = value_type.lookup_key() else {
            return Err(MapperError::UnsupportedType(value_type.to_string()));
        };

        if !self.missing.contains(&key) {
            if let Some(codec) = self.config.registry().lookup(&key) {
                return Ok(Some(codec));
            }
            self.missing.insert(key, record);
        }

        match value_type {
            ValueType::Custom(name) => Err(MapperError::UnsupportedType(format!(
                "no codec registered for {name}"
            ))),
            _ => Ok(None),
        }
    }
}
