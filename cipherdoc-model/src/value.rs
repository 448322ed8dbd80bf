use chrono::{DateTime, Utc};
use cipherdoc_types::ObjectId;
use std::collections::BTreeMap;
use uuid::Uuid;

/// A value read from, or written to, one field of a record.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Text(String),
    Bytes(Vec<u8>),
    ObjectId(ObjectId),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    /// Symbolic name of an enumeration member.
    Enum(String),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
    /// Field values of a nested record.
    Record(RecordValue),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int8(_) => "i8",
            Self::Int16(_) => "i16",
            Self::Int32(_) => "i32",
            Self::Int64(_) => "i64",
            Self::Float32(_) => "f32",
            Self::Float64(_) => "f64",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::ObjectId(_) => "objectId",
            Self::Uuid(_) => "uuid",
            Self::DateTime(_) => "dateTime",
            Self::Enum(_) => "enum",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Record(_) => "record",
        }
    }
}

/// Field values of one record, in declaration order.
///
/// Produced by [`EntitySchema::snapshot`](crate::EntitySchema::snapshot) on
/// encode and by the mapper's first decode pass; consumed by
/// [`EntitySchema::restore`](crate::EntitySchema::restore).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordValue {
    entries: Vec<(String, FieldValue)>,
}

impl RecordValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Removes and returns the value stored under `name`.
    pub fn take(&mut self, name: &str) -> Option<FieldValue> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for RecordValue {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        let mut record = RecordValue::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}
