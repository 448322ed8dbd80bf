//! The document tree: ordered maps of named values.

use crate::ObjectId;
use serde::{Deserialize, Serialize};

/// Subtype byte attached to every binary value.
///
/// The byte values are part of the storage format and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinarySubtype {
    /// Plain bytes.
    Generic,
    /// UUID in the legacy (driver specific) byte order.
    UuidLegacy,
    /// UUID in RFC 4122 byte order.
    Uuid,
    /// A tagged scalar encrypted by the field cipher.
    Encrypted,
    /// Any other subtype byte.
    User(u8),
}

impl BinarySubtype {
    pub const GENERIC: u8 = 0x00;
    pub const UUID_LEGACY: u8 = 0x03;
    pub const UUID: u8 = 0x04;
    /// Reserved for encrypted scalars; sits in the user-defined range.
    pub const ENCRYPTED: u8 = 0xAF;

    /// Returns the wire byte for this subtype.
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Generic => Self::GENERIC,
            Self::UuidLegacy => Self::UUID_LEGACY,
            Self::Uuid => Self::UUID,
            Self::Encrypted => Self::ENCRYPTED,
            Self::User(b) => b,
        }
    }

    /// Classifies a wire byte.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            Self::GENERIC => Self::Generic,
            Self::UUID_LEGACY => Self::UuidLegacy,
            Self::UUID => Self::Uuid,
            Self::ENCRYPTED => Self::Encrypted,
            other => Self::User(other),
        }
    }

    /// Whether the subtype carries a 128-bit UUID.
    pub fn is_uuid(self) -> bool {
        matches!(self, Self::Uuid | Self::UuidLegacy)
    }
}

/// A binary blob with its subtype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binary {
    pub subtype: BinarySubtype,
    pub bytes: Vec<u8>,
}

impl Binary {
    pub fn new(subtype: BinarySubtype, bytes: Vec<u8>) -> Self {
        Self { subtype, bytes }
    }

    /// Shorthand for a generic binary value.
    pub fn generic(bytes: Vec<u8>) -> Self {
        Self::new(BinarySubtype::Generic, bytes)
    }

    /// Shorthand for an encrypted payload.
    pub fn encrypted(bytes: Vec<u8>) -> Self {
        Self::new(BinarySubtype::Encrypted, bytes)
    }

    pub fn is_encrypted(&self) -> bool {
        self.subtype == BinarySubtype::Encrypted
    }
}

/// A single value in a document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Double(f64),
    String(String),
    Binary(Binary),
    ObjectId(ObjectId),
    /// Milliseconds since the Unix epoch.
    DateTime(i64),
    Document(Document),
    Array(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::Binary(_) => "binary",
            Self::ObjectId(_) => "objectId",
            Self::DateTime(_) => "dateTime",
            Self::Document(_) => "document",
            Self::Array(_) => "array",
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Self::Document(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&Binary> {
        match self {
            Self::Binary(bin) => Some(bin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Self::Document(doc)
    }
}

impl From<Binary> for Value {
    fn from(bin: Binary) -> Self {
        Self::Binary(bin)
    }
}

/// Insertion-ordered mapping from field name to [`Value`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    entries: Vec<(String, Value)>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing (in place) any value already under `key`.
    /// Returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (k, v) in iter {
            doc.insert(k, v);
        }
        doc
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
