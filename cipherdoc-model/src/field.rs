//! Typed conversions between Rust field types and [`FieldValue`].

use crate::error::FieldError;
use crate::schema::{EnumType, ValueType};
use crate::value::FieldValue;
use chrono::{DateTime, Utc};
use cipherdoc_types::ObjectId;
use uuid::Uuid;

/// A Rust type that can be stored in a record field.
///
/// Conversions from [`FieldValue`] accept the exact kind plus lossless
/// widenings (an `i64` field accepts `Int32`, an `f64` field accepts
/// `Float32`).
pub trait FieldType: Sized {
    /// Whether the type can hold null (`Option<V>`).
    const NULLABLE: bool = false;

    fn value_type() -> ValueType;

    fn to_field(&self) -> FieldValue;

    fn from_field(value: FieldValue) -> Result<Self, FieldError>;
}

/// An enumeration stored by the symbolic name of its members.
pub trait EnumMember: Sized + 'static {
    const TYPE_NAME: &'static str;
    const MEMBERS: &'static [&'static str];

    fn name(&self) -> &'static str;

    fn from_name(name: &str) -> Option<Self>;

    fn enum_type() -> EnumType {
        EnumType {
            name: Self::TYPE_NAME,
            members: Self::MEMBERS,
        }
    }

    /// Resolves a decoded value (`Enum` or `Text`) to a member.
    fn from_field(value: FieldValue) -> Result<Self, FieldError> {
        match value {
            FieldValue::Enum(name) | FieldValue::Text(name) => {
                Self::from_name(&name).ok_or(FieldError::UnknownEnumMember {
                    enum_name: Self::TYPE_NAME,
                    name,
                })
            }
            other => Err(FieldError::mismatch(Self::TYPE_NAME, other.kind())),
        }
    }
}

impl<V: FieldType> FieldType for Option<V> {
    const NULLABLE: bool = true;

    fn value_type() -> ValueType {
        V::value_type()
    }

    fn to_field(&self) -> FieldValue {
        match self {
            Some(v) => v.to_field(),
            None => FieldValue::Null,
        }
    }

    fn from_field(value: FieldValue) -> Result<Self, FieldError> {
        match value {
            FieldValue::Null => Ok(None),
            other => V::from_field(other).map(Some),
        }
    }
}

/// A dynamically typed field.
impl FieldType for FieldValue {
    const NULLABLE: bool = true;

    fn value_type() -> ValueType {
        ValueType::Any
    }

    fn to_field(&self) -> FieldValue {
        self.clone()
    }

    fn from_field(value: FieldValue) -> Result<Self, FieldError> {
        Ok(value)
    }
}

impl FieldType for bool {
    fn value_type() -> ValueType {
        ValueType::Bool
    }

    fn to_field(&self) -> FieldValue {
        FieldValue::Bool(*self)
    }

    fn from_field(value: FieldValue) -> Result<Self, FieldError> {
        match value {
            FieldValue::Bool(v) => Ok(v),
            other => Err(FieldError::mismatch("bool", other.kind())),
        }
    }
}

impl FieldType for i8 {
    fn value_type() -> ValueType {
        ValueType::Int8
    }

    fn to_field(&self) -> FieldValue {
        FieldValue::Int8(*self)
    }

    fn from_field(value: FieldValue) -> Result<Self, FieldError> {
        match value {
            FieldValue::Int8(v) => Ok(v),
            other => Err(FieldError::mismatch("i8", other.kind())),
        }
    }
}

impl FieldType for i16 {
    fn value_type() -> ValueType {
        ValueType::Int16
    }

    fn to_field(&self) -> FieldValue {
        FieldValue::Int16(*self)
    }

    fn from_field(value: FieldValue) -> Result<Self, FieldError> {
        match value {
            FieldValue::Int16(v) => Ok(v),
            FieldValue::Int8(v) => Ok(v.into()),
            other => Err(FieldError::mismatch("i16", other.kind())),
        }
    }
}

impl FieldType for i32 {
    fn value_type() -> ValueType {
        ValueType::Int32
    }

    fn to_field(&self) -> FieldValue {
        FieldValue::Int32(*self)
    }

    fn from_field(value: FieldValue) -> Result<Self, FieldError> {
        match value {
            FieldValue::Int32(v) => Ok(v),
            FieldValue::Int16(v) => Ok(v.into()),
            FieldValue::Int8(v) => Ok(v.into()),
            other => Err(FieldError::mismatch("i32", other.kind())),
        }
    }
}

impl FieldType for i64 {
    fn value_type() -> ValueType {
        ValueType::Int64
    }

    fn to_field(&self) -> FieldValue {
        FieldValue::Int64(*self)
    }

    fn from_field(value: FieldValue) -> Result<Self, FieldError> {
        match value {
            FieldValue::Int64(v) => Ok(v),
            FieldValue::Int32(v) => Ok(v.into()),
            FieldValue::Int16(v) => Ok(v.into()),
            FieldValue::Int8(v) => Ok(v.into()),
            other => Err(FieldError::mismatch("i64", other.kind())),
        }
    }
}

impl FieldType for f32 {
    fn value_type() -> ValueType {
        ValueType::Float32
    }

    fn to_field(&self) -> FieldValue {
        FieldValue::Float32(*self)
    }

    fn from_field(value: FieldValue) -> Result<Self, FieldError> {
        match value {
            FieldValue::Float32(v) => Ok(v),
            other => Err(FieldError::mismatch("f32", other.kind())),
        }
    }
}

impl FieldType for f64 {
    fn value_type() -> ValueType {
        ValueType::Float64
    }

    fn to_field(&self) -> FieldValue {
        FieldValue::Float64(*self)
    }

    fn from_field(value: FieldValue) -> Result<Self, FieldError> {
        match value {
            FieldValue::Float64(v) => Ok(v),
            FieldValue::Float32(v) => Ok(v.into()),
            other => Err(FieldError::mismatch("f64", other.kind())),
        }
    }
}

impl FieldType for String {
    fn value_type() -> ValueType {
        ValueType::Text
    }

    fn to_field(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }

    fn from_field(value: FieldValue) -> Result<Self, FieldError> {
        match value {
            FieldValue::Text(v) => Ok(v),
            // String identifiers come back from the store as object ids.
            FieldValue::ObjectId(id) => Ok(id.to_hex()),
            other => Err(FieldError::mismatch("text", other.kind())),
        }
    }
}

impl FieldType for Vec<u8> {
    fn value_type() -> ValueType {
        ValueType::Bytes
    }

    fn to_field(&self) -> FieldValue {
        FieldValue::Bytes(self.clone())
    }

    fn from_field(value: FieldValue) -> Result<Self, FieldError> {
        match value {
            FieldValue::Bytes(v) => Ok(v),
            other => Err(FieldError::mismatch("bytes", other.kind())),
        }
    }
}

impl FieldType for ObjectId {
    fn value_type() -> ValueType {
        ValueType::ObjectId
    }

    fn to_field(&self) -> FieldValue {
        FieldValue::ObjectId(*self)
    }

    fn from_field(value: FieldValue) -> Result<Self, FieldError> {
        match value {
            FieldValue::ObjectId(v) => Ok(v),
            FieldValue::Text(s) => {
                ObjectId::parse_str(&s).map_err(|_| FieldError::mismatch("objectId", "text"))
            }
            other => Err(FieldError::mismatch("objectId", other.kind())),
        }
    }
}

impl FieldType for Uuid {
    fn value_type() -> ValueType {
        ValueType::Uuid
    }

    fn to_field(&self) -> FieldValue {
        FieldValue::Uuid(*self)
    }

    fn from_field(value: FieldValue) -> Result<Self, FieldError> {
        match value {
            FieldValue::Uuid(v) => Ok(v),
            other => Err(FieldError::mismatch("uuid", other.kind())),
        }
    }
}

impl FieldType for DateTime<Utc> {
    fn value_type() -> ValueType {
        ValueType::DateTime
    }

    fn to_field(&self) -> FieldValue {
        FieldValue::DateTime(*self)
    }

    fn from_field(value: FieldValue) -> Result<Self, FieldError> {
        match value {
            FieldValue::DateTime(v) => Ok(v),
            other => Err(FieldError::mismatch("dateTime", other.kind())),
        }
    }
}
