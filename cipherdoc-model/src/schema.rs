//! Per-type schema descriptors.
//!
//! An [`EntitySchema`] is built once per record type (usually inside a
//! `OnceLock`) and lists the record's fields in declaration order. Each field
//! carries type-erased metadata ([`FieldInfo`]) that the mapper walks, plus a
//! get/set accessor pair built from plain lens functions.

use crate::error::{FieldError, SchemaError};
use crate::field::{EnumMember, FieldType};
use crate::value::{FieldValue, RecordValue};
use std::collections::BTreeMap;
use std::fmt;

/// Key under which a codec registry resolves a value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(&'static str);

impl TypeKey {
    pub const BOOL: TypeKey = TypeKey("bool");
    pub const INT8: TypeKey = TypeKey("i8");
    pub const INT16: TypeKey = TypeKey("i16");
    pub const INT32: TypeKey = TypeKey("i32");
    pub const INT64: TypeKey = TypeKey("i64");
    pub const FLOAT32: TypeKey = TypeKey("f32");
    pub const FLOAT64: TypeKey = TypeKey("f64");
    pub const TEXT: TypeKey = TypeKey("text");
    pub const BYTES: TypeKey = TypeKey("bytes");
    pub const OBJECT_ID: TypeKey = TypeKey("objectId");
    pub const UUID: TypeKey = TypeKey("uuid");
    pub const DATE_TIME: TypeKey = TypeKey("dateTime");

    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// An enumeration type: its name and the symbolic names of its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumType {
    pub name: &'static str,
    pub members: &'static [&'static str],
}

impl EnumType {
    pub fn contains(&self, member: &str) -> bool {
        self.members.contains(&member)
    }
}

/// Reference to another mapped record type.
///
/// Resolved lazily so schemas can refer to each other in any order.
#[derive(Clone, Copy)]
pub struct RecordType {
    name: fn() -> &'static str,
    fields: fn() -> &'static [FieldInfo],
}

impl RecordType {
    pub fn of<U: Entity>() -> Self {
        Self {
            name: || U::schema().name(),
            fields: || U::schema().fields(),
        }
    }

    pub fn name(&self) -> &'static str {
        (self.name)()
    }

    pub fn fields(&self) -> &'static [FieldInfo] {
        (self.fields)()
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordType").field(&self.name()).finish()
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

/// Declared value type of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Text,
    Bytes,
    ObjectId,
    Uuid,
    DateTime,
    Enum(EnumType),
    Record(RecordType),
    List(Box<ValueType>),
    Map(Box<ValueType>),
    /// A type only a registered codec knows how to handle.
    Custom(&'static str),
    /// No static type; values are mapped by their own kind.
    Any,
}

impl ValueType {
    /// Registry key for this type; `None` for structural kinds the mapper
    /// handles itself (enums, records, lists, maps, dynamic values).
    pub fn lookup_key(&self) -> Option<TypeKey> {
        let key = match self {
            Self::Bool => TypeKey::BOOL,
            Self::Int8 => TypeKey::INT8,
            Self::Int16 => TypeKey::INT16,
            Self::Int32 => TypeKey::INT32,
            Self::Int64 => TypeKey::INT64,
            Self::Float32 => TypeKey::FLOAT32,
            Self::Float64 => TypeKey::FLOAT64,
            Self::Text => TypeKey::TEXT,
            Self::Bytes => TypeKey::BYTES,
            Self::ObjectId => TypeKey::OBJECT_ID,
            Self::Uuid => TypeKey::UUID,
            Self::DateTime => TypeKey::DATE_TIME,
            Self::Custom(name) => TypeKey::new(*name),
            Self::Enum(_) | Self::Record(_) | Self::List(_) | Self::Map(_) | Self::Any => {
                return None;
            }
        };
        Some(key)
    }

    /// Whether values of this type can be stored encrypted.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Bool
                | Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::Float32
                | Self::Float64
                | Self::Text
                | Self::Bytes
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum(e) => write!(f, "enum {}", e.name),
            Self::Record(r) => write!(f, "record {}", r.name()),
            Self::List(inner) => write!(f, "list<{inner}>"),
            Self::Map(inner) => write!(f, "map<text, {inner}>"),
            Self::Any => f.write_str("any"),
            other => match other.lookup_key() {
                Some(key) => write!(f, "{key}"),
                None => write!(f, "{other:?}"),
            },
        }
    }
}

/// Metadata of one declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub name: &'static str,
    pub value_type: ValueType,
    pub identifier: bool,
    pub required: bool,
    pub encrypted: bool,
}

impl FieldInfo {
    pub fn new(name: &'static str, value_type: ValueType) -> Self {
        Self {
            name,
            value_type,
            identifier: false,
            required: false,
            encrypted: false,
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self.value_type, ValueType::Record(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self.value_type, ValueType::Map(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self.value_type, ValueType::List(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.value_type, ValueType::Enum(_))
    }

    /// Element type of a list or map field.
    pub fn element_type(&self) -> Option<&ValueType> {
        match &self.value_type {
            ValueType::List(inner) | ValueType::Map(inner) => Some(&**inner),
            _ => None,
        }
    }
}

/// A record type the mapper can encode and decode.
///
/// ```ignore
/// impl Entity for Person {
///     fn schema() -> &'static EntitySchema<Self> {
///         static SCHEMA: OnceLock<EntitySchema<Person>> = OnceLock::new();
///         SCHEMA.get_or_init(|| /* EntitySchema::<Person>::builder("Person")... */)
///     }
/// }
/// ```
pub trait Entity: Default + Send + Sync + 'static {
    fn schema() -> &'static EntitySchema<Self>;
}

type Getter<T> = Box<dyn Fn(&T) -> FieldValue + Send + Sync>;
type Setter<T> = Box<dyn Fn(&mut T, FieldValue) -> Result<(), FieldError> + Send + Sync>;

struct Accessor<T> {
    get: Getter<T>,
    set: Setter<T>,
}

/// Field table of record type `T`.
pub struct EntitySchema<T> {
    name: &'static str,
    fields: Vec<FieldInfo>,
    accessors: Vec<Accessor<T>>,
    id_index: Option<usize>,
}

impl<T: Default + 'static> EntitySchema<T> {
    pub fn builder(name: &'static str) -> EntitySchemaBuilder<T> {
        EntitySchemaBuilder {
            name,
            fields: Vec::new(),
            accessors: Vec::new(),
            error: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared fields, in order.
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn id_field(&self) -> Option<&FieldInfo> {
        self.id_index.map(|i| &self.fields[i])
    }

    /// Reads a field by name.
    pub fn get(&self, record: &T, name: &str) -> Option<FieldValue> {
        let index = self.position(name)?;
        Some((self.accessors[index].get)(record))
    }

    /// Writes a field by name.
    pub fn set(&self, record: &mut T, name: &str, value: FieldValue) -> Result<(), FieldError> {
        let index = self
            .position(name)
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
        (self.accessors[index].set)(record, value).map_err(|e| e.in_field(name))
    }

    /// Reads the identifier; `None` when the type has no identifier field.
    pub fn get_id(&self, record: &T) -> Option<FieldValue> {
        self.id_index.map(|i| (self.accessors[i].get)(record))
    }

    pub fn set_id(&self, record: &mut T, value: FieldValue) -> Result<(), FieldError> {
        let index = self.id_index.ok_or(FieldError::NoIdentifier)?;
        (self.accessors[index].set)(record, value).map_err(|e| e.in_field(self.fields[index].name))
    }

    /// Reads every declared field.
    pub fn snapshot(&self, record: &T) -> RecordValue {
        self.fields
            .iter()
            .zip(&self.accessors)
            .map(|(info, acc)| (info.name, (acc.get)(record)))
            .collect()
    }

    /// Default-constructs a record and assigns every field present in
    /// `values`. Absent fields keep their default.
    pub fn restore(&self, mut values: RecordValue) -> Result<T, FieldError> {
        let mut record = T::default();
        for (info, acc) in self.fields.iter().zip(&self.accessors) {
            if let Some(value) = values.take(info.name) {
                (acc.set)(&mut record, value).map_err(|e| e.in_field(info.name))?;
            }
        }
        Ok(record)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

impl<T> fmt::Debug for EntitySchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitySchema")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Builder for [`EntitySchema`].
///
/// Fields are added through lens functions (`|r| &r.field`,
/// `|r| &mut r.field`); `required()` and `encrypted()` flag the field added
/// last. Name the record type when starting the builder
/// (`EntitySchema::<Person>::builder(..)`) so the lenses can be checked.
pub struct EntitySchemaBuilder<T> {
    name: &'static str,
    fields: Vec<FieldInfo>,
    accessors: Vec<Accessor<T>>,
    error: Option<SchemaError>,
}

impl<T: Default + 'static> EntitySchemaBuilder<T> {
    /// Adds the identifier field.
    pub fn id<V: FieldType + 'static>(
        self,
        name: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self {
        let mut builder = self.field(name, get, get_mut);
        if let Some(last) = builder.fields.last_mut() {
            last.identifier = true;
        }
        builder
    }

    /// Adds a plain field.
    pub fn field<V: FieldType + 'static>(
        self,
        name: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self {
        self.push(
            FieldInfo::new(name, V::value_type()),
            Box::new(move |r: &T| get(r).to_field()),
            Box::new(move |r: &mut T, value: FieldValue| {
                // Non-nullable fields keep their default when the store has null.
                if value.is_null() && !V::NULLABLE {
                    return Ok(());
                }
                *get_mut(r) = V::from_field(value)?;
                Ok(())
            }),
        )
    }

    /// Adds an enumeration field stored by member name.
    pub fn enumeration<E: EnumMember>(
        self,
        name: &'static str,
        get: fn(&T) -> &Option<E>,
        get_mut: fn(&mut T) -> &mut Option<E>,
    ) -> Self {
        self.push(
            FieldInfo::new(name, ValueType::Enum(E::enum_type())),
            Box::new(move |r: &T| match get(r) {
                Some(e) => FieldValue::Enum(e.name().to_string()),
                None => FieldValue::Null,
            }),
            Box::new(move |r: &mut T, value: FieldValue| {
                *get_mut(r) = match value {
                    FieldValue::Null => None,
                    other => Some(E::from_field(other)?),
                };
                Ok(())
            }),
        )
    }

    /// Adds a reference to a nested record.
    pub fn nested<U: Entity>(
        self,
        name: &'static str,
        get: fn(&T) -> &Option<U>,
        get_mut: fn(&mut T) -> &mut Option<U>,
    ) -> Self {
        self.push(
            FieldInfo::new(name, ValueType::Record(RecordType::of::<U>())),
            Box::new(move |r: &T| match get(r) {
                Some(u) => FieldValue::Record(U::schema().snapshot(u)),
                None => FieldValue::Null,
            }),
            Box::new(move |r: &mut T, value: FieldValue| {
                *get_mut(r) = restore_nested::<U>(value)?;
                Ok(())
            }),
        )
    }

    /// Adds a list of scalar values.
    pub fn list<V: FieldType + 'static>(
        self,
        name: &'static str,
        get: fn(&T) -> &Option<Vec<V>>,
        get_mut: fn(&mut T) -> &mut Option<Vec<V>>,
    ) -> Self {
        self.push(
            FieldInfo::new(name, ValueType::List(Box::new(V::value_type()))),
            Box::new(move |r: &T| match get(r) {
                Some(items) => FieldValue::List(items.iter().map(V::to_field).collect()),
                None => FieldValue::Null,
            }),
            Box::new(move |r: &mut T, value: FieldValue| {
                *get_mut(r) = match value {
                    FieldValue::Null => None,
                    FieldValue::List(items) => Some(
                        items
                            .into_iter()
                            .map(V::from_field)
                            .collect::<Result<Vec<V>, FieldError>>()?,
                    ),
                    other => return Err(FieldError::mismatch("list", other.kind())),
                };
                Ok(())
            }),
        )
    }

    /// Adds a list of nested records.
    pub fn nested_list<U: Entity>(
        self,
        name: &'static str,
        get: fn(&T) -> &Option<Vec<U>>,
        get_mut: fn(&mut T) -> &mut Option<Vec<U>>,
    ) -> Self {
        let element = ValueType::Record(RecordType::of::<U>());
        self.push(
            FieldInfo::new(name, ValueType::List(Box::new(element))),
            Box::new(move |r: &T| match get(r) {
                Some(items) => FieldValue::List(
                    items
                        .iter()
                        .map(|u| FieldValue::Record(U::schema().snapshot(u)))
                        .collect(),
                ),
                None => FieldValue::Null,
            }),
            Box::new(move |r: &mut T, value: FieldValue| {
                *get_mut(r) = match value {
                    FieldValue::Null => None,
                    FieldValue::List(items) => {
                        let mut out = Vec::with_capacity(items.len());
                        for item in items {
                            // Vec<U> has no slot for a null element.
                            match restore_nested::<U>(item)? {
                                Some(u) => out.push(u),
                                None => {
                                    return Err(FieldError::mismatch(
                                        format!("record {}", U::schema().name()),
                                        "null",
                                    ));
                                }
                            }
                        }
                        Some(out)
                    }
                    other => return Err(FieldError::mismatch("list", other.kind())),
                };
                Ok(())
            }),
        )
    }

    /// Adds a map from text keys to scalar values.
    pub fn map<V: FieldType + 'static>(
        self,
        name: &'static str,
        get: fn(&T) -> &Option<BTreeMap<String, V>>,
        get_mut: fn(&mut T) -> &mut Option<BTreeMap<String, V>>,
    ) -> Self {
        self.push(
            FieldInfo::new(name, ValueType::Map(Box::new(V::value_type()))),
            Box::new(move |r: &T| match get(r) {
                Some(entries) => FieldValue::Map(
                    entries
                        .iter()
                        .map(|(k, v)| (k.clone(), v.to_field()))
                        .collect(),
                ),
                None => FieldValue::Null,
            }),
            Box::new(move |r: &mut T, value: FieldValue| {
                *get_mut(r) = match value {
                    FieldValue::Null => None,
                    FieldValue::Map(entries) => Some(
                        entries
                            .into_iter()
                            .map(|(k, v)| V::from_field(v).map(|v| (k, v)))
                            .collect::<Result<BTreeMap<String, V>, FieldError>>()?,
                    ),
                    other => return Err(FieldError::mismatch("map", other.kind())),
                };
                Ok(())
            }),
        )
    }

    /// Adds a field handled by a registered codec under `type_name`, with
    /// hand-written accessors.
    pub fn custom(
        self,
        name: &'static str,
        type_name: &'static str,
        get: fn(&T) -> FieldValue,
        set: fn(&mut T, FieldValue) -> Result<(), FieldError>,
    ) -> Self {
        self.push(
            FieldInfo::new(name, ValueType::Custom(type_name)),
            Box::new(get),
            Box::new(set),
        )
    }

    /// Marks the last added field as required (non-null).
    pub fn required(self) -> Self {
        self.flag_last("required", |f| f.required = true)
    }

    /// Marks the last added field as encrypted at rest.
    pub fn encrypted(self) -> Self {
        self.flag_last("encrypted", |f| f.encrypted = true)
    }

    /// Validates the field table.
    pub fn build(self) -> Result<EntitySchema<T>, SchemaError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let schema = self.name;
        let mut id_index: Option<usize> = None;
        for (i, info) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == info.name) {
                return Err(SchemaError::DuplicateField {
                    schema,
                    field: info.name,
                });
            }
            if info.identifier {
                if let Some(first) = id_index {
                    return Err(SchemaError::MultipleIdentifiers {
                        schema,
                        first: self.fields[first].name,
                        second: info.name,
                    });
                }
                id_index = Some(i);
            }
            if info.encrypted {
                if info.identifier {
                    return Err(SchemaError::EncryptedIdentifier {
                        schema,
                        field: info.name,
                    });
                }
                if !info.value_type.is_scalar() {
                    return Err(SchemaError::EncryptedNonScalar {
                        schema,
                        field: info.name,
                        value_type: info.value_type.to_string(),
                    });
                }
            }
        }

        Ok(EntitySchema {
            name: self.name,
            fields: self.fields,
            accessors: self.accessors,
            id_index,
        })
    }

    fn push(mut self, info: FieldInfo, get: Getter<T>, set: Setter<T>) -> Self {
        self.fields.push(info);
        self.accessors.push(Accessor { get, set });
        self
    }

    fn flag_last(mut self, flag: &'static str, apply: impl FnOnce(&mut FieldInfo)) -> Self {
        match self.fields.last_mut() {
            Some(last) => apply(last),
            None if self.error.is_none() => {
                self.error = Some(SchemaError::NoFieldToFlag {
                    schema: self.name,
                    flag,
                });
            }
            None => {}
        }
        self
    }
}

fn restore_nested<U: Entity>(value: FieldValue) -> Result<Option<U>, FieldError> {
    match value {
        FieldValue::Null => Ok(None),
        FieldValue::Record(values) => U::schema().restore(values).map(Some),
        other => Err(FieldError::mismatch(
            format!("record {}", U::schema().name()),
            other.kind(),
        )),
    }
}
