//! Shared record types and helpers for mapper tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use cipherdoc_crypto::{FieldCipher, FieldKey};
use cipherdoc_mapper::{
    Codec, CodecRegistry, MapperConfig, MapperError, MapperResult, ProviderRegistry,
};
use cipherdoc_model::{Entity, EntitySchema, EnumMember, FieldError, FieldValue, TypeKey};
use cipherdoc_types::{ObjectId, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, OnceLock};
use uuid::Uuid;

// ── Records ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Status {
    Active,
    Archived,
}

impl EnumMember for Status {
    const TYPE_NAME: &'static str = "Status";
    const MEMBERS: &'static [&'static str] = &["ACTIVE", "ARCHIVED"];

    fn name(&self) -> &'static str {
        match self {
            Status::Active => "ACTIVE",
            Status::Archived => "ARCHIVED",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "ACTIVE" => Some(Status::Active),
            "ARCHIVED" => Some(Status::Archived),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub street: Option<String>,
    pub zip: i32,
}

impl Entity for Address {
    fn schema() -> &'static EntitySchema<Self> {
        static SCHEMA: OnceLock<EntitySchema<Address>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            EntitySchema::<Address>::builder("Address")
                .field("street", |a| &a.street, |a| &mut a.street)
                .field("zip", |a| &a.zip, |a| &mut a.zip)
                .build()
                .expect("valid schema")
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub id: Option<ObjectId>,
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub age: i32,
    pub pin: Option<i32>,
    pub status: Option<Status>,
    pub address: Option<Address>,
    pub tags: Option<Vec<String>>,
    pub scores: Option<BTreeMap<String, i64>>,
    pub contacts: Option<Vec<Address>>,
    pub external: Option<Uuid>,
    pub joined: Option<DateTime<Utc>>,
}

impl Entity for Person {
    fn schema() -> &'static EntitySchema<Self> {
        static SCHEMA: OnceLock<EntitySchema<Person>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            EntitySchema::<Person>::builder("Person")
                .id("id", |p| &p.id, |p| &mut p.id)
                .field("name", |p| &p.name, |p| &mut p.name)
                .required()
                .field("nickname", |p| &p.nickname, |p| &mut p.nickname)
                .field("age", |p| &p.age, |p| &mut p.age)
                .field("pin", |p| &p.pin, |p| &mut p.pin)
                .encrypted()
                .enumeration("status", |p| &p.status, |p| &mut p.status)
                .nested("address", |p| &p.address, |p| &mut p.address)
                .list("tags", |p| &p.tags, |p| &mut p.tags)
                .map("scores", |p| &p.scores, |p| &mut p.scores)
                .nested_list("contacts", |p| &p.contacts, |p| &mut p.contacts)
                .field("external", |p| &p.external, |p| &mut p.external)
                .field("joined", |p| &p.joined, |p| &mut p.joined)
                .build()
                .expect("valid schema")
        })
    }
}

/// One encrypted field per scalar kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Secrets {
    pub flag: bool,
    pub small: i8,
    pub short: i16,
    pub i: i32,
    pub big: i64,
    pub ratio: f32,
    pub precise: f64,
    pub note: Option<String>,
    pub blob: Option<Vec<u8>>,
}

impl Entity for Secrets {
    fn schema() -> &'static EntitySchema<Self> {
        static SCHEMA: OnceLock<EntitySchema<Secrets>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            EntitySchema::<Secrets>::builder("Secrets")
                .field("flag", |s| &s.flag, |s| &mut s.flag)
                .encrypted()
                .field("small", |s| &s.small, |s| &mut s.small)
                .encrypted()
                .field("short", |s| &s.short, |s| &mut s.short)
                .encrypted()
                .field("i", |s| &s.i, |s| &mut s.i)
                .encrypted()
                .field("big", |s| &s.big, |s| &mut s.big)
                .encrypted()
                .field("ratio", |s| &s.ratio, |s| &mut s.ratio)
                .encrypted()
                .field("precise", |s| &s.precise, |s| &mut s.precise)
                .encrypted()
                .field("note", |s| &s.note, |s| &mut s.note)
                .encrypted()
                .field("blob", |s| &s.blob, |s| &mut s.blob)
                .encrypted()
                .build()
                .expect("valid schema")
        })
    }
}

/// A record whose identifier is stored as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ticket {
    pub id: Option<String>,
    pub title: Option<String>,
}

impl Entity for Ticket {
    fn schema() -> &'static EntitySchema<Self> {
        static SCHEMA: OnceLock<EntitySchema<Ticket>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            EntitySchema::<Ticket>::builder("Ticket")
                .id("id", |t| &t.id, |t| &mut t.id)
                .field("title", |t| &t.title, |t| &mut t.title)
                .build()
                .expect("valid schema")
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Celsius(pub f64);

/// A record with a field only a registered codec can map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reading {
    pub sensor: Option<String>,
    pub temperature: Celsius,
}

pub const CELSIUS: TypeKey = TypeKey::new("celsius");

impl Entity for Reading {
    fn schema() -> &'static EntitySchema<Self> {
        static SCHEMA: OnceLock<EntitySchema<Reading>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            EntitySchema::<Reading>::builder("Reading")
                .field("sensor", |r| &r.sensor, |r| &mut r.sensor)
                .custom(
                    "temperature",
                    "celsius",
                    |r: &Reading| FieldValue::Float64(r.temperature.0),
                    |r: &mut Reading, value: FieldValue| match value {
                        FieldValue::Float64(c) => {
                            r.temperature = Celsius(c);
                            Ok(())
                        }
                        FieldValue::Null => Ok(()),
                        other => Err(FieldError::TypeMismatch {
                            expected: "celsius".to_string(),
                            found: other.kind(),
                        }),
                    },
                )
                .build()
                .expect("valid schema")
        })
    }
}

/// A record with a dynamically typed payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    pub id: Option<ObjectId>,
    pub payload: FieldValue,
}

impl Entity for Envelope {
    fn schema() -> &'static EntitySchema<Self> {
        static SCHEMA: OnceLock<EntitySchema<Envelope>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            EntitySchema::<Envelope>::builder("Envelope")
                .id("id", |e| &e.id, |e| &mut e.id)
                .field("payload", |e| &e.payload, |e| &mut e.payload)
                .build()
                .expect("valid schema")
        })
    }
}

// ── Codecs and registries ────────────────────────────────────────

/// Stores temperatures as text such as `"21.5C"`.
pub struct CelsiusCodec;

impl Codec for CelsiusCodec {
    fn encode(&self, value: &FieldValue) -> MapperResult<Value> {
        match value {
            FieldValue::Float64(c) => Ok(Value::String(format!("{c}C"))),
            other => Err(MapperError::UnsupportedType(format!("celsius from {}", other.kind()))),
        }
    }

    fn decode(&self, value: &Value) -> MapperResult<FieldValue> {
        let text = value
            .as_str()
            .and_then(|s| s.strip_suffix('C'))
            .ok_or_else(|| MapperError::UnsupportedType("celsius text".to_string()))?;
        text.parse()
            .map(FieldValue::Float64)
            .map_err(|e| MapperError::UnsupportedType(format!("celsius: {e}")))
    }
}

/// Upper-cases text on encode; used to check registry codecs win over the
/// builtin mapping.
pub struct ShoutingTextCodec;

impl Codec for ShoutingTextCodec {
    fn encode(&self, value: &FieldValue) -> MapperResult<Value> {
        match value {
            FieldValue::Text(s) => Ok(Value::String(s.to_uppercase())),
            other => Err(MapperError::UnsupportedType(format!("text from {}", other.kind()))),
        }
    }

    fn decode(&self, value: &Value) -> MapperResult<FieldValue> {
        match value {
            Value::String(s) => Ok(FieldValue::Text(s.to_lowercase())),
            other => Err(MapperError::UnsupportedType(format!("text from {}", other.kind()))),
        }
    }
}

/// Registry double that counts lookups per key.
pub struct CountingRegistry {
    inner: ProviderRegistry,
    lookups: Mutex<HashMap<TypeKey, usize>>,
}

impl CountingRegistry {
    pub fn new(inner: ProviderRegistry) -> Self {
        Self {
            inner,
            lookups: Mutex::new(HashMap::new()),
        }
    }

    pub fn lookups(&self, key: TypeKey) -> usize {
        self.lookups.lock().unwrap().get(&key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.lookups.lock().unwrap().values().sum()
    }
}

impl CodecRegistry for CountingRegistry {
    fn lookup(&self, key: &TypeKey) -> Option<Arc<dyn Codec>> {
        *self.lookups.lock().unwrap().entry(*key).or_insert(0) += 1;
        self.inner.lookup(key)
    }
}

// ── Helpers ──────────────────────────────────────────────────────

pub fn key(byte: u8) -> FieldKey {
    FieldKey::from_bytes(&[byte; 32]).unwrap()
}

pub fn cipher(byte: u8) -> FieldCipher {
    FieldCipher::new(key(byte))
}

pub fn config_with_key(byte: u8) -> Arc<MapperConfig> {
    MapperConfig::builder().cipher(cipher(byte)).build()
}

pub fn joined_at() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_700_000_000_123).unwrap()
}

pub fn sample_person() -> Person {
    let mut scores = BTreeMap::new();
    scores.insert("math".to_string(), 91);
    scores.insert("art".to_string(), 78);

    Person {
        id: Some(ObjectId::new()),
        name: Some("Ada".to_string()),
        nickname: None,
        age: 36,
        pin: Some(42),
        status: Some(Status::Active),
        address: Some(Address {
            street: Some("1 Analytical Way".to_string()),
            zip: 12345,
        }),
        tags: Some(vec!["math".to_string(), "engines".to_string()]),
        scores: Some(scores),
        contacts: Some(vec![
            Address {
                street: Some("2 Side St".to_string()),
                zip: 1,
            },
            Address {
                street: None,
                zip: 2,
            },
        ]),
        external: Some(Uuid::new_v4()),
        joined: Some(joined_at()),
    }
}
