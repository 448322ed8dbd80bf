use cipherdoc_types::{Binary, BinarySubtype, Document, ObjectId, Value};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// ── Document ordering ─────────────────────────────────────────────

#[test]
fn document_preserves_insertion_order() {
    let mut doc = Document::new();
    doc.insert("b", Value::Int32(1));
    doc.insert("a", Value::Int32(2));
    doc.insert("c", Value::Null);
    assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
}

#[test]
fn document_insert_replaces_in_place() {
    let mut doc = Document::new();
    doc.insert("x", Value::Int32(1));
    doc.insert("y", Value::Int32(2));
    let previous = doc.insert("x", Value::String("one".into()));
    assert_eq!(previous, Some(Value::Int32(1)));
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["x", "y"]);
    assert_eq!(doc.get("x"), Some(&Value::String("one".into())));
}

#[test]
fn document_remove_and_contains() {
    let mut doc: Document = [("a", Value::Bool(true)), ("b", Value::Null)]
        .into_iter()
        .collect();
    assert!(doc.contains_key("a"));
    assert_eq!(doc.remove("a"), Some(Value::Bool(true)));
    assert!(!doc.contains_key("a"));
    assert_eq!(doc.remove("missing"), None);
    assert_eq!(doc.len(), 1);
}

#[test]
fn document_get_mut() {
    let mut doc = Document::new();
    doc.insert("n", Value::Int64(1));
    if let Some(Value::Int64(n)) = doc.get_mut("n") {
        *n += 1;
    }
    assert_eq!(doc.get("n"), Some(&Value::Int64(2)));
}

#[test]
fn empty_document() {
    let doc = Document::new();
    assert!(doc.is_empty());
    assert_eq!(doc.iter().count(), 0);
}

// ── Binary subtypes ───────────────────────────────────────────────

#[test]
fn subtype_wire_bytes_are_stable() {
    assert_eq!(BinarySubtype::Generic.to_byte(), 0x00);
    assert_eq!(BinarySubtype::UuidLegacy.to_byte(), 0x03);
    assert_eq!(BinarySubtype::Uuid.to_byte(), 0x04);
    assert_eq!(BinarySubtype::Encrypted.to_byte(), 0xAF);
    assert_eq!(BinarySubtype::Encrypted.to_byte() as i8, -81);
}

#[test]
fn encrypted_subtype_is_distinct() {
    assert_ne!(BinarySubtype::Encrypted, BinarySubtype::Generic);
    assert!(!BinarySubtype::Encrypted.is_uuid());
    assert!(BinarySubtype::Uuid.is_uuid());
    assert!(BinarySubtype::UuidLegacy.is_uuid());
}

#[test]
fn binary_helpers() {
    let bin = Binary::encrypted(vec![1, 2, 3]);
    assert!(bin.is_encrypted());
    assert!(!Binary::generic(vec![]).is_encrypted());
    let value = Value::from(bin.clone());
    assert_eq!(value.as_binary(), Some(&bin));
    assert_eq!(value.kind(), "binary");
}

proptest! {
    #[test]
    fn subtype_byte_roundtrip(byte in any::<u8>()) {
        prop_assert_eq!(BinarySubtype::from_byte(byte).to_byte(), byte);
    }
}

// ── Serde ─────────────────────────────────────────────────────────

#[test]
fn nested_document_serde_roundtrip() {
    let mut inner = Document::new();
    inner.insert("street", Value::String("Main".into()));
    let mut doc = Document::new();
    doc.insert("_id", Value::ObjectId(ObjectId::new()));
    doc.insert("address", inner);
    doc.insert("tags", Value::Array(vec![Value::String("a".into()), Value::Null]));
    doc.insert("secret", Binary::encrypted(vec![9; 32]));

    let json = serde_json::to_string(&doc).unwrap();
    let back: Document = serde_json::from_str(&json).unwrap();
    assert_eq!(doc, back);
}
