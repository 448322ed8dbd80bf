use cipherdoc_types::{ObjectId, TypesError};
use std::collections::HashSet;
use std::str::FromStr;

// ── Generation ────────────────────────────────────────────────────

#[test]
fn object_id_new_is_unique() {
    let ids: HashSet<ObjectId> = (0..1000).map(|_| ObjectId::new()).collect();
    assert_eq!(ids.len(), 1000);
}

#[test]
fn object_id_timestamp_is_recent() {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as u32;
    let id = ObjectId::new();
    assert!(id.timestamp() <= now);
    assert!(now - id.timestamp() < 60);
}

#[test]
fn object_ids_share_process_bytes() {
    let a = ObjectId::new().bytes();
    let b = ObjectId::new().bytes();
    assert_eq!(a[4..9], b[4..9]);
}

// ── Hex form ──────────────────────────────────────────────────────

#[test]
fn object_id_display_and_parse() {
    let id = ObjectId::new();
    let s = id.to_string();
    assert_eq!(s.len(), 24);
    assert_eq!(ObjectId::parse_str(&s).unwrap(), id);
    assert_eq!(ObjectId::from_str(&s).unwrap(), id);
}

#[test]
fn object_id_known_bytes() {
    let id = ObjectId::from_bytes([0x5f, 0, 0, 1, 2, 3, 4, 5, 6, 0xaa, 0xbb, 0xcc]);
    assert_eq!(id.to_hex(), "5f0000010203040506aabbcc");
    assert_eq!(id.timestamp(), 0x5f00_0001);
}

#[test]
fn object_id_parse_wrong_length() {
    let err = ObjectId::parse_str("abc").unwrap_err();
    let TypesError::InvalidObjectId { input, reason } = err;
    assert_eq!(input, "abc");
    assert!(reason.contains("24"));
}

#[test]
fn object_id_parse_not_hex() {
    assert!(ObjectId::parse_str("zzzzzzzzzzzzzzzzzzzzzzzz").is_err());
}

#[test]
fn object_id_serde_roundtrip() {
    let id = ObjectId::new();
    let json = serde_json::to_string(&id).unwrap();
    let back: ObjectId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, back);
}
