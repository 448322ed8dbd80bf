//! Tagged scalar encoding.
//!
//! Layout: `[tag: u8] || body`, all multi-byte numbers big-endian.
//!
//! | tag | kind   | body                                   |
//! |-----|--------|----------------------------------------|
//! | 0   | Int32  | 4 bytes                                |
//! | 1   | Int64  | 8 bytes                                |
//! | 2   | Double | 8 bytes, IEEE 754                      |
//! | 3   | Bool   | 1 byte, non-zero is true               |
//! | 4   | Float  | 4 bytes, IEEE 754                      |
//! | 5   | Int8   | 1 byte                                 |
//! | 6   | Int16  | 2 bytes                                |
//! | 7   | Text   | u16 byte length, then UTF-8            |
//! | 8   | Bytes  | every remaining byte                   |
//!
//! Tag 255 is reserved for opaque caller-defined payloads and is rejected.

use crate::error::{CryptoError, CryptoResult};

pub const TAG_INT32: u8 = 0;
pub const TAG_INT64: u8 = 1;
pub const TAG_DOUBLE: u8 = 2;
pub const TAG_BOOL: u8 = 3;
pub const TAG_FLOAT: u8 = 4;
pub const TAG_INT8: u8 = 5;
pub const TAG_INT16: u8 = 6;
pub const TAG_TEXT: u8 = 7;
pub const TAG_BYTES: u8 = 8;
pub const TAG_OPAQUE: u8 = 255;

/// Longest text the 2-byte length prefix can describe.
pub const MAX_TEXT_LEN: usize = u16::MAX as usize;

/// A primitive value that can be stored in an encrypted field.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int32(i32),
    Int64(i64),
    Double(f64),
    Bool(bool),
    Float(f32),
    Int8(i8),
    Int16(i16),
    Text(String),
    Bytes(Vec<u8>),
}

impl Scalar {
    /// The tag byte this scalar is written with.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Int32(_) => TAG_INT32,
            Self::Int64(_) => TAG_INT64,
            Self::Double(_) => TAG_DOUBLE,
            Self::Bool(_) => TAG_BOOL,
            Self::Float(_) => TAG_FLOAT,
            Self::Int8(_) => TAG_INT8,
            Self::Int16(_) => TAG_INT16,
            Self::Text(_) => TAG_TEXT,
            Self::Bytes(_) => TAG_BYTES,
        }
    }
}

/// Encodes a scalar as tag + body.
pub fn serialize(value: &Scalar) -> CryptoResult<Vec<u8>> {
    let mut out = vec![value.tag()];
    match value {
        Scalar::Int32(v) => out.extend_from_slice(&v.to_be_bytes()),
        Scalar::Int64(v) => out.extend_from_slice(&v.to_be_bytes()),
        Scalar::Double(v) => out.extend_from_slice(&v.to_be_bytes()),
        Scalar::Bool(v) => out.push(u8::from(*v)),
        Scalar::Float(v) => out.extend_from_slice(&v.to_be_bytes()),
        Scalar::Int8(v) => out.extend_from_slice(&v.to_be_bytes()),
        Scalar::Int16(v) => out.extend_from_slice(&v.to_be_bytes()),
        Scalar::Text(s) => {
            let len = u16::try_from(s.len()).map_err(|_| {
                CryptoError::ValueTooLarge(format!(
                    "text of {} bytes exceeds {MAX_TEXT_LEN}",
                    s.len()
                ))
            })?;
            out.reserve(2 + s.len());
            out.extend_from_slice(&len.to_be_bytes());
            out.extend_from_slice(s.as_bytes());
        }
        Scalar::Bytes(b) => out.extend_from_slice(b),
    }
    Ok(out)
}

/// Decodes bytes produced by [`serialize`].
pub fn deserialize(data: &[u8]) -> CryptoResult<Scalar> {
    let (&tag, body) = data
        .split_first()
        .ok_or_else(|| malformed("empty payload"))?;
    let mut reader = Reader { body, tag };

    let value = match tag {
        TAG_INT32 => Scalar::Int32(i32::from_be_bytes(reader.fixed()?)),
        TAG_INT64 => Scalar::Int64(i64::from_be_bytes(reader.fixed()?)),
        TAG_DOUBLE => Scalar::Double(f64::from_be_bytes(reader.fixed()?)),
        TAG_BOOL => Scalar::Bool(reader.fixed::<1>()?[0] != 0),
        TAG_FLOAT => Scalar::Float(f32::from_be_bytes(reader.fixed()?)),
        TAG_INT8 => Scalar::Int8(i8::from_be_bytes(reader.fixed()?)),
        TAG_INT16 => Scalar::Int16(i16::from_be_bytes(reader.fixed()?)),
        TAG_TEXT => {
            let len = u16::from_be_bytes(reader.fixed()?) as usize;
            let bytes = reader.take(len)?;
            let text = String::from_utf8(bytes.to_vec())
                .map_err(|e| malformed(format!("text is not valid UTF-8: {e}")))?;
            Scalar::Text(text)
        }
        TAG_BYTES => return Ok(Scalar::Bytes(body.to_vec())),
        TAG_OPAQUE => return Err(malformed("opaque payloads (tag 255) are not supported")),
        other => return Err(malformed(format!("unknown tag {other}"))),
    };

    if !reader.body.is_empty() {
        return Err(malformed(format!(
            "{} trailing bytes after tag {tag}",
            reader.body.len()
        )));
    }
    Ok(value)
}

struct Reader<'a> {
    body: &'a [u8],
    tag: u8,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> CryptoResult<&'a [u8]> {
        if self.body.len() < len {
            return Err(malformed(format!(
                "tag {} needs {len} bytes, only {} remain",
                self.tag,
                self.body.len()
            )));
        }
        let (head, rest) = self.body.split_at(len);
        self.body = rest;
        Ok(head)
    }

    fn fixed<const N: usize>(&mut self) -> CryptoResult<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }
}

fn malformed(reason: impl Into<String>) -> CryptoError {
    CryptoError::MalformedPayload(reason.into())
}
