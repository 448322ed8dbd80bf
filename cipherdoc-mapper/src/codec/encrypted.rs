//! Encrypted field values.
//!
//! A non-null value of an encrypted field is converted to a [`Scalar`],
//! serialized with its tag, encrypted with the configured [`FieldCipher`]
//! and stored as a binary of the encrypted subtype.

use crate::error::{MapperError, MapperResult};
use cipherdoc_crypto::{FieldCipher, Scalar};
use cipherdoc_model::FieldValue;
use cipherdoc_types::{Binary, Value};
use tracing::{trace, warn};

pub(crate) fn encrypt(
    cipher: Option<&FieldCipher>,
    field: &str,
    value: &FieldValue,
) -> MapperResult<Value> {
    let cipher = require(cipher)?;
    let scalar = to_scalar(value).ok_or_else(|| {
        MapperError::UnsupportedType(format!(
            "field {field}: {} values cannot be encrypted",
            value.kind()
        ))
    })?;
    trace!(field, tag = scalar.tag(), "encrypting field");
    let blob = cipher.encrypt_scalar(&scalar)?;
    Ok(Value::Binary(Binary::encrypted(blob)))
}

pub(crate) fn decrypt(cipher: Option<&FieldCipher>, blob: &Binary) -> MapperResult<FieldValue> {
    let cipher = require(cipher)?;
    let scalar = cipher.decrypt_scalar(&blob.bytes).map_err(|e| {
        warn!(len = blob.bytes.len(), error = %e, "failed to decrypt field value");
        MapperError::from(e)
    })?;
    trace!(tag = scalar.tag(), "decrypted field value");
    Ok(from_scalar(scalar))
}

fn require(cipher: Option<&FieldCipher>) -> MapperResult<&FieldCipher> {
    cipher.ok_or_else(|| MapperError::CryptoFailure("no field cipher configured".to_string()))
}

fn to_scalar(value: &FieldValue) -> Option<Scalar> {
    let scalar = match value {
        FieldValue::Bool(v) => Scalar::Bool(*v),
        FieldValue::Int8(v) => Scalar::Int8(*v),
        FieldValue::Int16(v) => Scalar::Int16(*v),
        FieldValue::Int32(v) => Scalar::Int32(*v),
        FieldValue::Int64(v) => Scalar::Int64(*v),
        FieldValue::Float32(v) => Scalar::Float(*v),
        FieldValue::Float64(v) => Scalar::Double(*v),
        FieldValue::Text(v) => Scalar::Text(v.clone()),
        FieldValue::Bytes(v) => Scalar::Bytes(v.clone()),
        _ => return None,
    };
    Some(scalar)
}

fn from_scalar(scalar: Scalar) -> FieldValue {
    match scalar {
        Scalar::Bool(v) => FieldValue::Bool(v),
        Scalar::Int8(v) => FieldValue::Int8(v),
        Scalar::Int16(v) => FieldValue::Int16(v),
        Scalar::Int32(v) => FieldValue::Int32(v),
        Scalar::Int64(v) => FieldValue::Int64(v),
        Scalar::Float(v) => FieldValue::Float32(v),
        Scalar::Double(v) => FieldValue::Float64(v),
        Scalar::Text(v) => FieldValue::Text(v),
        Scalar::Bytes(v) => FieldValue::Bytes(v),
    }
}
