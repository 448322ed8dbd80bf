use thiserror::Error;

/// Errors raised while moving values in and out of record fields.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: String,
        found: &'static str,
    },

    #[error("`{name}` is not a member of {enum_name}")]
    UnknownEnumMember {
        enum_name: &'static str,
        name: String,
    },

    #[error("no field named `{0}`")]
    UnknownField(String),

    #[error("record type has no identifier field")]
    NoIdentifier,

    #[error("field `{field}`: {source}")]
    InField {
        field: String,
        #[source]
        source: Box<FieldError>,
    },
}

impl FieldError {
    pub(crate) fn mismatch(expected: impl Into<String>, found: &'static str) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found,
        }
    }

    /// Attaches the field name the error occurred in.
    pub fn in_field(self, field: &str) -> Self {
        Self::InField {
            field: field.to_string(),
            source: Box::new(self),
        }
    }
}

/// Errors detected when an [`EntitySchema`](crate::EntitySchema) is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{schema}: field `{field}` is declared twice")]
    DuplicateField {
        schema: &'static str,
        field: &'static str,
    },

    #[error("{schema}: both `{first}` and `{second}` are marked as identifier")]
    MultipleIdentifiers {
        schema: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("{schema}: encrypted field `{field}` has non-scalar type {value_type}")]
    EncryptedNonScalar {
        schema: &'static str,
        field: &'static str,
        value_type: String,
    },

    #[error("{schema}: identifier field `{field}` cannot be encrypted")]
    EncryptedIdentifier {
        schema: &'static str,
        field: &'static str,
    },

    #[error("{schema}: `{flag}` called before any field was added")]
    NoFieldToFlag {
        schema: &'static str,
        flag: &'static str,
    },
}
