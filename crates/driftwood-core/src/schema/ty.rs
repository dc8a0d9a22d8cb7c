//! Field type vocabulary and mapping tables.
//!
//! Two translations live here, both injectable rather than process-global:
//!
//! - [`TypeMap`]: declared type names (the vocabulary application code
//!   writes) to [`FieldType`]. Used by the generator.
//! - [`NativeTypeMap`]: the catalog's native type names ("character
//!   varying", "timestamp without time zone", ...) to the normalized SQL
//!   vocabulary. Used by the inspector. Unrecognized native types pass
//!   through uppercased rather than failing.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Semantic field type, drawn from a closed vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Text,
    Integer,
    BigInt,
    Float,
    Decimal,
    Boolean,
    Timestamp,
    Date,
    Time,
    Json,
    Jsonb,
    Uuid,
    Array,
    Object,
    File,
    Image,
    Video,
    Audio,
    Reference,
    Relation,
    Enum,
    Password,
    Encrypted,
    Email,
    Url,
    Phone,
    UniqueId,
}

impl FieldType {
    /// `true` for types stored as bounded character data; these take the
    /// configured default length.
    pub fn is_string_like(self) -> bool {
        matches!(
            self,
            Self::String
                | Self::File
                | Self::Image
                | Self::Video
                | Self::Audio
                | Self::Reference
                | Self::Relation
                | Self::Enum
                | Self::Password
                | Self::Encrypted
                | Self::Email
                | Self::Url
                | Self::Phone
                | Self::UniqueId
        )
    }

    pub fn is_decimal(self) -> bool {
        matches!(self, Self::Decimal)
    }

    pub fn is_timestamp(self) -> bool {
        matches!(self, Self::Timestamp)
    }

    /// Base column type in the normalized SQL vocabulary, without length
    /// or precision arguments.
    pub fn sql_base(self) -> &'static str {
        match self {
            Self::String
            | Self::File
            | Self::Image
            | Self::Video
            | Self::Audio
            | Self::Reference
            | Self::Relation
            | Self::Enum
            | Self::Password
            | Self::Encrypted
            | Self::Email
            | Self::Url
            | Self::Phone
            | Self::UniqueId => "VARCHAR",
            Self::Text => "TEXT",
            Self::Integer => "INTEGER",
            Self::BigInt => "BIGINT",
            Self::Float => "DOUBLE PRECISION",
            Self::Decimal => "DECIMAL",
            Self::Boolean => "BOOLEAN",
            Self::Timestamp => "TIMESTAMP",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Json => "JSON",
            Self::Jsonb | Self::Array | Self::Object => "JSONB",
            Self::Uuid => "UUID",
        }
    }
}

/// Declared-type-name to [`FieldType`] dictionary.
///
/// Lookup tries an exact match first, then a lowercased match, so `Date`
/// (a host-language class name, historically a timestamp) and `date` (the
/// SQL day type) can coexist.
#[derive(Debug, Clone)]
pub struct TypeMap {
    entries: IndexMap<String, FieldType>,
}

impl TypeMap {
    /// An empty map; every resolution falls back to the caller's default.
    pub fn empty() -> TypeMap {
        TypeMap {
            entries: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, ty: FieldType) -> &mut Self {
        self.entries.insert(name.into(), ty);
        self
    }

    pub fn resolve(&self, name: &str) -> Option<FieldType> {
        if let Some(ty) = self.entries.get(name) {
            return Some(*ty);
        }
        self.entries.get(name.to_lowercase().as_str()).copied()
    }
}

impl Default for TypeMap {
    fn default() -> TypeMap {
        let mut map = TypeMap::empty();
        for (name, ty) in [
            ("string", FieldType::String),
            ("varchar", FieldType::String),
            ("text", FieldType::Text),
            ("number", FieldType::Integer),
            ("integer", FieldType::Integer),
            ("int", FieldType::Integer),
            ("bigint", FieldType::BigInt),
            ("float", FieldType::Float),
            ("double", FieldType::Float),
            ("decimal", FieldType::Decimal),
            ("boolean", FieldType::Boolean),
            ("bool", FieldType::Boolean),
            // `Date` is the host-language class; it has always meant a
            // point in time, not a civil date.
            ("Date", FieldType::Timestamp),
            ("timestamp", FieldType::Timestamp),
            ("datetime", FieldType::Timestamp),
            ("date", FieldType::Date),
            ("time", FieldType::Time),
            ("json", FieldType::Json),
            ("jsonb", FieldType::Jsonb),
            ("object", FieldType::Object),
            ("array", FieldType::Array),
            ("uuid", FieldType::Uuid),
            ("file", FieldType::File),
            ("image", FieldType::Image),
            ("video", FieldType::Video),
            ("audio", FieldType::Audio),
            ("reference", FieldType::Reference),
            ("relation", FieldType::Relation),
            ("enum", FieldType::Enum),
            ("password", FieldType::Password),
            ("encrypted", FieldType::Encrypted),
            ("email", FieldType::Email),
            ("url", FieldType::Url),
            ("phone", FieldType::Phone),
            ("uniqueid", FieldType::UniqueId),
        ] {
            map.insert(name, ty);
        }
        map
    }
}

/// Catalog-native type name to normalized SQL vocabulary.
#[derive(Debug, Clone)]
pub struct NativeTypeMap {
    entries: IndexMap<String, String>,
}

impl NativeTypeMap {
    pub fn insert(&mut self, native: impl Into<String>, normalized: impl Into<String>) -> &mut Self {
        self.entries.insert(native.into(), normalized.into());
        self
    }

    /// Normalizes a native type name; unrecognized names pass through
    /// uppercased.
    pub fn normalize(&self, native: &str) -> String {
        match self.entries.get(native) {
            Some(normalized) => normalized.clone(),
            None => native.to_uppercase(),
        }
    }
}

impl Default for NativeTypeMap {
    fn default() -> NativeTypeMap {
        let mut map = NativeTypeMap {
            entries: IndexMap::new(),
        };
        for (native, normalized) in [
            ("character varying", "VARCHAR"),
            ("character", "CHAR"),
            ("text", "TEXT"),
            ("smallint", "SMALLINT"),
            ("integer", "INTEGER"),
            ("bigint", "BIGINT"),
            ("numeric", "DECIMAL"),
            ("real", "REAL"),
            ("double precision", "DOUBLE PRECISION"),
            ("boolean", "BOOLEAN"),
            ("timestamp without time zone", "TIMESTAMP"),
            ("timestamp with time zone", "TIMESTAMPTZ"),
            ("time without time zone", "TIME"),
            ("time with time zone", "TIMETZ"),
            ("date", "DATE"),
            ("json", "JSON"),
            ("jsonb", "JSONB"),
            ("uuid", "UUID"),
            ("bytea", "BYTEA"),
            ("ARRAY", "ARRAY"),
        ] {
            map.insert(native, normalized);
        }
        map
    }
}
