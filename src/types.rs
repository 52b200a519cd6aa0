//! Core types shared by the tracker and the mapping builder.

use crate::error::{PersistError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies the (key type, record type) pair a mapping applies to.
///
/// Both names are compared verbatim against the description, so they are
/// usually fully-qualified (`org.example.Employee`).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MappingKey {
    pub key_type: String,
    pub record_type: String,
}

impl MappingKey {
    pub fn new(key_type: impl Into<String>, record_type: impl Into<String>) -> Self {
        Self {
            key_type: key_type.into(),
            record_type: record_type.into(),
        }
    }

    /// Whether a fragment declared for `(key_type, record_type)` applies.
    pub fn matches(&self, key_type: &str, record_type: &str) -> bool {
        self.key_type == key_type && self.record_type == record_type
    }
}

impl fmt::Debug for MappingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MappingKey({}, {})", self.key_type, self.record_type)
    }
}

impl fmt::Display for MappingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.key_type, self.record_type)
    }
}

/// Physical data types a mapped field can be stored as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Binary,
    Boolean,
    Keyword,
    ConstantKeyword,
    Wildcard,
    Long,
    Integer,
    Short,
    Byte,
    Double,
    Float,
    HalfFloat,
    ScaledFloat,
    Date,
    DateNanos,
    Object,
    Flattened,
    Nested,
    Text,
    Ip,
}

impl DataType {
    pub const ALL: [DataType; 20] = [
        DataType::Binary,
        DataType::Boolean,
        DataType::Keyword,
        DataType::ConstantKeyword,
        DataType::Wildcard,
        DataType::Long,
        DataType::Integer,
        DataType::Short,
        DataType::Byte,
        DataType::Double,
        DataType::Float,
        DataType::HalfFloat,
        DataType::ScaledFloat,
        DataType::Date,
        DataType::DateNanos,
        DataType::Object,
        DataType::Flattened,
        DataType::Nested,
        DataType::Text,
        DataType::Ip,
    ];

    /// Canonical tag as written in mapping descriptions.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Binary => "binary",
            DataType::Boolean => "boolean",
            DataType::Keyword => "keyword",
            DataType::ConstantKeyword => "constant_keyword",
            DataType::Wildcard => "wildcard",
            DataType::Long => "long",
            DataType::Integer => "integer",
            DataType::Short => "short",
            DataType::Byte => "byte",
            DataType::Double => "double",
            DataType::Float => "float",
            DataType::HalfFloat => "half_float",
            DataType::ScaledFloat => "scaled_float",
            DataType::Date => "date",
            DataType::DateNanos => "date_nanos",
            DataType::Object => "object",
            DataType::Flattened => "flattened",
            DataType::Nested => "nested",
            DataType::Text => "text",
            DataType::Ip => "ip",
        }
    }
}

impl FromStr for DataType {
    type Err = PersistError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self> {
        DataType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| PersistError::UnknownFieldType(s.to_string()))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical type of a mapped field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldType {
    pub data_type: DataType,

    /// Only meaningful for [`DataType::ScaledFloat`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling_factor: Option<i32>,
}

impl FieldType {
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            scaling_factor: None,
        }
    }

    pub fn scaled_float(scaling_factor: i32) -> Self {
        Self {
            data_type: DataType::ScaledFloat,
            scaling_factor: Some(scaling_factor),
        }
    }
}

impl From<DataType> for FieldType {
    fn from(data_type: DataType) -> Self {
        FieldType::new(data_type)
    }
}

/// Physical field descriptor: where and how one logical field is stored.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    /// Physical field name in the backend.
    pub name: String,

    /// Physical type.
    pub field_type: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
        }
    }

    pub fn data_type(&self) -> DataType {
        self.field_type.data_type
    }
}
