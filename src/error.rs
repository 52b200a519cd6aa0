//! Error types for change tracking and mapping resolution.

use crate::types::MappingKey;
use thiserror::Error;

/// Main error type for persistency operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Field '{field}' does not exist in record {record}")]
    FieldNotFound { field: String, record: String },

    #[error("Mapping source error: {0}")]
    MappingSource(String),

    #[error("Unknown field type: {0}")]
    UnknownFieldType(String),

    #[error("No mapping declared for {0}")]
    MappingNotFound(MappingKey),

    #[error("Invalid builder state: {0}")]
    InvalidState(&'static str),
}

impl From<std::io::Error> for PersistError {
    fn from(e: std::io::Error) -> Self {
        PersistError::MappingSource(format!("failed to read mapping input: {}", e))
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        PersistError::MappingSource(format!("malformed JSON mapping: {}", e))
    }
}

impl From<roxmltree::Error> for PersistError {
    fn from(e: roxmltree::Error) -> Self {
        PersistError::MappingSource(format!("malformed XML mapping: {}", e))
    }
}

/// Result type for persistency operations.
pub type Result<T> = std::result::Result<T, PersistError>;
