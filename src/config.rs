//! Mapping loader configuration.

use serde::Deserialize;
use std::path::PathBuf;

/// Default mapping description file name.
pub const DEFAULT_MAPPING_FILE: &str = "gora-elasticsearch-mapping.xml";

/// Syntax of a mapping description.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionFormat {
    /// Decide from the first non-whitespace byte (`<` or `{`).
    #[default]
    Auto,
    Xml,
    Json,
}

/// What to do when no fragment matches the requested (key, record) pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// Resolve to a mapping with no fields; the container stays unresolved.
    #[default]
    Empty,
    /// Fail with [`PersistError::MappingNotFound`](crate::PersistError::MappingNotFound).
    Fail,
}

/// Mapping loader configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Description syntax.
    pub format: DescriptionFormat,

    /// Behaviour for unmatched (key, record) pairs.
    pub unmatched: UnmatchedPolicy,

    /// File read by [`MappingBuilder::load_default_file`](crate::MappingBuilder::load_default_file).
    pub mapping_file: PathBuf,

    /// Capacity of a [`MappingCache`](crate::MappingCache) built from this config.
    pub cache_capacity: usize,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            format: DescriptionFormat::Auto,
            unmatched: UnmatchedPolicy::Empty,
            mapping_file: PathBuf::from(DEFAULT_MAPPING_FILE),
            cache_capacity: 64,
        }
    }
}

impl MappingConfig {
    pub fn with_format(mut self, format: DescriptionFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_unmatched(mut self, unmatched: UnmatchedPolicy) -> Self {
        self.unmatched = unmatched;
        self
    }

    pub fn with_mapping_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.mapping_file = path.into();
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }
}
