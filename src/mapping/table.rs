//! Resolved mapping tables.

use crate::dirty::Persistent;
use crate::types::Field;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Binding of a record type's logical fields to a backend's physical schema.
///
/// Built once by [`MappingBuilder`](crate::MappingBuilder) and read-only
/// afterwards; share it as `Arc<Mapping>`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    container_name: Option<String>,
    fields: BTreeMap<String, Field>,
}

impl Mapping {
    /// Mapping with no container and no fields (unmatched description).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_parts(
        container_name: impl Into<String>,
        fields: impl IntoIterator<Item = (String, Field)>,
    ) -> Self {
        Self {
            container_name: Some(container_name.into()),
            fields: fields.into_iter().collect(),
        }
    }

    /// Physical container (index, table, collection), if resolved.
    pub fn container_name(&self) -> Option<&str> {
        self.container_name.as_deref()
    }

    /// Whether a class fragment was matched and a container resolved.
    pub fn is_resolved(&self) -> bool {
        self.container_name.is_some()
    }

    /// Physical descriptor of a logical field.
    pub fn field(&self, logical: &str) -> Option<&Field> {
        self.fields.get(logical)
    }

    /// Physical name of a logical field.
    pub fn physical_name(&self, logical: &str) -> Option<&str> {
        self.fields.get(logical).map(|field| field.name.as_str())
    }

    /// All descriptors keyed by logical name.
    pub fn fields(&self) -> &BTreeMap<String, Field> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Mapped fields of `record` that changed since its last clear.
    ///
    /// Dirty fields without a descriptor are skipped; the result follows the
    /// record's declaration order.
    pub fn dirty_physical_fields<P: Persistent + ?Sized>(
        &self,
        record: &P,
    ) -> Vec<(&str, &Field)> {
        record
            .dirty_fields()
            .into_iter()
            .filter_map(|def| self.fields.get_key_value(def.name.as_str()))
            .map(|(logical, field)| (logical.as_str(), field))
            .collect()
    }

    pub(crate) fn with_container(container_name: impl Into<String>) -> Self {
        Self {
            container_name: Some(container_name.into()),
            fields: BTreeMap::new(),
        }
    }

    pub(crate) fn insert_field(&mut self, logical: String, field: Field) {
        self.fields.insert(logical, field);
    }
}
