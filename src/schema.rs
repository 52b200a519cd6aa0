//! Record schemas.
//!
//! A schema lists the data fields of a record type in declaration order.
//! Field positions are stable and start at zero; they double as the bit
//! positions of the record's [`DirtyBits`](crate::DirtyBits).

use crate::error::{PersistError, Result};
use std::collections::HashMap;

/// Structural kind of a record field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Scalar value (string, number, bytes, enum symbol).
    Primitive,
    /// Nested record.
    Record,
    /// Ordered sequence.
    Array,
    /// Key-value mapping.
    Map,
    /// Tagged union, including nullable values.
    Union,
}

impl FieldKind {
    /// Whether a field of this kind can hold a value with its own change state.
    pub fn may_track(&self) -> bool {
        !matches!(self, FieldKind::Primitive)
    }
}

/// Declaration of one data field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub pos: usize,
    pub kind: FieldKind,
}

/// Ordered field declarations of a record type.
#[derive(Clone, Debug)]
pub struct RecordSchema {
    full_name: String,
    fields: Vec<FieldDef>,
    by_name: HashMap<String, usize>,
}

impl RecordSchema {
    /// Create a schema from `(name, kind)` pairs; positions follow their order.
    pub fn new<N: Into<String>>(
        full_name: impl Into<String>,
        fields: impl IntoIterator<Item = (N, FieldKind)>,
    ) -> Self {
        let fields: Vec<FieldDef> = fields
            .into_iter()
            .enumerate()
            .map(|(pos, (name, kind))| FieldDef {
                name: name.into(),
                pos,
                kind,
            })
            .collect();

        let by_name = fields
            .iter()
            .map(|field| (field.name.clone(), field.pos))
            .collect();

        Self {
            full_name: full_name.into(),
            fields,
            by_name,
        }
    }

    /// Fully-qualified record type name.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Unqualified record type name (text after the last `.`).
    pub fn simple_name(&self) -> &str {
        self.full_name
            .rsplit('.')
            .next()
            .unwrap_or(self.full_name.as_str())
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Field at `pos`, if declared.
    pub fn field_at(&self, pos: usize) -> Option<&FieldDef> {
        self.fields.get(pos)
    }

    /// Field named `name`, if declared.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.by_name.get(name).map(|&pos| &self.fields[pos])
    }

    /// Resolve a field name to its position.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| PersistError::FieldNotFound {
                field: name.to_string(),
                record: self.full_name.clone(),
            })
    }
}
