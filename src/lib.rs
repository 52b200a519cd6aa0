//! # Persistency
//!
//! Change tracking and schema mapping primitives for storing generated
//! records in heterogeneous backends (document stores, search indices,
//! key-value stores).
//!
//! ## Core Concepts
//!
//! - **Records**: types implementing [`Persistent`], with one dirty bit per
//!   data field and recursive dirtiness through nested records, lists, maps
//!   and unions
//! - **Trackable values**: field values that report their own change state,
//!   declared through [`Trackable`]
//! - **Mappings**: the binding of a record's logical fields to a backend's
//!   physical container and fields, loaded from an XML or JSON description
//!   by [`MappingBuilder`]
//!
//! ## Example
//!
//! ```ignore
//! use persistency::{Dirtyable, MappingBuilder, MappingRequest, Persistent};
//!
//! let request = MappingRequest::for_schema("java.lang.String", employee.schema());
//! let mut builder = MappingBuilder::new(request);
//! let mapping = builder.load_file("gora-elasticsearch-mapping.xml")?;
//!
//! employee.set_salary(120);
//! for (logical, field) in mapping.dirty_physical_fields(&employee) {
//!     update.set(&field.name, employee.get(logical));
//! }
//! employee.clear_dirty();
//! ```

pub mod config;
pub mod dirty;
pub mod error;
pub mod mapping;
pub mod schema;
pub mod types;

// Re-exports
pub use config::{DescriptionFormat, MappingConfig, UnmatchedPolicy, DEFAULT_MAPPING_FILE};
pub use dirty::{DirtyBits, DirtyList, DirtyMap, Dirtyable, Persistent, Trackable};
pub use error::{PersistError, Result};
pub use mapping::{
    resolve_mapping, BuilderState, ClassFragment, ContainerDivergence, FieldFragment, Mapping,
    MappingBuilder, MappingCache, MappingDocument, MappingRequest, Resolution,
};
pub use schema::{FieldDef, FieldKind, RecordSchema};
pub use types::{DataType, Field, FieldType, MappingKey};
