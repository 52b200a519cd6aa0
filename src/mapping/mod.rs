//! Physical schema mappings.
//!
//! A store adapter describes where each logical field of a record lives in
//! its backend with a mapping description:
//!
//! ```xml
//! <gora-otd>
//!   <class name="org.example.Employee" keyClass="java.lang.String" index="frontier">
//!     <field name="name" docfield="name" type="text"/>
//!     <field name="salary" docfield="salary" type="integer"/>
//!   </class>
//! </gora-otd>
//! ```
//!
//! # Example
//!
//! ```ignore
//! let request = MappingRequest::new("java.lang.String", "org.example.Employee", "frontier");
//! let mut builder = MappingBuilder::new(request);
//! let mapping = builder.load_file("gora-elasticsearch-mapping.xml")?;
//! assert_eq!(mapping.container_name(), Some("frontier"));
//! ```

mod builder;
mod cache;
mod document;
mod table;

pub use builder::{
    resolve_mapping, BuilderState, ContainerDivergence, MappingBuilder, MappingRequest, Resolution,
};
pub use cache::MappingCache;
pub use document::{ClassFragment, FieldFragment, MappingDocument};
pub use table::Mapping;
