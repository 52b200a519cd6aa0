//! Record change tracking.
//!
//! Every record owns a [`DirtyBits`] vector with one bit per data field.
//! Record-level queries OR the bits with the state of nested values that can
//! track themselves (sub-records, [`DirtyList`], [`DirtyMap`], unions holding
//! one of those), so a change deep in the tree is visible at the root without
//! explicit propagation.
//!
//! # Example
//!
//! ```ignore
//! let mut employee = Employee::new("Ada", 100);
//! employee.clear_dirty();                    // freshly loaded from a store
//!
//! employee.set_salary(120);                  // marks "salary"
//! assert!(employee.is_field_dirty_by_name("salary")?);
//!
//! let changed = employee.dirty_fields();     // write only these
//! store.update(&key, &employee, &changed)?;
//! employee.clear_dirty();
//! ```

mod bits;
mod collections;
mod tracking;

pub use bits::DirtyBits;
pub use collections::{DirtyList, DirtyMap};
pub use tracking::{
    record_clear_dirty, record_is_dirty, record_set_dirty, Dirtyable, Persistent, Trackable,
};
