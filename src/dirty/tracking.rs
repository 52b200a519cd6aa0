//! Change-tracking contracts for records and their field values.

use crate::dirty::DirtyBits;
use crate::error::Result;
use crate::schema::{FieldDef, RecordSchema};

/// A value that knows whether it changed since it was last cleared.
pub trait Dirtyable {
    fn is_dirty(&self) -> bool;

    /// Force the value into the changed state.
    fn set_dirty(&mut self);

    /// Forget every change, including changes held by nested values.
    fn clear_dirty(&mut self);
}

/// Capability interface for field values.
///
/// Types that carry their own change state return themselves; scalar types
/// keep the defaults. Union types answer for the variant they currently hold.
pub trait Trackable {
    fn as_dirtyable(&self) -> Option<&dyn Dirtyable> {
        None
    }

    fn as_dirtyable_mut(&mut self) -> Option<&mut dyn Dirtyable> {
        None
    }
}

macro_rules! untracked {
    ($($ty:ty),+ $(,)?) => {
        $(impl Trackable for $ty {})+
    };
}

untracked!(bool, char, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, String, Vec<u8>);

impl<T: Trackable> Trackable for Option<T> {
    fn as_dirtyable(&self) -> Option<&dyn Dirtyable> {
        self.as_ref().and_then(|value| value.as_dirtyable())
    }

    fn as_dirtyable_mut(&mut self) -> Option<&mut dyn Dirtyable> {
        self.as_mut().and_then(|value| value.as_dirtyable_mut())
    }
}

impl<T: Trackable + ?Sized> Trackable for Box<T> {
    fn as_dirtyable(&self) -> Option<&dyn Dirtyable> {
        (**self).as_dirtyable()
    }

    fn as_dirtyable_mut(&mut self) -> Option<&mut dyn Dirtyable> {
        (**self).as_dirtyable_mut()
    }
}

/// A record with per-field change tracking.
///
/// Implementors expose their schema, their bit vector and positional access
/// to field values; everything else is provided. Use
/// [`persistent_tracking!`](crate::persistent_tracking) to derive the
/// matching [`Dirtyable`] and [`Trackable`] impls.
pub trait Persistent: Dirtyable {
    fn schema(&self) -> &RecordSchema;

    fn dirty_bits(&self) -> &DirtyBits;

    fn dirty_bits_mut(&mut self) -> &mut DirtyBits;

    /// Value of the field at `pos`, or `None` if `pos` is not declared.
    fn field(&self, pos: usize) -> Option<&dyn Trackable>;

    fn field_mut(&mut self, pos: usize) -> Option<&mut dyn Trackable>;

    /// Return the field at `pos` to its default value.
    fn reset_field(&mut self, pos: usize);

    /// Whether the field at `pos` changed, directly or through its nested value.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is not a declared field position.
    fn is_field_dirty(&self, pos: usize) -> bool {
        self.dirty_bits().get(pos) || nested_dirty(self, pos)
    }

    fn is_field_dirty_by_name(&self, name: &str) -> Result<bool> {
        let pos = self.schema().index_of(name)?;
        Ok(self.is_field_dirty(pos))
    }

    /// Mark the field at `pos` changed. Nested values are left untouched.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is not a declared field position.
    fn set_field_dirty(&mut self, pos: usize) {
        self.dirty_bits_mut().set(pos);
    }

    fn set_field_dirty_by_name(&mut self, name: &str) -> Result<()> {
        let pos = self.schema().index_of(name)?;
        self.set_field_dirty(pos);
        Ok(())
    }

    /// Clear the bit at `pos` and the change state of the value it holds.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is not a declared field position.
    fn clear_field_dirty(&mut self, pos: usize) {
        self.dirty_bits_mut().clear(pos);
        clear_nested(self, pos);
    }

    fn clear_field_dirty_by_name(&mut self, name: &str) -> Result<()> {
        let pos = self.schema().index_of(name)?;
        self.clear_field_dirty(pos);
        Ok(())
    }

    /// Fields a partial write-back has to include, in declaration order.
    fn dirty_fields(&self) -> Vec<&FieldDef> {
        self.schema()
            .fields()
            .iter()
            .filter(|field| self.is_field_dirty(field.pos))
            .collect()
    }

    /// Reset every field to its default and forget all changes.
    fn reset(&mut self) {
        for pos in 0..self.schema().field_count() {
            self.reset_field(pos);
        }
        self.clear_dirty();
    }
}

/// [`Dirtyable::is_dirty`] for a [`Persistent`] record.
pub fn record_is_dirty<P: Persistent + ?Sized>(record: &P) -> bool {
    record.dirty_bits().any()
        || (0..record.schema().field_count()).any(|pos| nested_dirty(record, pos))
}

/// [`Dirtyable::set_dirty`] for a [`Persistent`] record.
pub fn record_set_dirty<P: Persistent + ?Sized>(record: &mut P) {
    record.dirty_bits_mut().set_all();
}

/// [`Dirtyable::clear_dirty`] for a [`Persistent`] record.
pub fn record_clear_dirty<P: Persistent + ?Sized>(record: &mut P) {
    record.dirty_bits_mut().clear_all();
    for pos in 0..record.schema().field_count() {
        clear_nested(record, pos);
    }
}

fn may_track<P: Persistent + ?Sized>(record: &P, pos: usize) -> bool {
    record
        .schema()
        .field_at(pos)
        .is_some_and(|field| field.kind.may_track())
}

fn nested_dirty<P: Persistent + ?Sized>(record: &P, pos: usize) -> bool {
    if !may_track(record, pos) {
        return false;
    }
    record
        .field(pos)
        .and_then(|value| value.as_dirtyable())
        .is_some_and(|value| value.is_dirty())
}

fn clear_nested<P: Persistent + ?Sized>(record: &mut P, pos: usize) {
    if !may_track(record, pos) {
        return;
    }
    if let Some(value) = record.field_mut(pos) {
        if let Some(nested) = value.as_dirtyable_mut() {
            nested.clear_dirty();
        }
    }
}

/// Implement [`Dirtyable`] and [`Trackable`] for [`Persistent`] record types.
///
/// ```ignore
/// persistent_tracking!(Employee, WebPage);
/// ```
#[macro_export]
macro_rules! persistent_tracking {
    ($($record:ty),+ $(,)?) => {
        $(
            impl $crate::Dirtyable for $record {
                fn is_dirty(&self) -> bool {
                    $crate::dirty::record_is_dirty(self)
                }

                fn set_dirty(&mut self) {
                    $crate::dirty::record_set_dirty(self)
                }

                fn clear_dirty(&mut self) {
                    $crate::dirty::record_clear_dirty(self)
                }
            }

            impl $crate::Trackable for $record {
                fn as_dirtyable(&self) -> Option<&dyn $crate::Dirtyable> {
                    Some(self)
                }

                fn as_dirtyable_mut(&mut self) -> Option<&mut dyn $crate::Dirtyable> {
                    Some(self)
                }
            }
        )+
    };
}
