//! Collections that track their own modifications.
//!
//! Both wrappers flag themselves dirty on any structural mutation and also
//! report dirty when an element with its own change state does. Building one
//! from existing data yields a clean collection.

use crate::dirty::{Dirtyable, Trackable};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;

fn element_dirty<T: Trackable>(value: &T) -> bool {
    value.as_dirtyable().is_some_and(|v| v.is_dirty())
}

fn clear_element<T: Trackable>(value: &mut T) {
    if let Some(v) = value.as_dirtyable_mut() {
        v.clear_dirty();
    }
}

/// Ordered sequence with change tracking.
#[derive(Clone)]
pub struct DirtyList<T> {
    items: Vec<T>,
    dirty: bool,
}

impl<T> DirtyList<T> {
    /// Create an empty, clean list.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            dirty: false,
        }
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value);
        self.dirty = true;
    }

    pub fn pop(&mut self) -> Option<T> {
        let value = self.items.pop();
        if value.is_some() {
            self.dirty = true;
        }
        value
    }

    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) {
        self.items.insert(index, value);
        self.dirty = true;
    }

    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        self.dirty = true;
        self.items.remove(index)
    }

    /// Replace the element at `index`, returning the previous one.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn set(&mut self, index: usize, value: T) -> T {
        self.dirty = true;
        std::mem::replace(&mut self.items[index], value)
    }

    /// Mutable access to one element. Marks the list dirty when it exists.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        let value = self.items.get_mut(index);
        if value.is_some() {
            self.dirty = true;
        }
        value
    }

    pub fn retain(&mut self, f: impl FnMut(&T) -> bool) {
        let before = self.items.len();
        self.items.retain(f);
        if self.items.len() != before {
            self.dirty = true;
        }
    }

    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            self.dirty = true;
        }
        self.items.clear();
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Extend<T> for DirtyList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let before = self.items.len();
        self.items.extend(iter);
        if self.items.len() != before {
            self.dirty = true;
        }
    }
}

impl<T> Default for DirtyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for DirtyList<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items,
            dirty: false,
        }
    }
}

impl<T> FromIterator<T> for DirtyList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T> Deref for DirtyList<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T> IntoIterator for &'a DirtyList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: PartialEq> PartialEq for DirtyList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: fmt::Debug> fmt::Debug for DirtyList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirtyList")
            .field("items", &self.items)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl<T: Trackable> Dirtyable for DirtyList<T> {
    fn is_dirty(&self) -> bool {
        self.dirty || self.items.iter().any(element_dirty)
    }

    fn set_dirty(&mut self) {
        self.dirty = true;
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
        self.items.iter_mut().for_each(clear_element);
    }
}

impl<T: Trackable> Trackable for DirtyList<T> {
    fn as_dirtyable(&self) -> Option<&dyn Dirtyable> {
        Some(self)
    }

    fn as_dirtyable_mut(&mut self) -> Option<&mut dyn Dirtyable> {
        Some(self)
    }
}

impl<T: Serialize> Serialize for DirtyList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for DirtyList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(DirtyList::from)
    }
}

/// Key-ordered mapping with change tracking.
#[derive(Clone)]
pub struct DirtyMap<K, V> {
    entries: BTreeMap<K, V>,
    dirty: bool,
}

impl<K: Ord, V> DirtyMap<K, V> {
    /// Create an empty, clean map.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            dirty: false,
        }
    }

    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.dirty = true;
        self.entries.insert(key, value)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let value = self.entries.remove(key);
        if value.is_some() {
            self.dirty = true;
        }
        value
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.get(key)
    }

    /// Mutable access to one value. Marks the map dirty when it exists.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let value = self.entries.get_mut(key);
        if value.is_some() {
            self.dirty = true;
        }
        value
    }

    /// Value for `key`, inserting `default()` first if absent. Marks the map dirty.
    pub fn entry_or_insert_with(&mut self, key: K, default: impl FnOnce() -> V) -> &mut V {
        self.dirty = true;
        self.entries.entry(key).or_insert_with(default)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.dirty = true;
        }
        self.entries.clear();
    }

    pub fn iter(&self) -> btree_map::Iter<'_, K, V> {
        self.entries.iter()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, K, V> {
        self.entries.keys()
    }

    pub fn values(&self) -> btree_map::Values<'_, K, V> {
        self.entries.values()
    }

    pub fn into_inner(self) -> BTreeMap<K, V> {
        self.entries
    }
}

impl<K: Ord, V> Default for DirtyMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> From<BTreeMap<K, V>> for DirtyMap<K, V> {
    fn from(entries: BTreeMap<K, V>) -> Self {
        Self {
            entries,
            dirty: false,
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for DirtyMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<BTreeMap<_, _>>())
    }
}

impl<'a, K, V> IntoIterator for &'a DirtyMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = btree_map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for DirtyMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for DirtyMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirtyMap")
            .field("entries", &self.entries)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl<K, V: Trackable> Dirtyable for DirtyMap<K, V> {
    fn is_dirty(&self) -> bool {
        self.dirty || self.entries.values().any(element_dirty)
    }

    fn set_dirty(&mut self) {
        self.dirty = true;
    }

    fn clear_dirty(&mut self) {
        self.dirty = false;
        self.entries.values_mut().for_each(clear_element);
    }
}

impl<K, V: Trackable> Trackable for DirtyMap<K, V> {
    fn as_dirtyable(&self) -> Option<&dyn Dirtyable> {
        Some(self)
    }

    fn as_dirtyable_mut(&mut self) -> Option<&mut dyn Dirtyable> {
        Some(self)
    }
}

impl<K: Serialize, V: Serialize> Serialize for DirtyMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de, K, V> Deserialize<'de> for DirtyMap<K, V>
where
    K: Ord + Deserialize<'de>,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<K, V>::deserialize(deserializer).map(DirtyMap::from)
    }
}
