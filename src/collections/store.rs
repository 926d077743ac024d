//! A string-keyed container for values of arbitrary types.
//!
//! [`HeterogeneousStore`] maps string keys to owned values of any `'static` type. Each value
//! remembers the type it was stored as; reading it back as another type fails with
//! [`Error::InvalidCast`] instead of yielding a wrong value.
//!
//! Values can be addressed explicitly by key, or implicitly by their type, in which case the
//! short type name ([`TypeHandle::name`]) is the key. The implicit API is a thin wrapper over
//! the explicit one, so both address the same entries:
//!
//! ```rust
//! use synergy::collections::HeterogeneousStore;
//!
//! let mut store = HeterogeneousStore::new();
//! store.add(7_u16);
//!
//! assert_eq!(store.get::<u16>("u16")?, 7);
//! assert_eq!(store.get_typed::<u16>()?, 7);
//! # Ok::<(), synergy::Error>(())
//! ```
//!
//! The store takes `&mut self` for every mutation; sharing it between threads requires an
//! external lock.

use std::{any::Any, fmt};

use indexmap::{map::Entry, IndexMap};

use crate::{
    reflection::{DynValue, TypeHandle},
    Error, Result,
};

struct StoreEntry {
    value: DynValue,
    handle: TypeHandle,
}

impl StoreEntry {
    fn new<V: Any>(value: V) -> Self {
        StoreEntry {
            value: Box::new(value),
            handle: TypeHandle::of::<V>(),
        }
    }

    fn downcast_ref<V: Any>(&self, key: &str) -> Result<&V> {
        self.value
            .downcast_ref::<V>()
            .ok_or_else(|| invalid_cast::<V>(key, self.handle))
    }

    fn downcast_mut<V: Any>(&mut self, key: &str) -> Result<&mut V> {
        let handle = self.handle;
        self.value
            .downcast_mut::<V>()
            .ok_or_else(|| invalid_cast::<V>(key, handle))
    }
}

/// An ordered map from string keys to values of arbitrary types
#[derive(Default)]
pub struct HeterogeneousStore {
    entries: IndexMap<String, StoreEntry>,
}

impl HeterogeneousStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing whatever was stored there
    pub fn insert<V: Any>(&mut self, key: impl Into<String>, value: V) {
        self.entries.insert(key.into(), StoreEntry::new(value));
    }

    /// Store `value` under its short type name
    pub fn add<V: Any>(&mut self, value: V) {
        self.insert(TypeHandle::of::<V>().name(), value);
    }

    /// Copy of the value under `key`, or `V::default()` if the key is absent
    ///
    /// # Errors
    /// Returns [`Error::InvalidCast`] if the stored value is not a `V`.
    pub fn get<V: Any + Default + Clone>(&self, key: &str) -> Result<V> {
        self.get_or_else(key, V::default)
    }

    /// Copy of the value under `key`, or `default` if the key is absent
    ///
    /// # Errors
    /// Returns [`Error::InvalidCast`] if the stored value is not a `V`.
    pub fn get_or<V: Any + Clone>(&self, key: &str, default: V) -> Result<V> {
        self.get_or_else(key, || default)
    }

    /// Copy of the value under `key`, or the result of `default` if the key is absent
    ///
    /// # Errors
    /// Returns [`Error::InvalidCast`] if the stored value is not a `V`.
    pub fn get_or_else<V, F>(&self, key: &str, default: F) -> Result<V>
    where
        V: Any + Clone,
        F: FnOnce() -> V,
    {
        Ok(self.get_ref::<V>(key)?.cloned().unwrap_or_else(default))
    }

    /// Borrow the value under `key`, `None` if the key is absent
    ///
    /// # Errors
    /// Returns [`Error::InvalidCast`] if the stored value is not a `V`.
    pub fn get_ref<V: Any>(&self, key: &str) -> Result<Option<&V>> {
        self.entries
            .get(key)
            .map(|entry| entry.downcast_ref::<V>(key))
            .transpose()
    }

    /// Mutably borrow the value under `key`, `None` if the key is absent
    ///
    /// # Errors
    /// Returns [`Error::InvalidCast`] if the stored value is not a `V`.
    pub fn get_mut<V: Any>(&mut self, key: &str) -> Result<Option<&mut V>> {
        self.entries
            .get_mut(key)
            .map(|entry| entry.downcast_mut::<V>(key))
            .transpose()
    }

    /// The value under `key`, storing the result of `factory` first if the key is absent
    ///
    /// `factory` receives the key and runs only when nothing is stored yet.
    ///
    /// # Errors
    /// Returns [`Error::InvalidCast`] if a value is present but not a `V`.
    pub fn get_or_add<V, F>(&mut self, key: &str, factory: F) -> Result<&mut V>
    where
        V: Any,
        F: FnOnce(&str) -> V,
    {
        let entry = match self.entries.entry(key.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(StoreEntry::new(factory(key))),
        };
        entry.downcast_mut::<V>(key)
    }

    /// Store `value` if `key` is absent, otherwise replace the stored value with
    /// `update(key, current)`
    ///
    /// `value` is dropped unused when the key is present.
    ///
    /// # Errors
    /// Returns [`Error::InvalidCast`] if a value is present but not a `V`; the store is left
    /// unchanged in that case.
    pub fn add_or_update<V, F>(&mut self, key: &str, value: V, update: F) -> Result<&V>
    where
        V: Any,
        F: FnOnce(&str, &V) -> V,
    {
        let entry = match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                let next = update(key, entry.get().downcast_ref::<V>(key)?);
                entry.insert(StoreEntry::new(next));
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(StoreEntry::new(value)),
        };
        entry.downcast_ref::<V>(key)
    }

    /// Copy of the value stored under the short name of `V`, or `V::default()`
    ///
    /// # Errors
    /// Returns [`Error::InvalidCast`] if the stored value is not a `V`.
    pub fn get_typed<V: Any + Default + Clone>(&self) -> Result<V> {
        self.get::<V>(&TypeHandle::of::<V>().name())
    }

    /// Borrow the value stored under the short name of `V`
    ///
    /// # Errors
    /// Returns [`Error::InvalidCast`] if the stored value is not a `V`.
    pub fn get_typed_ref<V: Any>(&self) -> Result<Option<&V>> {
        self.get_ref::<V>(&TypeHandle::of::<V>().name())
    }

    /// Remove the value under `key`, keeping the order of the remaining entries
    pub fn remove(&mut self, key: &str) -> Option<DynValue> {
        self.entries.shift_remove(key).map(|entry| entry.value)
    }

    /// Returns `true` if a value is stored under `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The type the value under `key` was stored as
    pub fn type_of(&self, key: &str) -> Option<TypeHandle> {
        self.entries.get(key).map(|entry| entry.handle)
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Key, type-erased value and stored type of every entry, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Any, TypeHandle)> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.as_str(), &*entry.value, entry.handle))
    }
}

impl fmt::Debug for HeterogeneousStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(key, entry)| (key, entry.handle)))
            .finish()
    }
}

fn invalid_cast<V: Any>(key: &str, actual: TypeHandle) -> Error {
    Error::InvalidCast {
        key: key.to_string(),
        expected: TypeHandle::of::<V>().name(),
        actual: actual.name(),
    }
}
