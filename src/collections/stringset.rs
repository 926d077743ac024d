//! Ordered string-to-string mapping with pluggable serialization.
//!
//! A [`StringSet`] is the textual projection of an object (one entry per public member) or any
//! other set of string pairs destined for logging or templating. Keys are unique and
//! case-sensitive; iteration follows insertion order.
//!
//! Turning a set into text goes through a serializer. [`StringSet::to_text`] takes one per call
//! or falls back to the default serializer of the global [`ReflectionContext`], which starts
//! out as [`default_text`]:
//!
//! ```rust
//! use synergy::collections::StringSet;
//!
//! let mut set = StringSet::new();
//! set.insert("a", "1");
//! set.insert("b", "2");
//!
//! assert_eq!(set.to_text(None), r#"{ "a":"1", "b":"2" }"#);
//! assert_eq!(set.to_text(Some(&|s: &StringSet| s.len().to_string())), "2");
//! ```

use std::{collections::HashMap, fmt, hash::BuildHasher};

use indexmap::{map::Entry, IndexMap};

use crate::{
    collections::HeterogeneousStore,
    reflection::{Reflect, Reflected, ReflectionContext},
    Result,
};

/// Ordered, case-sensitive mapping of string keys to string values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringSet {
    entries: IndexMap<String, String>,
}

impl StringSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Project the public members of `object` through the global context
    ///
    /// # Errors
    /// See [`ReflectionContext::to_string_set`].
    pub fn from_object(object: &dyn Reflected) -> Result<Self> {
        ReflectionContext::global().to_string_set(object)
    }

    /// Stringify every value of `store` with the global context's renderers
    ///
    /// Values of types without a renderer become their full type name.
    pub fn from_store(store: &HeterogeneousStore) -> Self {
        let context = ReflectionContext::global();
        store
            .iter()
            .map(|(key, value, handle)| (key, context.render_value(value, handle)))
            .collect()
    }

    /// Serialize with `serializer`, or with the global default serializer if none is given
    pub fn to_text(&self, serializer: Option<&dyn Fn(&StringSet) -> String>) -> String {
        ReflectionContext::global().render_string_set(self, serializer)
    }

    /// The value under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// The value under `key`, or an empty string
    pub fn try_get(&self, key: &str) -> &str {
        self.try_get_or(key, "")
    }

    /// The value under `key`, or `default`
    pub fn try_get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Store `value` under `key`, returning the replaced value
    ///
    /// A replaced key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove `key`, keeping the order of the remaining entries
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    /// The value under `key`, storing `factory(key)` first if the key is absent
    pub fn get_or_add<F>(&mut self, key: &str, factory: F) -> &str
    where
        F: FnOnce(&str) -> String,
    {
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(factory(key)),
        }
    }

    /// Store `value` if `key` is absent, otherwise replace the value with `update(key, current)`
    pub fn add_or_update<F>(&mut self, key: &str, value: impl Into<String>, update: F) -> &str
    where
        F: FnOnce(&str, &str) -> String,
    {
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(entry) => {
                let current = entry.into_mut();
                let next = update(key, current);
                *current = next;
                current
            }
            Entry::Vacant(entry) => entry.insert(value.into()),
        }
    }

    /// Returns `true` if `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the set has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key/value pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// The underlying ordered map
    pub fn as_map(&self) -> &IndexMap<String, String> {
        &self.entries
    }
}

impl From<IndexMap<String, String>> for StringSet {
    fn from(entries: IndexMap<String, String>) -> Self {
        StringSet { entries }
    }
}

impl<S: BuildHasher> From<HashMap<String, String, S>> for StringSet {
    fn from(map: HashMap<String, String, S>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StringSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        StringSet {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for StringSet {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.entries
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl<'a> IntoIterator for &'a StringSet {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for StringSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(None))
    }
}

/// The built-in serializer: `{ "k1":"v1", "k2":"v2" }`, and `{  }` for an empty set
///
/// Keys and values are written verbatim, without escaping.
pub fn default_text(set: &StringSet) -> String {
    let body = set
        .iter()
        .map(|(key, value)| format!("\"{key}\":\"{value}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{ {body} }}")
}

/// Conversion of a value into a [`StringSet`]
///
/// Implemented for string sets themselves (cloned), string maps (copied in iteration order),
/// heterogeneous stores (values stringified) and every [`Reflect`] type (public members
/// projected through the global context).
pub trait ToStringSet {
    /// Build the string set
    ///
    /// # Errors
    /// Only projections of reflectable objects can fail, see
    /// [`ReflectionContext::to_string_set`].
    fn to_string_set(&self) -> Result<StringSet>;
}

impl ToStringSet for StringSet {
    fn to_string_set(&self) -> Result<StringSet> {
        Ok(self.clone())
    }
}

impl ToStringSet for IndexMap<String, String> {
    fn to_string_set(&self) -> Result<StringSet> {
        Ok(StringSet::from(self.clone()))
    }
}

impl ToStringSet for HashMap<String, String> {
    fn to_string_set(&self) -> Result<StringSet> {
        Ok(self.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect())
    }
}

impl ToStringSet for HeterogeneousStore {
    fn to_string_set(&self) -> Result<StringSet> {
        Ok(StringSet::from_store(self))
    }
}

impl ToStringSet for dyn Reflected {
    fn to_string_set(&self) -> Result<StringSet> {
        StringSet::from_object(self)
    }
}

impl<T: Reflect> ToStringSet for T {
    fn to_string_set(&self) -> Result<StringSet> {
        StringSet::from_object(self)
    }
}
