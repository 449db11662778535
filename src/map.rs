//! Ordered map type for CyBuf objects.
//!
//! [`CybufMap`] wraps [`IndexMap`] so a decoded object keeps the order its
//! keys appeared in. Encoding a map still sorts keys (see [`crate::ser`]), so
//! insertion order only matters for inspection, never for output bytes.
//!
//! ```rust
//! use serde_cybuf::{CybufMap, Value};
//!
//! let mut map = CybufMap::new();
//! map.insert("Name".to_string(), Value::from("cybuf"));
//! map.insert("Age".to_string(), Value::from(1));
//!
//! let keys: Vec<_> = map.keys().cloned().collect();
//! assert_eq!(keys, vec!["Name", "Age"]);
//! ```

use crate::Value;
use indexmap::IndexMap;
use std::collections::HashMap;

/// An insertion-ordered map of string keys to CyBuf values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CybufMap(IndexMap<String, Value>);

impl CybufMap {
    #[must_use]
    pub fn new() -> Self {
        CybufMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        CybufMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, returning the previous value for that key.
    ///
    /// A replaced key keeps its original position.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl From<HashMap<String, Value>> for CybufMap {
    fn from(map: HashMap<String, Value>) -> Self {
        CybufMap(map.into_iter().collect())
    }
}

impl From<CybufMap> for HashMap<String, Value> {
    fn from(map: CybufMap) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for CybufMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a CybufMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for CybufMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        CybufMap(IndexMap::from_iter(iter))
    }
}
