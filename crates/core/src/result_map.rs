//! Ordered result of a successful dispatch.

use serde::{Deserialize, Serialize};
use serde_json::Map;

use crate::Value;

/// Insertion-ordered key/value output of a command.
///
/// Iteration order is the order in which keys were first inserted. Callers
/// may render results in that order, so it is part of the contract.
/// Inserting an existing key replaces its value without moving it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultMap(Map<String, Value>);

impl ResultMap {
    /// Create an empty result map
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Insert a value, returning the previous value for the key if any
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Unwrap into the underlying ordered map
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ResultMap {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<ResultMap> for Value {
    fn from(map: ResultMap) -> Self {
        Value::Object(map.0)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ResultMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ResultMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
