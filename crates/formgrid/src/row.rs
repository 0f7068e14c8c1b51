//! Row entities: key-ordered records for tabular data

use std::collections::HashMap;

use crate::value::Value;

/// One row of tabular data.
///
/// The key order defines both column identity and column order when the row
/// is used to derive a table's columns. A key may appear in the key order
/// without a value; reading it yields nothing and displays as an empty cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowEntity {
    key_order: Vec<String>,
    values: HashMap<String, Value>,
}

impl RowEntity {
    /// Create an entity with the given key order and no values
    pub fn new<K: Into<String>>(key_order: impl IntoIterator<Item = K>) -> Self {
        let mut key_order: Vec<String> = key_order.into_iter().map(Into::into).collect();
        dedup_preserving_order(&mut key_order);
        Self {
            key_order,
            values: HashMap::new(),
        }
    }

    /// Builder-style setter
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    #[must_use]
    pub fn key_order(&self) -> &[String] {
        &self.key_order
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// The value for `key`, `Null` when absent
    #[must_use]
    pub fn value_or_null(&self, key: &str) -> Value {
        self.values.get(key).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn has_value(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Set a value.
    ///
    /// Setting `Null` clears the value but keeps the key's position; a
    /// non-null value for an unknown key appends the key to the key order.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if value.is_null() {
            self.values.remove(&key);
            return;
        }
        if !self.key_order.contains(&key) {
            self.key_order.push(key.clone());
        }
        self.values.insert(key, value);
    }

    /// Values in key order; keys without a value yield `Null`
    #[must_use]
    pub fn cells(&self, key_order: &[String]) -> Vec<Value> {
        key_order.iter().map(|k| self.value_or_null(k)).collect()
    }

    /// Number of keys holding a value
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn dedup_preserving_order(keys: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    keys.retain(|k| seen.insert(k.clone()));
}
