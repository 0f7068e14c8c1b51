//! The key/value store behind a form
//!
//! A `ValueMap` holds the logical data of a form: one entry per field key.
//! Entries are seeded from field defaults when fields are registered and are
//! only overwritten from live widgets by an explicit `Form::save_values`.

use std::collections::HashMap;

use crate::value::Value;

/// Key → value store, optionally remembering insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    entries: HashMap<String, Value>,
    /// Insertion order of keys; `None` for an unordered map
    order: Option<Vec<String>>,
}

impl ValueMap {
    /// Create an empty unordered map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty map that preserves insertion order
    #[must_use]
    pub fn ordered() -> Self {
        Self {
            entries: HashMap::new(),
            order: Some(Vec::new()),
        }
    }

    /// Seed a map from an external key/value source
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>, ordered: bool) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut map = if ordered { Self::ordered() } else { Self::new() };
        for (key, value) in pairs {
            map.set_item(key, value);
        }
        map
    }

    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.order.is_some()
    }

    /// Whether the key is present, whatever its value
    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether the key is present with a non-null value
    #[must_use]
    pub fn has_item(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|v| !v.is_null())
    }

    /// Look up a value; an absent key yields `None`, never an error
    #[must_use]
    pub fn item(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn item_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Insert or overwrite a value, returning the previous one
    pub fn set_item(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        if let Some(order) = &mut self.order {
            if !self.entries.contains_key(&key) {
                order.push(key.clone());
            }
        }
        self.entries.insert(key, value.into())
    }

    /// Remove a key; afterwards neither `has_key` nor `has_item` holds
    pub fn remove_item(&mut self, key: &str) -> Option<Value> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            if let Some(order) = &mut self.order {
                order.retain(|k| k != key);
            }
        }
        removed
    }

    /// All keys: insertion order for ordered maps, sorted otherwise
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        match &self.order {
            Some(order) => order.clone(),
            None => {
                let mut keys: Vec<String> = self.entries.keys().cloned().collect();
                keys.sort();
                keys
            }
        }
    }

    /// The underlying map
    #[must_use]
    pub fn map(&self) -> &HashMap<String, Value> {
        &self.entries
    }

    /// Entries in `keys()` order
    pub fn iter(&self) -> impl Iterator<Item = (String, &Value)> + '_ {
        self.keys().into_iter().filter_map(move |k| {
            let value = self.entries.get(&k)?;
            Some((k, value))
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
