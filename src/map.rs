//! Field maps of parsed documents.
//!
//! A [`Map`] keeps an object's fields in document order. Columns enter the
//! store in the order rows first mention them, so a stable field order keeps
//! the store reproducible before it is canonically reordered.
//!
//! ```rust
//! use jtree::{value, Value};
//!
//! let doc = value!({ "zeta": 1, "alpha": { "id": 7 } });
//! let fields: Vec<_> = doc.as_object().unwrap().keys().map(String::as_str).collect();
//! assert_eq!(fields, vec!["zeta", "alpha"]);
//! ```

use crate::Value;
use indexmap::IndexMap;

/// Fields of one JSON object, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Map(IndexMap<String, Value>);

impl Map {
    #[must_use]
    pub fn new() -> Self {
        Map(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Map(IndexMap::with_capacity(capacity))
    }

    /// Sets `field` to `value`.
    ///
    /// A repeated field keeps its first position and its last value, which
    /// is how a document with duplicate keys is read.
    pub fn insert(&mut self, field: String, value: Value) -> Option<Value> {
        self.0.insert(field, value)
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    #[must_use]
    pub fn contains_key(&self, field: &str) -> bool {
        self.0.contains_key(field)
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

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl IntoIterator for Map {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(fields: T) -> Self {
        Map(fields.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_field_keeps_position_and_last_value() {
        let mut doc = Map::new();
        doc.insert("a".to_string(), Value::from(1));
        doc.insert("b".to_string(), Value::from(2));
        assert_eq!(doc.insert("a".to_string(), Value::from(3)), Some(Value::from(1)));

        let fields: Vec<_> = doc.iter().map(|(k, v)| (k.as_str(), v.as_i64())).collect();
        assert_eq!(fields, vec![("a", Some(3)), ("b", Some(2))]);
    }

    #[test]
    fn test_collect_fields() {
        let doc: Map = vec![("x".to_string(), Value::Null)].into_iter().collect();
        assert!(doc.contains_key("x"));
        assert!(!doc.is_empty());
        assert_eq!(doc.len(), 1);
    }
}
