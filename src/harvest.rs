//! Parsing documents and harvesting their key paths.
//!
//! Each line is parsed into a [`Value`] and must be an object. The object is
//! walked recursively:
//!
//! - nested objects are descended into, extending the current key path;
//! - arrays are never decomposed: the whole array is replaced by its compact
//!   JSON text and becomes one scalar leaf;
//! - every other value is a leaf whose key path joins the corpus key set.
//!
//! The key set is the union over all documents, so a key missing from some
//! documents simply becomes a sparse column later on. Empty objects have no
//! leaves and contribute no key path.
//!
//! ```rust
//! use jtree::{harvest::harvest_document, value, KeyPath, KeySet, Location, Value};
//!
//! let mut keys = KeySet::new();
//! let doc = value!({ "user": { "id": 1, "tags": [1, 2] } });
//! let normalized = harvest_document(doc, Location::Line(1), 64, &mut keys).unwrap();
//!
//! assert!(keys.contains(&KeyPath::from(["user", "tags"])));
//! let user = normalized.get("user").and_then(Value::as_object).unwrap();
//! assert_eq!(user.get("tags"), Some(&Value::from("[1,2]")));
//! ```

use crate::observer::{tick, Event, Observer, Stage};
use crate::sampler::RawLine;
use crate::{Error, KeyPath, KeySet, Location, Map, Result, Value};

/// Normalized documents and the union of their key paths.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Harvest {
    pub documents: Vec<Map>,
    pub keys: KeySet,
}

/// Parses every non-blank line and harvests its key paths.
///
/// # Errors
///
/// Fails on the first line that is not valid JSON, is not an object, or
/// nests deeper than `max_depth`.
pub fn harvest(lines: &[RawLine], max_depth: usize, observer: &dyn Observer) -> Result<Harvest> {
    let mut harvest = Harvest {
        documents: Vec::with_capacity(lines.len()),
        keys: KeySet::new(),
    };

    for (i, line) in lines.iter().enumerate() {
        tick(observer, Stage::Harvest, i + 1, lines.len());
        if line.is_blank() {
            continue;
        }
        let value = parse_line(line)?;
        let document = harvest_document(value, line.location, max_depth, &mut harvest.keys)?;
        harvest.documents.push(document);
    }

    observer.event(&Event::DocumentsParsed {
        documents: harvest.documents.len(),
        key_paths: harvest.keys.len(),
    });
    Ok(harvest)
}

/// Parses one line of JSON text.
///
/// # Errors
///
/// Returns [`Error::Parse`] carrying the line's location.
pub fn parse_line(line: &RawLine) -> Result<Value> {
    serde_json::from_str(&line.text).map_err(|e| Error::from_json(line.location, &e))
}

/// Normalizes one parsed document and adds its key paths to `keys`.
///
/// # Errors
///
/// Returns [`Error::NotAnObject`] if `value` is not an object and
/// [`Error::DepthExceeded`] if objects nest deeper than `max_depth`.
pub fn harvest_document(
    value: Value,
    location: Location,
    max_depth: usize,
    keys: &mut KeySet,
) -> Result<Map> {
    match value {
        Value::Object(map) => {
            let mut walker = Walker {
                location,
                max_depth,
                keys,
                prefix: Vec::new(),
            };
            walker.walk(map)
        }
        other => Err(Error::NotAnObject {
            location,
            found: other.kind(),
        }),
    }
}

struct Walker<'a> {
    location: Location,
    max_depth: usize,
    keys: &'a mut KeySet,
    prefix: Vec<String>,
}

impl Walker<'_> {
    fn walk(&mut self, map: Map) -> Result<Map> {
        if self.prefix.len() >= self.max_depth {
            return Err(Error::DepthExceeded {
                location: self.location,
                limit: self.max_depth,
            });
        }

        let mut out = Map::with_capacity(map.len());
        for (key, value) in map {
            let value = match value {
                Value::Object(inner) => {
                    self.prefix.push(key);
                    let walked = self.walk(inner);
                    let key = self.prefix.pop().unwrap_or_default();
                    out.insert(key, Value::Object(walked?));
                    continue;
                }
                Value::Array(items) => Value::String(Value::Array(items).to_json()?),
                scalar @ (Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)) => {
                    scalar
                }
            };
            self.keys.insert(self.leaf_path(&key));
            out.insert(key, value);
        }
        Ok(out)
    }

    fn leaf_path(&self, key: &str) -> KeyPath {
        let mut segments = Vec::with_capacity(self.prefix.len() + 1);
        segments.extend(self.prefix.iter().cloned());
        segments.push(key.to_string());
        KeyPath::new(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoopObserver;

    fn lines(text: &str) -> Vec<RawLine> {
        crate::sampler::read_lines(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_union_of_keys() {
        let harvest = harvest(
            &lines("{\"user\":{\"id\":1,\"tags\":[1,2]}}\n{\"user\":{\"id\":2}}"),
            64,
            &NoopObserver,
        )
        .unwrap();

        assert_eq!(harvest.documents.len(), 2);
        let keys: Vec<_> = harvest.keys.into_iter().collect();
        assert_eq!(
            keys,
            vec![KeyPath::from(["user", "id"]), KeyPath::from(["user", "tags"])]
        );
    }

    #[test]
    fn test_arrays_of_objects_are_opaque() {
        let mut keys = KeySet::new();
        let doc = crate::value!({ "items": [{ "a": 1 }, { "b": [2] }] });
        let normalized = harvest_document(doc, Location::Line(1), 8, &mut keys).unwrap();

        assert_eq!(keys.len(), 1);
        assert!(keys.contains(&KeyPath::from(["items"])));
        assert_eq!(
            normalized.get("items"),
            Some(&Value::from(r#"[{"a":1},{"b":[2]}]"#))
        );
    }

    #[test]
    fn test_empty_object_has_no_paths() {
        let mut keys = KeySet::new();
        let doc = crate::value!({ "a": {}, "b": null });
        harvest_document(doc, Location::Line(1), 8, &mut keys).unwrap();
        assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec![KeyPath::from(["b"])]);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let harvest = harvest(&lines("{\"a\":1}\n\n   \n{\"b\":2}\n"), 64, &NoopObserver).unwrap();
        assert_eq!(harvest.documents.len(), 2);
    }

    #[test]
    fn test_malformed_line_reports_location() {
        let err = harvest(&lines("{\"a\":1}\n{\"a\":}"), 64, &NoopObserver).unwrap_err();
        assert_eq!(err.location(), Some(Location::Line(2)));
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_non_object_document() {
        let err = harvest(&lines("[1,2]"), 64, &NoopObserver).unwrap_err();
        assert!(matches!(
            err,
            Error::NotAnObject {
                found: "an array",
                ..
            }
        ));
    }

    #[test]
    fn test_depth_limit() {
        let doc = "{\"a\":{\"b\":{\"c\":1}}}";
        assert!(harvest(&lines(doc), 3, &NoopObserver).is_ok());
        let err = harvest(&lines(doc), 2, &NoopObserver).unwrap_err();
        assert!(matches!(err, Error::DepthExceeded { limit: 2, .. }));
    }
}
