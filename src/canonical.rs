//! Projecting normalized documents into one canonical table.
//!
//! Every document becomes one row. Its leaves are addressed by their key
//! paths joined with the separator, so each harvested path becomes one
//! column. Once all rows are in, the columns are split back into paths,
//! sorted by `(length, segments)` and the table is reordered to match; the
//! tree builder relies on that order.

use crate::observer::{tick, Event, Observer, Stage};
use crate::{Error, KeyPath, KeySet, Map, Result, Table, Value};

/// The canonical table together with its column paths, in column order.
#[derive(Clone, Debug, PartialEq)]
pub struct Canonical {
    pub table: Table,
    pub paths: Vec<KeyPath>,
}

/// Builds the canonical table from normalized documents.
///
/// # Errors
///
/// Fails if the columns produced from `documents` do not split back into
/// exactly `keys`, or if two leaves of one document join to the same column
/// name. Both only happen when `separator` occurs inside a key segment.
///
/// # Examples
///
/// ```rust
/// use jtree::{canonical::canonicalize, value, KeyPath, KeySet, NoopObserver, Value};
///
/// let doc = match value!({ "b": 1, "a": { "x": 2 } }) {
///     Value::Object(map) => map,
///     _ => unreachable!(),
/// };
/// let keys: KeySet = [KeyPath::from(["b"]), KeyPath::from(["a", "x"])].into_iter().collect();
///
/// let canonical = canonicalize(vec![doc], &keys, '.', &NoopObserver).unwrap();
/// let names: Vec<_> = canonical.table.column_names().collect();
/// assert_eq!(names, vec!["b", "a.x"]);
/// ```
pub fn canonicalize(
    documents: Vec<Map>,
    keys: &KeySet,
    separator: char,
    observer: &dyn Observer,
) -> Result<Canonical> {
    let total = documents.len();
    let mut table = Table::new();
    let mut prefix = String::new();

    for (i, document) in documents.into_iter().enumerate() {
        let mut row = Vec::with_capacity(table.num_columns());
        flatten(document, &mut prefix, 0, separator, &mut row);
        table.push_row(row)?;
        tick(observer, Stage::Normalize, i + 1, total);
    }

    let mut paths: Vec<KeyPath> = table
        .column_names()
        .map(|name| KeyPath::split(name, separator))
        .collect();
    paths.sort();

    if paths.len() != keys.len() || !paths.iter().eq(keys.iter()) {
        return Err(Error::custom(format!(
            "{} store columns do not split back into the {} harvested key paths with separator {:?}",
            paths.len(),
            keys.len(),
            separator
        )));
    }

    let order: Vec<String> = paths.iter().map(|p| p.join(separator)).collect();
    let table = table.reorder(&order)?;

    observer.event(&Event::Normalized {
        rows: table.num_rows(),
        columns: table.num_columns(),
    });
    Ok(Canonical { table, paths })
}

/// Appends every leaf of `map` to `row` under its joined path.
fn flatten(
    map: Map,
    prefix: &mut String,
    depth: usize,
    separator: char,
    row: &mut Vec<(String, Value)>,
) {
    for (key, value) in map {
        let mark = prefix.len();
        // an empty key still occupies a segment
        if depth > 0 {
            prefix.push(separator);
        }
        prefix.push_str(&key);
        match value {
            Value::Object(inner) => flatten(inner, prefix, depth + 1, separator, row),
            leaf => row.push((prefix.clone(), leaf)),
        }
        prefix.truncate(mark);
    }
}
