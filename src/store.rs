//! Column-oriented tabular store.
//!
//! [`Table`] maps column names to [`Column`]s of equal length; row `i` of
//! every column belongs to the `i`-th inserted document. A cell is `None`
//! when the document had no value at that path, which is distinct from an
//! explicit JSON `null`.
//!
//! Tree nodes never copy column data. They hold a [`Columns`] view: a shared
//! `Arc<Table>` plus the indices of the columns they own.
//!
//! ## Examples
//!
//! ```rust
//! use jtree::{Table, Value};
//!
//! let mut table = Table::new();
//! table.push_row(vec![("a".to_string(), Value::from(1))])?;
//! table.push_row(vec![("b".to_string(), Value::Null)])?;
//!
//! assert_eq!(table.num_rows(), 2);
//! assert_eq!(table.get(0, "b"), None);
//! assert_eq!(table.get(1, "b"), Some(&Value::Null));
//! # Ok::<(), jtree::Error>(())
//! ```

use crate::{Error, Result, Value};
use indexmap::IndexMap;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// One column of cells, `None` marking a missing value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Column {
    values: Vec<Option<Value>>,
}

impl Column {
    fn missing(rows: usize) -> Self {
        Column {
            values: vec![None; rows],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value at `row`, or `None` if it is missing or out of range.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row).and_then(Option::as_ref)
    }

    /// Number of rows without a value.
    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Option<Value>> {
        self.values.iter()
    }
}

/// A set of named, row-aligned columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: IndexMap<String, Column>,
    rows: usize,
}

impl Table {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names, in column order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.keys().map(String::as_str)
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    #[must_use]
    pub fn column_at(&self, index: usize) -> Option<(&str, &Column)> {
        self.columns
            .get_index(index)
            .map(|(name, column)| (name.as_str(), column))
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }

    /// Returns the cell at (`row`, `name`), `None` if it is missing.
    #[must_use]
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        self.columns.get(name).and_then(|c| c.get(row))
    }

    /// Adds an all-missing column at the end and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateColumn`] if the name is taken.
    pub fn insert_column(&mut self, name: &str) -> Result<usize> {
        if self.columns.contains_key(name) {
            return Err(Error::DuplicateColumn(name.to_string()));
        }
        let (index, _) = self
            .columns
            .insert_full(name.to_string(), Column::missing(self.rows));
        Ok(index)
    }

    /// Appends one row. Columns not named in `row` get a missing cell;
    /// names not yet in the table are added through
    /// [`insert_column`](Table::insert_column), missing in all earlier rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateColumn`] if `row` names a column twice. The
    /// cells before the repeat stay in the table.
    pub fn push_row<I>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        for column in self.columns.values_mut() {
            column.values.push(None);
        }
        self.rows += 1;
        for (name, value) in row {
            let index = match self.columns.get_index_of(&name) {
                Some(index) => index,
                None => self.insert_column(&name)?,
            };
            if let Some((_, column)) = self.columns.get_index_mut(index) {
                match column.values.last_mut() {
                    Some(cell @ None) => *cell = Some(value),
                    _ => return Err(Error::DuplicateColumn(name)),
                }
            }
        }
        Ok(())
    }

    /// Copies out the named columns, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] for a name not in the table.
    pub fn project<S: AsRef<str>>(&self, names: &[S]) -> Result<Table> {
        let mut columns = IndexMap::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let column = self
                .columns
                .get(name)
                .ok_or_else(|| Error::UnknownColumn(name.to_string()))?;
            columns.insert(name.to_string(), column.clone());
        }
        Ok(Table {
            columns,
            rows: self.rows,
        })
    }

    /// Rearranges the columns into exactly the order given.
    ///
    /// # Errors
    ///
    /// `order` must name every column once: unknown names fail with
    /// [`Error::UnknownColumn`], repeats with [`Error::DuplicateColumn`], and
    /// left-out columns with [`Error::Custom`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jtree::{Table, Value};
    ///
    /// let mut table = Table::new();
    /// table.push_row(vec![
    ///     ("b".to_string(), Value::from(2)),
    ///     ("a".to_string(), Value::from(1)),
    /// ]).unwrap();
    /// let table = table.reorder(&["a", "b"]).unwrap();
    /// assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["a", "b"]);
    /// ```
    pub fn reorder<S: AsRef<str>>(mut self, order: &[S]) -> Result<Table> {
        let mut columns = IndexMap::with_capacity(order.len());
        for name in order {
            let name = name.as_ref();
            if columns.contains_key(name) {
                return Err(Error::DuplicateColumn(name.to_string()));
            }
            let column = self
                .columns
                .swap_remove(name)
                .ok_or_else(|| Error::UnknownColumn(name.to_string()))?;
            columns.insert(name.to_string(), column);
        }
        if let Some(name) = self.columns.keys().next() {
            return Err(Error::custom(format!(
                "reorder leaves out column {}",
                name
            )));
        }
        Ok(Table {
            columns,
            rows: self.rows,
        })
    }
}

/// A read-only view over some columns of a shared table.
#[derive(Clone, Debug, PartialEq)]
pub struct Columns {
    table: Arc<Table>,
    indices: Vec<usize>,
}

impl Columns {
    /// A view over every column of `table`.
    #[must_use]
    pub fn all(table: Arc<Table>) -> Self {
        let indices = (0..table.num_columns()).collect();
        Columns { table, indices }
    }

    /// A view over the named columns of `table`, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] for a name not in the table.
    pub fn select<S: AsRef<str>>(table: Arc<Table>, names: &[S]) -> Result<Self> {
        let indices = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                table
                    .index_of(name)
                    .ok_or_else(|| Error::UnknownColumn(name.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Columns { table, indices })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The table this view reads from.
    #[must_use]
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// Positions of the viewed columns in the table.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> + '_ {
        self.indices
            .iter()
            .filter_map(move |&i| self.table.column_at(i))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(name, _)| name)
    }

    /// Looks up a viewed column by its full name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.iter().find(|(n, _)| *n == name).map(|(_, c)| c)
    }

    /// Copies the viewed columns out into a standalone table.
    ///
    /// # Errors
    ///
    /// Never fails for a view built by this crate.
    pub fn to_table(&self) -> Result<Table> {
        let names: Vec<&str> = self.names().collect();
        self.table.project(&names)
    }
}

impl Serialize for Columns {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for name in self.names() {
            seq.serialize_element(name)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, i64)]) -> Vec<(String, Value)> {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect()
    }

    #[test]
    fn test_new_columns_backfill_missing() {
        let mut table = Table::new();
        table.push_row(row(&[("a", 1)])).unwrap();
        table.push_row(row(&[("b", 2)])).unwrap();
        table.push_row(row(&[("a", 3), ("b", 4)])).unwrap();

        let a = table.column("a").unwrap();
        let b = table.column("b").unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(b.len(), 3);
        assert_eq!(a.missing_count(), 1);
        assert_eq!(b.get(0), None);
        assert_eq!(b.get(1).and_then(Value::as_i64), Some(2));
    }

    #[test]
    fn test_insert_column() {
        let mut table = Table::new();
        table.push_row(row(&[("a", 1)])).unwrap();
        assert_eq!(table.insert_column("z").unwrap(), 1);
        assert_eq!(table.column("z").unwrap().len(), 1);
        assert!(matches!(
            table.insert_column("a"),
            Err(Error::DuplicateColumn(_))
        ));
    }

    #[test]
    fn test_repeated_name_in_row_rejected() {
        let mut table = Table::new();
        table.push_row(row(&[("a", 1)])).unwrap();
        let err = table.push_row(row(&[("b", 2), ("b", 3)])).unwrap_err();
        assert!(matches!(err, Error::DuplicateColumn(ref name) if name == "b"));
        assert_eq!(table.get(1, "b").and_then(Value::as_i64), Some(2));
        assert_eq!(table.column("b").unwrap().get(0), None);
    }

    #[test]
    fn test_project() {
        let mut table = Table::new();
        table.push_row(row(&[("a", 1), ("b", 2), ("c", 3)])).unwrap();
        let projected = table.project(&["c", "a"]).unwrap();
        assert_eq!(projected.column_names().collect::<Vec<_>>(), vec!["c", "a"]);
        assert_eq!(projected.num_rows(), 1);
        assert!(matches!(
            table.project(&["nope"]),
            Err(Error::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_reorder_requires_permutation() {
        let mut table = Table::new();
        table.push_row(row(&[("a", 1), ("b", 2)])).unwrap();

        assert!(table.clone().reorder(&["b", "a"]).is_ok());
        assert!(matches!(
            table.clone().reorder(&["a", "a"]),
            Err(Error::DuplicateColumn(_))
        ));
        assert!(matches!(table.clone().reorder(&["a"]), Err(Error::Custom(_))));
        assert!(matches!(
            table.reorder(&["a", "x"]),
            Err(Error::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_columns_view() {
        let mut table = Table::new();
        table.push_row(row(&[("a", 1), ("b", 2), ("c", 3)])).unwrap();
        let table = Arc::new(table);

        let all = Columns::all(Arc::clone(&table));
        assert_eq!(all.len(), 3);

        let view = Columns::select(Arc::clone(&table), &["c", "a"]).unwrap();
        assert_eq!(view.indices(), &[2, 0]);
        assert_eq!(view.names().collect::<Vec<_>>(), vec!["c", "a"]);
        assert!(view.get("b").is_none());
        assert_eq!(view.to_table().unwrap().num_columns(), 2);
        assert!(Arc::ptr_eq(view.table(), &table));
    }
}
