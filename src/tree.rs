//! The path tree.
//!
//! [`build_tree`] partitions the canonically ordered key paths level by
//! level. At each node, paths with one remaining segment are the node's
//! direct keys; longer paths are grouped by their first segment, and each
//! group (with that segment stripped) becomes a child subtree. Branch keys
//! are sorted, and `children[i]` is always the subtree of `branch_keys[i]`.
//!
//! A segment may be both a direct key and a branch key of the same node when
//! some documents hold a scalar there and others an object. The two never
//! clash in the store: `a` and `a.b` are different columns.
//!
//! ```rust
//! let tree = jtree::from_str("{\"a\": 1}\n{\"a\": {\"b\": 2}}").unwrap();
//!
//! assert_eq!(tree.direct_keys(), &["a"]);
//! assert_eq!(tree.branch_keys(), &["a"]);
//! assert_eq!(tree.child("a").unwrap().direct_keys(), &["b"]);
//! ```

use crate::observer::{Event, Observer};
use crate::{Columns, Error, KeyPath, Result, Table};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// One object level of the corpus.
///
/// The root views the entire table; every other node views only the
/// columns of its own direct keys. Nodes are immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TreeNode {
    absolute_path: Vec<String>,
    direct_keys: Vec<String>,
    branch_keys: Vec<String>,
    children: Vec<TreeNode>,
    columns: Columns,
    #[serde(skip)]
    separator: char,
}

impl TreeNode {
    /// Segments from the root to this node; empty at the root.
    #[must_use]
    pub fn absolute_path(&self) -> &[String] {
        &self.absolute_path
    }

    /// Keys that are leaves at this level.
    #[must_use]
    pub fn direct_keys(&self) -> &[String] {
        &self.direct_keys
    }

    /// Keys that lead to child nodes, sorted.
    #[must_use]
    pub fn branch_keys(&self) -> &[String] {
        &self.branch_keys
    }

    /// Child nodes, positionally parallel to [`branch_keys`](Self::branch_keys).
    #[must_use]
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    /// The columns this node owns.
    #[must_use]
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// The table shared by every node of the tree.
    #[must_use]
    pub fn table(&self) -> &Arc<Table> {
        self.columns.table()
    }

    /// The character joining segments into column names.
    #[must_use]
    pub fn separator(&self) -> char {
        self.separator
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.absolute_path.is_empty()
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of segments between the root and this node.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.absolute_path.len()
    }

    /// Returns the subtree under `key`, if `key` is a branch key.
    #[must_use]
    pub fn child(&self, key: &str) -> Option<&TreeNode> {
        self.branch_keys
            .binary_search_by(|k| k.as_str().cmp(key))
            .ok()
            .and_then(|i| self.children.get(i))
    }

    /// Follows `path` down from this node.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let tree = jtree::from_str("{\"a\": {\"b\": {\"c\": 1}}}").unwrap();
    /// let node = tree.descend(&["a", "b"]).unwrap();
    /// assert_eq!(node.absolute_path(), &["a", "b"]);
    /// assert!(tree.descend(&["b"]).is_none());
    /// ```
    #[must_use]
    pub fn descend<S: AsRef<str>>(&self, path: &[S]) -> Option<&TreeNode> {
        path.iter()
            .try_fold(self, |node, key| node.child(key.as_ref()))
    }

    /// Full column name of one of this node's direct keys.
    #[must_use]
    pub fn column_name(&self, key: &str) -> String {
        KeyPath::new(self.absolute_path.clone())
            .child(key)
            .join(self.separator)
    }

    /// Iterates over this node and all its descendants, depth first, parents
    /// before children and children in branch key order.
    pub fn iter(&self) -> Nodes<'_> {
        Nodes { stack: vec![self] }
    }

    /// Full paths of every direct key in this subtree.
    ///
    /// For the root this is exactly the harvested key set.
    #[must_use]
    pub fn leaf_paths(&self) -> Vec<KeyPath> {
        self.iter()
            .flat_map(|node| {
                let base = KeyPath::new(node.absolute_path.clone());
                node.direct_keys.iter().map(move |key| base.child(key))
            })
            .collect()
    }

    fn fmt_level(&self, f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
        let indent = self.depth() * 2;
        write!(f, "{:indent$}{}", "", name, indent = indent)?;
        if !self.direct_keys.is_empty() {
            write!(f, ": {}", self.direct_keys.join(", "))?;
        }
        writeln!(f)?;
        for (key, child) in self.branch_keys.iter().zip(&self.children) {
            child.fmt_level(f, &format!("{}/", key))?;
        }
        Ok(())
    }
}

impl fmt::Display for TreeNode {
    /// Renders one line per node, indented by depth.
    ///
    /// ```text
    /// /: a
    ///   a/: b
    ///   user/: id, tags
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.absolute_path.last() {
            Some(last) => format!("{}/", last),
            None => "/".to_string(),
        };
        self.fmt_level(f, &name)
    }
}

/// Preorder iterator over a subtree. See [`TreeNode::iter`].
pub struct Nodes<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Partitions `paths` into a tree whose nodes view columns of `table`.
///
/// `paths` must be the table's column paths in canonical order, as produced
/// by [`canonicalize`](crate::canonical::canonicalize).
///
/// # Errors
///
/// Returns [`Error::UnknownColumn`] if a path has no column in `table`, and
/// [`Error::Custom`] for an empty path.
pub fn build_tree(
    paths: &[KeyPath],
    table: Arc<Table>,
    separator: char,
    observer: &dyn Observer,
) -> Result<TreeNode> {
    if paths.iter().any(KeyPath::is_empty) {
        return Err(Error::custom("cannot place an empty key path in the tree"));
    }
    let remaining: Vec<&[String]> = paths.iter().map(KeyPath::segments).collect();
    let builder = Builder {
        table: &table,
        separator,
        observer,
    };
    let root = builder.build(&remaining, Vec::new())?;
    observer.event(&Event::Finished {
        nodes: root.iter().count(),
    });
    Ok(root)
}

struct Builder<'a> {
    table: &'a Arc<Table>,
    separator: char,
    observer: &'a dyn Observer,
}

impl Builder<'_> {
    fn build(&self, paths: &[&[String]], absolute_path: Vec<String>) -> Result<TreeNode> {
        let (direct, nested): (Vec<&[String]>, Vec<&[String]>) =
            paths.iter().copied().partition(|p| p.len() == 1);
        let direct_keys: Vec<String> = direct.iter().map(|p| p[0].clone()).collect();

        let mut groups: BTreeMap<&str, Vec<&[String]>> = BTreeMap::new();
        for path in nested {
            groups.entry(path[0].as_str()).or_default().push(&path[1..]);
        }

        let mut branch_keys = Vec::with_capacity(groups.len());
        let mut children = Vec::with_capacity(groups.len());
        for (key, group) in groups {
            let mut child_path = absolute_path.clone();
            child_path.push(key.to_string());
            children.push(self.build(&group, child_path)?);
            branch_keys.push(key.to_string());
        }

        let columns = if absolute_path.is_empty() {
            Columns::all(Arc::clone(self.table))
        } else {
            let base = KeyPath::new(absolute_path.clone());
            let names: Vec<String> = direct_keys
                .iter()
                .map(|key| base.child(key).join(self.separator))
                .collect();
            Columns::select(Arc::clone(self.table), &names)?
        };

        self.observer.event(&Event::NodeBuilt {
            absolute_path: &absolute_path,
            direct_keys: direct_keys.len(),
            branch_keys: branch_keys.len(),
        });

        Ok(TreeNode {
            absolute_path,
            direct_keys,
            branch_keys,
            children,
            columns,
            separator: self.separator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NoopObserver, Value};

    /// A table with one empty row and a column per path, in the given order.
    fn tree(paths: &[&[&str]]) -> TreeNode {
        let mut paths: Vec<KeyPath> = paths.iter().map(|p| KeyPath::from(*p)).collect();
        paths.sort();
        let mut table = Table::new();
        table
            .push_row(paths.iter().map(|p| (p.join('.'), Value::Null)))
            .unwrap();
        build_tree(&paths, Arc::new(table), '.', &NoopObserver).unwrap()
    }

    #[test]
    fn test_flat_root_is_leaf() {
        let root = tree(&[&["b"], &["a"]]);
        assert!(root.is_root() && root.is_leaf());
        assert_eq!(root.direct_keys(), &["a", "b"]);
        assert_eq!(root.columns().len(), 2);
    }

    #[test]
    fn test_branch_keys_sorted_and_parallel() {
        let root = tree(&[&["z", "1"], &["m", "1"], &["a", "1"], &["m", "2"]]);
        assert_eq!(root.branch_keys(), &["a", "m", "z"]);
        for (key, child) in root.branch_keys().iter().zip(root.children()) {
            assert_eq!(child.absolute_path(), &[key.clone()]);
        }
        assert_eq!(root.child("m").unwrap().direct_keys(), &["1", "2"]);
    }

    #[test]
    fn test_leaf_and_branch_share_segment() {
        let root = tree(&[&["a"], &["a", "b"]]);
        assert_eq!(root.direct_keys(), &["a"]);
        assert_eq!(root.branch_keys(), &["a"]);
        let child = root.child("a").unwrap();
        assert_eq!(child.direct_keys(), &["b"]);
        assert_eq!(child.columns().names().collect::<Vec<_>>(), vec!["a.b"]);
    }

    #[test]
    fn test_interior_nodes_view_only_their_columns() {
        let root = tree(&[&["a", "x"], &["a", "b", "c"], &["top"]]);
        assert_eq!(root.columns().len(), 3);

        let a = root.child("a").unwrap();
        assert!(!a.is_leaf());
        assert_eq!(a.columns().names().collect::<Vec<_>>(), vec!["a.x"]);
        assert!(Arc::ptr_eq(a.table(), root.table()));

        let b = root.descend(&["a", "b"]).unwrap();
        assert_eq!(b.column_name("c"), "a.b.c");
    }

    #[test]
    fn test_leaf_paths_cover_input() {
        let input: &[&[&str]] = &[&["a"], &["a", "b"], &["c", "d", "e"], &["c", "f"]];
        let root = tree(input);
        let mut got = root.leaf_paths();
        got.sort();
        let mut want: Vec<KeyPath> = input.iter().map(|p| KeyPath::from(*p)).collect();
        want.sort();
        assert_eq!(got, want);
    }

    #[test]
    fn test_preorder_iteration() {
        let root = tree(&[&["b", "x"], &["a", "y", "z"]]);
        let order: Vec<Vec<String>> = root.iter().map(|n| n.absolute_path().to_vec()).collect();
        assert_eq!(
            order,
            vec![
                vec![],
                vec!["a".to_string()],
                vec!["a".to_string(), "y".to_string()],
                vec!["b".to_string()],
            ]
        );
    }

    #[test]
    fn test_display() {
        let root = tree(&[&["a"], &["a", "b"], &["user", "id"]]);
        assert_eq!(root.to_string(), "/: a\n  a/: b\n  user/: id\n");
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let paths = vec![KeyPath::from(["a", "b"])];
        let err = build_tree(&paths, Arc::new(Table::new()), '.', &NoopObserver).unwrap_err();
        assert!(matches!(err, Error::UnknownColumn(ref name) if name == "a.b"));
    }

    #[test]
    fn test_empty_path_rejected() {
        let paths = vec![KeyPath::default()];
        assert!(build_tree(&paths, Arc::new(Table::new()), '.', &NoopObserver).is_err());
    }
}
