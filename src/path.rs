//! Key paths.
//!
//! A [`KeyPath`] is the sequence of object keys leading from a document's
//! root to a leaf. Paths order by length first and then segment by segment,
//! which is the order the tree builder consumes them in.
//!
//! ```rust
//! use jtree::KeyPath;
//!
//! let mut paths = vec![
//!     KeyPath::from(["user", "name"]),
//!     KeyPath::from(["z"]),
//!     KeyPath::from(["user", "age"]),
//! ];
//! paths.sort();
//! assert_eq!(paths[0], KeyPath::from(["z"]));
//! assert_eq!(paths[1].join('.'), "user.age");
//! ```

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// The set of distinct key paths harvested from a corpus, in canonical order.
pub type KeySet = BTreeSet<KeyPath>;

/// An ordered sequence of key segments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        KeyPath(segments)
    }

    /// Splits a joined column name back into its segments.
    ///
    /// Only sound when `separator` occurs in no segment, which is what
    /// [`select_separator`](crate::separator::select_separator) guarantees.
    #[must_use]
    pub fn split(name: &str, separator: char) -> Self {
        KeyPath(name.split(separator).map(str::to_string).collect())
    }

    /// Joins the segments into a single column name.
    #[must_use]
    pub fn join(&self, separator: char) -> String {
        let mut buf = [0u8; 4];
        let sep: &str = separator.encode_utf8(&mut buf);
        self.0.join(sep)
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn into_segments(self) -> Vec<String> {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new path with `segment` appended.
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend(self.0.iter().cloned());
        segments.push(segment.to_string());
        KeyPath(segments)
    }
}

impl Ord for KeyPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for KeyPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl From<Vec<String>> for KeyPath {
    fn from(segments: Vec<String>) -> Self {
        KeyPath(segments)
    }
}

impl<const N: usize> From<[&str; N]> for KeyPath {
    fn from(segments: [&str; N]) -> Self {
        KeyPath(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl From<&[&str]> for KeyPath {
    fn from(segments: &[&str]) -> Self {
        KeyPath(segments.iter().map(|s| s.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorter_paths_first() {
        let short = KeyPath::from(["zzz"]);
        let long = KeyPath::from(["a", "a"]);
        assert!(short < long);
    }

    #[test]
    fn test_ties_break_by_segment() {
        let a = KeyPath::from(["user", "age"]);
        let b = KeyPath::from(["user", "name"]);
        let c = KeyPath::from(["zone", "a"]);
        assert!(a < b && b < c);
    }

    #[test]
    fn test_join_split() {
        let path = KeyPath::from(["a", "", "c"]);
        let name = path.join('/');
        assert_eq!(name, "a//c");
        assert_eq!(KeyPath::split(&name, '/'), path);
    }

    #[test]
    fn test_child() {
        let path = KeyPath::from(["a"]).child("b");
        assert_eq!(path, KeyPath::from(["a", "b"]));
    }
}
