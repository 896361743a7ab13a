//! # jtree
//!
//! Turn a corpus of newline-delimited JSON documents into a path tree: a
//! prefix tree whose nodes mirror the documents' object nesting, where every
//! leaf key is a column of one shared tabular store.
//!
//! ## How it works
//!
//! 1. **Read**: load every line, or a random sample of lines for files too
//!    large to hold in memory ([`sampler`]).
//! 2. **Harvest**: parse each line, replace arrays by their JSON text and
//!    collect the union of all key paths ([`harvest`]).
//! 3. **Separator**: pick a punctuation character that occurs in no key
//!    ([`separator`]).
//! 4. **Canonicalize**: flatten each document into one row of a [`Table`]
//!    whose column names are joined paths, then order the columns by path
//!    length and name ([`canonical`]).
//! 5. **Build**: partition the ordered paths level by level into
//!    [`TreeNode`]s ([`tree`]).
//!
//! Builds are all-or-nothing. Any malformed line fails the whole build with
//! an [`Error`] naming the line.
//!
//! ## Quick Start
//!
//! ```rust
//! let corpus = "{\"user\":{\"id\":1,\"tags\":[1,2]}}\n{\"user\":{\"id\":2}}";
//! let root = jtree::from_str(corpus).unwrap();
//!
//! assert_eq!(root.branch_keys(), &["user"]);
//! let user = root.child("user").unwrap();
//! assert_eq!(user.direct_keys(), &["id", "tags"]);
//!
//! let table = root.table();
//! assert_eq!(table.num_rows(), 2);
//! assert_eq!(table.get(0, "user.tags").and_then(|v| v.as_str()), Some("[1,2]"));
//! assert_eq!(table.get(1, "user.tags"), None);
//! ```
//!
//! ## Sampling large files
//!
//! ```rust,no_run
//! use jtree::BuildOptions;
//!
//! // roughly 1% of the lines, reproducibly
//! let options = BuildOptions::sampled(1.0).with_seed(42);
//! let root = jtree::build_with_options("events.ndjson", &options)?;
//! # Ok::<(), jtree::Error>(())
//! ```
//!
//! ## Observability
//!
//! Progress is reported as [`Event`]s to an [`Observer`]. The path-based
//! entry points use [`TracingObserver`], which logs through `tracing`; pass
//! your own observer to [`build_with_observer`] to capture events yourself.

pub mod canonical;
pub mod error;
pub mod harvest;
pub mod macros;
pub mod map;
pub mod observer;
pub mod options;
pub mod path;
pub mod sampler;
pub mod separator;
pub mod store;
pub mod tree;
pub mod value;

pub use error::{Error, Location, Result};
pub use map::Map;
pub use observer::{Event, NoopObserver, Observer, Stage, TracingObserver};
pub use options::BuildOptions;
pub use path::{KeyPath, KeySet};
pub use sampler::RawLine;
pub use store::{Column, Columns, Table};
pub use tree::TreeNode;
pub use value::{Number, Value};

use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;
use std::sync::Arc;

/// Builds the path tree of the newline-delimited JSON file at `path`.
///
/// `sample_percent` is in `(0, 100]`; below 100 only a random sample of
/// lines is read.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a line is malformed, the
/// corpus is empty, or no separator can be chosen.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn build<P: AsRef<Path>>(path: P, sample_percent: f64) -> Result<TreeNode> {
    build_with_options(path, &BuildOptions::sampled(sample_percent))
}

/// Builds the path tree of the file at `path` with custom options.
///
/// # Errors
///
/// See [`build`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn build_with_options<P: AsRef<Path>>(path: P, options: &BuildOptions) -> Result<TreeNode> {
    build_with_observer(path, options, &TracingObserver)
}

/// Builds the path tree of the file at `path`, reporting to `observer`.
///
/// # Errors
///
/// See [`build`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn build_with_observer<P: AsRef<Path>>(
    path: P,
    options: &BuildOptions,
    observer: &dyn Observer,
) -> Result<TreeNode> {
    options.validate()?;
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(sampler::READ_BUFFER, file);
    from_seekable_with_observer(&mut reader, options, observer)
}

/// Builds the path tree of a seekable source, sampling if the options ask
/// for it.
///
/// # Errors
///
/// See [`build`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_seekable<R: BufRead + Seek>(reader: &mut R, options: &BuildOptions) -> Result<TreeNode> {
    from_seekable_with_observer(reader, options, &TracingObserver)
}

/// Like [`from_seekable`], reporting to `observer`.
///
/// # Errors
///
/// See [`build`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_seekable_with_observer<R: BufRead + Seek>(
    reader: &mut R,
    options: &BuildOptions,
    observer: &dyn Observer,
) -> Result<TreeNode> {
    options.validate()?;
    let lines = sampler::load(reader, options, observer)?;
    from_lines(&lines, options, observer)
}

/// Builds the path tree from every line of `reader`.
///
/// # Examples
///
/// ```rust
/// use std::io::Cursor;
///
/// let root = jtree::from_reader(Cursor::new("{\"a\": 1}\n{\"b\": 2}\n")).unwrap();
/// assert_eq!(root.direct_keys(), &["a", "b"]);
/// ```
///
/// # Errors
///
/// See [`build`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R: BufRead>(reader: R) -> Result<TreeNode> {
    from_reader_with_options(reader, &BuildOptions::default())
}

/// Builds the path tree from every line of `reader` with custom options.
///
/// # Errors
///
/// A plain reader cannot be sampled: options with `sample_percent < 100`
/// are rejected. Use [`from_seekable`] to sample. Otherwise see [`build`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader_with_options<R: BufRead>(reader: R, options: &BuildOptions) -> Result<TreeNode> {
    from_reader_with_observer(reader, options, &TracingObserver)
}

/// Like [`from_reader_with_options`], reporting to `observer`.
///
/// # Errors
///
/// See [`from_reader_with_options`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader_with_observer<R: BufRead>(
    reader: R,
    options: &BuildOptions,
    observer: &dyn Observer,
) -> Result<TreeNode> {
    options.validate()?;
    if options.is_sampled() {
        return Err(Error::custom(
            "sampling needs a seekable source, use from_seekable",
        ));
    }
    let lines = sampler::read_lines(reader)?;
    observer.event(&Event::LinesRead {
        lines: lines.len(),
        sampled: false,
    });
    from_lines(&lines, options, observer)
}

/// Builds the path tree from newline-delimited JSON text.
///
/// # Errors
///
/// See [`build`].
#[must_use = "this returns the result of the operation, errors must be handled"]
#[allow(clippy::should_implement_trait)]
pub fn from_str(text: &str) -> Result<TreeNode> {
    from_reader(text.as_bytes())
}

/// Runs the pipeline over lines already in memory.
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] if there are no documents and
/// [`Error::NoKeyPaths`] if the documents have no leaves; otherwise fails on
/// the first malformed line or an exhausted separator set.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_lines(
    lines: &[RawLine],
    options: &BuildOptions,
    observer: &dyn Observer,
) -> Result<TreeNode> {
    let harvest = harvest::harvest(lines, options.max_depth, observer)?;
    if harvest.documents.is_empty() {
        return Err(Error::EmptyInput);
    }
    if harvest.keys.is_empty() {
        return Err(Error::NoKeyPaths {
            documents: harvest.documents.len(),
        });
    }

    let separator = separator::select_separator(&harvest.keys, observer)?;
    let canonical::Canonical { table, paths } =
        canonical::canonicalize(harvest.documents, &harvest.keys, separator, observer)?;
    tree::build_tree(&paths, Arc::new(table), separator, observer)
}
