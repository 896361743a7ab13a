//! Error types for building a path tree.
//!
//! Every failure in the pipeline is reported through [`Error`]. Builds are
//! all-or-nothing: the first error aborts the build and no partial tree is
//! returned.
//!
//! ## Error Categories
//!
//! - **Input errors**: malformed JSON, invalid UTF-8, non-object documents,
//!   nesting deeper than the configured limit. These carry a [`Location`]
//!   identifying the offending line.
//! - **Configuration errors**: an out-of-range sample percentage, or a corpus
//!   whose key segments use every separator candidate.
//! - **Empty input**: no documents, or documents without any key path.
//! - **I/O errors**: propagated unchanged from the file system.
//!
//! ## Examples
//!
//! ```rust
//! use jtree::{from_str, Error};
//!
//! let result = from_str("{\"a\": 1}\n{\"a\": ");
//! match result {
//!     Err(Error::Parse { location, .. }) => assert_eq!(location.to_string(), "line 2"),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

/// Where a raw document line came from.
///
/// Fully read files number their lines from 1; sampled lines are identified
/// by the byte offset at which they start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Location {
    Line(usize),
    Offset(u64),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Line(n) => write!(f, "line {}", n),
            Location::Offset(o) => write!(f, "byte offset {}", o),
        }
    }
}

/// Represents all possible errors that can occur while building a tree.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error during reading
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A line that is not valid JSON
    #[error("Parse error at {location}, column {column}: {msg}")]
    Parse {
        location: Location,
        column: usize,
        msg: String,
    },

    /// A line that is not valid UTF-8
    #[error("Invalid UTF-8 at {location}")]
    Encoding { location: Location },

    /// A document whose top level is not a JSON object
    #[error("Document at {location} is {found}, expected an object")]
    NotAnObject {
        location: Location,
        found: &'static str,
    },

    /// Object nesting deeper than the configured maximum
    #[error("Document at {location} nests objects deeper than {limit} levels")]
    DepthExceeded { location: Location, limit: usize },

    /// Every separator candidate occurs inside some key segment
    #[error("No separator available: every candidate character occurs in a key segment")]
    SeparatorExhausted,

    /// Nothing to build from
    #[error("Empty input: no documents to build a tree from")]
    EmptyInput,

    /// Documents exist but none of them contributes a key path
    #[error("Empty input: {documents} documents yielded no key paths")]
    NoKeyPaths { documents: usize },

    /// Sample percentage outside (0, 100]
    #[error("Invalid sample percent {0}: expected a value in (0, 100]")]
    InvalidSamplePercent(f64),

    /// Column lookup by a name the store does not contain
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Column insertion with a name the store already contains
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a parse error for the line at `location`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jtree::{Error, Location};
    ///
    /// let err = Error::parse(Location::Line(10), 5, "expected value");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn parse(location: Location, column: usize, msg: &str) -> Self {
        Error::Parse {
            location,
            column,
            msg: msg.to_string(),
        }
    }

    pub(crate) fn from_json(location: Location, err: &serde_json::Error) -> Self {
        Error::Parse {
            location,
            column: err.column(),
            msg: err.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jtree::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns the location of the offending line, if the error has one.
    #[must_use]
    pub fn location(&self) -> Option<Location> {
        match self {
            Error::Parse { location, .. }
            | Error::Encoding { location }
            | Error::NotAnObject { location, .. }
            | Error::DepthExceeded { location, .. } => Some(*location),
            _ => None,
        }
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        assert_eq!(Location::Line(3).to_string(), "line 3");
        assert_eq!(Location::Offset(120).to_string(), "byte offset 120");
    }

    #[test]
    fn test_location_accessor() {
        let err = Error::parse(Location::Offset(7), 1, "bad");
        assert_eq!(err.location(), Some(Location::Offset(7)));
        assert_eq!(Error::EmptyInput.location(), None);
    }

    #[test]
    fn test_deserialize_value_with_crate_error() {
        use serde::de::{Deserialize, IntoDeserializer};

        let de: serde::de::value::StrDeserializer<'_, Error> = "tags".into_deserializer();
        let value = crate::Value::deserialize(de).unwrap();
        assert_eq!(value.as_str(), Some("tags"));

        let err = <Error as serde::de::Error>::custom("not a document");
        assert!(matches!(err, Error::Custom(ref m) if m == "not a document"));
    }

    #[test]
    fn test_io_from() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
    }
}
