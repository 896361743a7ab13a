//! Choosing the character that joins key paths into column names.
//!
//! The separator must not occur inside any key segment; then splitting a
//! joined column name always recovers the original path. Candidates are
//! tried in a fixed order, `.` first, then the rest of ASCII punctuation.

use crate::observer::{Event, Observer};
use crate::{Error, KeySet, Result};
use std::collections::BTreeSet;

/// Separator candidates, in order of preference.
pub const CANDIDATES: &str = ".!\"#$%&'()*+,-/:;<=>?@[\\]^_`{|}~";

/// Picks the first candidate that occurs in no segment of `keys`.
///
/// # Errors
///
/// Returns [`Error::SeparatorExhausted`] if every candidate occurs in some
/// segment.
///
/// # Examples
///
/// ```rust
/// use jtree::{separator::select_separator, KeyPath, KeySet, NoopObserver};
///
/// let keys: KeySet = [KeyPath::from(["a.b", "c"])].into_iter().collect();
/// assert_eq!(select_separator(&keys, &NoopObserver).unwrap(), '!');
/// ```
pub fn select_separator(keys: &KeySet, observer: &dyn Observer) -> Result<char> {
    let segments: BTreeSet<&str> = keys
        .iter()
        .flat_map(|path| path.segments().iter().map(String::as_str))
        .collect();

    for candidate in CANDIDATES.chars() {
        match segments.iter().find(|segment| segment.contains(candidate)) {
            Some(segment) => observer.event(&Event::SeparatorRejected {
                candidate,
                segment: *segment,
            }),
            None => {
                observer.event(&Event::SeparatorChosen {
                    separator: candidate,
                });
                return Ok(candidate);
            }
        }
    }
    Err(Error::SeparatorExhausted)
}
