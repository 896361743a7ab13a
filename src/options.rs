//! Configuration options for building a path tree.
//!
//! [`BuildOptions`] controls sampling and the safety limits applied while
//! walking documents.
//!
//! ## Examples
//!
//! ```rust
//! use jtree::BuildOptions;
//!
//! // Read every line
//! let options = BuildOptions::new();
//! assert_eq!(options.sample_percent, 100.0);
//!
//! // Sample roughly 5% of a large file, reproducibly
//! let options = BuildOptions::sampled(5.0).with_seed(42);
//! assert!(options.is_sampled());
//! ```

use crate::{Error, Result};

/// Lines read up front to estimate the mean line length when sampling.
pub const DEFAULT_ESTIMATE_LINES: usize = 1000;

/// Deepest object nesting accepted in a document.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Configuration options for a build.
///
/// # Examples
///
/// ```rust
/// use jtree::BuildOptions;
///
/// let options = BuildOptions::new()
///     .with_sample_percent(10.0)
///     .with_estimate_lines(500)
///     .with_max_depth(16)
///     .with_seed(7);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BuildOptions {
    /// Percentage of lines to sample, in `(0, 100]`. `100` reads every line.
    pub sample_percent: f64,
    /// Number of leading lines used to estimate the mean line length.
    pub estimate_lines: usize,
    /// Maximum object nesting depth.
    pub max_depth: usize,
    /// Seed for the sampler's RNG. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            sample_percent: 100.0,
            estimate_lines: DEFAULT_ESTIMATE_LINES,
            max_depth: DEFAULT_MAX_DEPTH,
            seed: None,
        }
    }
}

impl BuildOptions {
    /// Creates default options (full read, 1000 estimate lines, depth 64).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that sample `percent` of the input lines.
    #[must_use]
    pub fn sampled(percent: f64) -> Self {
        BuildOptions {
            sample_percent: percent,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_sample_percent(mut self, percent: f64) -> Self {
        self.sample_percent = percent;
        self
    }

    #[must_use]
    pub fn with_estimate_lines(mut self, lines: usize) -> Self {
        self.estimate_lines = lines;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Fixes the sampler's RNG seed so repeated builds draw the same sample.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns `true` if the sampler will be used instead of a full read.
    #[must_use]
    pub fn is_sampled(&self) -> bool {
        self.sample_percent < 100.0
    }

    /// Checks that every option is within range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSamplePercent`] if `sample_percent` is not in
    /// `(0, 100]`, and [`Error::Custom`] for a zero `estimate_lines` or
    /// `max_depth`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jtree::BuildOptions;
    ///
    /// assert!(BuildOptions::sampled(0.0).validate().is_err());
    /// assert!(BuildOptions::sampled(150.0).validate().is_err());
    /// assert!(BuildOptions::sampled(100.0).validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<()> {
        let p = self.sample_percent;
        if p.is_nan() || p <= 0.0 || p > 100.0 {
            return Err(Error::InvalidSamplePercent(p));
        }
        if self.estimate_lines == 0 {
            return Err(Error::custom("estimate_lines must be at least 1"));
        }
        if self.max_depth == 0 {
            return Err(Error::custom("max_depth must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = BuildOptions::default();
        assert_eq!(options.sample_percent, 100.0);
        assert_eq!(options.estimate_lines, DEFAULT_ESTIMATE_LINES);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(options.seed, None);
        assert!(!options.is_sampled());
    }

    #[test]
    fn test_invalid_percent() {
        for p in [0.0, -1.0, 100.5, f64::NAN] {
            let err = BuildOptions::sampled(p).validate().unwrap_err();
            assert!(matches!(err, Error::InvalidSamplePercent(_)));
        }
    }

    #[test]
    fn test_zero_limits_rejected() {
        assert!(BuildOptions::new().with_max_depth(0).validate().is_err());
        assert!(BuildOptions::new().with_estimate_lines(0).validate().is_err());
    }
}
