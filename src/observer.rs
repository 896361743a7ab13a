//! Progress and diagnostic events.
//!
//! The pipeline never prints. Every stage reports what it is doing as an
//! [`Event`] to an [`Observer`] passed in by the caller. The default,
//! [`TracingObserver`], forwards events to `tracing`; [`NoopObserver`]
//! drops them.
//!
//! ## Examples
//!
//! ```rust
//! use jtree::{Event, Observer};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! #[derive(Default)]
//! struct CountNodes(AtomicUsize);
//!
//! impl Observer for CountNodes {
//!     fn event(&self, event: &Event<'_>) {
//!         if let Event::NodeBuilt { .. } = event {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//! }
//!
//! let counter = CountNodes::default();
//! let tree = jtree::from_reader_with_observer(
//!     "{\"a\": {\"b\": 1}}".as_bytes(),
//!     &jtree::BuildOptions::new(),
//!     &counter,
//! )
//! .unwrap();
//! assert_eq!(counter.0.load(Ordering::Relaxed), tree.iter().count());
//! ```

use tracing::{debug, info, trace, warn};

/// A pipeline stage, used to label progress events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Sample,
    Harvest,
    Normalize,
}

impl Stage {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Stage::Sample => "sample",
            Stage::Harvest => "harvest",
            Stage::Normalize => "normalize",
        }
    }
}

/// Something worth reporting during a build.
#[derive(Clone, Debug, PartialEq)]
pub enum Event<'a> {
    /// The sampler has estimated the file and fixed its sample size.
    SamplePlanned {
        file_size: u64,
        mean_line_len: f64,
        target: usize,
    },
    /// `done` of `total` units of a stage have been processed.
    Progress {
        stage: Stage,
        done: usize,
        total: usize,
    },
    /// Some sampled offsets fell in the last line, or before a blank line, and
    /// yielded nothing.
    ShortSample { requested: usize, returned: usize },
    /// Raw lines are in memory.
    LinesRead { lines: usize, sampled: bool },
    /// Every line has been parsed and its key paths harvested.
    DocumentsParsed { documents: usize, key_paths: usize },
    /// A separator candidate occurs inside a key segment.
    SeparatorRejected { candidate: char, segment: &'a str },
    SeparatorChosen { separator: char },
    /// The tabular store has been filled and reordered.
    Normalized { rows: usize, columns: usize },
    /// A tree node has been constructed.
    NodeBuilt {
        absolute_path: &'a [String],
        direct_keys: usize,
        branch_keys: usize,
    },
    /// The whole tree is built.
    Finished { nodes: usize },
}

/// A fire-and-forget sink for build events.
pub trait Observer {
    fn event(&self, event: &Event<'_>);
}

/// Forwards events to the `tracing` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn event(&self, event: &Event<'_>) {
        match event {
            Event::SamplePlanned {
                file_size,
                mean_line_len,
                target,
            } => info!(
                file_size,
                mean_line_len,
                sample_size = *target,
                "sampling lines from file"
            ),
            Event::Progress { stage, done, total } => {
                trace!(stage = stage.as_str(), done, total, "progress")
            }
            Event::ShortSample {
                requested,
                returned,
            } => warn!(requested, returned, "sample is short: some offsets yielded no document line"),
            Event::LinesRead { lines, sampled } => info!(lines, sampled, "raw data loaded"),
            Event::DocumentsParsed {
                documents,
                key_paths,
            } => info!(documents, key_paths, "documents parsed"),
            Event::SeparatorRejected { candidate, segment } => {
                debug!(%candidate, segment, "separator candidate occurs in key")
            }
            Event::SeparatorChosen { separator } => info!(%separator, "separator selected"),
            Event::Normalized { rows, columns } => info!(rows, columns, "store normalized"),
            Event::NodeBuilt {
                absolute_path,
                direct_keys,
                branch_keys,
            } => debug!(
                path = ?absolute_path,
                direct_keys, branch_keys, "node built"
            ),
            Event::Finished { nodes } => info!(nodes, "build finished"),
        }
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn event(&self, _event: &Event<'_>) {}
}

/// Reports progress roughly every tenth of `total`, plus the final unit.
pub(crate) fn tick(observer: &dyn Observer, stage: Stage, done: usize, total: usize) {
    let step = (total / 10).max(1);
    if done % step == 0 || done == total {
        observer.event(&Event::Progress { stage, done, total });
    }
}
