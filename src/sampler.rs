//! Reading raw document lines, in full or as a random sample.
//!
//! ## Sampling
//!
//! [`sample_lines`] keeps memory bounded on files too large to load:
//!
//! 1. Read up to `estimate_lines` leading lines to estimate the mean line
//!    length in bytes.
//! 2. Seek to the end for the file size and estimate the line count as
//!    `size / mean`.
//! 3. Draw `floor(percent / 100 * size / mean)` distinct byte offsets in
//!    `[0, size)` and visit them in ascending order.
//! 4. At each offset, discard the (possibly partial) line under it and keep
//!    the next full line.
//!
//! The sample is offset-proportional, not uniform over lines: a line is
//! picked with probability proportional to the length of the line *before*
//! it, two offsets inside the same line return the same following line, and
//! the first line of the file is never picked. An offset inside the last
//! line yields nothing, and neither does one whose following line is blank;
//! such offsets are dropped and the sample comes back short, reported
//! through [`Event::ShortSample`].

use crate::observer::{tick, Event, Observer, Stage};
use crate::{BuildOptions, Error, Location, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{BufRead, Seek, SeekFrom};

/// Buffer size for file readers.
pub(crate) const READ_BUFFER: usize = 1 << 16;

/// One undecoded document line and where it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct RawLine {
    pub location: Location,
    pub text: String,
}

impl RawLine {
    /// Decodes `bytes` as UTF-8, dropping a trailing `\n` or `\r\n`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the bytes are not valid UTF-8.
    pub fn from_bytes(location: Location, mut bytes: Vec<u8>) -> Result<Self> {
        if bytes.last() == Some(&b'\n') {
            bytes.pop();
        }
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        let text = String::from_utf8(bytes).map_err(|_| Error::Encoding { location })?;
        Ok(RawLine { location, text })
    }

    /// Returns `true` if the line holds nothing but whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Loads the lines of `reader`, sampling when
/// `options.sample_percent < 100` and reading every line otherwise.
///
/// # Errors
///
/// Propagates I/O errors and invalid UTF-8.
pub fn load<R: BufRead + Seek>(
    reader: &mut R,
    options: &BuildOptions,
    observer: &dyn Observer,
) -> Result<Vec<RawLine>> {
    let lines = if options.is_sampled() {
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        sample_lines(
            reader,
            options.sample_percent,
            options.estimate_lines,
            &mut rng,
            observer,
        )?
    } else {
        read_lines(reader)?
    };

    observer.event(&Event::LinesRead {
        lines: lines.len(),
        sampled: options.is_sampled(),
    });
    Ok(lines)
}

/// Reads every line, numbering them from 1.
///
/// # Errors
///
/// Propagates I/O errors and invalid UTF-8.
///
/// # Examples
///
/// ```rust
/// use jtree::{sampler::read_lines, Location};
///
/// let lines = read_lines("{\"a\":1}\r\n{\"a\":2}".as_bytes()).unwrap();
/// assert_eq!(lines.len(), 2);
/// assert_eq!(lines[1].location, Location::Line(2));
/// assert_eq!(lines[0].text, "{\"a\":1}");
/// ```
pub fn read_lines<R: BufRead>(reader: R) -> Result<Vec<RawLine>> {
    reader
        .split(b'\n')
        .enumerate()
        .map(|(i, bytes)| RawLine::from_bytes(Location::Line(i + 1), bytes?))
        .collect()
}

/// Computes how many offsets to draw for a file of `file_size` bytes whose
/// lines average `mean_line_len` bytes.
///
/// # Examples
///
/// ```rust
/// use jtree::sampler::sample_size;
///
/// // 1000 lines of 10 bytes, 25% of them
/// assert_eq!(sample_size(25.0, 10_000, 10.0), 250);
/// assert_eq!(sample_size(0.001, 10_000, 10.0), 0);
/// ```
#[must_use]
pub fn sample_size(percent: f64, file_size: u64, mean_line_len: f64) -> usize {
    if file_size == 0 || mean_line_len <= 0.0 {
        return 0;
    }
    let estimate = (percent / 100.0) * (file_size as f64 / mean_line_len);
    (estimate.floor() as u64).min(file_size) as usize
}

/// Draws an offset-proportional random sample of lines from `reader`.
///
/// Lines are returned in file order and located by the byte offset at which
/// they start.
///
/// # Errors
///
/// Propagates I/O errors and invalid UTF-8.
pub fn sample_lines<R, G>(
    reader: &mut R,
    percent: f64,
    estimate_lines: usize,
    rng: &mut G,
    observer: &dyn Observer,
) -> Result<Vec<RawLine>>
where
    R: BufRead + Seek,
    G: Rng + ?Sized,
{
    reader.seek(SeekFrom::Start(0))?;

    let mut buf = Vec::new();
    let mut lines_seen = 0usize;
    let mut bytes_seen = 0u64;
    while lines_seen < estimate_lines {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            break;
        }
        lines_seen += 1;
        bytes_seen += n as u64;
    }
    if lines_seen == 0 {
        return Ok(Vec::new());
    }

    let mean_line_len = bytes_seen as f64 / lines_seen as f64;
    let file_size = reader.seek(SeekFrom::End(0))?;
    let target = sample_size(percent, file_size, mean_line_len);
    observer.event(&Event::SamplePlanned {
        file_size,
        mean_line_len,
        target,
    });
    if target == 0 {
        return Ok(Vec::new());
    }

    let span = usize::try_from(file_size)
        .map_err(|_| Error::custom("file is too large to sample on this platform"))?;
    let mut offsets = rand::seq::index::sample(rng, span, target).into_vec();
    offsets.sort_unstable();

    let mut sample = Vec::with_capacity(target);
    for (i, &offset) in offsets.iter().enumerate() {
        reader.seek(SeekFrom::Start(offset as u64))?;
        buf.clear();
        let skipped = reader.read_until(b'\n', &mut buf)?;
        let mut line = Vec::new();
        let n = reader.read_until(b'\n', &mut line)?;
        tick(observer, Stage::Sample, i + 1, target);
        if n == 0 {
            continue;
        }
        let location = Location::Offset(offset as u64 + skipped as u64);
        let line = RawLine::from_bytes(location, line)?;
        if line.is_blank() {
            continue;
        }
        sample.push(line);
    }

    if sample.len() < target {
        observer.event(&Event::ShortSample {
            requested: target,
            returned: sample.len(),
        });
    }
    Ok(sample)
}
