//! End-to-end loading of point of interest files into a sink.
//!
//! The run resolves paths, parses every file, validates each record and
//! writes the accepted records in fixed-size batches. Invalid records are
//! logged and counted; unreadable files and sink failures stop the run.

use std::fmt;
use std::num::NonZeroUsize;

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use poi_loader_core::{UpsertSink, batches};
use thiserror::Error;

use crate::{ParseError, parse_file, resolve_paths};

mod accumulator;

use accumulator::RecordAccumulator;

/// Counters describing a completed load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Files parsed.
    pub files: usize,
    /// Valid records handed to the sink, duplicates included.
    pub loaded: usize,
    /// Records rejected during validation.
    pub skipped: usize,
    /// Batches written.
    pub batches: usize,
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loaded {} Point of Interests (skipped {})",
            self.loaded, self.skipped
        )
    }
}

/// Errors that abort a load.
#[derive(Debug, Error)]
pub enum LoadError<E>
where
    E: std::error::Error + 'static,
{
    /// Path resolution produced no file with a supported extension.
    #[error("No supported files found")]
    NoSupportedFiles,
    /// A file could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The sink rejected a batch.
    #[error("failed to upsert batch {batch}")]
    Upsert {
        /// Zero-based index of the failed batch.
        batch: usize,
        /// Error reported by the sink.
        #[source]
        source: E,
    },
}

/// Load every supported file under `paths` into `sink`.
///
/// Records are written in input order, `batch_size` at a time. Batches
/// written before a failure stay committed.
///
/// # Errors
/// Returns [`LoadError::NoSupportedFiles`] before touching the sink when no
/// file resolves, [`LoadError::Parse`] when a file is unreadable or
/// malformed, and [`LoadError::Upsert`] when the sink fails.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use camino::Utf8PathBuf;
/// use poi_loader_core::UpsertConfig;
/// use poi_loader_data::{LoadError, SqlitePoiSink, load_points_of_interest};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut sink = SqlitePoiSink::open_in_memory(&UpsertConfig::default())?;
/// let paths = [Utf8PathBuf::from("missing.csv")];
/// let outcome = load_points_of_interest(&paths, NonZeroUsize::MIN, &mut sink);
/// assert!(matches!(outcome, Err(LoadError::NoSupportedFiles)));
/// # Ok(())
/// # }
/// ```
pub fn load_points_of_interest<P, S>(
    paths: &[P],
    batch_size: NonZeroUsize,
    sink: &mut S,
) -> Result<LoadSummary, LoadError<S::Error>>
where
    P: AsRef<Utf8Path>,
    S: UpsertSink,
{
    load_files(&resolve_paths(paths), batch_size, sink)
}

/// Load already resolved `files` into `sink`.
///
/// Callers that need to know the file list before preparing a sink resolve
/// it with [`resolve_paths`] and hand it over here.
///
/// # Errors
/// Returns [`LoadError::NoSupportedFiles`] before touching the sink when
/// `files` is empty, otherwise as [`load_points_of_interest`].
pub fn load_files<S>(
    files: &[Utf8PathBuf],
    batch_size: NonZeroUsize,
    sink: &mut S,
) -> Result<LoadSummary, LoadError<S::Error>>
where
    S: UpsertSink,
{
    if files.is_empty() {
        return Err(LoadError::NoSupportedFiles);
    }

    let mut accumulator = RecordAccumulator::default();
    for file in files {
        let parsed = parse_file(file)?;
        accumulator.process_file(file, parsed);
    }
    let (records, mut summary) = accumulator.finish();

    for (batch, chunk) in batches(&records, batch_size).enumerate() {
        sink.upsert_batch(chunk)
            .map_err(|source| LoadError::Upsert { batch, source })?;
        summary.batches += 1;
        debug!("wrote batch {batch} with {} records", chunk.len());
    }
    Ok(summary)
}
