//! File ingestion and persistence for the point of interest loader.
//!
//! Responsibilities:
//! - Resolve user-supplied paths into supported source files.
//! - Decode CSV, JSON and XML sources into raw records.
//! - Drive validation and batching, and persist through SQLite.
//!
//! Boundaries:
//! - Do not encode domain rules (live in `poi-loader-core`).
//! - All I/O is blocking and sequential.
//!
//! Invariants:
//! - A run either completes or stops at the first file or sink failure.
//! - No global mutable state.

#![forbid(unsafe_code)]

pub mod discover;
pub mod ingest;
pub mod load;
pub mod store;

pub use discover::resolve_paths;
pub use ingest::{ParseError, ParsedRecord, SourceFormat, parse_file};
pub use load::{LoadError, LoadSummary, load_files, load_points_of_interest};
pub use store::{PersistPoisError, SqlitePoiSink};
