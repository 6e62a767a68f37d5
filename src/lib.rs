//! Facade crate for the point of interest loader.
//!
//! This crate re-exports the core domain types together with the file
//! ingestion pipeline and the SQLite sink.

#![forbid(unsafe_code)]

pub use poi_loader_core::{
    DEFAULT_BATCH_SIZE, PoiField, PoiRow, PointOfInterest, PointOfInterestError, RawRecord,
    RawValue, RecordLocator, RejectionReason, SkippedRecord, UpsertConfig, UpsertConfigError,
    UpsertSink, average_rating, batches, normalise,
};

pub use poi_loader_data::{
    LoadError, LoadSummary, ParseError, ParsedRecord, PersistPoisError, SourceFormat,
    SqlitePoiSink, load_files, load_points_of_interest, parse_file, resolve_paths,
};

#[cfg(feature = "test-support")]
pub use poi_loader_core::test_support;
