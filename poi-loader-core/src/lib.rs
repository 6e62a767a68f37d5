//! Core domain types for the point of interest loader.
//!
//! Parsers hand over [`RawRecord`] values; [`normalise`] validates them into
//! [`PointOfInterest`] records, which are split with [`batches`] and written
//! through an [`UpsertSink`]. Constructors return `Result` so invalid input
//! surfaces before anything reaches a store.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod batch;
pub mod normalise;
mod poi;
mod raw;
pub mod upsert;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use batch::{DEFAULT_BATCH_SIZE, batches};
pub use normalise::{RecordLocator, RejectionReason, SkippedRecord, normalise};
pub use poi::{
    COORDINATE_MAX_DIGITS, COORDINATE_SCALE, MAX_RATING, PoiField, PointOfInterest,
    PointOfInterestError, RATING_SCALE, average_rating,
};
pub use raw::{RawRecord, RawValue, parse_decimal};
pub use upsert::{DEFAULT_UPDATE_FIELDS, PoiRow, UpsertConfig, UpsertConfigError, UpsertSink};
