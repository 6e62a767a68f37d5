//! Durable sinks for validated points of interest.

mod sqlite;

pub use sqlite::{PersistPoisError, SqlitePoiSink, TABLE};
