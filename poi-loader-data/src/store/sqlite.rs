//! SQLite persistence for points of interest.
//!
//! Rows are keyed by the upsert conflict key and written one batch per
//! transaction. Decimals are stored as text so their scale survives the round
//! trip; ratings are stored as a JSON array.

use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use poi_loader_core::{PoiField, PoiRow, PointOfInterest, UpsertConfig, UpsertSink};
use poi_loader_fs::ensure_parent_dir;
use rusqlite::types::Type;
use rusqlite::{Connection, Error as SqliteError, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use thiserror::Error;

/// Name of the table holding persisted points of interest.
pub const TABLE: &str = "points_of_interest";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS points_of_interest (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        external_id TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        category TEXT NOT NULL,
        longitude TEXT NOT NULL,
        latitude TEXT NOT NULL,
        ratings TEXT NOT NULL,
        average_rating TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
    CREATE INDEX IF NOT EXISTS points_of_interest_category
        ON points_of_interest (category);
";

const INSERT_COLUMNS: [PoiField; 7] = [
    PoiField::ExternalId,
    PoiField::Name,
    PoiField::Category,
    PoiField::Longitude,
    PoiField::Latitude,
    PoiField::Ratings,
    PoiField::AverageRating,
];

const SELECT_ROW: &str = "SELECT external_id, name, category, longitude, latitude, ratings, \
     average_rating FROM points_of_interest WHERE external_id = ?1";

/// Errors raised when persisting points of interest to SQLite.
#[derive(Debug, Error)]
pub enum PersistPoisError {
    /// Failed to create the parent directory for the database file.
    #[error("failed to create parent directory for {path}")]
    CreateDirectory {
        /// Database path whose parent could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}")]
    Open {
        /// Destination database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Creating the table or its index failed.
    #[error("failed to create points_of_interest schema")]
    CreateSchema {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Beginning the batch transaction failed.
    #[error("failed to begin upsert transaction")]
    BeginTransaction {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Preparing the upsert statement failed.
    #[error("failed to prepare upsert statement")]
    PrepareUpsert {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Serializing ratings to JSON failed.
    #[error("failed to serialize ratings for {external_id}")]
    SerializeRatings {
        /// Identifier of the record whose ratings failed to serialize.
        external_id: String,
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// Writing a row failed.
    #[error("failed to persist {external_id}")]
    PersistRow {
        /// Identifier of the record being persisted.
        external_id: String,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Committing the batch transaction failed.
    #[error("failed to commit upsert transaction")]
    Commit {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Reading rows back failed.
    #[error("failed to read from points_of_interest")]
    Read {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

/// Build the `INSERT ... ON CONFLICT ... DO UPDATE` statement for `config`.
fn upsert_statement(config: &UpsertConfig) -> String {
    let columns: Vec<&str> = INSERT_COLUMNS.iter().map(|field| field.column()).collect();
    let placeholders: Vec<String> = (1..=INSERT_COLUMNS.len()).map(|n| format!("?{n}")).collect();
    let assignments: Vec<String> = config
        .update_fields()
        .iter()
        .map(|field| format!("{column} = excluded.{column}", column = field.column()))
        .collect();
    format!(
        "INSERT INTO {TABLE} ({columns}) VALUES ({placeholders}) \
         ON CONFLICT({key}) DO UPDATE SET {assignments}",
        columns = columns.join(", "),
        placeholders = placeholders.join(", "),
        key = config.conflict_key().column(),
        assignments = assignments.join(", "),
    )
}

/// [`UpsertSink`] writing to a SQLite database.
///
/// # Examples
/// ```
/// use poi_loader_core::{PointOfInterest, UpsertConfig, UpsertSink};
/// use poi_loader_data::SqlitePoiSink;
/// use rust_decimal::Decimal;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut sink = SqlitePoiSink::open_in_memory(&UpsertConfig::default())?;
/// let poi = PointOfInterest::new("p1", "Cafe", "food", Decimal::ONE, Decimal::TWO, vec![4])?;
/// sink.upsert_batch(&[poi])?;
/// assert_eq!(sink.count()?, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SqlitePoiSink {
    connection: Connection,
    path: Option<Utf8PathBuf>,
    upsert_sql: String,
}

impl SqlitePoiSink {
    /// Open or create the database at `path`.
    ///
    /// Parent directories are created as needed and the schema is initialised
    /// if missing.
    ///
    /// # Errors
    /// Returns [`PersistPoisError`] when the directory, database or schema
    /// cannot be created.
    pub fn open(path: &Utf8Path, config: &UpsertConfig) -> Result<Self, PersistPoisError> {
        ensure_parent_dir(path).map_err(|source| PersistPoisError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        })?;
        let connection =
            Connection::open(path.as_std_path()).map_err(|source| PersistPoisError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Self::with_connection(connection, Some(path.to_path_buf()), config)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns [`PersistPoisError`] when SQLite cannot allocate the database.
    pub fn open_in_memory(config: &UpsertConfig) -> Result<Self, PersistPoisError> {
        let connection = Connection::open_in_memory().map_err(|source| PersistPoisError::Open {
            path: Utf8PathBuf::from(":memory:"),
            source,
        })?;
        Self::with_connection(connection, None, config)
    }

    fn with_connection(
        connection: Connection,
        path: Option<Utf8PathBuf>,
        config: &UpsertConfig,
    ) -> Result<Self, PersistPoisError> {
        connection
            .execute_batch(SCHEMA)
            .map_err(|source| PersistPoisError::CreateSchema { source })?;
        Ok(Self {
            connection,
            path,
            upsert_sql: upsert_statement(config),
        })
    }

    /// Location of the database file, or `None` when held in memory.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    /// Number of persisted rows.
    ///
    /// # Errors
    /// Returns [`PersistPoisError::Read`] when the query fails.
    pub fn count(&self) -> Result<u64, PersistPoisError> {
        self.connection
            .query_row(&format!("SELECT COUNT(*) FROM {TABLE}"), [], |row| row.get(0))
            .map_err(|source| PersistPoisError::Read { source })
    }

    /// Read the row stored for `external_id`, if any.
    ///
    /// # Errors
    /// Returns [`PersistPoisError::Read`] when the query fails or a stored
    /// value cannot be decoded.
    pub fn fetch(&self, external_id: &str) -> Result<Option<PoiRow>, PersistPoisError> {
        self.connection
            .query_row(SELECT_ROW, [external_id], decode_row)
            .optional()
            .map_err(|source| PersistPoisError::Read { source })
    }
}

fn decode_row(row: &Row<'_>) -> rusqlite::Result<PoiRow> {
    let ratings: String = row.get(5)?;
    Ok(PoiRow {
        external_id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        longitude: decimal_column(row, 3)?,
        latitude: decimal_column(row, 4)?,
        ratings: serde_json::from_str(&ratings).map_err(|err| {
            SqliteError::FromSqlConversionFailure(5, Type::Text, Box::new(err))
        })?,
        average_rating: decimal_column(row, 6)?,
    })
}

fn decimal_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(index)?;
    Decimal::from_str(&text)
        .map_err(|err| SqliteError::FromSqlConversionFailure(index, Type::Text, Box::new(err)))
}

impl UpsertSink for SqlitePoiSink {
    type Error = PersistPoisError;

    fn upsert_batch(&mut self, records: &[PointOfInterest]) -> Result<(), Self::Error> {
        let transaction = self
            .connection
            .transaction()
            .map_err(|source| PersistPoisError::BeginTransaction { source })?;
        {
            let mut statement = transaction
                .prepare_cached(&self.upsert_sql)
                .map_err(|source| PersistPoisError::PrepareUpsert { source })?;
            for poi in records {
                let ratings = serde_json::to_string(poi.ratings()).map_err(|source| {
                    PersistPoisError::SerializeRatings {
                        external_id: poi.external_id().to_owned(),
                        source,
                    }
                })?;
                statement
                    .execute(params![
                        poi.external_id(),
                        poi.name(),
                        poi.category(),
                        poi.longitude().to_string(),
                        poi.latitude().to_string(),
                        ratings,
                        poi.average_rating().to_string(),
                    ])
                    .map_err(|source| PersistPoisError::PersistRow {
                        external_id: poi.external_id().to_owned(),
                        source,
                    })?;
            }
        }
        transaction
            .commit()
            .map_err(|source| PersistPoisError::Commit { source })?;
        debug!("upserted {} rows into {TABLE}", records.len());
        Ok(())
    }
}
