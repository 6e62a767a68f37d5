//! Test-only, in-memory `UpsertSink` implementation used by unit and
//! behaviour tests.

use thiserror::Error;

use crate::{PointOfInterest, PoiRow, UpsertConfig, UpsertSink};

/// Failure injected into a [`MemorySink`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("batch {batch} rejected by memory sink")]
pub struct MemorySinkError {
    /// Zero-based index of the rejected batch.
    pub batch: usize,
}

/// In-memory `UpsertSink` that keeps rows in insertion order.
///
/// Lookups are linear and the sink is intended only for small datasets.
#[derive(Debug, Default)]
pub struct MemorySink {
    config: UpsertConfig,
    rows: Vec<PoiRow>,
    batch_sizes: Vec<usize>,
    fail_on_batch: Option<usize>,
}

impl MemorySink {
    /// Create an empty sink using `config` for conflicts.
    #[must_use]
    pub fn with_config(config: UpsertConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Reject the batch at the given zero-based index.
    #[must_use]
    pub fn failing_on_batch(mut self, batch: usize) -> Self {
        self.fail_on_batch = Some(batch);
        self
    }

    /// Persisted rows in first-insertion order.
    #[must_use]
    pub fn rows(&self) -> &[PoiRow] {
        &self.rows
    }

    /// Look up a row by external identifier.
    #[must_use]
    pub fn row(&self, external_id: &str) -> Option<&PoiRow> {
        self.rows.iter().find(|row| row.external_id == external_id)
    }

    /// Sizes of the batches applied so far.
    #[must_use]
    pub fn batch_sizes(&self) -> &[usize] {
        &self.batch_sizes
    }
}

impl UpsertSink for MemorySink {
    type Error = MemorySinkError;

    fn upsert_batch(&mut self, records: &[PointOfInterest]) -> Result<(), Self::Error> {
        let batch = self.batch_sizes.len();
        if self.fail_on_batch == Some(batch) {
            return Err(MemorySinkError { batch });
        }
        for record in records {
            let existing = self
                .rows
                .iter()
                .position(|row| row.external_id == record.external_id());
            match existing.and_then(|index| self.rows.get_mut(index)) {
                Some(row) => self.config.apply(row, record),
                None => self.rows.push(PoiRow::from(record)),
            }
        }
        self.batch_sizes.push(records.len());
        Ok(())
    }
}
