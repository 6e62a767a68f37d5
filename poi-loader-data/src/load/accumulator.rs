//! Internal accumulator for the load pipeline.
//!
//! Validates parsed records file by file, keeping the accepted ones in input
//! order and counting the rejects for the run summary.
use camino::Utf8Path;
use log::{info, warn};
use poi_loader_core::{PointOfInterest, RecordLocator, normalise};

use super::LoadSummary;
use crate::ParsedRecord;

#[derive(Debug, Default)]
pub(super) struct RecordAccumulator {
    summary: LoadSummary,
    records: Vec<PointOfInterest>,
}

impl RecordAccumulator {
    pub(super) fn process_file(&mut self, file: &Utf8Path, parsed: Vec<ParsedRecord>) {
        self.summary.files += 1;
        let total = parsed.len();
        let skipped_before = self.summary.skipped;
        for record in parsed {
            self.process_record(file, record);
        }
        info!(
            "read {total} records from {file} (skipped {})",
            self.summary.skipped - skipped_before
        );
    }

    fn process_record(&mut self, file: &Utf8Path, record: ParsedRecord) {
        let locator = RecordLocator {
            file: file.as_std_path().to_path_buf(),
            position: record.position,
            excerpt: record.excerpt,
        };
        match normalise(record.raw, &locator) {
            Ok(poi) => {
                self.summary.loaded += 1;
                self.records.push(poi);
            }
            Err(skipped) => {
                self.summary.skipped += 1;
                warn!(
                    "Skipping invalid record ({}), {}",
                    skipped.reason, skipped.locator
                );
            }
        }
    }

    pub(super) fn finish(self) -> (Vec<PointOfInterest>, LoadSummary) {
        (self.records, self.summary)
    }
}
