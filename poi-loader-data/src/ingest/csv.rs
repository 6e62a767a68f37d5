//! CSV decoding.
//!
//! The first row names the columns. Rows may be shorter or longer than the
//! header; missing cells read as absent fields.

use std::io::Read;

use camino::Utf8Path;
use csv::{ReaderBuilder, StringRecord};
use poi_loader_core::{RawRecord, RawValue};

use super::{ParseError, ParsedRecord, ratings};

const ID: &str = "poi_id";
const NAME: &str = "poi_name";
const CATEGORY: &str = "poi_category";
const LATITUDE: &str = "poi_latitude";
const LONGITUDE: &str = "poi_longitude";
const RATINGS: &str = "poi_ratings";

/// Column indices resolved once from the header row.
///
/// Duplicate headers resolve to the right-most column.
#[derive(Debug)]
struct Columns {
    headers: StringRecord,
    id: Option<usize>,
    name: Option<usize>,
    category: Option<usize>,
    latitude: Option<usize>,
    longitude: Option<usize>,
    ratings: Option<usize>,
}

impl Columns {
    fn new(headers: StringRecord) -> Self {
        let find = |column: &str| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, header)| *header == column)
                .map(|(index, _)| index)
                .last()
        };
        Self {
            id: find(ID),
            name: find(NAME),
            category: find(CATEGORY),
            latitude: find(LATITUDE),
            longitude: find(LONGITUDE),
            ratings: find(RATINGS),
            headers,
        }
    }

    fn text(row: &StringRecord, index: Option<usize>) -> Option<RawValue> {
        index.and_then(|i| row.get(i)).map(RawValue::from)
    }

    fn record(&self, row: &StringRecord) -> RawRecord {
        RawRecord {
            external_id: Self::text(row, self.id),
            name: Self::text(row, self.name),
            category: Self::text(row, self.category),
            longitude: Self::text(row, self.longitude),
            latitude: Self::text(row, self.latitude),
            ratings: self
                .ratings
                .and_then(|i| row.get(i))
                .map(|cell| ratings::parse_braced(cell.trim()))
                .unwrap_or_default(),
        }
    }

    fn excerpt(&self, row: &StringRecord) -> String {
        let pairs: Vec<String> = self
            .headers
            .iter()
            .zip(row.iter())
            .map(|(header, value)| format!("{header:?}: {value:?}"))
            .collect();
        format!("{{{}}}", pairs.join(", "))
    }
}

pub(super) fn parse<R: Read>(path: &Utf8Path, reader: R) -> Result<Vec<ParsedRecord>, ParseError> {
    let to_error = |source| ParseError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut csv = ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns::new(csv.headers().map_err(to_error)?.clone());

    let mut records = Vec::new();
    for (index, row) in csv.records().enumerate() {
        let row = row.map_err(to_error)?;
        records.push(ParsedRecord {
            position: index + 1,
            excerpt: Some(columns.excerpt(&row)),
            raw: columns.record(&row),
        });
    }
    Ok(records)
}
