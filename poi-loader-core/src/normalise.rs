//! Conversion of raw parser output into validated points of interest.
//!
//! Validation is local: a record that fails is reported as a
//! [`SkippedRecord`] and callers carry on with the next one.

use std::fmt;
use std::path::PathBuf;

use log::debug;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use thiserror::Error;

use crate::{MAX_RATING, PoiField, PointOfInterest, PointOfInterestError, RawRecord, RawValue};
use crate::raw::parse_decimal;

/// Where a raw record came from, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLocator {
    /// Source file.
    pub file: PathBuf,
    /// 1-based position of the record within the file.
    pub position: usize,
    /// Raw content of the record, when the format has a readable rendering.
    pub excerpt: Option<String>,
}

impl fmt::Display for RecordLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.excerpt {
            Some(excerpt) => write!(f, "file={}: {excerpt}", self.file.display()),
            None => write!(f, "position={}; file={}", self.position, self.file.display()),
        }
    }
}

/// Why a raw record was not turned into a [`PointOfInterest`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RejectionReason {
    /// A required field was absent or falsy.
    #[error("missing {0}")]
    MissingField(PoiField),
    /// A coordinate could not be read as a decimal.
    #[error("invalid {field} value {value:?}")]
    InvalidCoordinate {
        /// Offending coordinate field.
        field: PoiField,
        /// Value as found in the source.
        value: String,
    },
    /// The canonical record rejected the values.
    #[error(transparent)]
    Invalid(#[from] PointOfInterestError),
}

/// A raw record that failed validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("skipping invalid record ({reason}), {locator}")]
pub struct SkippedRecord {
    /// Location of the rejected record.
    pub locator: RecordLocator,
    /// What was wrong with it.
    pub reason: RejectionReason,
}

/// Validate a raw record and build its canonical form.
///
/// All of `external_id`, `name`, `category`, `longitude` and `latitude` must
/// be present and truthy. Fractional ratings are truncated for storage and
/// averaged at full precision. A rating that is not finite, is negative, or
/// exceeds [`MAX_RATING`] discards the whole list, leaving it empty.
///
/// # Errors
/// Returns [`SkippedRecord`] describing the first failed check.
///
/// # Examples
/// ```
/// use std::path::PathBuf;
/// use poi_loader_core::{RawRecord, RawValue, RecordLocator, normalise};
///
/// let raw = RawRecord {
///     external_id: Some(RawValue::from("1")),
///     name: Some(RawValue::from("Museum")),
///     category: Some(RawValue::from("culture")),
///     longitude: Some(RawValue::from("13.4")),
///     latitude: Some(RawValue::from("52.5")),
///     ratings: vec![3.0, 4.0, 5.0],
/// };
/// let locator = RecordLocator { file: PathBuf::from("pois.csv"), position: 1, excerpt: None };
/// let poi = normalise(raw, &locator).expect("valid record");
/// assert_eq!(poi.average_rating().to_string(), "4.0");
/// ```
pub fn normalise(raw: RawRecord, locator: &RecordLocator) -> Result<PointOfInterest, SkippedRecord> {
    build(raw, locator).map_err(|reason| SkippedRecord {
        locator: locator.clone(),
        reason,
    })
}

fn build(raw: RawRecord, locator: &RecordLocator) -> Result<PointOfInterest, RejectionReason> {
    let RawRecord {
        external_id,
        name,
        category,
        longitude,
        latitude,
        ratings,
    } = raw;
    let external_id = require(external_id, PoiField::ExternalId)?;
    let name = require(name, PoiField::Name)?;
    let category = require(category, PoiField::Category)?;
    let longitude = require(longitude, PoiField::Longitude)?;
    let latitude = require(latitude, PoiField::Latitude)?;

    let longitude = coordinate(longitude, PoiField::Longitude)?;
    let latitude = coordinate(latitude, PoiField::Latitude)?;
    let ratings = rating_values(&ratings).unwrap_or_else(|| {
        debug!("Discarding ratings {ratings:?} outside 0..={MAX_RATING}, {locator}");
        Vec::new()
    });

    Ok(PointOfInterest::from_rating_values(
        external_id.into_text(),
        name.into_text(),
        category.into_text(),
        longitude,
        latitude,
        &ratings,
    )?)
}

fn require(value: Option<RawValue>, field: PoiField) -> Result<RawValue, RejectionReason> {
    value
        .filter(RawValue::is_truthy)
        .ok_or(RejectionReason::MissingField(field))
}

fn coordinate(value: RawValue, field: PoiField) -> Result<Decimal, RejectionReason> {
    let text = value.into_text();
    parse_decimal(&text).ok_or(RejectionReason::InvalidCoordinate { field, value: text })
}

fn rating_values(ratings: &[f64]) -> Option<Vec<Decimal>> {
    ratings.iter().copied().map(rating_value).collect()
}

fn rating_value(rating: f64) -> Option<Decimal> {
    let value = Decimal::from_f64(rating)?;
    let whole = value.trunc();
    let in_range = !value.is_sign_negative() || value.is_zero();
    (in_range && whole.to_u16().is_some_and(|whole| whole <= MAX_RATING)).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn locator() -> RecordLocator {
        RecordLocator {
            file: PathBuf::from("data/pois.xml"),
            position: 3,
            excerpt: None,
        }
    }

    #[fixture]
    fn complete() -> RawRecord {
        RawRecord {
            external_id: Some(RawValue::from("poi-1")),
            name: Some(RawValue::from("Old Town Hall")),
            category: Some(RawValue::from("landmark")),
            longitude: Some(RawValue::Number("13.404954".into())),
            latitude: Some(RawValue::from("52.520008")),
            ratings: vec![2.0, 4.0],
        }
    }

    #[rstest]
    fn builds_canonical_record(complete: RawRecord, locator: RecordLocator) {
        let poi = normalise(complete, &locator).expect("valid record");
        assert_eq!(poi.external_id(), "poi-1");
        assert_eq!(poi.name(), "Old Town Hall");
        assert_eq!(poi.category(), "landmark");
        assert_eq!(poi.longitude().to_string(), "13.40495400");
        assert_eq!(poi.latitude().to_string(), "52.52000800");
        assert_eq!(poi.ratings(), &[2, 4]);
        assert_eq!(poi.average_rating(), Decimal::new(30, 1));
    }

    #[rstest]
    #[case::external_id(PoiField::ExternalId)]
    #[case::name(PoiField::Name)]
    #[case::category(PoiField::Category)]
    #[case::longitude(PoiField::Longitude)]
    #[case::latitude(PoiField::Latitude)]
    fn rejects_each_missing_field(
        complete: RawRecord,
        locator: RecordLocator,
        #[case] field: PoiField,
    ) {
        let mut raw = complete;
        let slot = match field {
            PoiField::ExternalId => &mut raw.external_id,
            PoiField::Name => &mut raw.name,
            PoiField::Category => &mut raw.category,
            PoiField::Longitude => &mut raw.longitude,
            PoiField::Latitude => &mut raw.latitude,
            PoiField::Ratings | PoiField::AverageRating => panic!("not a required field"),
        };
        *slot = None;

        let skipped = normalise(raw, &locator).expect_err("missing field");
        assert_eq!(skipped.reason, RejectionReason::MissingField(field));
        assert_eq!(skipped.locator, locator);
    }

    #[rstest]
    fn treats_falsy_values_as_missing(complete: RawRecord, locator: RecordLocator) {
        let mut raw = complete;
        raw.name = Some(RawValue::from(""));
        raw.latitude = Some(RawValue::Number("0".into()));

        let skipped = normalise(raw, &locator).expect_err("falsy name");
        assert_eq!(skipped.reason, RejectionReason::MissingField(PoiField::Name));
    }

    #[rstest]
    fn rejects_non_decimal_coordinates(complete: RawRecord, locator: RecordLocator) {
        let mut raw = complete;
        raw.latitude = Some(RawValue::from("north"));

        let skipped = normalise(raw, &locator).expect_err("invalid latitude");
        assert_eq!(
            skipped.reason,
            RejectionReason::InvalidCoordinate {
                field: PoiField::Latitude,
                value: "north".into(),
            }
        );
    }

    #[rstest]
    #[case(vec![3.5, 4.0], &[3, 4], "3.8")]
    #[case(vec![1.5, 2.0], &[1, 2], "1.8")]
    #[case(vec![0.25], &[0], "0.2")]
    fn averages_fractional_ratings_at_full_precision(
        complete: RawRecord,
        locator: RecordLocator,
        #[case] ratings: Vec<f64>,
        #[case] stored: &[u16],
        #[case] average: &str,
    ) {
        let mut raw = complete;
        raw.ratings = ratings;

        let poi = normalise(raw, &locator).expect("record still valid");
        assert_eq!(poi.ratings(), stored);
        assert_eq!(poi.average_rating().to_string(), average);
    }

    #[rstest]
    #[case(vec![-1.0])]
    #[case(vec![40_000.0])]
    #[case(vec![f64::NAN])]
    fn discards_ratings_outside_small_integer_range(
        complete: RawRecord,
        locator: RecordLocator,
        #[case] ratings: Vec<f64>,
    ) {
        let mut raw = complete;
        raw.ratings = ratings;

        let poi = normalise(raw, &locator).expect("record still valid");
        assert!(poi.ratings().is_empty());
        assert_eq!(poi.average_rating(), Decimal::ZERO);
    }

    #[rstest]
    fn renders_locators_for_diagnostics(locator: RecordLocator) {
        assert_eq!(locator.to_string(), "position=3; file=data/pois.xml");
        let with_excerpt = RecordLocator {
            excerpt: Some("{\"id\": 1}".into()),
            ..locator
        };
        assert_eq!(with_excerpt.to_string(), "file=data/pois.xml: {\"id\": 1}");
    }
}
