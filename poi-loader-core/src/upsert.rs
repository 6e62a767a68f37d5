//! Idempotent persistence contract for points of interest.
//!
//! Sinks insert new records and update existing ones matched on a unique
//! conflict key. Which fields an update overwrites is described once by
//! [`UpsertConfig`] so every sink applies the same rule.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{PoiField, PointOfInterest};

/// Fields overwritten when an incoming record matches an existing one.
pub const DEFAULT_UPDATE_FIELDS: [PoiField; 5] = [
    PoiField::Name,
    PoiField::Category,
    PoiField::Latitude,
    PoiField::Longitude,
    PoiField::AverageRating,
];

/// Destination for batches of validated points of interest.
///
/// Implementations must apply a batch atomically: either every record in the
/// batch is written or the call fails and none are.
pub trait UpsertSink {
    /// Error raised when a batch cannot be written.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert new records and update existing ones, keyed by the conflict key.
    ///
    /// # Errors
    /// Returns the sink's error when the batch is rejected.
    fn upsert_batch(&mut self, records: &[PointOfInterest]) -> Result<(), Self::Error>;
}

/// Errors returned by [`UpsertConfig::new`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpsertConfigError {
    /// Stores cannot detect conflicts on a non-unique field.
    #[error("{field} is not unique and cannot be used as the conflict key")]
    NonUniqueConflictKey {
        /// Requested conflict key.
        field: PoiField,
    },
    /// The conflict key itself must never be overwritten.
    #[error("conflict key {field} cannot be an update field")]
    ConflictKeyUpdated {
        /// Field listed in both roles.
        field: PoiField,
    },
    /// A field appeared more than once in the update list.
    #[error("update field {field} is listed more than once")]
    DuplicateUpdateField {
        /// Repeated field.
        field: PoiField,
    },
    /// An update without fields would leave conflicts unresolved.
    #[error("at least one update field is required")]
    NoUpdateFields,
}

/// Conflict key and update field list shared by every sink.
///
/// # Examples
/// ```
/// use poi_loader_core::{PoiField, UpsertConfig};
///
/// let config = UpsertConfig::default();
/// assert_eq!(config.conflict_key(), PoiField::ExternalId);
/// assert!(config.updates(PoiField::AverageRating));
/// assert!(!config.updates(PoiField::Ratings));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertConfig {
    conflict_key: PoiField,
    update_fields: Vec<PoiField>,
}

impl UpsertConfig {
    /// Validate and build an upsert configuration.
    ///
    /// # Errors
    /// Returns [`UpsertConfigError`] when the conflict key is not unique, is
    /// also listed as an update field, or the update list is empty or
    /// repeats a field.
    pub fn new(
        conflict_key: PoiField,
        update_fields: impl IntoIterator<Item = PoiField>,
    ) -> Result<Self, UpsertConfigError> {
        if !conflict_key.is_unique() {
            return Err(UpsertConfigError::NonUniqueConflictKey {
                field: conflict_key,
            });
        }
        let mut fields: Vec<PoiField> = Vec::new();
        for field in update_fields {
            if field == conflict_key {
                return Err(UpsertConfigError::ConflictKeyUpdated { field });
            }
            if fields.contains(&field) {
                return Err(UpsertConfigError::DuplicateUpdateField { field });
            }
            fields.push(field);
        }
        if fields.is_empty() {
            return Err(UpsertConfigError::NoUpdateFields);
        }
        Ok(Self {
            conflict_key,
            update_fields: fields,
        })
    }

    /// Field used to detect existing records.
    #[must_use]
    pub const fn conflict_key(&self) -> PoiField {
        self.conflict_key
    }

    /// Fields overwritten on conflict, in declaration order.
    #[must_use]
    pub fn update_fields(&self) -> &[PoiField] {
        &self.update_fields
    }

    /// Whether `field` is overwritten on conflict.
    #[must_use]
    pub fn updates(&self, field: PoiField) -> bool {
        self.update_fields.contains(&field)
    }

    /// Overwrite the configured fields of `row` with values from `incoming`.
    pub fn apply(&self, row: &mut PoiRow, incoming: &PointOfInterest) {
        for field in &self.update_fields {
            match field {
                PoiField::ExternalId => incoming.external_id().clone_into(&mut row.external_id),
                PoiField::Name => incoming.name().clone_into(&mut row.name),
                PoiField::Category => incoming.category().clone_into(&mut row.category),
                PoiField::Longitude => row.longitude = incoming.longitude(),
                PoiField::Latitude => row.latitude = incoming.latitude(),
                PoiField::Ratings => incoming.ratings().clone_into(&mut row.ratings),
                PoiField::AverageRating => row.average_rating = incoming.average_rating(),
            }
        }
    }
}

impl Default for UpsertConfig {
    fn default() -> Self {
        Self {
            conflict_key: PoiField::ExternalId,
            update_fields: DEFAULT_UPDATE_FIELDS.to_vec(),
        }
    }
}

/// A persisted point of interest as a store holds it.
///
/// Unlike [`PointOfInterest`], a row may carry an average rating that no
/// longer matches its ratings: updates only touch the configured fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoiRow {
    /// Upstream identifier.
    pub external_id: String,
    /// Display name.
    pub name: String,
    /// Grouping category.
    pub category: String,
    /// Stored longitude.
    pub longitude: Decimal,
    /// Stored latitude.
    pub latitude: Decimal,
    /// Stored ratings.
    pub ratings: Vec<u16>,
    /// Stored average rating.
    pub average_rating: Decimal,
}

impl From<&PointOfInterest> for PoiRow {
    fn from(poi: &PointOfInterest) -> Self {
        Self {
            external_id: poi.external_id().to_owned(),
            name: poi.name().to_owned(),
            category: poi.category().to_owned(),
            longitude: poi.longitude(),
            latitude: poi.latitude(),
            ratings: poi.ratings().to_vec(),
            average_rating: poi.average_rating(),
        }
    }
}
