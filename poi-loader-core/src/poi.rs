use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

/// Number of fractional digits kept for coordinates.
pub const COORDINATE_SCALE: u32 = 8;
/// Total number of digits a coordinate may carry.
pub const COORDINATE_MAX_DIGITS: u32 = 19;
/// Number of fractional digits kept for the average rating.
pub const RATING_SCALE: u32 = 1;
/// Largest rating a store can hold as a positive small integer.
pub const MAX_RATING: u16 = 32_767;

/// Fields persisted for every point of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoiField {
    /// Identifier assigned by the upstream data source.
    ExternalId,
    /// Display name.
    Name,
    /// Grouping category.
    Category,
    /// WGS84 longitude.
    Longitude,
    /// WGS84 latitude.
    Latitude,
    /// Individual ratings.
    Ratings,
    /// Mean of the ratings.
    AverageRating,
}

impl PoiField {
    /// Column name used by stores and diagnostics.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::ExternalId => "external_id",
            Self::Name => "name",
            Self::Category => "category",
            Self::Longitude => "longitude",
            Self::Latitude => "latitude",
            Self::Ratings => "ratings",
            Self::AverageRating => "average_rating",
        }
    }

    /// Whether stores enforce uniqueness for this field.
    #[must_use]
    pub const fn is_unique(self) -> bool {
        matches!(self, Self::ExternalId)
    }
}

impl fmt::Display for PoiField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Errors returned by [`PointOfInterest::new`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PointOfInterestError {
    /// A required text field was empty.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Field that was empty.
        field: PoiField,
    },
    /// A coordinate does not fit the fixed decimal precision.
    #[error("{field} value {value} does not fit {COORDINATE_MAX_DIGITS} digits")]
    CoordinateOutOfRange {
        /// Coordinate field that overflowed.
        field: PoiField,
        /// Value after rounding.
        value: Decimal,
    },
    /// A rating does not fit a non-negative small integer.
    #[error("rating {value} is outside 0..={MAX_RATING}")]
    RatingOutOfRange {
        /// Rating as supplied.
        value: Decimal,
    },
}

/// A validated point of interest ready for persistence.
///
/// Coordinates are held at a fixed scale of eight fractional digits and the
/// average rating is derived from the ratings when the value is built, so the
/// two can never disagree. Fractional ratings are truncated for storage but
/// still count at full precision towards the average.
///
/// # Examples
/// ```
/// use rust_decimal::Decimal;
/// use poi_loader_core::PointOfInterest;
///
/// # fn main() -> Result<(), poi_loader_core::PointOfInterestError> {
/// let poi = PointOfInterest::new(
///     "42",
///     "Museum",
///     "culture",
///     Decimal::new(13_404_954, 6),
///     Decimal::new(52_520_008, 6),
///     vec![3, 4, 5],
/// )?;
/// assert_eq!(poi.average_rating(), Decimal::new(40, 1));
/// assert_eq!(poi.longitude().to_string(), "13.40495400");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointOfInterest {
    external_id: String,
    name: String,
    category: String,
    longitude: Decimal,
    latitude: Decimal,
    ratings: Vec<u16>,
    average_rating: Decimal,
}

impl PointOfInterest {
    /// Validates and constructs a [`PointOfInterest`].
    ///
    /// # Errors
    /// Returns [`PointOfInterestError`] when a text field is empty or a
    /// coordinate exceeds the fixed precision.
    pub fn new(
        external_id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        longitude: Decimal,
        latitude: Decimal,
        ratings: Vec<u16>,
    ) -> Result<Self, PointOfInterestError> {
        let average_rating = average_rating(&ratings);
        Self::build(
            external_id.into(),
            name.into(),
            category.into(),
            (longitude, latitude),
            ratings,
            average_rating,
        )
    }

    /// Constructs a [`PointOfInterest`] from ratings as measured at the source.
    ///
    /// Each rating is truncated towards zero for storage; the average is the
    /// mean of the values as given.
    ///
    /// # Errors
    /// Returns [`PointOfInterestError`] when a text field is empty, a
    /// coordinate exceeds the fixed precision, or a rating is negative or
    /// above [`MAX_RATING`].
    ///
    /// # Examples
    /// ```
    /// use rust_decimal::Decimal;
    /// use poi_loader_core::PointOfInterest;
    ///
    /// # fn main() -> Result<(), poi_loader_core::PointOfInterestError> {
    /// let poi = PointOfInterest::from_rating_values(
    ///     "42",
    ///     "Museum",
    ///     "culture",
    ///     Decimal::ONE,
    ///     Decimal::TWO,
    ///     &[Decimal::new(35, 1), Decimal::from(4)],
    /// )?;
    /// assert_eq!(poi.ratings(), &[3, 4]);
    /// assert_eq!(poi.average_rating().to_string(), "3.8");
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_rating_values(
        external_id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        longitude: Decimal,
        latitude: Decimal,
        values: &[Decimal],
    ) -> Result<Self, PointOfInterestError> {
        let ratings = values
            .iter()
            .map(|value| stored_rating(*value))
            .collect::<Result<Vec<_>, _>>()?;
        Self::build(
            external_id.into(),
            name.into(),
            category.into(),
            (longitude, latitude),
            ratings,
            average_rating(values),
        )
    }

    fn build(
        external_id: String,
        name: String,
        category: String,
        (longitude, latitude): (Decimal, Decimal),
        ratings: Vec<u16>,
        average_rating: Decimal,
    ) -> Result<Self, PointOfInterestError> {
        let external_id = non_empty(external_id, PoiField::ExternalId)?;
        let name = non_empty(name, PoiField::Name)?;
        let category = non_empty(category, PoiField::Category)?;
        let longitude = fixed_coordinate(longitude, PoiField::Longitude)?;
        let latitude = fixed_coordinate(latitude, PoiField::Latitude)?;
        Ok(Self {
            external_id,
            name,
            category,
            longitude,
            latitude,
            ratings,
            average_rating,
        })
    }

    /// Identifier assigned by the upstream data source.
    #[must_use]
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Grouping category.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Longitude at eight fractional digits.
    #[must_use]
    pub const fn longitude(&self) -> Decimal {
        self.longitude
    }

    /// Latitude at eight fractional digits.
    #[must_use]
    pub const fn latitude(&self) -> Decimal {
        self.latitude
    }

    /// Individual ratings in source order.
    #[must_use]
    pub fn ratings(&self) -> &[u16] {
        &self.ratings
    }

    /// Mean rating at one fractional digit.
    #[must_use]
    pub const fn average_rating(&self) -> Decimal {
        self.average_rating
    }
}

/// Arithmetic mean of `ratings`, rounded half-to-even to one fractional digit.
///
/// An empty slice yields `0.0`.
///
/// # Examples
/// ```
/// use rust_decimal::Decimal;
/// use poi_loader_core::average_rating;
///
/// assert_eq!(average_rating(&[2_u16, 3]), Decimal::new(25, 1));
/// assert_eq!(average_rating(&[Decimal::new(35, 1), Decimal::from(4)]).to_string(), "3.8");
/// assert_eq!(average_rating::<u16>(&[]).to_string(), "0.0");
/// ```
#[must_use]
pub fn average_rating<T: Copy + Into<Decimal>>(ratings: &[T]) -> Decimal {
    if ratings.is_empty() {
        return Decimal::new(0, RATING_SCALE);
    }
    let total: Decimal = ratings.iter().map(|rating| Into::<Decimal>::into(*rating)).sum();
    let mean = total / Decimal::from(ratings.len());
    let mut rounded = mean.round_dp(RATING_SCALE);
    rounded.rescale(RATING_SCALE);
    rounded
}

fn stored_rating(value: Decimal) -> Result<u16, PointOfInterestError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(PointOfInterestError::RatingOutOfRange { value });
    }
    value
        .trunc()
        .to_u16()
        .filter(|rating| *rating <= MAX_RATING)
        .ok_or(PointOfInterestError::RatingOutOfRange { value })
}

fn non_empty(value: String, field: PoiField) -> Result<String, PointOfInterestError> {
    if value.is_empty() {
        Err(PointOfInterestError::EmptyField { field })
    } else {
        Ok(value)
    }
}

fn fixed_coordinate(value: Decimal, field: PoiField) -> Result<Decimal, PointOfInterestError> {
    let mut rounded = value.round_dp(COORDINATE_SCALE);
    let limit = Decimal::from(10_u64.pow(COORDINATE_MAX_DIGITS - COORDINATE_SCALE));
    if rounded.abs() >= limit {
        return Err(PointOfInterestError::CoordinateOutOfRange {
            field,
            value: rounded,
        });
    }
    rounded.rescale(COORDINATE_SCALE);
    Ok(rounded)
}
