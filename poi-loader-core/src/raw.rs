use std::str::FromStr;

use rust_decimal::Decimal;

/// A scalar value decoded from a source file before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// Text as it appeared in the source.
    Text(String),
    /// A numeric literal, kept in its textual form.
    Number(String),
    /// A boolean literal.
    Bool(bool),
}

impl RawValue {
    /// Whether the value counts as present for required-field checks.
    ///
    /// Empty text, numeric zero and `false` are not truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Text(text) => !text.is_empty(),
            Self::Number(literal) => parse_decimal(literal).is_none_or(|value| !value.is_zero()),
            Self::Bool(flag) => *flag,
        }
    }

    /// Textual form used once the value becomes a canonical field.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) | Self::Number(text) => text,
            Self::Bool(flag) => flag.to_string(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Field values extracted by a format parser, aligned on the canonical names.
///
/// Absent fields are `None`; `ratings` has already been decoded and is empty
/// when the source had none or they were malformed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    /// Upstream identifier.
    pub external_id: Option<RawValue>,
    /// Display name.
    pub name: Option<RawValue>,
    /// Grouping category.
    pub category: Option<RawValue>,
    /// Longitude in its source form.
    pub longitude: Option<RawValue>,
    /// Latitude in its source form.
    pub latitude: Option<RawValue>,
    /// Decoded ratings.
    pub ratings: Vec<f64>,
}

/// Parse a decimal literal, accepting surrounding whitespace and exponents.
///
/// # Examples
/// ```
/// use rust_decimal::Decimal;
/// use poi_loader_core::parse_decimal;
///
/// assert_eq!(parse_decimal(" 52.5 "), Some(Decimal::new(525, 1)));
/// assert_eq!(parse_decimal("1e-2"), Some(Decimal::new(1, 2)));
/// assert_eq!(parse_decimal("north"), None);
/// ```
#[must_use]
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}
