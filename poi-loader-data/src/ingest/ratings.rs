//! Decoding of ratings embedded as text.
//!
//! A list with any token that is not a number decodes to an empty list, never
//! to a partial one.

/// Decode a brace-delimited list such as `{3,4,5}`.
///
/// Text without the surrounding braces yields no ratings.
pub(super) fn parse_braced(text: &str) -> Vec<f64> {
    text.strip_prefix('{')
        .and_then(|inner| inner.strip_suffix('}'))
        .map(parse_list)
        .unwrap_or_default()
}

/// Decode a comma-separated list such as `3,4,5`.
pub(super) fn parse_list(text: &str) -> Vec<f64> {
    text.split(',')
        .map(|token| token.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_default()
}
