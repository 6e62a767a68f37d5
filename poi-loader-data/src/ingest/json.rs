//! JSON decoding.

use std::io::Read;

use camino::Utf8Path;
use poi_loader_core::{RawRecord, RawValue};
use serde_json::{Map, Value};

use super::{ParseError, ParsedRecord};

pub(super) fn parse<R: Read>(path: &Utf8Path, mut reader: R) -> Result<Vec<ParsedRecord>, ParseError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|source| ParseError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let document: Value = serde_json::from_str(&text).map_err(|source| ParseError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let Value::Array(items) = document else {
        return Err(ParseError::NotAnArray {
            path: path.to_path_buf(),
        });
    };

    Ok(items
        .into_iter()
        .enumerate()
        .map(|(index, item)| ParsedRecord {
            position: index + 1,
            excerpt: Some(item.to_string()),
            raw: item.as_object().map(record).unwrap_or_default(),
        })
        .collect())
}

fn record(item: &Map<String, Value>) -> RawRecord {
    let coordinates = item.get("coordinates").and_then(Value::as_object);
    let coordinate = |key: &str| coordinates.and_then(|object| object.get(key)).and_then(scalar);
    RawRecord {
        external_id: item.get("id").and_then(scalar),
        name: item.get("name").and_then(scalar),
        category: item.get("category").and_then(scalar),
        longitude: coordinate("longitude"),
        latitude: coordinate("latitude"),
        ratings: item.get("ratings").map(ratings).unwrap_or_default(),
    }
}

fn scalar(value: &Value) -> Option<RawValue> {
    match value {
        Value::String(text) => Some(RawValue::Text(text.clone())),
        Value::Number(number) => Some(RawValue::Number(number.to_string())),
        Value::Bool(flag) => Some(RawValue::Bool(*flag)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Ratings must be an array of numbers; anything else yields no ratings.
fn ratings(value: &Value) -> Vec<f64> {
    value
        .as_array()
        .and_then(|items| items.iter().map(Value::as_f64).collect::<Option<Vec<_>>>())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse_text(text: &str) -> Result<Vec<ParsedRecord>, ParseError> {
        parse(Utf8Path::new("pois.json"), text.as_bytes())
    }

    fn first(text: &str) -> ParsedRecord {
        parse_text(text)
            .expect("valid JSON")
            .into_iter()
            .next()
            .expect("at least one record")
    }

    #[rstest]
    fn decodes_nested_fields() {
        let record = first(
            r#"[{"id": 7, "name": "Cafe", "category": "food",
                 "coordinates": {"latitude": 52.5, "longitude": "13.4"},
                 "ratings": [3, 4, 5]}]"#,
        )
        .raw;
        assert_eq!(record.external_id, Some(RawValue::Number("7".to_owned())));
        assert_eq!(record.name, Some(RawValue::from("Cafe")));
        assert_eq!(record.category, Some(RawValue::from("food")));
        assert_eq!(record.latitude, Some(RawValue::Number("52.5".to_owned())));
        assert_eq!(record.longitude, Some(RawValue::from("13.4")));
        assert_eq!(record.ratings, vec![3.0, 4.0, 5.0]);
    }

    #[rstest]
    #[case(r#"[{"id": "a", "coordinates": null}]"#)]
    #[case(r#"[{"id": "a", "coordinates": [1, 2]}]"#)]
    #[case(r#"[{"id": "a"}]"#)]
    fn absent_coordinates(#[case] text: &str) {
        let record = first(text).raw;
        assert_eq!(record.latitude, None);
        assert_eq!(record.longitude, None);
    }

    #[rstest]
    #[case(r#"[{"ratings": [3, "x"]}]"#)]
    #[case(r#"[{"ratings": "3,4"}]"#)]
    #[case(r#"[{"ratings": null}]"#)]
    fn malformed_ratings_are_empty(#[case] text: &str) {
        assert!(first(text).raw.ratings.is_empty());
    }

    #[rstest]
    #[case("null")]
    #[case("[1, 2]")]
    #[case(r#"{"a": 1}"#)]
    fn compound_scalars_are_absent(#[case] id: &str) {
        let record = first(&format!(r#"[{{"id": {id}}}]"#)).raw;
        assert_eq!(record.external_id, None);
    }

    #[rstest]
    fn non_object_elements_have_no_fields() {
        let record = first(r#"["just text"]"#);
        assert_eq!(record.raw, RawRecord::default());
        assert_eq!(record.excerpt.as_deref(), Some(r#""just text""#));
    }

    #[rstest]
    fn booleans_are_kept() {
        let record = first(r#"[{"name": false}]"#).raw;
        assert_eq!(record.name, Some(RawValue::Bool(false)));
    }

    #[rstest]
    fn rejects_non_array_documents() {
        let err = parse_text(r#"{"id": 1}"#).expect_err("not an array");
        assert!(matches!(err, ParseError::NotAnArray { .. }));
    }

    #[rstest]
    fn rejects_malformed_documents() {
        let err = parse_text("[{").expect_err("malformed");
        assert!(matches!(err, ParseError::Json { .. }));
    }

    #[rstest]
    fn empty_arrays_have_no_records() {
        assert!(parse_text("[]").expect("valid JSON").is_empty());
    }
}
