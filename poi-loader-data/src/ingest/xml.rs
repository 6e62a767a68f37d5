//! XML decoding.
//!
//! Records are `DATA_RECORD` elements directly below the document root.

use std::io::Read;

use camino::Utf8Path;
use poi_loader_core::{RawRecord, RawValue};
use roxmltree::{Document, Node, ParsingOptions};

use super::{ParseError, ParsedRecord, ratings};

const RECORD: &str = "DATA_RECORD";

pub(super) fn parse<R: Read>(path: &Utf8Path, mut reader: R) -> Result<Vec<ParsedRecord>, ParseError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|source| ParseError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(&text, options).map_err(|source| ParseError::Xml {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(document
        .root_element()
        .children()
        .filter(|node| node.has_tag_name(RECORD))
        .enumerate()
        .map(|(index, node)| ParsedRecord {
            position: index + 1,
            excerpt: None,
            raw: record(node),
        })
        .collect())
}

fn record(node: Node<'_, '_>) -> RawRecord {
    RawRecord {
        external_id: child_text(node, "pid").map(RawValue::from),
        name: child_text(node, "pname").map(RawValue::from),
        category: child_text(node, "pcategory").map(RawValue::from),
        longitude: child_text(node, "plongitude").map(RawValue::from),
        latitude: child_text(node, "platitude").map(RawValue::from),
        ratings: child_text(node, "pratings")
            .map(ratings::parse_list)
            .unwrap_or_default(),
    }
}

/// Trimmed text of the first child named `name`; blank text counts as absent.
fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.children()
        .find(|child| child.has_tag_name(name))
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
}
