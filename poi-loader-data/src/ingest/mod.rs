//! Format parsers turning source files into raw point of interest records.
//!
//! Each supported extension maps to one [`SourceFormat`]. Parsers only decode
//! their native shape; validation happens later in
//! [`poi_loader_core::normalise`].

use std::fmt;

use camino::Utf8Path;
use poi_loader_core::RawRecord;
use poi_loader_fs::open_utf8_file;

mod csv;
mod error;
mod json;
mod ratings;
mod xml;

pub use error::ParseError;

/// File formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// A JSON array of objects.
    Json,
    /// An XML document of `DATA_RECORD` elements.
    Xml,
}

impl SourceFormat {
    /// Every supported format.
    pub const ALL: [Self; 3] = [Self::Csv, Self::Json, Self::Xml];

    /// File extension associated with the format, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    /// Select the format for `path` from its extension, ignoring case.
    ///
    /// # Examples
    /// ```
    /// use camino::Utf8Path;
    /// use poi_loader_data::SourceFormat;
    ///
    /// assert_eq!(SourceFormat::from_path(Utf8Path::new("a/POIS.Json")), Some(SourceFormat::Json));
    /// assert_eq!(SourceFormat::from_path(Utf8Path::new("notes.txt")), None);
    /// ```
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        let extension = path.extension()?;
        Self::ALL
            .into_iter()
            .find(|format| extension.eq_ignore_ascii_case(format.extension()))
    }

    /// Decode every record in `path` using this format.
    ///
    /// # Errors
    /// Returns [`ParseError`] when the file cannot be opened or read, or the
    /// document as a whole is malformed.
    pub fn parse(self, path: &Utf8Path) -> Result<Vec<ParsedRecord>, ParseError> {
        let file = open_utf8_file(path).map_err(|source| ParseError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        match self {
            Self::Csv => csv::parse(path, file),
            Self::Json => json::parse(path, file),
            Self::Xml => xml::parse(path, file),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A raw record together with where it sits in its file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    /// 1-based position among the file's records.
    pub position: usize,
    /// Readable rendering of the source record, if the format has one.
    pub excerpt: Option<String>,
    /// Decoded field values.
    pub raw: RawRecord,
}

/// Parse `path` with the format matching its extension.
///
/// # Errors
/// Returns [`ParseError::UnsupportedFormat`] for unknown extensions and
/// propagates errors from [`SourceFormat::parse`].
pub fn parse_file(path: &Utf8Path) -> Result<Vec<ParsedRecord>, ParseError> {
    let format = SourceFormat::from_path(path).ok_or_else(|| ParseError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    format.parse(path)
}
