//! Errors raised while decoding source files.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that abort parsing of a whole file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file extension matches no supported format.
    #[error("unsupported file extension for {path}")]
    UnsupportedFormat {
        /// Offending file.
        path: Utf8PathBuf,
    },
    /// Opening the file failed.
    #[error("failed to open {path}")]
    Open {
        /// File being opened.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Reading the file contents failed.
    #[error("failed to read {path}")]
    Read {
        /// File being read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The CSV reader rejected the file.
    #[error("failed to read CSV records from {path}")]
    Csv {
        /// File being read.
        path: Utf8PathBuf,
        /// Source error returned by `csv`.
        #[source]
        source: csv::Error,
    },
    /// The file is not valid JSON.
    #[error("failed to decode JSON document {path}")]
    Json {
        /// File being decoded.
        path: Utf8PathBuf,
        /// Source error returned by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The JSON document is valid but not an array of records.
    #[error("expected a top-level JSON array in {path}")]
    NotAnArray {
        /// File being decoded.
        path: Utf8PathBuf,
    },
    /// The file is not a well-formed XML document.
    #[error("failed to parse XML document {path}")]
    Xml {
        /// File being parsed.
        path: Utf8PathBuf,
        /// Source error returned by `roxmltree`.
        #[source]
        source: roxmltree::Error,
    },
}
