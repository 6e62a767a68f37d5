//! Shared helpers for the data crate's behaviour tests.

use camino::Utf8PathBuf;

/// Directory containing the source file fixtures.
pub fn fixtures_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}
