//! Error types emitted by the PoI loader CLI.
//!
//! Keep this error type reasonably small, as every CLI helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use poi_loader_data::{LoadError, PersistPoisError};
use thiserror::Error;

/// Errors emitted by the PoI loader CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// The merged batch size is zero.
    #[error("{field} must be positive (set --{field} or {env})")]
    InvalidBatchSize {
        /// Flag carrying the batch size.
        field: &'static str,
        /// Environment variable carrying the batch size.
        env: &'static str,
    },
    /// Opening the SQLite store failed.
    #[error("failed to open POI store at {path}")]
    OpenStore {
        /// Database path.
        path: Utf8PathBuf,
        /// Error reported by the store.
        #[source]
        source: PersistPoisError,
    },
    /// The load pipeline failed.
    #[error(transparent)]
    Load(#[from] LoadError<PersistPoisError>),
    /// Writing progress or the summary failed.
    #[error("failed to write output")]
    WriteOutput(#[source] std::io::Error),
}
