//! `loadpoi` command implementation.

use std::num::NonZeroUsize;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use poi_loader_core::{DEFAULT_BATCH_SIZE, UpsertConfig};
use poi_loader_data::{LoadError, LoadSummary, SqlitePoiSink, load_files, resolve_paths};
use serde::{Deserialize, Serialize};

use crate::{ARG_BATCH_SIZE, ARG_DATABASE, CliError, DEFAULT_DATABASE, ENV_BATCH_SIZE};

/// CLI arguments for the `loadpoi` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "loadpoi",
    long_about = "Load points of interest from files or directories. Directories \
                 are searched recursively for .csv, .json and .xml files. The \
                 batch size and database can also come from configuration \
                 files or environment variables.",
    about = "Load point of interest files"
)]
#[ortho_config(prefix = "POI_LOADER")]
pub(crate) struct LoadArgs {
    /// Files or directories to load.
    #[arg(value_name = "path", required = true, num_args = 1..)]
    #[serde(default)]
    pub(crate) paths: Vec<Utf8PathBuf>,
    /// Records written per transaction (default 1000).
    #[arg(short = 'b', long = ARG_BATCH_SIZE, value_name = "n")]
    #[serde(default)]
    pub(crate) batch_size: Option<usize>,
    /// SQLite database to write (default `pois.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl LoadArgs {
    pub(crate) fn into_config(self) -> Result<LoadConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        LoadConfig::try_from(merged)
    }
}

/// Resolved `loadpoi` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LoadConfig {
    /// Files or directories to load.
    pub(crate) paths: Vec<Utf8PathBuf>,
    /// Records written per transaction.
    pub(crate) batch_size: NonZeroUsize,
    /// SQLite database path.
    pub(crate) database: Utf8PathBuf,
}

impl TryFrom<LoadArgs> for LoadConfig {
    type Error = CliError;

    fn try_from(args: LoadArgs) -> Result<Self, Self::Error> {
        let batch_size = match args.batch_size {
            None => DEFAULT_BATCH_SIZE,
            Some(size) => NonZeroUsize::new(size).ok_or(CliError::InvalidBatchSize {
                field: ARG_BATCH_SIZE,
                env: ENV_BATCH_SIZE,
            })?,
        };
        let database = args
            .database
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE));
        Ok(Self {
            paths: args.paths,
            batch_size,
            database,
        })
    }
}

pub(crate) fn run_load(args: LoadArgs) -> Result<LoadSummary, CliError> {
    let config = args.into_config()?;
    execute(&config)
}

/// Resolve the input paths, then open the store and load them.
///
/// Nothing is created on disk when no supported file resolves.
pub(crate) fn execute(config: &LoadConfig) -> Result<LoadSummary, CliError> {
    let files = resolve_paths(&config.paths);
    if files.is_empty() {
        return Err(LoadError::NoSupportedFiles.into());
    }
    let mut sink = SqlitePoiSink::open(&config.database, &UpsertConfig::default()).map_err(
        |source| CliError::OpenStore {
            path: config.database.clone(),
            source,
        },
    )?;
    let summary = load_files(&files, config.batch_size, &mut sink)?;
    Ok(summary)
}
