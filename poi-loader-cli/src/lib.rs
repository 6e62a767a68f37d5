//! Command-line interface for loading point of interest files.
#![forbid(unsafe_code)]

use std::ffi::OsString;
use std::io::Write;

use clap::{Parser, Subcommand};
use poi_loader_data::LoadSummary;

mod error;
mod loadpoi;

pub use error::CliError;
use loadpoi::{LoadArgs, run_load};

const ARG_BATCH_SIZE: &str = "batch-size";
const ARG_DATABASE: &str = "database";
const ENV_BATCH_SIZE: &str = "POI_LOADER_CMDS_LOADPOI_BATCH_SIZE";
const DEFAULT_DATABASE: &str = "pois.db";

/// Message written before any file is read.
pub const STARTUP_MESSAGE: &str = "Loading file contents, please wait...";

/// Run the CLI with the current process arguments, writing to stdout.
///
/// # Errors
/// Returns [`CliError`] when arguments, configuration, the store or the load
/// fail.
pub fn run() -> Result<LoadSummary, CliError> {
    let stdout = std::io::stdout();
    run_from(std::env::args_os(), &mut stdout.lock())
}

/// Run the CLI with explicit arguments, writing progress and the summary to
/// `out`.
///
/// # Errors
/// Returns [`CliError`] when arguments, configuration, the store or the load
/// fail, or `out` cannot be written.
pub fn run_from<I, T, W>(args: I, out: &mut W) -> Result<LoadSummary, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
{
    let cli = Cli::try_parse_from(args).map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Loadpoi(args) => {
            writeln!(out, "{STARTUP_MESSAGE}").map_err(CliError::WriteOutput)?;
            let summary = run_load(args)?;
            writeln!(out, "{summary}").map_err(CliError::WriteOutput)?;
            Ok(summary)
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "poi-loader",
    about = "Load points of interest from CSV, JSON and XML files",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load point of interest files into the SQLite store.
    Loadpoi(LoadArgs),
}

#[cfg(test)]
mod tests;
