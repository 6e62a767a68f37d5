//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use std::error::Error;

use poi_loader_cli::CliError;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    if let Err(err) = poi_loader_cli::run() {
        // Help and version requests are not failures.
        if let CliError::ArgumentParsing(clap_err) = &err
            && !clap_err.use_stderr()
        {
            clap_err.exit();
        }
        eprintln!("poi-loader: {err}");
        let mut source = err.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        std::process::exit(1);
    }
}

/// Send `log` records to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
