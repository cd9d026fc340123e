#![forbid(unsafe_code)]

mod args;
mod commands;
mod error;
mod render;
mod time_fmt;

use args::Cli;
use clap::Parser;
use error::CliError;
use std::io::Write as _;
use std::process::ExitCode;
use tl_core::ids::WorkspaceId;
use tl_storage::SqliteStore;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TASKLOG_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("tasklog: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let workspace = WorkspaceId::try_new(cli.workspace)?;
    let mut store = SqliteStore::open(&cli.storage_dir)?;
    tracing::debug!(storage_dir = %cli.storage_dir.display(), workspace = %workspace, "store ready");

    let lines = commands::dispatch(&mut store, &workspace, cli.command)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for line in lines {
        serde_json::to_writer(&mut out, &line)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
