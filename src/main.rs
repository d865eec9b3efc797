mod cli;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cli::dispatch::dispatch;
use cli::types::Cli;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_directive = if cli.verbose {
        "gencheck=debug"
    } else {
        "gencheck=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if dispatch(cli)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
