//! `mindhub` command line client.

mod cli;
mod platform;

use std::process::ExitCode;

use clap::Parser;
use mindhub_logging::LogDestination;

use crate::cli::Cli;
use crate::platform::{App, ClientConfig, TOKEN_ENV};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let destination = match &cli.log_file {
        Some(path) => LogDestination::Both(path.clone()),
        None => LogDestination::Terminal,
    };
    mindhub_logging::initialize(&destination, cli.verbosity.log_level_filter());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config =
        ClientConfig::load(&cli.config).with_token_override(std::env::var(TOKEN_ENV).ok());
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    let mut app = App::new(config)?;
    let result = app.run(cli.command);
    app.flush_notices();
    result
}
