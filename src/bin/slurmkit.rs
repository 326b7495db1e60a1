// src/bin/slurmkit.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use slurmkit::{
    ClientConfig, SlurmError,
    cli::{Cli, dispatcher},
};

/// The main entry point of the `slurmkit` application.
/// It sets up logging, loads the configuration, dispatches to the correct
/// handler, and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // A tool that failed already explained itself on stderr; show it verbatim.
        if let Some(SlurmError::Tool { tool, code, stderr }) = e.downcast_ref::<SlurmError>() {
            eprintln!("\n{}: {} exited with code {}", "Error".red().bold(), tool, code);
            if !stderr.is_empty() {
                eprintln!("{}", stderr);
            }
            std::process::exit(1);
        }

        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);
    let config = ClientConfig::load().context("Failed to load the slurmkit configuration")?;
    dispatcher::dispatch(cli.args, &config)
}
