// src/cli/handlers/submit.rs

use crate::cli::arg_parser::ParsedArgs;
use crate::cli::handlers::commons;
use crate::config::ClientConfig;
use crate::slurm::session::{Slurm, SubmitOptions};
use anyhow::{Context, Result};
use colored::Colorize;

/// The default action: `slurmkit [sbatch options...] COMMAND`.
///
/// Prints the generated script and the command, then submits both.
pub fn handle(args: Vec<String>, config: &ClientConfig) -> Result<()> {
    let parsed = ParsedArgs::new(&args)?;
    let slurm = commons::session_from(&parsed, Slurm::from_config(config));

    print!("{}", slurm);
    println!("{}", parsed.command.cyan());

    let options = SubmitOptions {
        echo: true,
        ..SubmitOptions::default()
    };
    let submission = slurm
        .sbatch(&parsed.command, &options)
        .context("Failed to submit the batch job")?;
    log::debug!("Submission: {:?}", submission);
    Ok(())
}
