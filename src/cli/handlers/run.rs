// src/cli/handlers/run.rs

use crate::cli::arg_parser::ParsedArgs;
use crate::cli::handlers::commons;
use crate::config::ClientConfig;
use crate::slurm::session::Slurm;
use anyhow::{Context, Result};

/// `slurmkit run [options...] COMMAND`: runs the command through `srun`,
/// attached to the terminal.
pub fn handle(args: Vec<String>, config: &ClientConfig) -> Result<()> {
    let parsed = ParsedArgs::new(&args)?;
    let slurm = commons::session_from(&parsed, Slurm::from_config(config));
    slurm
        .srun(&parsed.command, true)
        .with_context(|| format!("srun failed for '{}'", parsed.command))?;
    Ok(())
}
