// src/cli/handlers/cancel.rs

use crate::cli::args::CancelArgs;
use crate::config::ClientConfig;
use crate::slurm::scancel::Scancel;
use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;

/// Cancels one job, or all of the user's jobs.
pub fn handle(args: Vec<String>, config: &ClientConfig) -> Result<()> {
    let cancel_args = CancelArgs::try_parse_from(&args)?;
    let scancel = Scancel::from_config(config);

    if cancel_args.all {
        scancel.cancel_all()?;
        println!("{}", "Cancelled all of your jobs.".green());
        return Ok(());
    }

    let job_id = cancel_args
        .job_id
        .ok_or_else(|| anyhow!("Specify a job ID or --all."))?;
    scancel.cancel_job(&job_id)?;
    println!("Cancelled job {}.", job_id.yellow());
    Ok(())
}
