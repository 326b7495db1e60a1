// src/cli/handlers/acct.rs

use crate::cli::args::AcctArgs;
use crate::cli::handlers::commons;
use crate::config::ClientConfig;
use crate::slurm::sacct::Sacct;
use anyhow::Result;
use clap::Parser;

/// Prints accounting records for one job.
pub fn handle(args: Vec<String>, config: &ClientConfig) -> Result<()> {
    let acct_args = AcctArgs::try_parse_from(&args)?;

    // Command-line fields and units take precedence over the config file.
    let mut effective = config.clone();
    if !acct_args.fields.is_empty() {
        effective.sacct.fields = acct_args.fields;
    }
    if let Some(units) = acct_args.units {
        effective.sacct.units = units;
    }

    let mut sacct = Sacct::from_config(&effective)?;
    let records = sacct.update(Some(&acct_args.job_id))?;

    if acct_args.json {
        commons::print_json(records)
    } else {
        commons::print_table(records);
        Ok(())
    }
}
