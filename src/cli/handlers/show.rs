// src/cli/handlers/show.rs

use crate::cli::args::ShowArgs;
use crate::cli::handlers::commons;
use crate::config::ClientConfig;
use crate::slurm::scontrol::Scontrol;
use anyhow::Result;
use clap::Parser;
use colored::Colorize;

/// Fields printed for every record, in this order, when present.
const SUMMARY_FIELDS: &[&str] = &[
    "JobName", "JobState", "Reason", "ExitCode", "RunTime", "TimeLimit", "Partition", "NodeList",
    "StdOut", "StdErr",
];

/// Prints `scontrol` details and the exit code of one job.
pub fn handle(args: Vec<String>, config: &ClientConfig) -> Result<()> {
    let show_args = ShowArgs::try_parse_from(&args)?;
    let mut scontrol = Scontrol::from_config(config);
    let snapshot = scontrol.update(Some(&show_args.job_id))?;

    if show_args.json {
        return commons::print_json(snapshot);
    }

    for record in &snapshot.records {
        println!(
            "\n--- Job '{}' ---",
            record.job_id().unwrap_or(&show_args.job_id).yellow()
        );
        for field in SUMMARY_FIELDS {
            if let Some(value) = record.get(field) {
                println!("  {:<15} {}", field.blue(), value);
            }
        }
    }
    println!("\n{} {}", "Exit code:".bold(), snapshot.exit_code());
    Ok(())
}
