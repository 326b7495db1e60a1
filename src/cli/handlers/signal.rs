// src/cli/handlers/signal.rs

use crate::cli::args::SignalArgs;
use crate::config::ClientConfig;
use crate::core::escalation::Escalation;
use crate::slurm::scancel::Scancel;
use crate::slurm::squeue::Squeue;
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::thread;
use std::time::Duration;

/// Signals a job once or, with `--escalate-every`, keeps escalating until the
/// job is gone from the queue or the plain cancel has been sent.
pub fn handle(args: Vec<String>, config: &ClientConfig) -> Result<()> {
    let signal_args = SignalArgs::try_parse_from(&args)?;
    let job_id = signal_args.job_id;
    let mut scancel = Scancel::from_config(config);

    let escalation = scancel.signal_job(&job_id)?;
    report(&job_id, escalation);

    let Some(every) = signal_args.escalate_every else {
        return Ok(());
    };
    let mut squeue = Squeue::from_config(config)?;
    let mut last = escalation;
    while last != Escalation::Cancel {
        thread::sleep(Duration::from_secs(every));
        if squeue.update()?.get(&job_id).is_none() {
            println!("Job {} has left the queue.", job_id.yellow());
            return Ok(());
        }
        last = scancel.signal_job(&job_id)?;
        report(&job_id, last);
    }
    Ok(())
}

fn report(job_id: &str, escalation: Escalation) {
    let action = match escalation {
        Escalation::Term => "Sent SIGTERM to".normal(),
        Escalation::Kill => "Sent SIGKILL to".red(),
        Escalation::Cancel => "Cancelled".red().bold(),
    };
    println!("{} job {}.", action, job_id.yellow());
}
