// src/cli/handlers/queue.rs

use crate::cli::args::QueueArgs;
use crate::cli::handlers::commons;
use crate::config::ClientConfig;
use crate::slurm::squeue::Squeue;
use anyhow::Result;
use clap::Parser;
use indexmap::IndexMap;

/// Lists the user's queued jobs, optionally filtered by name.
pub fn handle(args: Vec<String>, config: &ClientConfig) -> Result<()> {
    let queue_args = QueueArgs::try_parse_from(&args)?;
    let mut squeue = Squeue::from_config(config)?;
    squeue.update()?;

    let jobs: IndexMap<&str, _> = match &queue_args.name {
        Some(fragment) => squeue.filtered_jobs(fragment).into_iter().collect(),
        None => squeue
            .jobs()
            .jobs
            .iter()
            .map(|(id, record)| (id.as_str(), record))
            .collect(),
    };

    if queue_args.json {
        commons::print_json(&jobs)
    } else {
        commons::print_table(jobs.values().copied());
        Ok(())
    }
}
