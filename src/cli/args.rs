// src/cli/args.rs
use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Lists your jobs in the queue.")]
pub struct QueueArgs {
    /// Only show jobs whose name contains this text.
    #[arg(long, short)]
    pub name: Option<String>,

    /// Print the jobs as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Shows `scontrol show job` details and the exit code of a job.")]
pub struct ShowArgs {
    /// The job to inspect.
    pub job_id: String,

    /// Print the records as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Shows the accounting records of a job.")]
pub struct AcctArgs {
    /// The job to inspect.
    pub job_id: String,

    /// Comma-separated `sacct` fields. Must include JobName.
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Memory units passed to `sacct --units`.
    #[arg(long)]
    pub units: Option<String>,

    /// Print the records as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Cancels a job, or all of your jobs.")]
pub struct CancelArgs {
    /// The job to cancel.
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub job_id: Option<String>,

    /// Cancel every job you own.
    #[arg(long)]
    pub all: bool,
}

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Signals a job: TERM first, then KILL, then a plain cancel."
)]
pub struct SignalArgs {
    /// The job to signal.
    pub job_id: String,

    /// Keep escalating every N seconds until the job leaves the queue.
    #[arg(long, value_name = "SECONDS")]
    pub escalate_every: Option<u64>,
}
