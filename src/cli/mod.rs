// src/cli/mod.rs

use clap::Parser;

pub mod arg_parser;
pub mod args;
pub mod dispatcher;
pub mod handlers;

/// slurmkit: build, submit and inspect Slurm batch jobs.
///
/// `slurmkit [sbatch options...] COMMAND` prints the generated script and
/// submits it. `slurmkit <run|queue|show|acct|cancel|signal> [args...]` runs
/// one of the other actions.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
#[command(trailing_var_arg = true)]
pub struct Cli {
    /// sbatch options and the command to submit, or an action and its arguments.
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}
