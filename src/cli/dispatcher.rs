// src/cli/dispatcher.rs

use anyhow::Result;

use crate::cli::handlers;
use crate::config::ClientConfig;

/// A named action, its aliases and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &ClientConfig) -> Result<()>,
}

/// Every action besides the default submission.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "acct",
        aliases: &["sacct"],
        handler: handlers::acct::handle,
    },
    CommandDefinition {
        name: "cancel",
        aliases: &["scancel"],
        handler: handlers::cancel::handle,
    },
    CommandDefinition {
        name: "queue",
        aliases: &["squeue", "q"],
        handler: handlers::queue::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &["srun"],
        handler: handlers::run::handle,
    },
    CommandDefinition {
        name: "show",
        aliases: &["scontrol"],
        handler: handlers::show::handle,
    },
    CommandDefinition {
        name: "signal",
        aliases: &[],
        handler: handlers::signal::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes `all_args` to an action, or to submission when the first word is
/// not an action name (`slurmkit [options...] COMMAND`).
pub fn dispatch(all_args: Vec<String>, config: &ClientConfig) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let Some((first, rest)) = all_args.split_first() else {
        return Err(anyhow::anyhow!(
            "Usage: slurmkit [sbatch options...] COMMAND\n       slurmkit <{}> [args...]",
            COMMAND_REGISTRY
                .iter()
                .map(|cmd| cmd.name)
                .collect::<Vec<_>>()
                .join("|")
        ));
    };

    match find_command(first) {
        Some(command) => (command.handler)(rest.to_vec(), config),
        None => handlers::submit::handle(all_args, config),
    }
}
