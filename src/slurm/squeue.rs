// src/slurm/squeue.rs

use crate::config::ClientConfig;
use crate::models::JobRecord;
use crate::parsers::squeue::{QueueFormat, QueueSnapshot, parse_squeue};
use crate::slurm::{SlurmError, run_checked, tool_argv};
use crate::system::executor::{Invocation, ProcessRunner, SystemRunner};
use std::sync::Arc;

/// The current user's queue, refreshed on demand.
#[derive(Debug, Clone)]
pub struct Squeue {
    command: String,
    format: QueueFormat,
    runner: Arc<dyn ProcessRunner>,
    snapshot: QueueSnapshot,
}

impl Squeue {
    /// A wrapper around `squeue` with the default format.
    pub fn new() -> Self {
        Self {
            command: "squeue".to_string(),
            format: QueueFormat::default(),
            runner: Arc::new(SystemRunner),
            snapshot: QueueSnapshot::default(),
        }
    }

    /// A wrapper using the tool path and format of `config`.
    ///
    /// # Errors
    /// Fails if the configured format is not a valid delimited record.
    pub fn from_config(config: &ClientConfig) -> Result<Self, SlurmError> {
        Ok(Self {
            command: config.tools.squeue.clone(),
            format: config.queue_format()?,
            ..Self::new()
        })
    }

    /// Replaces the process runner.
    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// The format passed to `squeue -o`.
    pub fn format(&self) -> &QueueFormat {
        &self.format
    }

    /// Runs `squeue --me -o <format>` and replaces the snapshot.
    pub fn update(&mut self) -> Result<&QueueSnapshot, SlurmError> {
        let argv = tool_argv(&self.command, ["--me", "-o", self.format.template()])?;
        let output = run_checked(self.runner.as_ref(), "squeue", &Invocation::argv(argv))?;
        self.snapshot = parse_squeue(output.stdout.trim(), &self.format)?;
        Ok(&self.snapshot)
    }

    /// The snapshot from the last [`Self::update`].
    pub fn jobs(&self) -> &QueueSnapshot {
        &self.snapshot
    }

    /// Jobs of the last snapshot whose name contains `fragment`.
    pub fn filtered_jobs(&self, fragment: &str) -> Vec<(&str, &JobRecord)> {
        self.snapshot.filter_by_name(fragment)
    }
}

impl Default for Squeue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slurm::testing::{ScriptedRunner, failed, ok};
    use crate::system::executor::Program;

    #[test]
    fn test_update_runs_squeue_for_current_user() {
        let runner = Arc::new(ScriptedRunner::replying(vec![ok(
            "\"JOBID\",\"NAME\",\"ST\"\n\"10\",\"alpha\",\"R\"\n\"11\",\"beta\",\"PD\"\n",
        )]));
        let mut squeue = Squeue::new().with_runner(runner.clone());

        let snapshot = squeue.update().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(squeue.filtered_jobs("alp").len(), 1);

        let calls = runner.calls();
        let Program::Argv(argv) = &calls[0].program else {
            panic!("squeue must be spawned directly");
        };
        assert_eq!(argv[..3], ["squeue", "--me", "-o"]);
        assert_eq!(argv[3], crate::constants::DEFAULT_SQUEUE_FORMAT);
    }

    #[test]
    fn test_update_failure_keeps_stderr() {
        let runner = Arc::new(ScriptedRunner::replying(vec![failed(1, "slurm_load_jobs error\n")]));
        let mut squeue = Squeue::new().with_runner(runner);
        let err = squeue.update().unwrap_err();
        assert!(matches!(err, SlurmError::Tool { ref stderr, .. } if stderr == "slurm_load_jobs error"));
        assert!(squeue.jobs().is_empty());
    }

    #[test]
    fn test_from_config_validates_format() {
        let mut config = ClientConfig::default();
        config.squeue.format = "%i".to_string();
        assert!(matches!(Squeue::from_config(&config), Err(SlurmError::Config(_))));
    }
}
