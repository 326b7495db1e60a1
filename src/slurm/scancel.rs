// src/slurm/scancel.rs

use crate::config::ClientConfig;
use crate::core::escalation::{Escalation, EscalationState, EscalationTracker};
use crate::slurm::{SlurmError, run_checked, tool_argv};
use crate::system::executor::{Invocation, ProcessRunner, SystemRunner};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// `scancel`, with per-job escalation for [`Scancel::signal_job`].
#[derive(Debug, Clone)]
pub struct Scancel {
    command: String,
    runner: Arc<dyn ProcessRunner>,
    tracker: EscalationTracker,
}

impl Scancel {
    /// Forgets a job's signal history once it is older than `stale_window`.
    pub fn new(stale_window: Duration) -> Self {
        Self {
            command: "scancel".to_string(),
            runner: Arc::new(SystemRunner),
            tracker: EscalationTracker::new(stale_window),
        }
    }

    /// Uses the configured `scancel` path and stale window.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            command: config.tools.scancel.clone(),
            ..Self::new(config.stale_window())
        }
    }

    /// Replaces the process runner.
    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// `scancel <job_id>`.
    pub fn cancel_job(&self, job_id: &str) -> Result<(), SlurmError> {
        self.run([job_id])
    }

    /// Cancels every job of the current user (`scancel --me`).
    pub fn cancel_all(&self) -> Result<(), SlurmError> {
        self.run(["--me"])
    }

    /// Sends the next signal of the escalation to `job_id`: TERM the first
    /// time, KILL the second, then a plain `scancel`.
    ///
    /// The attempt counts even when `scancel` fails.
    pub fn signal_job(&mut self, job_id: &str) -> Result<Escalation, SlurmError> {
        self.signal_job_at(job_id, Instant::now())
    }

    /// [`Self::signal_job`] with an explicit clock reading.
    pub fn signal_job_at(&mut self, job_id: &str, now: Instant) -> Result<Escalation, SlurmError> {
        let escalation = self.tracker.next_signal(job_id, now);
        match escalation.signal_arg() {
            Some(signal) => self.run([signal, job_id])?,
            None => self.run([job_id])?,
        }
        Ok(escalation)
    }

    /// Where `job_id` stands in the escalation.
    pub fn state(&self, job_id: &str) -> EscalationState {
        self.tracker.state(job_id)
    }

    /// Drops signal history older than the stale window.
    pub fn prune_stale(&mut self, now: Instant) {
        self.tracker.prune_stale(now);
    }

    fn run<const N: usize>(&self, args: [&str; N]) -> Result<(), SlurmError> {
        let argv = tool_argv(&self.command, args)?;
        run_checked(self.runner.as_ref(), "scancel", &Invocation::argv(argv))?;
        Ok(())
    }
}

impl Default for Scancel {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_STALE_WINDOW)
    }
}
