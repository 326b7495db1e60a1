// src/slurm/scontrol.rs

use crate::config::{ClientConfig, ConfigError};
use crate::models::ExitStatus;
use crate::parsers::scontrol::ControlSnapshot;
use crate::slurm::{SlurmError, run_checked, tool_argv};
use crate::system::executor::{Invocation, ProcessRunner, SystemRunner};
use std::sync::Arc;

/// `scontrol show job` for one job, remembering the last job queried.
#[derive(Debug, Clone)]
pub struct Scontrol {
    command: String,
    runner: Arc<dyn ProcessRunner>,
    job_id: Option<String>,
    snapshot: Option<ControlSnapshot>,
}

impl Scontrol {
    /// A wrapper around the default `scontrol` with no snapshot yet.
    pub fn new() -> Self {
        Self {
            command: "scontrol".to_string(),
            runner: Arc::new(SystemRunner),
            job_id: None,
            snapshot: None,
        }
    }

    /// Uses the configured `scontrol` path.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            command: config.tools.scontrol.clone(),
            ..Self::new()
        }
    }

    /// Replaces the process runner.
    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Queries `job_id`, or the last job queried when `None`.
    ///
    /// # Errors
    /// [`ConfigError::MissingJobId`] when no job was ever given.
    pub fn update(&mut self, job_id: Option<&str>) -> Result<&ControlSnapshot, SlurmError> {
        if let Some(id) = job_id {
            self.job_id = Some(id.to_string());
        }
        let id = self.job_id.clone().ok_or(ConfigError::MissingJobId)?;

        let argv = tool_argv(&self.command, ["show", "job", id.as_str()])?;
        let output = run_checked(self.runner.as_ref(), "scontrol", &Invocation::argv(argv))?;
        let snapshot = self.snapshot.insert(ControlSnapshot::parse(&output.stdout));
        log::debug!("Job {} has exit code {}.", id, snapshot.exit_code());
        Ok(snapshot)
    }

    /// The last snapshot, if any.
    pub fn snapshot(&self) -> Option<&ControlSnapshot> {
        self.snapshot.as_ref()
    }

    /// Aggregate exit code of the last snapshot; `Unknown` before the first update.
    pub fn exit_code(&self) -> ExitStatus {
        self.snapshot
            .as_ref()
            .map_or(ExitStatus::Unknown, ControlSnapshot::exit_code)
    }

    /// The values of `key` across every record of the last snapshot.
    pub fn column(&self, key: &str) -> Vec<&str> {
        self.snapshot
            .iter()
            .flat_map(|s| s.records.iter())
            .filter_map(|record| record.get(key))
            .collect()
    }

    /// The job id of the last query.
    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }
}

impl Default for Scontrol {
    fn default() -> Self {
        Self::new()
    }
}
