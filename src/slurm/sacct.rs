// src/slurm/sacct.rs

use crate::config::{ClientConfig, ConfigError};
use crate::constants::{ACCOUNTING_JOB_NAME_COLUMN, DEFAULT_SACCT_FIELDS, DEFAULT_SACCT_UNITS};
use crate::models::JobRecord;
use crate::parsers::sacct::parse_sacct;
use crate::slurm::{SlurmError, run_checked, tool_argv};
use crate::system::executor::{Invocation, ProcessRunner, SystemRunner};
use std::sync::Arc;

/// Accounting records of one job (one per array task), without the
/// synthetic `batch` and `extern` steps.
#[derive(Debug, Clone)]
pub struct Sacct {
    command: String,
    fields: Vec<String>,
    units: String,
    runner: Arc<dyn ProcessRunner>,
    job_id: Option<String>,
    records: Vec<JobRecord>,
}

impl Sacct {
    /// A wrapper requesting `fields` (each may carry a `%width` suffix) in `units`.
    ///
    /// # Errors
    /// [`ConfigError::MissingJobName`] when `fields` has no `JobName`; the
    /// parser needs it to drop the synthetic steps.
    pub fn new<I, S>(fields: I, units: &str) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        let has_job_name = fields.iter().any(|field| {
            let name = field.split('%').next().unwrap_or_default().trim();
            name.eq_ignore_ascii_case(ACCOUNTING_JOB_NAME_COLUMN)
        });
        if !has_job_name {
            return Err(ConfigError::MissingJobName(fields.join(",")));
        }

        Ok(Self {
            command: "sacct".to_string(),
            fields,
            units: units.to_string(),
            runner: Arc::new(SystemRunner),
            job_id: None,
            records: Vec::new(),
        })
    }

    /// A wrapper using the tool path, fields and units of `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let mut sacct = Self::new(config.sacct.fields.iter().cloned(), &config.sacct.units)?;
        sacct.command = config.tools.sacct.clone();
        Ok(sacct)
    }

    /// Replaces the process runner.
    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Runs `sacct -j <id> --format=<fields> --units=<units>` for `job_id`, or
    /// for the last job queried when `None`.
    pub fn update(&mut self, job_id: Option<&str>) -> Result<&[JobRecord], SlurmError> {
        if let Some(id) = job_id {
            self.job_id = Some(id.to_string());
        }
        let id = self.job_id.clone().ok_or(ConfigError::MissingJobId)?;

        let argv = tool_argv(
            &self.command,
            [
                "-j".to_string(),
                id,
                format!("--format={}", self.fields.join(",")),
                format!("--units={}", self.units),
            ],
        )?;
        let output = run_checked(self.runner.as_ref(), "sacct", &Invocation::argv(argv))?;
        self.records = parse_sacct(&output.stdout)?;
        Ok(&self.records)
    }

    /// Records from the last update.
    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    /// The values of `column` across the last records.
    pub fn column(&self, column: &str) -> Vec<&str> {
        self.records
            .iter()
            .filter_map(|record| record.get(column).map(String::as_str))
            .collect()
    }

    /// The fields requested from `sacct`.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

impl Default for Sacct {
    fn default() -> Self {
        Self {
            command: "sacct".to_string(),
            fields: DEFAULT_SACCT_FIELDS.iter().map(|f| (*f).to_string()).collect(),
            units: DEFAULT_SACCT_UNITS.to_string(),
            runner: Arc::new(SystemRunner),
            job_id: None,
            records: Vec::new(),
        }
    }
}
