// src/config.rs

//! # Client Configuration
//!
//! Optional TOML file describing where the Slurm tools live and how their
//! output is requested. Every field has a default, so a missing file and an
//! empty file behave the same.
//!
//! The file is looked up at `$SLURMKIT_CONFIG`, then at
//! `<config dir>/slurmkit/config.toml`. The `SQUEUE_FORMAT` environment variable
//! overrides `squeue.format` after the file is read.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILENAME, CONFIG_PATH_ENV, DEFAULT_SACCT_FIELDS, DEFAULT_SACCT_UNITS,
    DEFAULT_SHELL, DEFAULT_SQUEUE_FORMAT, DEFAULT_STALE_WINDOW, SQUEUE_FORMAT_ENV,
};
use crate::parsers::squeue::QueueFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Invalid or unreadable configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid squeue format '{template}': {reason}")]
    InvalidQueueFormat { template: String, reason: String },
    #[error("The sacct field list must include 'JobName' (got: {0}).")]
    MissingJobName(String),
    #[error("Job ID not specified. Please provide a job ID.")]
    MissingJobId,
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    #[error("Could not read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    TomlParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to expand '{value}': {reason}")]
    Expand { value: String, reason: String },
}

/// Executables used for each tool. Values may contain `~` and `$VAR`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolPaths {
    /// Submits batch scripts.
    pub sbatch: String,
    /// Runs a job step in the foreground.
    pub srun: String,
    /// Lists queued jobs.
    pub squeue: String,
    /// Shows a job's details.
    pub scontrol: String,
    /// Reports accounting records.
    pub sacct: String,
    /// Cancels or signals jobs.
    pub scancel: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            sbatch: "sbatch".to_string(),
            srun: "srun".to_string(),
            squeue: "squeue".to_string(),
            scontrol: "scontrol".to_string(),
            sacct: "sacct".to_string(),
            scancel: "scancel".to_string(),
        }
    }
}

/// `squeue` output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SqueueSettings {
    /// The `-o` template; its first output line is the header.
    pub format: String,
    /// Field separator used in `format`.
    pub delimiter: char,
    /// Quote character used in `format`.
    pub quote: char,
}

impl Default for SqueueSettings {
    fn default() -> Self {
        Self {
            format: DEFAULT_SQUEUE_FORMAT.to_string(),
            delimiter: ',',
            quote: '"',
        }
    }
}

/// `sacct` output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SacctSettings {
    /// Columns passed to `--format`; must include `JobName`.
    pub fields: Vec<String>,
    /// Value of `--units` (`K`, `M`, `G`, ...).
    pub units: String,
}

impl Default for SacctSettings {
    fn default() -> Self {
        Self {
            fields: DEFAULT_SACCT_FIELDS.iter().map(|f| (*f).to_string()).collect(),
            units: DEFAULT_SACCT_UNITS.to_string(),
        }
    }
}

/// Client settings read from `config.toml`; every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Interpreter written to the script's `#!` line.
    pub shell: String,
    /// Seconds after which a job's signal history is forgotten.
    pub stale_after_secs: u64,
    /// Paths of the Slurm tools, expanded before use.
    pub tools: ToolPaths,
    /// Queue snapshot format.
    pub squeue: SqueueSettings,
    /// Accounting query fields.
    pub sacct: SacctSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            shell: DEFAULT_SHELL.to_string(),
            stale_after_secs: DEFAULT_STALE_WINDOW.as_secs(),
            tools: ToolPaths::default(),
            squeue: SqueueSettings::default(),
            sacct: SacctSettings::default(),
        }
    }
}

impl ClientConfig {
    /// Loads the configuration from the usual locations and applies
    /// environment overrides.
    ///
    /// # Errors
    /// Fails if a config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match config_path()? {
            Some(path) => Self::load_from(&path)?,
            None => {
                log::debug!("No config file found, using defaults.");
                Self::default()
            }
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Reads and parses the file at `path`, without environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("Loading config from '{}'.", path.display());
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Applies `SQUEUE_FORMAT`, read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(format) = lookup(SQUEUE_FORMAT_ENV).filter(|f| !f.trim().is_empty()) {
            log::debug!("{} overrides the squeue format: {}", SQUEUE_FORMAT_ENV, format);
            self.squeue.format = format;
        }
    }

    /// The validated `squeue` format.
    pub fn queue_format(&self) -> Result<QueueFormat, ConfigError> {
        QueueFormat::new(&self.squeue.format, self.squeue.delimiter, self.squeue.quote)
    }

    /// The escalation stale window.
    pub fn stale_window(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }
}

/// Expands `~` and environment variables in a configured tool command.
pub fn expand_tool(value: &str) -> Result<String, ConfigError> {
    shellexpand::full(value)
        .map(|expanded| expanded.into_owned())
        .map_err(|e| ConfigError::Expand {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Returns the config directory (`~/.config/slurmkit` on Linux).
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or(ConfigError::ConfigDirNotFound)
}

/// The config file to read, if any: `$SLURMKIT_CONFIG` when set, otherwise the
/// default location when that file exists.
fn config_path() -> Result<Option<PathBuf>, ConfigError> {
    if let Some(explicit) = std::env::var_os(CONFIG_PATH_ENV) {
        return Ok(Some(PathBuf::from(explicit)));
    }
    match config_dir() {
        Ok(dir) => {
            let path = dir.join(CONFIG_FILENAME);
            Ok(path.is_file().then_some(path))
        }
        // No config directory on this platform is the same as no config file.
        Err(ConfigError::ConfigDirNotFound) => Ok(None),
        Err(e) => Err(e),
    }
}
