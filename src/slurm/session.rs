// src/slurm/session.rs

use crate::config::{ClientConfig, ToolPaths, expand_tool};
use crate::constants::{DEFAULT_SHELL, HEREDOC_DELIMITER, SUBMITTED_PHRASE};
use crate::core::option_store::OptionStore;
use crate::core::script::{CommandBody, render_inline, render_script};
use crate::core::vocabulary;
use crate::models::{OptionValue, Submission};
use crate::slurm::{SlurmError, run_checked};
use crate::system::executor::{ExecutionError, Invocation, ProcessOutput, ProcessRunner, SystemRunner};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

lazy_static! {
    // `sbatch --parsable` prints `<job id>` or `<job id>;<cluster>`.
    static ref PARSABLE_RE: Regex =
        Regex::new(r"^\s*(\d+)(?:[:;](\S+))?\s*$").expect("parsable output pattern");
}

/// How [`Slurm::sbatch`] hands the script to `sbatch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStyle {
    /// Through a here-document on `sh -c`. With `escape_dollar`, `$` in the
    /// body is escaped so the submitting shell does not expand it.
    Inline {
        /// Write `$` in the body as `\$`.
        escape_dollar: bool,
    },
    /// Written to this file first, then submitted by path.
    File(PathBuf),
}

impl Default for SubmitStyle {
    fn default() -> Self {
        Self::Inline {
            escape_dollar: true,
        }
    }
}

/// How [`Slurm::sbatch`] hands the script over and whether it echoes the reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitOptions {
    /// Inline here-document or script file.
    pub style: SubmitStyle,
    /// Print `sbatch`'s stdout after a successful submission.
    pub echo: bool,
}

/// A batch job being assembled: its options, its command body and the tools
/// used to submit it.
#[derive(Debug, Clone)]
pub struct Slurm {
    options: OptionStore,
    body: CommandBody,
    shell: String,
    tools: ToolPaths,
    runner: Arc<dyn ProcessRunner>,
}

impl Default for Slurm {
    fn default() -> Self {
        Self::new()
    }
}

impl Slurm {
    /// An empty session using the default tools and `/bin/sh`.
    pub fn new() -> Self {
        Self {
            options: OptionStore::new(),
            body: CommandBody::new(),
            shell: DEFAULT_SHELL.to_string(),
            tools: ToolPaths::default(),
            runner: Arc::new(SystemRunner),
        }
    }

    /// An empty session using the shell and tool paths of `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            shell: config.shell.clone(),
            tools: config.tools.clone(),
            ..Self::new()
        }
    }

    /// Replaces the process runner.
    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Replaces the interpreter written to the `#!` line.
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Sets `name` without checking it against the known options.
    ///
    /// `false` removes the option; setting it again moves it to the end.
    pub fn set_option(&mut self, name: &str, value: impl Into<OptionValue>) -> &mut Self {
        self.options.set(name, value);
        self
    }

    /// Sets a known option given in any spelling (`-J`, `--job-name`, `job_name`).
    ///
    /// # Errors
    /// Returns [`SlurmError::UnknownOption`] when `sbatch` has no such option.
    pub fn add_argument(
        &mut self,
        name: &str,
        value: impl Into<OptionValue>,
    ) -> Result<&mut Self, SlurmError> {
        let spec = vocabulary::resolve(name).ok_or_else(|| SlurmError::UnknownOption(name.to_string()))?;
        Ok(self.set_option(spec.name, value))
    }

    /// [`Self::add_argument`] for every pair, stopping at the first unknown name.
    pub fn add_arguments<I, K, V>(&mut self, pairs: I) -> Result<&mut Self, SlurmError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<OptionValue>,
    {
        for (name, value) in pairs {
            self.add_argument(name.as_ref(), value)?;
        }
        Ok(self)
    }

    /// The options set so far.
    pub fn options(&self) -> &OptionStore {
        &self.options
    }

    /// Appends shell commands to the body.
    pub fn add_cmd(&mut self, command: &str) -> &mut Self {
        self.body.add(command);
        self
    }

    /// Empties the body.
    pub fn reset_cmd(&mut self) -> &mut Self {
        self.body.reset();
        self
    }

    /// The body, one command per line.
    pub fn commands(&self) -> &[String] {
        self.body.lines()
    }

    /// The batch script for the current state.
    pub fn script(&self, escape_dollar: bool) -> String {
        render_script(&self.options, self.body.lines(), &self.shell, escape_dollar)
    }

    /// The options in command-line form, as passed to `srun`.
    pub fn inline_arguments(&self) -> Result<String, SlurmError> {
        render_inline(&self.options).map_err(|value| {
            SlurmError::Execution(ExecutionError::CommandParse(format!(
                "option value cannot be quoted: {:?}",
                value
            )))
        })
    }

    /// Submits the script with `run_cmd` as its last command.
    ///
    /// `run_cmd` is not kept in the body. The job id is read from `sbatch`'s
    /// stdout: in parsable mode (the `parsable` option is set) the whole output
    /// must be `<id>[;<cluster>]` and a non-zero exit fails; otherwise the
    /// output must contain `Submitted batch job <id>`, whatever the exit code.
    ///
    /// # Errors
    /// - [`SlurmError::Io`] if the script file cannot be written.
    /// - [`SlurmError::Tool`] for a non-zero exit in parsable mode.
    /// - [`SlurmError::SubmissionOutput`] when no job id can be read.
    pub fn sbatch(&self, run_cmd: &str, options: &SubmitOptions) -> Result<Submission, SlurmError> {
        let lines = self.lines_with(run_cmd);
        let sbatch = expand_tool(&self.tools.sbatch)?;

        let invocation = match &options.style {
            SubmitStyle::Inline { escape_dollar } => {
                let script = render_script(&self.options, &lines, &self.shell, *escape_dollar);
                Invocation::shell(format!(
                    "{} << {}\n{}{}",
                    sbatch, HEREDOC_DELIMITER, script, HEREDOC_DELIMITER
                ))
            }
            SubmitStyle::File(path) => {
                let script = render_script(&self.options, &lines, &self.shell, false);
                fs::write(path, script).map_err(|e| SlurmError::Io {
                    path: path.display().to_string(),
                    source: e,
                })?;
                log::debug!("Wrote batch script to '{}'.", path.display());
                crate::slurm::tool_argv(&self.tools.sbatch, [path.display().to_string()])
                    .map(Invocation::argv)?
            }
        };

        let submission = if self.options.is_parsable() {
            let output = run_checked(self.runner.as_ref(), "sbatch", &invocation)?;
            parse_parsable(output)?
        } else {
            parse_submitted(self.runner.run(&invocation)?)?
        };

        log::info!("Submitted batch job {}.", submission.job_id);
        if options.echo {
            println!("{}", submission.stdout.trim_end());
        }
        Ok(submission)
    }

    /// Runs `run_cmd` through `srun` with the current options, attached to the terminal.
    ///
    /// # Errors
    /// Returns [`SlurmError::Tool`] when `srun` exits with a non-zero code.
    pub fn srun(&self, run_cmd: &str, echo: bool) -> Result<i32, SlurmError> {
        let srun = expand_tool(&self.tools.srun)?;
        let command = [srun, self.inline_arguments()?, run_cmd.trim().to_string()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if echo {
            println!("{}", command);
        }
        let output = run_checked(
            self.runner.as_ref(),
            "srun",
            &Invocation::shell(command).inheriting_stdio(),
        )?;
        Ok(output.code)
    }

    fn lines_with(&self, run_cmd: &str) -> Vec<String> {
        let mut body = self.body.clone();
        body.add(run_cmd);
        body.lines().to_vec()
    }
}

impl fmt::Display for Slurm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.script(false))
    }
}

// One `set_<option>` method per known option.
include!(concat!(env!("OUT_DIR"), "/sbatch_setters.rs"));

fn parse_parsable(output: ProcessOutput) -> Result<Submission, SlurmError> {
    let parsed = output
        .stdout
        .lines()
        .find_map(|line| PARSABLE_RE.captures(line))
        .and_then(|caps| {
            let job_id = caps.get(1)?.as_str().parse::<u64>().ok()?;
            let cluster = caps.get(2).map(|m| m.as_str().to_string());
            Some((job_id, cluster))
        });

    match parsed {
        Some((job_id, cluster)) => Ok(Submission {
            job_id,
            cluster,
            stdout: output.stdout,
        }),
        None => Err(SlurmError::SubmissionOutput {
            stdout: output.stdout,
            stderr: output.stderr,
        }),
    }
}

fn parse_submitted(output: ProcessOutput) -> Result<Submission, SlurmError> {
    let job_id = output
        .stdout
        .lines()
        .find(|line| line.contains(SUBMITTED_PHRASE))
        .and_then(|line| line.split_whitespace().nth(3))
        .and_then(|token| token.parse::<u64>().ok());

    match job_id {
        Some(job_id) => Ok(Submission {
            job_id,
            cluster: None,
            stdout: output.stdout,
        }),
        None => Err(SlurmError::SubmissionOutput {
            stdout: output.stdout,
            stderr: output.stderr,
        }),
    }
}
