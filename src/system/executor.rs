// src/system/executor.rs

use std::fmt;
use std::io::Write;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    #[error("No command specified to run.")]
    EmptyCommand,
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("Command '{command}' produced output that was not valid UTF-8")]
    InvalidUtf8Output {
        command: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// What to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Program {
    /// An executable followed by its arguments, spawned directly.
    Argv(Vec<String>),
    /// A script handed to `sh -c`.
    Shell(String),
}

/// A single process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The program and its arguments.
    pub program: Program,
    /// Text written to the child's stdin, if any.
    pub stdin: Option<String>,
    /// When set, the child shares the terminal instead of being captured.
    pub inherit_stdio: bool,
}

impl Invocation {
    /// Runs `argv[0]` with the remaining elements as arguments, capturing output.
    pub fn argv<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: Program::Argv(argv.into_iter().map(Into::into).collect()),
            stdin: None,
            inherit_stdio: false,
        }
    }

    /// Runs `script` through `sh -c`, capturing output.
    pub fn shell(script: impl Into<String>) -> Self {
        Self {
            program: Program::Shell(script.into()),
            stdin: None,
            inherit_stdio: false,
        }
    }

    /// Feeds `text` to the child's stdin.
    pub fn with_stdin(mut self, text: impl Into<String>) -> Self {
        self.stdin = Some(text.into());
        self
    }

    /// Lets the child write straight to the terminal.
    pub fn inheriting_stdio(mut self) -> Self {
        self.inherit_stdio = true;
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.program {
            Program::Argv(argv) => {
                let joined = shlex::try_join(argv.iter().map(String::as_str))
                    .unwrap_or_else(|_| argv.join(" "));
                write!(f, "{}", joined)
            }
            Program::Shell(script) => write!(f, "sh -c {:?}", script),
        }
    }
}

/// Exit code and captured output of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code; `-1` when the process was killed by a signal.
    pub code: i32,
    /// Captured standard output (empty when stdio was inherited).
    pub stdout: String,
    /// Captured standard error (empty when stdio was inherited).
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the process exited with code 0.
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Something that can run an [`Invocation`] to completion.
///
/// Implementations block until the process exits. A non-zero exit code is not
/// an error at this level; callers decide what it means.
pub trait ProcessRunner: Send + Sync + fmt::Debug {
    /// Runs `invocation` and returns its exit code and output.
    ///
    /// # Errors
    /// Returns an [`ExecutionError`] if the process could not be started or its
    /// output could not be read.
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ExecutionError>;
}

/// Runs invocations as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ExecutionError> {
        let display = invocation.to_string();
        log::debug!("Executing: {}", display);

        let mut command = match &invocation.program {
            Program::Argv(argv) => {
                let (program, args) = argv.split_first().ok_or(ExecutionError::EmptyCommand)?;
                if program.trim().is_empty() {
                    return Err(ExecutionError::EmptyCommand);
                }
                let mut command = StdCommand::new(program);
                command.args(args);
                command
            }
            Program::Shell(script) => {
                if script.trim().is_empty() {
                    return Err(ExecutionError::EmptyCommand);
                }
                let mut command = StdCommand::new("sh");
                command.arg("-c").arg(script);
                command
            }
        };

        if invocation.inherit_stdio {
            command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        } else {
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
        }
        if invocation.stdin.is_some() {
            command.stdin(Stdio::piped());
        } else if invocation.inherit_stdio {
            command.stdin(Stdio::inherit());
        } else {
            command.stdin(Stdio::null());
        }

        let mut child = command
            .spawn()
            .map_err(|e| ExecutionError::CommandFailed(display.clone(), e))?;

        if let Some(text) = &invocation.stdin
            && let Some(mut stdin) = child.stdin.take()
        {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| ExecutionError::CommandFailed(display.clone(), e))?;
            // Dropping the handle closes the pipe so the child sees EOF.
        }

        let output = child
            .wait_with_output()
            .map_err(|e| ExecutionError::CommandFailed(display.clone(), e))?;

        let code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8(output.stdout).map_err(|e| ExecutionError::InvalidUtf8Output {
            command: display.clone(),
            source: e,
        })?;
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        log::debug!("'{}' exited with code {}.", display, code);
        log::trace!("stdout of '{}':\n{}", display, stdout);
        Ok(ProcessOutput {
            code,
            stdout,
            stderr,
        })
    }
}

/// Splits a configured tool command (`"sbatch"`, `"ssh login sbatch"`) into argv.
///
/// # Errors
/// Returns [`ExecutionError::CommandParse`] for unbalanced quotes and
/// [`ExecutionError::EmptyCommand`] for an empty string.
pub fn split_command(command_line: &str) -> Result<Vec<String>, ExecutionError> {
    let trimmed = command_line.trim();
    let parts = shlex::split(trimmed).ok_or_else(|| ExecutionError::CommandParse(trimmed.to_string()))?;
    if parts.is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }
    Ok(parts)
}
