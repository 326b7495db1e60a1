// src/slurm/mod.rs

//! # Slurm Tool Wrappers
//!
//! Each wrapper owns the command used to reach its tool and a shared
//! [`ProcessRunner`]. They build the command line, run it, and hand the output
//! to the matching parser in [`crate::parsers`].

use crate::config::{ConfigError, expand_tool};
use crate::parsers::ParseError;
use crate::system::executor::{self, ExecutionError, Invocation, ProcessOutput, ProcessRunner};
use thiserror::Error;

pub mod sacct;
pub mod scancel;
pub mod scontrol;
pub mod session;
pub mod squeue;

#[derive(Error, Debug)]
pub enum SlurmError {
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("{tool} exited with code {code}: {stderr}")]
    Tool {
        tool: String,
        code: i32,
        stderr: String,
    },
    #[error("sbatch did not report a submitted job.\nstdout: {stdout}\nstderr: {stderr}")]
    SubmissionOutput { stdout: String, stderr: String },
    #[error("Unknown sbatch option '{0}'.")]
    UnknownOption(String),
    #[error("Could not write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Expands and splits a configured tool command, then appends `args`.
pub(crate) fn tool_argv<I, S>(command: &str, args: I) -> Result<Vec<String>, SlurmError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut argv = executor::split_command(&expand_tool(command)?)?;
    argv.extend(args.into_iter().map(Into::into));
    Ok(argv)
}

/// Runs `invocation` and turns a non-zero exit into [`SlurmError::Tool`].
pub(crate) fn run_checked(
    runner: &dyn ProcessRunner,
    tool: &str,
    invocation: &Invocation,
) -> Result<ProcessOutput, SlurmError> {
    let output = runner.run(invocation)?;
    if !output.success() {
        return Err(SlurmError::Tool {
            tool: tool.to_string(),
            code: output.code,
            stderr: output.stderr.trim().to_string(),
        });
    }
    Ok(output)
}

#[cfg(test)]
pub(crate) mod testing {
    //! A scripted [`ProcessRunner`] shared by the wrapper tests.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub(crate) struct ScriptedRunner {
        pub(crate) calls: Mutex<Vec<Invocation>>,
        replies: Mutex<VecDeque<ProcessOutput>>,
    }

    impl ScriptedRunner {
        pub(crate) fn replying(replies: Vec<ProcessOutput>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                replies: Mutex::new(replies.into()),
            }
        }

        pub(crate) fn calls(&self) -> Vec<Invocation> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ProcessRunner for ScriptedRunner {
        fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ExecutionError> {
            self.calls.lock().unwrap().push(invocation.clone());
            Ok(self.replies.lock().unwrap().pop_front().unwrap_or_default())
        }
    }

    pub(crate) fn ok(stdout: &str) -> ProcessOutput {
        ProcessOutput {
            code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub(crate) fn failed(code: i32, stderr: &str) -> ProcessOutput {
        ProcessOutput {
            code,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}
