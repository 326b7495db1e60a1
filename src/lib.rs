// src/lib.rs

//! A typed client for the Slurm batch scheduler.
//!
//! Options are set as typed values on a [`Slurm`] session, rendered into an
//! `sbatch` script and submitted through the scheduler's command-line tools.
//! The output of `squeue`, `scontrol` and `sacct` is parsed into records, and
//! [`Scancel`] escalates from TERM to KILL to a plain cancel for jobs that
//! refuse to stop.

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod models;
pub mod parsers;
pub mod slurm;
pub mod system;

pub use crate::config::ClientConfig;
pub use crate::models::{ExitStatus, Formatted, JobRecord, OptionValue, Submission};
pub use crate::slurm::SlurmError;
pub use crate::slurm::sacct::Sacct;
pub use crate::slurm::scancel::Scancel;
pub use crate::slurm::scontrol::Scontrol;
pub use crate::slurm::session::{Slurm, SubmitOptions, SubmitStyle};
pub use crate::slurm::squeue::Squeue;
