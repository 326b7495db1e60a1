// src/parsers/mod.rs

//! # Output Parsers
//!
//! Pure functions turning the text printed by Slurm's query tools into
//! structured records. None of them spawn processes; the wrappers in
//! [`crate::slurm`] feed them the captured output.
//!
//! - **`squeue`**: delimited tabular output, one header row, keyed by job id.
//! - **`scontrol`**: `key=value` blocks, one per job, with the aggregate exit code.
//! - **`sacct`**: whitespace-aligned columns under a header and a ruler line.

use thiserror::Error;

pub mod sacct;
pub mod scontrol;
pub mod squeue;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("{tool} output has no header line.")]
    MissingHeader { tool: &'static str },
    #[error("{tool} output has no '{column}' column.")]
    MissingColumn {
        tool: &'static str,
        column: &'static str,
    },
}
