// src/parsers/scontrol.rs

use crate::constants::{CONTROL_BLOCK_MARKER, CONTROL_EXIT_CODE_KEY, CONTROL_STATE_KEY, PENDING_STATE};
use crate::models::{ExitStatus, JobRecord};
use serde::Serialize;

/// One `JobId=` block of `scontrol show job` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlRecord {
    /// Every `key=value` pair of the block; later duplicates win.
    pub fields: JobRecord,
    /// Aggregate exit code of the block.
    pub exit_code: ExitStatus,
}

impl ControlRecord {
    fn from_fields(fields: JobRecord) -> Self {
        let exit_code = aggregate_exit_code(&fields);
        Self { fields, exit_code }
    }

    /// The raw value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// The `JobId` of the block.
    pub fn job_id(&self) -> Option<&str> {
        self.get("JobId")
    }
}

/// All records returned by one `scontrol show job` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ControlSnapshot {
    /// Records in output order.
    pub records: Vec<ControlRecord>,
}

impl ControlSnapshot {
    /// Parses raw `scontrol show job` output.
    pub fn parse(raw: &str) -> Self {
        Self {
            records: parse_scontrol(raw),
        }
    }

    /// The largest exit code across every record.
    ///
    /// `Unknown` when there are no records or when any record has no exit code
    /// yet; a job array is only finished when all of its tasks are.
    pub fn exit_code(&self) -> ExitStatus {
        let mut highest: Option<i32> = None;
        for record in &self.records {
            match record.exit_code {
                ExitStatus::Unknown => return ExitStatus::Unknown,
                ExitStatus::Code(code) => {
                    highest = Some(highest.map_or(code, |h| h.max(code)));
                }
            }
        }
        highest.map_or(ExitStatus::Unknown, ExitStatus::Code)
    }

    /// Whether the snapshot holds no record.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Splits `scontrol show job` output into one record per `JobId=` block.
///
/// Lines before the first block are ignored, as are tokens without `=`.
pub fn parse_scontrol(raw: &str) -> Vec<ControlRecord> {
    let mut blocks: Vec<JobRecord> = Vec::new();

    for line in raw.lines() {
        if line
            .split_whitespace()
            .any(|token| token.starts_with(CONTROL_BLOCK_MARKER))
        {
            blocks.push(JobRecord::new());
        }
        let Some(current) = blocks.last_mut() else {
            continue;
        };
        for token in line.split_whitespace() {
            if let Some((key, value)) = token.split_once('=') {
                current.insert(key.to_string(), value.to_string());
            }
        }
    }

    log::trace!("Parsed {} scontrol blocks.", blocks.len());
    blocks.into_iter().map(ControlRecord::from_fields).collect()
}

/// The largest numeric component of the block's `ExitCode` (`N:M`).
///
/// A pending job, or one without a readable exit code, is `Unknown`.
fn aggregate_exit_code(fields: &JobRecord) -> ExitStatus {
    if fields.get(CONTROL_STATE_KEY).is_some_and(|s| s == PENDING_STATE) {
        return ExitStatus::Unknown;
    }
    fields
        .get(CONTROL_EXIT_CODE_KEY)
        .and_then(|raw| {
            raw.split(':')
                .map(|part| part.trim().parse::<i32>().ok())
                .collect::<Option<Vec<_>>>()
        })
        .and_then(|parts| parts.into_iter().max())
        .map_or(ExitStatus::Unknown, ExitStatus::Code)
}
