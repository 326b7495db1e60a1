// src/parsers/sacct.rs

use crate::constants::{ACCOUNTING_JOB_NAME_COLUMN, SYNTHETIC_STEP_NAMES};
use crate::models::JobRecord;
use crate::parsers::ParseError;

/// Parses `sacct --format=...` output.
///
/// ```text
/// JobID           JobName      State    Elapsed
/// ------------ ---------- ---------- ----------
/// 4315805      test_slurm  COMPLETED   00:00:02
/// 4315805.bat+      batch  COMPLETED   00:00:02
/// 4315805.ext+     extern  COMPLETED   00:00:02
/// ```
///
/// The first line is the header, the second (the ruler) is discarded. Every
/// other non-blank line is split on whitespace and zipped against the header.
/// Rows describing the synthetic `batch` and `extern` steps are dropped, so a
/// single job yields one record and a job array one record per task.
///
/// Columns are split on whitespace, so an empty cell shifts the cells after it
/// one column to the left.
///
/// # Errors
/// - [`ParseError::MissingHeader`] when the output is empty.
/// - [`ParseError::MissingColumn`] when the header has no `JobName` column.
pub fn parse_sacct(raw: &str) -> Result<Vec<JobRecord>, ParseError> {
    let mut lines = raw.lines();
    let header: Vec<&str> = lines
        .next()
        .map(|line| line.split_whitespace().collect())
        .filter(|columns: &Vec<&str>| !columns.is_empty())
        .ok_or(ParseError::MissingHeader { tool: "sacct" })?;

    if !header.contains(&ACCOUNTING_JOB_NAME_COLUMN) {
        return Err(ParseError::MissingColumn {
            tool: "sacct",
            column: ACCOUNTING_JOB_NAME_COLUMN,
        });
    }

    // Ruler line.
    lines.next();

    let records: Vec<JobRecord> = lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            header
                .iter()
                .zip(line.split_whitespace())
                .map(|(column, value)| ((*column).to_string(), value.to_string()))
                .collect::<JobRecord>()
        })
        .filter(|record| {
            !record
                .get(ACCOUNTING_JOB_NAME_COLUMN)
                .is_some_and(|name| SYNTHETIC_STEP_NAMES.contains(&name.as_str()))
        })
        .collect();

    log::trace!("Parsed {} sacct records.", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE: &str = "\
JobID                     JobName      State    Elapsed               Start                 End   NNodes  AllocCPUS
------------ -------------------- ---------- ---------- ------------------- ------------------- -------- ----------
4315805                test_slurm  COMPLETED   00:00:02 2025-04-15T13:39:11 2025-04-15T13:39:13        1          1
4315805.bat+                batch  COMPLETED   00:00:02 2025-04-15T13:39:11 2025-04-15T13:39:13        1          1
4315805.ext+               extern  COMPLETED   00:00:02 2025-04-15T13:39:11 2025-04-15T13:39:13        1          1
";

    #[test]
    fn test_synthetic_steps_are_dropped() {
        let records = parse_sacct(SINGLE).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.get("JobID").map(String::as_str), Some("4315805"));
        assert_eq!(record.get("JobName").map(String::as_str), Some("test_slurm"));
        assert_eq!(record.get("State").map(String::as_str), Some("COMPLETED"));
        assert_eq!(record.get("AllocCPUS").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_array_tasks_keep_order() {
        let raw = "\
JobID      JobName      State
---------- ---------- ----------
4319559_1        test  COMPLETED
4319559_1.b+    batch  COMPLETED
4319559_2        test     FAILED
4319559_2.e+   extern  COMPLETED
";
        let records = parse_sacct(raw).unwrap();
        let ids: Vec<_> = records.iter().filter_map(|r| r.get("JobID")).collect();
        assert_eq!(ids, ["4319559_1", "4319559_2"]);
        assert_eq!(records[1].get("State").map(String::as_str), Some("FAILED"));
    }

    #[test]
    fn test_header_without_job_name() {
        let raw = "JobID State\n----- -----\n1 RUNNING\n";
        assert_eq!(
            parse_sacct(raw).unwrap_err(),
            ParseError::MissingColumn {
                tool: "sacct",
                column: "JobName"
            }
        );
    }

    #[test]
    fn test_empty_output() {
        assert_eq!(parse_sacct("").unwrap_err(), ParseError::MissingHeader { tool: "sacct" });
        let header_only = "JobID JobName\n------ -------\n";
        assert!(parse_sacct(header_only).unwrap().is_empty());
    }

    #[test]
    fn test_short_rows_keep_present_columns() {
        let raw = "JobID JobName State\n--- --- ---\n9 run\n";
        let records = parse_sacct(raw).unwrap();
        assert_eq!(records[0].len(), 2);
        assert!(records[0].get("State").is_none());
    }
}
