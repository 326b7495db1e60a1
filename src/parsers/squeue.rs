// src/parsers/squeue.rs

use crate::config::ConfigError;
use crate::constants::{QUEUE_JOB_ID_COLUMN, QUEUE_NAME_COLUMN};
use crate::models::JobRecord;
use crate::parsers::ParseError;
use indexmap::IndexMap;
use serde::Serialize;

/// The `--format` template handed to `squeue` together with the delimiter and
/// quote character the template uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueFormat {
    template: String,
    delimiter: u8,
    quote: u8,
}

impl QueueFormat {
    /// Validates `template` as a single delimited record.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidQueueFormat`] when the delimiter or quote is
    /// not a single ASCII character, when the quotes are unbalanced, when the
    /// template spans more than one record, or when it has fewer than two
    /// non-empty fields.
    pub fn new(template: &str, delimiter: char, quote: char) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidQueueFormat {
            template: template.to_string(),
            reason: reason.to_string(),
        };

        let delimiter = ascii_byte(delimiter).ok_or_else(|| invalid("delimiter must be a single ASCII character"))?;
        let quote = ascii_byte(quote).ok_or_else(|| invalid("quote must be a single ASCII character"))?;
        if delimiter == quote {
            return Err(invalid("delimiter and quote must differ"));
        }

        let template = template.trim();
        if template.bytes().filter(|b| *b == quote).count() % 2 != 0 {
            return Err(invalid("unbalanced quotes"));
        }

        let mut reader = reader_for(template, delimiter, quote, false);
        let mut records = reader.records();
        let first = match records.next() {
            Some(Ok(record)) => record,
            Some(Err(e)) => return Err(invalid(&e.to_string())),
            None => return Err(invalid("template is empty")),
        };
        if records.next().is_some() {
            return Err(invalid("template must be a single record"));
        }
        let non_empty = first.iter().filter(|field| !field.trim().is_empty()).count();
        if non_empty < 2 {
            return Err(invalid("template needs at least two fields"));
        }

        Ok(Self {
            template: template.to_string(),
            delimiter,
            quote,
        })
    }

    /// The template passed to `squeue --format`.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The field delimiter.
    pub fn delimiter(&self) -> char {
        char::from(self.delimiter)
    }

    /// The quote character.
    pub fn quote(&self) -> char {
        char::from(self.quote)
    }
}

impl Default for QueueFormat {
    fn default() -> Self {
        Self {
            template: crate::constants::DEFAULT_SQUEUE_FORMAT.to_string(),
            delimiter: b',',
            quote: b'"',
        }
    }
}

/// A data row that could not be keyed by job id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based line of the row in the raw output.
    pub line: u64,
    /// Why the row was skipped.
    pub reason: String,
}

/// The parsed queue: job id to row, in output order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueueSnapshot {
    /// Rows keyed by their job id.
    pub jobs: IndexMap<String, JobRecord>,
    /// Rows that were dropped while parsing.
    pub skipped: Vec<SkippedRow>,
}

impl QueueSnapshot {
    /// The row of `job_id`, if queued.
    pub fn get(&self, job_id: &str) -> Option<&JobRecord> {
        self.jobs.get(job_id)
    }

    /// Jobs whose name contains `fragment`.
    pub fn filter_by_name(&self, fragment: &str) -> Vec<(&str, &JobRecord)> {
        self.jobs
            .iter()
            .filter(|(_, record)| {
                record
                    .get(QUEUE_NAME_COLUMN)
                    .is_some_and(|name| name.contains(fragment))
            })
            .map(|(id, record)| (id.as_str(), record))
            .collect()
    }

    /// Number of jobs parsed.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether no job was parsed.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Parses `squeue --format=<template>` output.
///
/// The first record is the header. Every following record becomes a
/// [`JobRecord`] keyed by its `JOBID` value. Short rows keep the columns they
/// have; extra trailing fields are kept under positional names.
///
/// # Errors
/// - [`ParseError::MissingHeader`] when the output has no header record.
/// - [`ParseError::MissingColumn`] when the header has no `JOBID` column.
pub fn parse_squeue(raw: &str, format: &QueueFormat) -> Result<QueueSnapshot, ParseError> {
    let mut reader = reader_for(raw, format.delimiter, format.quote, true);

    let header: Vec<String> = match reader.headers() {
        Ok(h) if !h.is_empty() && h.iter().any(|c| !c.is_empty()) => {
            h.iter().map(str::to_string).collect()
        }
        _ => return Err(ParseError::MissingHeader { tool: "squeue" }),
    };
    if !header.iter().any(|c| c == QUEUE_JOB_ID_COLUMN) {
        return Err(ParseError::MissingColumn {
            tool: "squeue",
            column: QUEUE_JOB_ID_COLUMN,
        });
    }

    let mut snapshot = QueueSnapshot::default();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(csv::Position::line).unwrap_or(0);
                log::warn!("Skipping malformed squeue row at line {}: {}", line, e);
                snapshot.skipped.push(SkippedRow {
                    line,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let line = record.position().map(csv::Position::line).unwrap_or(0);

        let mut row = JobRecord::new();
        for (index, value) in record.iter().enumerate() {
            let column = header
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("COLUMN{}", index + 1));
            row.insert(column, value.to_string());
        }

        match row.get(QUEUE_JOB_ID_COLUMN).filter(|id| !id.is_empty()) {
            Some(id) => {
                let id = id.clone();
                snapshot.jobs.insert(id, row);
            }
            None => {
                log::warn!("Skipping squeue row at line {}: no job id.", line);
                snapshot.skipped.push(SkippedRow {
                    line,
                    reason: "missing job id".to_string(),
                });
            }
        }
    }

    log::debug!(
        "Parsed {} queued jobs ({} rows skipped).",
        snapshot.jobs.len(),
        snapshot.skipped.len()
    );
    Ok(snapshot)
}

fn reader_for(raw: &str, delimiter: u8, quote: u8, has_headers: bool) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(quote)
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes())
}

fn ascii_byte(c: char) -> Option<u8> {
    if c.is_ascii() { u8::try_from(c).ok() } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUEUE: &str = concat!(
        "\"JOBID\",\"NAME\",\"ST\",\"TIME\",\"TIME_LEFT\",\"NODES\",\"CPUS\",\"MIN_MEMORY\",\"TRES_PER_NODE\",\"NODELIST(REASON)\"\n",
        "\"1001\",\"train_model\",\"R\",\"1:02\",\"58:58\",\"1\",\"4\",\"8G\",\"gpu:1\",\"node01\"\n",
        "\"1002_3\",\"eval model\",\"PD\",\"0:00\",\"1:00:00\",\"2\",\"8\",\"16G\",\"N/A\",\"(Priority)\"\n",
    );

    #[test]
    fn test_parse_default_format() {
        let snapshot = parse_squeue(QUEUE, &QueueFormat::default()).unwrap();

        assert_eq!(snapshot.len(), 2);
        let job = snapshot.get("1001").unwrap();
        assert_eq!(job.get("NAME").map(String::as_str), Some("train_model"));
        assert_eq!(job.get("NODELIST(REASON)").map(String::as_str), Some("node01"));
        let array_task = snapshot.get("1002_3").unwrap();
        assert_eq!(array_task.get("ST").map(String::as_str), Some("PD"));
        assert!(snapshot.skipped.is_empty());
    }

    #[test]
    fn test_header_only_is_empty() {
        let header = QUEUE.lines().next().unwrap();
        let snapshot = parse_squeue(header, &QueueFormat::default()).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_missing_job_id_column() {
        let raw = "\"NAME\",\"ST\"\n\"a\",\"R\"\n";
        let err = parse_squeue(raw, &QueueFormat::default()).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingColumn {
                tool: "squeue",
                column: "JOBID"
            }
        );
    }

    #[test]
    fn test_empty_output_has_no_header() {
        let err = parse_squeue("", &QueueFormat::default()).unwrap_err();
        assert_eq!(err, ParseError::MissingHeader { tool: "squeue" });
    }

    #[test]
    fn test_rows_without_job_id_are_skipped() {
        let raw = "JOBID,NAME\n,orphan\n7,kept\n";
        let snapshot = parse_squeue(raw, &QueueFormat::default()).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.get("7").is_some());
        assert_eq!(snapshot.skipped.len(), 1);
        assert_eq!(snapshot.skipped[0].line, 2);
    }

    #[test]
    fn test_short_rows_and_whitespace() {
        let raw = " JOBID , NAME , ST \n 12 , short \n";
        let snapshot = parse_squeue(raw, &QueueFormat::default()).unwrap();
        let job = snapshot.get("12").unwrap();
        assert_eq!(job.get("NAME").map(String::as_str), Some("short"));
        assert!(job.get("ST").is_none());
    }

    #[test]
    fn test_custom_delimiter() {
        let format = QueueFormat::new("%i|%j", '|', '\'').unwrap();
        let snapshot = parse_squeue("JOBID|NAME\n5|x\n", &format).unwrap();
        assert_eq!(snapshot.get("5").and_then(|r| r.get("NAME")).map(String::as_str), Some("x"));
    }

    #[test]
    fn test_filter_by_name() {
        let snapshot = parse_squeue(QUEUE, &QueueFormat::default()).unwrap();
        let matches = snapshot.filter_by_name("model");
        assert_eq!(matches.len(), 2);
        let matches = snapshot.filter_by_name("train");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].0, "1001");
        assert!(snapshot.filter_by_name("missing").is_empty());
    }

    #[test]
    fn test_queue_format_validation() {
        assert!(QueueFormat::new(crate::constants::DEFAULT_SQUEUE_FORMAT, ',', '"').is_ok());
        assert!(QueueFormat::new("\"%i\",\"%j", ',', '"').is_err());
        assert!(QueueFormat::new("%i", ',', '"').is_err());
        assert!(QueueFormat::new("%i,%j\n%t,%M", ',', '"').is_err());
        assert!(QueueFormat::new("%i,%j", ',', ',').is_err());
        assert!(QueueFormat::new("%i,%j", 'é', '"').is_err());
        assert!(QueueFormat::new("", ',', '"').is_err());
    }
}
