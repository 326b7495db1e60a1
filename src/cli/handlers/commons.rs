// src/cli/handlers/commons.rs

// Output helpers shared by the query handlers.

use crate::models::JobRecord;
use crate::slurm::session::Slurm;
use crate::cli::arg_parser::ParsedArgs;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints records as an aligned table, columns taken from the first record.
pub fn print_table<'a, I>(records: I)
where
    I: IntoIterator<Item = &'a JobRecord>,
{
    let records: Vec<&JobRecord> = records.into_iter().collect();
    let Some(first) = records.first() else {
        println!("{}", "No jobs found.".yellow());
        return;
    };

    let columns: Vec<&String> = first.keys().collect();
    let widths: Vec<usize> = columns
        .iter()
        .map(|column| {
            records
                .iter()
                .filter_map(|r| r.get(column.as_str()))
                .map(|v| v.chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{:<width$}", column, width = width))
        .collect();
    println!("{}", header.join("  ").bold());

    for record in &records {
        let row: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(column, width)| {
                let value = record.get(column.as_str()).map(String::as_str).unwrap_or("");
                format!("{:<width$}", value, width = width)
            })
            .collect();
        println!("{}", row.join("  ").trim_end());
    }
}

/// Builds a session from parsed command-line options.
pub fn session_from(parsed: &ParsedArgs, slurm: Slurm) -> Slurm {
    let mut slurm = slurm;
    for (spec, value) in &parsed.options {
        slurm.set_option(spec.name, value.clone());
    }
    slurm
}
