// src/core/formatter.rs

//! Flattens typed [`OptionValue`]s into Slurm's textual option syntax.

use crate::models::{Formatted, OptionValue};
use std::time::Duration;

/// Formats a value for use as an option's value token.
///
/// `true` becomes [`Formatted::Flag`] and `false` becomes [`Formatted::Suppress`];
/// everything else becomes a trimmed [`Formatted::Value`].
pub fn format_value(value: &OptionValue) -> Formatted {
    match value {
        OptionValue::Bool(true) => Formatted::Flag,
        OptionValue::Bool(false) => Formatted::Suppress,
        other => Formatted::Value(format_text(other)),
    }
}

/// Renders a value as text. Nested `false` elements are dropped by the callers.
fn format_text(value: &OptionValue) -> String {
    let text = match value {
        OptionValue::Str(s) => s.clone(),
        OptionValue::Int(i) => i.to_string(),
        OptionValue::Float(f) => format_float(*f),
        OptionValue::Range { start, stop, step } => format_range(*start, *stop, *step),
        OptionValue::Map(entries) => entries
            .iter()
            .filter_map(|(key, v)| format_nested(v).map(|text| format!("{}:{}", key.trim(), text)))
            .collect::<Vec<_>>()
            .join(","),
        OptionValue::Duration(d) => format_duration(*d),
        OptionValue::List(items) => items
            .iter()
            .filter_map(format_nested)
            .collect::<Vec<_>>()
            .join(","),
        OptionValue::Bool(_) => String::new(),
    };
    text.trim().to_string()
}

fn format_nested(value: &OptionValue) -> Option<String> {
    match value {
        OptionValue::Bool(false) => None,
        other => Some(format_text(other)),
    }
}

/// Integral floats keep a `.0` so `2.0` stays distinguishable from `2`.
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// `[start, stop)` is written with its last included value as the upper bound.
fn format_range(start: i64, stop: i64, step: i64) -> String {
    let last = stop.saturating_sub(1);
    if step == 1 {
        format!("{}-{}", start, last)
    } else {
        format!("{}-{}:{}", start, last, step)
    }
}

/// Formats a duration as `D-HH:MM:SS`. Sub-second precision is dropped.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let seconds = total % 60;
    let minutes = (total / 60) % 60;
    let hours = (total / 3600) % 24;
    let days = total / 86_400;
    format!("{}-{:02}:{:02}:{:02}", days, hours, minutes, seconds)
}
