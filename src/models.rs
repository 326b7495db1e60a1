// src/models.rs

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::ops::Range;
use std::time::Duration;

/// One row of tool output: column name to raw value, in column order.
pub type JobRecord = IndexMap<String, String>;

// --- OPTION VALUES ---

/// A typed option value, before it is flattened into Slurm's option syntax.
///
/// Every variant has a fixed rendering (see [`crate::core::formatter`]), and the
/// compound variants nest arbitrarily deep.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// Passed through verbatim, trimmed.
    Str(String),
    /// Rendered in decimal.
    Int(i64),
    /// Rendered in decimal; integral values keep a trailing `.0`.
    Float(f64),
    /// Half-open range `[start, stop)`, rendered as `start-(stop-1)[:step]`.
    Range { start: i64, stop: i64, step: i64 },
    /// Rendered as comma-joined `key:value` pairs, in insertion order.
    Map(IndexMap<String, OptionValue>),
    /// Rendered as `D-HH:MM:SS`.
    Duration(Duration),
    /// Rendered as the comma-joined rendering of each element.
    List(Vec<OptionValue>),
    /// `true` renders the option as a bare flag, `false` removes it.
    Bool(bool),
}

impl OptionValue {
    /// A `[start, stop)` range with step 1.
    pub fn range(start: i64, stop: i64) -> Self {
        Self::stepped_range(start, stop, 1)
    }

    /// A `[start, stop)` range with an explicit step.
    pub fn stepped_range(start: i64, stop: i64, step: i64) -> Self {
        Self::Range { start, stop, step }
    }

    /// Builds a `Map` from `(key, value)` pairs, keeping their order.
    pub fn map<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<OptionValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for OptionValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Duration> for OptionValue {
    fn from(value: Duration) -> Self {
        Self::Duration(value)
    }
}

impl From<Range<i64>> for OptionValue {
    fn from(value: Range<i64>) -> Self {
        Self::range(value.start, value.end)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

macro_rules! int_conversions {
    ($($t:ty),*) => {
        $(
            impl From<$t> for OptionValue {
                fn from(value: $t) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

int_conversions!(i8, i16, i32, i64, u8, u16, u32);

// Wider unsigned integers keep their exact decimal form.
impl From<u64> for OptionValue {
    fn from(value: u64) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<usize> for OptionValue {
    fn from(value: usize) -> Self {
        Self::Str(value.to_string())
    }
}

impl<T: Into<OptionValue>> From<Vec<T>> for OptionValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<OptionValue>, const N: usize> From<[T; N]> for OptionValue {
    fn from(values: [T; N]) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<OptionValue>> From<IndexMap<K, V>> for OptionValue {
    fn from(values: IndexMap<K, V>) -> Self {
        Self::map(values)
    }
}

/// The result of formatting an [`OptionValue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatted {
    /// The option carries this value token.
    Value(String),
    /// The option is present but has no value token (a bare flag).
    Flag,
    /// The option must not be rendered at all.
    Suppress,
}

impl Formatted {
    /// The text written after the option name. Flags render as an empty string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Value(value) => value,
            Self::Flag | Self::Suppress => "",
        }
    }
}

// --- PARSED OUTPUT ---

/// Aggregate exit code of a job as reported by `scontrol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExitStatus {
    /// The largest exit-code component reported for the job.
    Code(i32),
    /// The job has not produced an exit code yet.
    Unknown,
}

impl ExitStatus {
    /// Returns the numeric code, if known.
    pub fn code(self) -> Option<i32> {
        match self {
            Self::Code(code) => Some(code),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{}", code),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A successful `sbatch` submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Scheduler-assigned job id.
    pub job_id: u64,
    /// Cluster name, reported only in parsable mode.
    pub cluster: Option<String>,
    /// Raw standard output of `sbatch`.
    pub stdout: String,
}
