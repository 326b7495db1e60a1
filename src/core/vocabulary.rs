// src/core/vocabulary.rs

//! The table of options `sbatch` accepts.
//!
//! The table is generated at build time from `options/sbatch.toml`.

/// Whether an option takes a value on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// `--name value` or `--name=value`.
    Value,
    /// `--name`, never followed by a value.
    Flag,
    /// `--name` or `--name=value`.
    Optional,
}

/// One known option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    /// Canonical snake_case name (`cpus_per_task`).
    pub name: &'static str,
    /// Single-letter alias (`c`).
    pub short: Option<char>,
    /// Whether a value follows the option.
    pub arity: Arity,
}

impl OptionSpec {
    /// The long form as written on the command line (`--cpus-per-task`).
    pub fn long_flag(&self) -> String {
        format!("--{}", self.name.replace('_', "-"))
    }
}

include!(concat!(env!("OUT_DIR"), "/sbatch_options.rs"));

/// Resolves any spelling of an option to its table entry.
///
/// Accepts short and long forms with or without dashes, and hyphen or
/// underscore word separators: `-J`, `J`, `--job-name`, `job-name`, `job_name`.
pub fn resolve(token: &str) -> Option<&'static OptionSpec> {
    let bare = token.trim().trim_start_matches('-');
    let mut chars = bare.chars();
    match (chars.next(), chars.next()) {
        (None, _) => None,
        (Some(c), None) => OPTIONS.iter().find(|spec| spec.short == Some(c)),
        _ => {
            let name = bare.replace('-', "_");
            OPTIONS.iter().find(|spec| spec.name == name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_every_spelling() {
        for token in ["-J", "J", "--job-name", "--job_name", "job-name", "job_name"] {
            let spec = resolve(token).unwrap_or_else(|| panic!("'{}' did not resolve", token));
            assert_eq!(spec.name, "job_name");
        }
        assert_eq!(resolve("-c").map(|s| s.name), Some("cpus_per_task"));
        assert_eq!(resolve("a").map(|s| s.name), Some("array"));
    }

    #[test]
    fn test_resolve_unknown() {
        assert!(resolve("--not-an-option").is_none());
        assert!(resolve("-Z").is_none());
        assert!(resolve("--").is_none());
        assert!(resolve("").is_none());
    }

    #[test]
    fn test_arity_and_long_flag() {
        let contiguous = resolve("contiguous").unwrap();
        assert_eq!(contiguous.arity, Arity::Flag);
        let time = resolve("-t").unwrap();
        assert_eq!(time.arity, Arity::Value);
        assert_eq!(resolve("ignore_pbs").unwrap().long_flag(), "--ignore-pbs");
    }

    #[test]
    fn test_short_aliases_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for spec in OPTIONS.iter() {
            if let Some(c) = spec.short {
                assert!(seen.insert(c), "duplicate short alias -{}", c);
            }
        }
    }
}
