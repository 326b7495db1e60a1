// src/core/option_store.rs

use crate::core::formatter::format_value;
use crate::models::{Formatted, OptionValue};
use indexmap::IndexMap;

/// Ordered mapping from option name to its formatted value.
///
/// Insertion order is display order. Setting an existing name again replaces
/// its value and moves it to the end. Names are kept in the spelling they were
/// given (minus leading dashes); hyphenation happens only when rendering.
/// `job-name` and `job_name` are the same option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionStore {
    // canonical key -> (name as last given, value)
    entries: IndexMap<String, (String, Formatted)>,
}

impl OptionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Formats `value` and stores it under `name`.
    ///
    /// A value that formats to [`Formatted::Suppress`] (`false`) removes the
    /// option instead. Unknown names are accepted as-is.
    pub fn set(&mut self, name: &str, value: impl Into<OptionValue>) -> &mut Self {
        let name = Self::strip_dashes(name);
        if name.is_empty() {
            log::warn!("Ignoring option with an empty name.");
            return self;
        }

        let formatted = format_value(&value.into());
        let key = Self::canonical_key(name);
        self.entries.shift_remove(&key);
        match formatted {
            Formatted::Suppress => {
                log::trace!("Option '{}' suppressed.", name);
            }
            other => {
                log::trace!("Option '{}' set to {:?}.", name, other);
                self.entries.insert(key, (name.to_string(), other));
            }
        }
        self
    }

    /// Returns the formatted value of `name`, if present.
    pub fn get(&self, name: &str) -> Option<&Formatted> {
        self.entries.get(&Self::lookup_key(name)).map(|(_, value)| value)
    }

    /// Whether `name` is present (as a value or a flag).
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&Self::lookup_key(name))
    }

    /// Removes `name`, returning its formatted value.
    pub fn remove(&mut self, name: &str) -> Option<Formatted> {
        self.entries.shift_remove(&Self::lookup_key(name)).map(|(_, value)| value)
    }

    /// Whether `sbatch` will be asked for machine-parsable output.
    pub fn is_parsable(&self) -> bool {
        self.contains("parsable")
    }

    /// Iterates over `(name, value)` in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Formatted)> {
        self.entries.values().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of options present.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no option is present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every option.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The option as written in a script or on a command line: `-k` for a
    /// single character, `--long-name` otherwise.
    pub fn display_token(name: &str) -> String {
        let hyphenated = name.replace('_', "-");
        if hyphenated.chars().count() == 1 {
            format!("-{}", hyphenated)
        } else {
            format!("--{}", hyphenated)
        }
    }

    fn strip_dashes(name: &str) -> &str {
        name.trim().trim_start_matches('-')
    }

    fn canonical_key(name: &str) -> String {
        name.replace('-', "_")
    }

    fn lookup_key(name: &str) -> String {
        Self::canonical_key(Self::strip_dashes(name))
    }
}
