// src/cli/arg_parser.rs

use crate::core::vocabulary::{self, Arity, OptionSpec};
use crate::models::OptionValue;
use anyhow::{Result, anyhow};

/// `sbatch`-style options followed by the command to run.
///
/// Accepted forms, resolved through the option table:
/// - `--name=value`, `--name value`
/// - `-k value`, `-kvalue`
/// - `--flag`, `-f`
///
/// Options whose value is optional (`--exclusive`) only take one through `=`
/// or when attached to a short alias; otherwise they are flags. Everything
/// that is not an option, and everything after `--`, is the command.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArgs {
    /// Options in the order given.
    pub options: Vec<(&'static OptionSpec, OptionValue)>,
    /// The command words, joined by spaces.
    pub command: String,
}

impl ParsedArgs {
    /// Parses `cli_params`.
    ///
    /// # Errors
    /// Fails on an unknown option, on a value option without a value, or when
    /// no command is given.
    pub fn new(cli_params: &[String]) -> Result<Self> {
        let mut options = Vec::new();
        let mut command_words: Vec<&str> = Vec::new();
        let mut params_iter = cli_params.iter().map(String::as_str).peekable();

        while let Some(param) = params_iter.next() {
            if param == "--" {
                command_words.extend(params_iter.by_ref());
                break;
            }

            if let Some(long) = param.strip_prefix("--") {
                let (name, inline_value) = match long.split_once('=') {
                    Some((name, value)) => (name, Some(value)),
                    None => (long, None),
                };
                let spec = lookup(name, param)?;
                let value = match (spec.arity, inline_value) {
                    (Arity::Flag, Some(_)) => {
                        return Err(anyhow!("Option '--{}' does not take a value.", name));
                    }
                    (Arity::Flag, None) | (Arity::Optional, None) => OptionValue::Bool(true),
                    (_, Some(value)) => OptionValue::from(value),
                    (Arity::Value, None) => {
                        let value = params_iter
                            .next()
                            .ok_or_else(|| anyhow!("Option '{}' requires a value.", param))?;
                        OptionValue::from(value)
                    }
                };
                options.push((spec, value));
            } else if let Some(short) = param.strip_prefix('-').filter(|s| !s.is_empty()) {
                let mut chars = short.chars();
                let alias = chars.next().unwrap_or_default();
                let attached = chars.as_str();
                let spec = lookup(&alias.to_string(), param)?;
                let value = match (spec.arity, attached.is_empty()) {
                    (Arity::Flag, false) => {
                        return Err(anyhow!("Option '-{}' does not take a value.", alias));
                    }
                    (Arity::Flag, true) | (Arity::Optional, true) => OptionValue::Bool(true),
                    (_, false) => OptionValue::from(attached.trim_start_matches('=')),
                    (Arity::Value, true) => {
                        let value = params_iter
                            .next()
                            .ok_or_else(|| anyhow!("Option '{}' requires a value.", param))?;
                        OptionValue::from(value)
                    }
                };
                options.push((spec, value));
            } else {
                // The first non-option word starts the command.
                command_words.push(param);
                command_words.extend(params_iter.by_ref());
                break;
            }
        }

        if command_words.is_empty() {
            return Err(anyhow!("No command specified to run."));
        }

        Ok(Self {
            options,
            command: command_words.join(" "),
        })
    }
}

fn lookup(name: &str, param: &str) -> Result<&'static OptionSpec> {
    vocabulary::resolve(name).ok_or_else(|| anyhow!("Unknown sbatch option '{}'.", param))
}
