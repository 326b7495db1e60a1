// src/core/script.rs

//! Turns an [`OptionStore`] and a command body into submittable text.

use crate::constants::{DIRECTIVE_PREFIX, DIRECTIVE_TOKEN_WIDTH};
use crate::core::option_store::OptionStore;
use crate::models::Formatted;
use std::borrow::Cow;

/// Ordered shell commands that make up the body of a batch script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandBody {
    lines: Vec<String>,
}

impl CommandBody {
    /// Creates an empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `command`. Multi-line text is split into lines; blank lines are dropped.
    pub fn add(&mut self, command: &str) -> &mut Self {
        self.lines.extend(
            command
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string),
        );
        self
    }

    /// Removes every command.
    pub fn reset(&mut self) {
        self.lines.clear();
    }

    /// The commands, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether the body has no commands.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Renders a batch script.
///
/// ```text
/// #!<shell>
///
/// #SBATCH --<name, left-justified>  <value>
/// ...
///
/// <body>
/// ```
///
/// The blank line before the body is only written when there is a body. When
/// `escape_dollar` is set, every `$` in the body becomes `\$` so that a
/// here-document does not expand it early. The result ends with exactly one
/// newline.
pub fn render_script(
    options: &OptionStore,
    body: &[String],
    shell: &str,
    escape_dollar: bool,
) -> String {
    let mut lines: Vec<Cow<'_, str>> = vec![Cow::Owned(format!("#!{}", shell)), Cow::Borrowed("")];

    for (name, value) in options.iter() {
        lines.push(Cow::Owned(format!(
            "{} {:<width$} {}",
            DIRECTIVE_PREFIX,
            OptionStore::display_token(name),
            value.as_str(),
            width = DIRECTIVE_TOKEN_WIDTH
        )));
    }

    if !body.is_empty() {
        lines.push(Cow::Borrowed(""));
        for command in body {
            if escape_dollar {
                lines.push(Cow::Owned(command.replace('$', "\\$")));
            } else {
                lines.push(Cow::Borrowed(command));
            }
        }
    }

    let mut script = lines.join("\n");
    let trimmed_len = script.trim_end_matches('\n').len();
    script.truncate(trimmed_len);
    script.push('\n');
    script
}

/// Renders the options as command-line arguments (`--name=value`, `--flag`,
/// `-k value`), each value shell-quoted.
///
/// # Errors
/// Returns the offending value if it cannot be quoted (it contains a NUL byte).
pub fn render_inline(options: &OptionStore) -> Result<String, String> {
    let mut args = Vec::with_capacity(options.len());
    for (name, value) in options.iter() {
        let token = OptionStore::display_token(name);
        match value {
            Formatted::Value(v) => {
                let quoted = shlex::try_quote(v).map_err(|_| v.clone())?;
                if token.starts_with("--") {
                    args.push(format!("{}={}", token, quoted));
                } else {
                    args.push(format!("{} {}", token, quoted));
                }
            }
            Formatted::Flag | Formatted::Suppress => args.push(token),
        }
    }
    Ok(args.join(" "))
}

/// Parses directive lines back into `(name, value)` pairs, names in their
/// hyphenated display form without dashes.
pub fn parse_directives(script: &str) -> Vec<(String, String)> {
    script
        .lines()
        .filter_map(|line| line.strip_prefix(DIRECTIVE_PREFIX))
        .filter_map(|rest| {
            let rest = rest.trim_start();
            let (token, value) = rest.split_once(' ').unwrap_or((rest, ""));
            let name = token.trim_start_matches('-');
            if name.is_empty() {
                None
            } else {
                Some((name.to_string(), value.trim().to_string()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OptionValue;
    use std::time::Duration;

    // Flag lines keep the padding of the name column, hence the trailing spaces.
    const FIXTURE: &str = concat!(
        "#!/bin/sh\n",
        "\n",
        "#SBATCH --array               3-11\n",
        "#SBATCH --cpus-per-task       15\n",
        "#SBATCH --dependency          after:65541,afterok:34987\n",
        "#SBATCH --gres                gpu:kepler:2,gpu:tesla:2,mps:400\n",
        "#SBATCH --ignore-pbs          \n",
        "#SBATCH --job-name            name\n",
        "#SBATCH --output              %A_%a.out\n",
        "#SBATCH --time                1-02:03:04\n",
    );

    fn fixture_store() -> OptionStore {
        let mut store = OptionStore::new();
        store
            .set("array", OptionValue::List(vec![OptionValue::range(3, 12)]))
            .set("cpus_per_task", 15)
            .set("dependency", OptionValue::map([("after", 65541), ("afterok", 34987)]))
            .set(
                "gres",
                OptionValue::List(vec![
                    "gpu:kepler:2".into(),
                    OptionValue::map([
                        ("gpu", OptionValue::map([("tesla", 2)])),
                        ("mps", OptionValue::Int(400)),
                    ]),
                ]),
            )
            .set("ignore_pbs", true)
            .set("job_name", "name")
            .set("output", "%A_%a.out")
            .set("time", Duration::from_secs(86_400 + 2 * 3600 + 3 * 60 + 4))
            .set("wait", false);
        store
    }

    #[test]
    fn test_render_matches_fixture() {
        let script = render_script(&fixture_store(), &[], "/bin/sh", true);
        assert_eq!(script, FIXTURE);
    }

    #[test]
    fn test_render_with_body() {
        let mut body = CommandBody::new();
        body.add("module load python\npython run.py 100");
        body.add("echo \"done\"");
        let script = render_script(&fixture_store(), body.lines(), "/bin/sh", false);
        let expected = format!("{}\nmodule load python\npython run.py 100\necho \"done\"\n", FIXTURE);
        assert_eq!(script, expected);
    }

    #[test]
    fn test_empty_body_adds_no_lines() {
        let mut store = OptionStore::new();
        store.set("contiguous", true);
        let mut body = CommandBody::new();
        body.add("").add("   \n\t");
        assert!(body.is_empty());

        let script = render_script(&store, body.lines(), "/bin/bash", true);
        assert_eq!(script, format!("#!/bin/bash\n\n#SBATCH --contiguous{}\n", " ".repeat(10)));
        assert!(script.ends_with('\n') && !script.ends_with("\n\n"));
    }

    #[test]
    fn test_render_without_options_or_body() {
        let script = render_script(&OptionStore::new(), &[], "/bin/sh", false);
        assert_eq!(script, "#!/bin/sh\n");
    }

    #[test]
    fn test_escape_dollar_only_touches_body() {
        let mut store = OptionStore::new();
        store.set("output", "$HOME/out.log");
        let body = vec!["echo $SLURM_JOB_ID".to_string()];

        let escaped = render_script(&store, &body, "/bin/sh", true);
        assert!(escaped.contains("$HOME/out.log"));
        assert!(escaped.ends_with("echo \\$SLURM_JOB_ID\n"));

        let verbatim = render_script(&store, &body, "/bin/sh", false);
        assert!(verbatim.ends_with("echo $SLURM_JOB_ID\n"));
    }

    #[test]
    fn test_reset_body() {
        let mut body = CommandBody::new();
        body.add("echo 1");
        body.reset();
        assert!(body.lines().is_empty());
    }

    #[test]
    fn test_string_options_round_trip() {
        let mut store = OptionStore::new();
        store
            .set("job_name", "analysis")
            .set("partition", "gpu")
            .set("output", "logs/%x-%j.out")
            .set("mail_type", "END,FAIL");

        let parsed = parse_directives(&render_script(&store, &[], "/bin/sh", false));
        let original: Vec<(String, String)> = store
            .iter()
            .map(|(k, v)| (k.replace('_', "-"), v.as_str().to_string()))
            .collect();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_render_inline() {
        let mut store = OptionStore::new();
        store
            .set("job_name", "my job")
            .set("contiguous", true)
            .set("N", 2)
            .set("time", "10");
        let inline = render_inline(&store).unwrap();
        assert_eq!(inline, "--job-name='my job' --contiguous -N 2 --time=10");
    }
}
