// src/constants.rs

use std::time::Duration;

/// Prefix of every option line in a batch script.
pub const DIRECTIVE_PREFIX: &str = "#SBATCH";

/// Width the option token (`--name`) is left-justified to in a directive line.
pub const DIRECTIVE_TOKEN_WIDTH: usize = 21;

/// Interpreter written to the shebang line when none is configured.
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Phrase `sbatch` prints on a successful, non-parsable submission.
pub const SUBMITTED_PHRASE: &str = "Submitted batch job";

/// Delimiter of the here-document used for inline submissions.
pub const HEREDOC_DELIMITER: &str = "EOF";

/// Default `squeue -o` template: one quoted column per field, comma separated.
pub const DEFAULT_SQUEUE_FORMAT: &str = r#""%i","%j","%t","%M","%L","%D","%C","%m","%b","%R""#;

/// Environment variable that overrides the `squeue` template.
pub const SQUEUE_FORMAT_ENV: &str = "SQUEUE_FORMAT";

/// Header `squeue` prints for the `%i` column.
pub const QUEUE_JOB_ID_COLUMN: &str = "JOBID";

/// Header `squeue` prints for the `%j` column.
pub const QUEUE_NAME_COLUMN: &str = "NAME";

/// Marker token that opens a new job block in `scontrol show job` output.
pub const CONTROL_BLOCK_MARKER: &str = "JobId=";

/// `scontrol` key holding the `exit:signal` pair.
pub const CONTROL_EXIT_CODE_KEY: &str = "ExitCode";

/// `scontrol` key holding the job state.
pub const CONTROL_STATE_KEY: &str = "JobState";

/// Job state for which no exit code exists yet.
pub const PENDING_STATE: &str = "PENDING";

/// `sacct` column the synthetic step filter is applied to.
pub const ACCOUNTING_JOB_NAME_COLUMN: &str = "JobName";

/// Step names `sacct` reports for the batch and extern wrappers of every job.
pub const SYNTHETIC_STEP_NAMES: &[&str] = &["batch", "extern"];

/// Default `sacct --format` fields.
pub const DEFAULT_SACCT_FIELDS: &[&str] = &[
    "JobID", "JobName", "State", "Elapsed", "Start", "End", "NNodes", "AllocCPUs", "ReqCPUs",
    "ReqMem", "MaxRSS",
];

/// Default `sacct --units`.
pub const DEFAULT_SACCT_UNITS: &str = "M";

/// How long a signalled job keeps its escalation history.
pub const DEFAULT_STALE_WINDOW: Duration = Duration::from_secs(30 * 60);

/// Environment variable pointing at an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "SLURMKIT_CONFIG";

/// Name of the configuration directory (inside the system config dir).
pub const CONFIG_DIR_NAME: &str = "slurmkit";

/// Name of the configuration file (inside the configuration directory).
pub const CONFIG_FILENAME: &str = "config.toml";

// --- Filename patterns (`--output`, `--error`, `--input`) ---

macro_rules! filename_patterns {
    ($($name:ident = $pattern:literal),* $(,)?) => {
        $(
            #[doc = concat!("Filename pattern `", $pattern, "`.")]
            pub const $name: &str = $pattern;
        )*

        /// Every filename pattern, by name.
        pub static FILENAME_PATTERNS: &[(&str, &str)] = &[$((stringify!($name), $name)),*];
    };
}

filename_patterns! {
    JOB_ARRAY_MASTER_ID = "%A",
    JOB_ARRAY_ID = "%a",
    JOB_ID_STEP_ID = "%J",
    JOB_ID = "%j",
    HOSTNAME = "%N",
    NODE_IDENTIFIER = "%n",
    STEP_ID = "%s",
    TASK_IDENTIFIER = "%t",
    USER_NAME = "%u",
    JOB_NAME = "%x",
    PERCENTAGE = "%%",
    DO_NOT_PROCESS = "\\\\",
}

// --- Output environment variables (set by Slurm inside the job) ---

macro_rules! output_env_vars {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc = concat!("Reference to `$", stringify!($name), "` for use in command bodies.")]
            pub const $name: &str = concat!("$", stringify!($name));
        )*

        /// Every output environment variable, by name.
        pub static OUTPUT_ENV_VARS: &[(&str, &str)] = &[$((stringify!($name), $name)),*];
    };
}

output_env_vars! {
    SLURM_ARRAY_JOB_ID,
    SLURM_ARRAY_TASK_COUNT,
    SLURM_ARRAY_TASK_ID,
    SLURM_ARRAY_TASK_MAX,
    SLURM_ARRAY_TASK_MIN,
    SLURM_ARRAY_TASK_STEP,
    SLURM_CLUSTER_NAME,
    SLURM_CPUS_ON_NODE,
    SLURM_CPUS_PER_GPU,
    SLURM_CPUS_PER_TASK,
    SLURM_CONTAINER,
    SLURM_DIST_PLANESIZE,
    SLURM_DISTRIBUTION,
    SLURM_EXPORT_ENV,
    SLURM_GPU_BIND,
    SLURM_GPU_FREQ,
    SLURM_GPUS,
    SLURM_GPUS_ON_NODE,
    SLURM_GPUS_PER_NODE,
    SLURM_GPUS_PER_SOCKET,
    SLURM_GPUS_PER_TASK,
    SLURM_GTIDS,
    SLURM_HET_SIZE,
    SLURM_JOB_ACCOUNT,
    SLURM_JOB_CPUS_PER_NODE,
    SLURM_JOB_DEPENDENCY,
    SLURM_JOB_ID,
    SLURM_JOB_NAME,
    SLURM_JOB_NODELIST,
    SLURM_JOB_NUM_NODES,
    SLURM_JOB_PARTITION,
    SLURM_JOB_QOS,
    SLURM_JOB_RESERVATION,
    SLURM_LOCALID,
    SLURM_MEM_PER_CPU,
    SLURM_MEM_PER_GPU,
    SLURM_MEM_PER_NODE,
    SLURM_NODE_ALIASES,
    SLURM_NODEID,
    SLURM_NPROCS,
    SLURM_NTASKS,
    SLURM_NTASKS_PER_CORE,
    SLURM_NTASKS_PER_GPU,
    SLURM_NTASKS_PER_NODE,
    SLURM_NTASKS_PER_SOCKET,
    SLURM_PRIO_PROCESS,
    SLURM_PROCID,
    SLURM_PROFILE,
    SLURM_RESTART_COUNT,
    SLURM_SUBMIT_DIR,
    SLURM_SUBMIT_HOST,
    SLURM_TASK_PID,
    SLURM_TASKS_PER_NODE,
    SLURM_TOPOLOGY_ADDR,
    SLURM_TOPOLOGY_ADDR_PATTERN,
    SLURMD_NODENAME,
}

/// Looks up a filename pattern by its constant name (e.g. `JOB_ARRAY_ID`).
pub fn filename_pattern(name: &str) -> Option<&'static str> {
    FILENAME_PATTERNS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, pattern)| *pattern)
}

/// Looks up an output environment variable reference by name (e.g. `SLURM_JOB_ID`).
pub fn output_env_var(name: &str) -> Option<&'static str> {
    OUTPUT_ENV_VARS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, reference)| *reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_env_var_reference() {
        assert_eq!(SLURM_ARRAY_TASK_ID, "$SLURM_ARRAY_TASK_ID");
        assert_eq!(output_env_var("SLURM_JOB_ID"), Some("$SLURM_JOB_ID"));
        assert_eq!(output_env_var("NOT_A_VAR"), None);
    }

    #[test]
    fn test_filename_patterns() {
        assert_eq!(format!("{}_{}.out", JOB_ARRAY_MASTER_ID, JOB_ARRAY_ID), "%A_%a.out");
        assert_eq!(filename_pattern("JOB_NAME"), Some("%x"));
        assert_eq!(DO_NOT_PROCESS, r"\\");
    }
}
