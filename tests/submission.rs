// tests/submission.rs

use indexmap::IndexMap;
use slurmkit::system::executor::{ExecutionError, Invocation, ProcessOutput, ProcessRunner, Program};
use slurmkit::{ExitStatus, OptionValue, Sacct, Scancel, Scontrol, Slurm, SlurmError, SubmitOptions, SubmitStyle};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Records every invocation and replays canned outputs in order.
#[derive(Debug, Default)]
struct FakeRunner {
    calls: Mutex<Vec<Invocation>>,
    replies: Mutex<VecDeque<ProcessOutput>>,
}

impl FakeRunner {
    fn with_replies(replies: &[(i32, &str, &str)]) -> Arc<Self> {
        let replies = replies
            .iter()
            .map(|(code, stdout, stderr)| ProcessOutput {
                code: *code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            })
            .collect();
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            replies: Mutex::new(replies),
        })
    }

    fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProcessRunner for FakeRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ExecutionError> {
        self.calls.lock().unwrap().push(invocation.clone());
        Ok(self.replies.lock().unwrap().pop_front().unwrap_or_default())
    }
}

fn days(d: u64, h: u64, m: u64, s: u64) -> Duration {
    Duration::from_secs(((d * 24 + h) * 60 + m) * 60 + s)
}

#[test]
fn test_full_script_from_typed_values() {
    let mut dependency = IndexMap::new();
    dependency.insert("after", 65541);
    dependency.insert("afterok", 34987);

    let mut slurm = Slurm::new();
    slurm
        .set_array(0_i64..100)
        .set_cpus_per_task(15)
        .set_dependency(dependency)
        .set_job_name("name")
        .set_output(format!(
            "{}_{}.out",
            slurmkit::constants::JOB_ARRAY_MASTER_ID,
            slurmkit::constants::JOB_ARRAY_ID
        ))
        .set_time(days(1, 2, 3, 4))
        .set_wait(false);
    slurm.add_cmd("python demo.py $SLURM_ARRAY_TASK_ID");

    let expected = concat!(
        "#!/bin/sh\n",
        "\n",
        "#SBATCH --array               0-99\n",
        "#SBATCH --cpus-per-task       15\n",
        "#SBATCH --dependency          after:65541,afterok:34987\n",
        "#SBATCH --job-name            name\n",
        "#SBATCH --output              %A_%a.out\n",
        "#SBATCH --time                1-02:03:04\n",
        "\n",
        "python demo.py $SLURM_ARRAY_TASK_ID\n",
    );
    assert_eq!(slurm.script(false), expected);
    assert!(slurm.script(true).ends_with("python demo.py \\$SLURM_ARRAY_TASK_ID\n"));
}

#[test]
fn test_submit_reports_job_id() {
    let runner = FakeRunner::with_replies(&[(0, "Submitted batch job 1234\n", "")]);
    let mut slurm = Slurm::new().with_runner(runner.clone());
    slurm.add_argument("-J", "integration").unwrap();
    slurm.add_argument("--time", days(0, 0, 10, 0)).unwrap();

    let submission = slurm.sbatch("srun hostname", &SubmitOptions::default()).unwrap();
    assert_eq!(submission.job_id, 1234);

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    match &calls[0].program {
        Program::Shell(script) => {
            assert!(script.starts_with("sbatch << EOF\n#!/bin/sh\n"));
            assert!(script.contains("#SBATCH --job-name            integration\n"));
            assert!(script.contains("#SBATCH --time                0-00:10:00\n"));
            assert!(script.ends_with("srun hostname\nEOF"));
        }
        other => panic!("expected a shell invocation, got {other:?}"),
    }
}

#[test]
fn test_parsable_submission_with_cluster() {
    let runner = FakeRunner::with_replies(&[(0, "1234;cluster1\n", "")]);
    let mut slurm = Slurm::new().with_runner(runner);
    slurm.set_parsable(true);

    let submission = slurm.sbatch("true", &SubmitOptions::default()).unwrap();
    assert_eq!(submission.job_id, 1234);
    assert_eq!(submission.cluster.as_deref(), Some("cluster1"));
}

#[test]
fn test_failed_submission_carries_stderr() {
    let runner = FakeRunner::with_replies(&[(1, "", "sbatch: error: Invalid account\n")]);
    let slurm = Slurm::new().with_runner(runner);
    match slurm.sbatch("true", &SubmitOptions::default()) {
        Err(SlurmError::SubmissionOutput { stderr, .. }) => {
            assert_eq!(stderr, "sbatch: error: Invalid account\n");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_file_submission_writes_exact_script() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("submit.sh");
    let runner = FakeRunner::with_replies(&[(0, "Submitted batch job 99\n", "")]);

    let mut slurm = Slurm::new().with_runner(runner.clone()).with_shell("/bin/bash");
    slurm.set_partition("debug").set_contiguous(true);

    let options = SubmitOptions {
        style: SubmitStyle::File(path.clone()),
        echo: false,
    };
    slurm.sbatch("echo $HOSTNAME", &options).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    let expected = format!(
        "#!/bin/bash\n\n#SBATCH --partition           debug\n#SBATCH --contiguous{}\n\necho $HOSTNAME\n",
        " ".repeat(10)
    );
    assert_eq!(written, expected);
    assert_eq!(
        runner.calls()[0].program,
        Program::Argv(vec!["sbatch".to_string(), path.display().to_string()])
    );
}

#[test]
fn test_control_and_accounting_snapshots() {
    let control = "\
JobId=4319559 ArrayJobId=4319559 ArrayTaskId=1 JobName=test
   JobState=COMPLETED Reason=None ExitCode=0:0
";
    let accounting = "\
JobID           JobName      State
------------ ---------- ----------
4319559_1          test  COMPLETED
4319559_1.b+      batch  COMPLETED
4319559_1.e+     extern  COMPLETED
";
    let runner = FakeRunner::with_replies(&[(0, control, ""), (0, accounting, "")]);

    let mut scontrol = Scontrol::new().with_runner(runner.clone());
    scontrol.update(Some("4319559")).unwrap();
    assert_eq!(scontrol.exit_code(), ExitStatus::Code(0));

    let mut sacct = Sacct::new(["JobID", "JobName", "State"], "M")
        .unwrap()
        .with_runner(runner.clone());
    let records = sacct.update(Some("4319559")).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("JobID").map(String::as_str), Some("4319559_1"));
}

#[test]
fn test_signal_escalation_over_time() {
    let runner = FakeRunner::with_replies(&[]);
    let window = Duration::from_secs(30 * 60);
    let mut scancel = Scancel::new(window).with_runner(runner.clone());
    let start = Instant::now();

    let steps: Vec<_> = [0, 1, 2]
        .into_iter()
        .map(|offset| scancel.signal_job_at("42", start + Duration::from_secs(offset)).unwrap())
        .collect();
    assert_eq!(
        steps,
        [
            slurmkit::core::escalation::Escalation::Term,
            slurmkit::core::escalation::Escalation::Kill,
            slurmkit::core::escalation::Escalation::Cancel,
        ]
    );

    let later = start + window + Duration::from_secs(60);
    assert_eq!(
        scancel.signal_job_at("42", later).unwrap(),
        slurmkit::core::escalation::Escalation::Term
    );
    assert_eq!(runner.calls().len(), 4);
}

#[test]
fn test_unknown_option_is_rejected() {
    let mut slurm = Slurm::new();
    assert!(matches!(
        slurm.add_argument("--frobnicate", OptionValue::Bool(true)),
        Err(SlurmError::UnknownOption(_))
    ));
}
