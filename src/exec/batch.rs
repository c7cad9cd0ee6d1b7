// src/exec/batch.rs

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::exec::command::{ExecError, spawn_shell, terminate_group};

/// An opaque shell command, optionally tagged with the test suite it runs.
///
/// Setup and teardown commands carry no label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub text: String,
    pub label: Option<String>,
}

impl Command {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: None,
        }
    }

    pub fn labeled(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: Some(label.into()),
        }
    }
}

/// How a batch of commands ended.
///
/// Callers must be able to tell "ran to completion with failures" apart from
/// "did not finish in time": the two cases call for different remediation
/// (inspect the log vs. verify remote resources were released).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    AllSucceeded,
    /// At least one command exited nonzero; carries the index of the first.
    SomeFailed { first_failure: usize },
    /// The deadline expired; carries how many results were recorded before
    /// the worker stopped (the terminated in-flight command included).
    TimedOut { completed: usize },
}

/// Everything captured for one executed command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub command: Command,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    /// Per-command transcript, present when the batch was run with
    /// `capture_individual_logs`.
    pub log: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Stop iterating at the first nonzero exit; later commands are simply
    /// absent from the results (not recorded as failed, not retried).
    pub stop_on_first_failure: bool,
    /// Retain each command's transcript block alongside its result.
    pub capture_individual_logs: bool,
}

/// Output contract of [`execute`].
#[derive(Debug)]
pub struct BatchReport {
    pub outcome: BatchOutcome,
    pub results: Vec<CommandResult>,
    /// Ordered concatenation of every executed command's transcript block.
    pub transcript: String,
}

/// Transcript block recorded for a single command.
pub fn transcript_block(command: &str, stdout: &str, stderr: &str) -> String {
    format!("Command:\n\n{command}\n\nStdout:\n\n{stdout}\nStderr:\n\n{stderr}\n")
}

/// Run `commands` strictly in order under one aggregate `deadline`.
///
/// A single worker task iterates the list; this caller performs a bounded
/// wait on it. When the deadline expires the worker is cancelled and the
/// process group of the in-flight command is terminated, but every result
/// gathered so far is still returned: no completed command's output is ever
/// lost to a later failure or timeout.
pub async fn execute(
    commands: Vec<Command>,
    deadline: Duration,
    options: BatchOptions,
) -> Result<BatchReport, ExecError> {
    let total = commands.len();
    let token = CancellationToken::new();
    let current: Arc<Mutex<Option<i32>>> = Arc::new(Mutex::new(None));

    let mut worker = tokio::spawn(run_commands(
        commands,
        options,
        token.clone(),
        Arc::clone(&current),
    ));

    let progress = match tokio::time::timeout(deadline, &mut worker).await {
        Ok(joined) => joined??,
        Err(_) => {
            warn!(?deadline, "batch deadline expired, cancelling worker");
            token.cancel();
            if let Some(pgid) = *lock(&current) {
                terminate_group(pgid);
            }
            // The worker resumes from its blocked wait, records the
            // terminated command, observes the cancellation and exits.
            worker.await??
        }
    };

    let outcome = if progress.cancelled {
        BatchOutcome::TimedOut {
            completed: progress.results.len(),
        }
    } else {
        natural_outcome(&progress.results)
    };

    info!(?outcome, total, completed = progress.results.len(), "batch finished");

    Ok(BatchReport {
        outcome,
        results: progress.results,
        transcript: progress.transcript,
    })
}

#[derive(Debug, Default)]
struct WorkerProgress {
    results: Vec<CommandResult>,
    transcript: String,
    cancelled: bool,
}

/// Worker body: executes the commands sequentially.
///
/// The current process-group id is the only state shared with the
/// controller. The token check and the spawn happen under the same lock, so
/// the controller either sees the fresh group id or the worker sees the
/// cancellation. It can never miss a just-spawned child, kill the wrong
/// process, or signal a group that was already reaped.
async fn run_commands(
    commands: Vec<Command>,
    options: BatchOptions,
    token: CancellationToken,
    current: Arc<Mutex<Option<i32>>>,
) -> Result<WorkerProgress, ExecError> {
    let mut progress = WorkerProgress::default();

    for command in commands {
        let running = {
            let mut slot = lock(&current);
            if token.is_cancelled() {
                progress.cancelled = true;
                break;
            }
            let running = spawn_shell(&command.text)?;
            *slot = running.group_id();
            running
        };

        // Blocks until the command finishes or the controller terminates
        // its process group; the lock is never held across this await.
        let output = running.collect().await?;
        *lock(&current) = None;

        let block = transcript_block(&command.text, &output.stdout, &output.stderr);
        progress.transcript.push_str(&block);

        let failed = output.exit_code != 0;
        if failed {
            debug!(command = %command.text, exit_code = output.exit_code, "command failed");
        }

        progress.results.push(CommandResult {
            command,
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code: output.exit_code,
            log: options.capture_individual_logs.then(|| block),
        });

        if token.is_cancelled() {
            progress.cancelled = true;
            break;
        }
        if failed && options.stop_on_first_failure {
            break;
        }
    }

    Ok(progress)
}

fn natural_outcome(results: &[CommandResult]) -> BatchOutcome {
    match results.iter().position(|r| r.exit_code != 0) {
        Some(first_failure) => BatchOutcome::SomeFailed { first_failure },
        None => BatchOutcome::AllSucceeded,
    }
}

/// Lock that shrugs off poisoning: the guarded value is a plain `Option`
/// and stays meaningful even if a holder panicked.
fn lock(cell: &Mutex<Option<i32>>) -> MutexGuard<'_, Option<i32>> {
    cell.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
