// src/engine/orchestrator.rs

use tracing::{info, warn};

use crate::config::PhaseTimeout;
use crate::engine::report::{ReportSection, render_report};
use crate::exec::{BatchOptions, BatchOutcome, Command, ExecError, execute};

/// Name of the transcript accumulating every command across all phases.
pub const AGGREGATE_LOG_NAME: &str = "complete_log.txt";

/// The three command batches of one orchestration run.
///
/// Every `run` command is expected to carry a suite label; results are
/// paired back to suites positionally.
#[derive(Debug, Clone)]
pub struct PhasePlan {
    pub setup: Vec<Command>,
    pub run: Vec<Command>,
    pub teardown: Vec<Command>,
}

/// Independent wall-clock budget per phase; never inherited or aggregated.
#[derive(Debug, Clone, Copy)]
pub struct PhaseTimeouts {
    pub setup: PhaseTimeout,
    pub run: PhaseTimeout,
    pub teardown: PhaseTimeout,
}

/// A named text buffer handed to the notifier at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub contents: String,
}

/// Final output of one orchestration run: the rendered report plus the
/// aggregate log and one log per suite that actually ran.
#[derive(Debug)]
pub struct Orchestration {
    pub report: String,
    pub artifacts: Vec<Artifact>,
}

/// Drive the three phases: setup, test suite run, teardown.
///
/// Failure handling:
/// - A setup failure or timeout skips the run phase entirely; no suite is
///   attempted against a cluster that may not exist.
/// - Teardown is attempted unconditionally, even after a setup or run
///   problem; it is the one phase that always runs.
/// - Only a spawn error aborts the orchestration as a hard failure.
pub async fn orchestrate(
    plan: PhasePlan,
    timeouts: &PhaseTimeouts,
    cluster_tag: &str,
) -> Result<Orchestration, ExecError> {
    let mut sections = Vec::new();
    let mut aggregate = String::new();
    let mut suite_artifacts = Vec::new();

    info!(commands = plan.setup.len(), "setup phase starting");
    let setup = execute(
        plan.setup,
        timeouts.setup.duration(),
        BatchOptions {
            stop_on_first_failure: true,
            capture_individual_logs: false,
        },
    )
    .await?;
    aggregate.push_str(&setup.transcript);

    match setup.outcome {
        BatchOutcome::TimedOut { .. } => {
            warn!("setup phase timed out; skipping test suites");
            sections.push(ReportSection::SetupTimedOut {
                minutes: timeouts.setup.minutes(),
            });
        }
        BatchOutcome::SomeFailed { .. } => {
            warn!("setup phase failed; skipping test suites");
            sections.push(ReportSection::SetupFailed);
        }
        BatchOutcome::AllSucceeded => {
            let labels: Vec<String> = plan
                .run
                .iter()
                .map(|cmd| cmd.label.clone().unwrap_or_else(|| cmd.text.clone()))
                .collect();

            info!(suites = labels.len(), "run phase starting");
            let run = execute(
                plan.run,
                timeouts.run.duration(),
                BatchOptions {
                    stop_on_first_failure: false,
                    capture_individual_logs: true,
                },
            )
            .await?;
            aggregate.push_str(&run.transcript);

            // Positional pairing: a batch cut short by timeout leaves only
            // the prefix of suites with results.
            let statuses = labels
                .iter()
                .zip(&run.results)
                .map(|(label, result)| (label.clone(), result.exit_code == 0))
                .collect();
            sections.push(ReportSection::SuiteSummary { statuses });

            for (label, result) in labels.iter().zip(&run.results) {
                if let Some(log) = &result.log {
                    suite_artifacts.push(Artifact {
                        name: format!("{label}_results.txt"),
                        contents: log.clone(),
                    });
                }
            }

            if let BatchOutcome::TimedOut { completed } = run.outcome {
                let during_idx = completed.saturating_sub(1);
                sections.push(ReportSection::RunTimedOut {
                    minutes: timeouts.run.minutes(),
                    during: labels.get(during_idx).cloned().unwrap_or_default(),
                    untested: labels.iter().skip(completed).cloned().collect(),
                });
            }
        }
    }

    info!(commands = plan.teardown.len(), "teardown phase starting");
    let teardown = execute(
        plan.teardown,
        timeouts.teardown.duration(),
        BatchOptions {
            stop_on_first_failure: false,
            capture_individual_logs: false,
        },
    )
    .await?;
    aggregate.push_str(&teardown.transcript);

    match teardown.outcome {
        BatchOutcome::TimedOut { .. } => {
            warn!(cluster_tag, "teardown timed out; cluster may still be running");
            sections.push(ReportSection::TeardownTimedOut {
                minutes: timeouts.teardown.minutes(),
                cluster_tag: cluster_tag.to_string(),
            });
        }
        BatchOutcome::SomeFailed { .. } => {
            warn!(cluster_tag, "teardown failed; cluster may still be running");
            sections.push(ReportSection::TeardownFailed {
                cluster_tag: cluster_tag.to_string(),
            });
        }
        BatchOutcome::AllSucceeded => {}
    }

    let mut artifacts = vec![Artifact {
        name: AGGREGATE_LOG_NAME.to_string(),
        contents: aggregate,
    }];
    artifacts.extend(suite_artifacts);

    Ok(Orchestration {
        report: render_report(&sections),
        artifacts,
    })
}
