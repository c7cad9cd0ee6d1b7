use std::time::Duration;

use remotest::exec::{BatchOptions, BatchOutcome, Command, execute, transcript_block};

const ROOMY: Duration = Duration::from_secs(60);

#[tokio::test]
async fn successful_commands_produce_results_in_order() {
    let report = execute(
        vec![Command::new("echo foo"), Command::new("echo bar")],
        ROOMY,
        BatchOptions::default(),
    )
    .await
    .expect("batch should run");

    assert_eq!(report.outcome, BatchOutcome::AllSucceeded);
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[0].stdout, "foo\n");
    assert_eq!(report.results[0].exit_code, 0);
    assert_eq!(report.results[1].stdout, "bar\n");
    assert_eq!(
        report.transcript,
        "Command:\n\necho foo\n\nStdout:\n\nfoo\n\nStderr:\n\n\n\
         Command:\n\necho bar\n\nStdout:\n\nbar\n\nStderr:\n\n\n"
    );
}

#[tokio::test]
async fn failure_is_recorded_not_fatal() {
    let report = execute(
        vec![Command::new("echo foo"), Command::new("exit 3"), Command::new("echo bar")],
        ROOMY,
        BatchOptions::default(),
    )
    .await
    .expect("batch should run");

    assert_eq!(report.outcome, BatchOutcome::SomeFailed { first_failure: 1 });
    assert_eq!(report.results.len(), 3);
    assert_eq!(report.results[1].exit_code, 3);
    // Commands after the failure still ran.
    assert_eq!(report.results[2].stdout, "bar\n");
}

#[tokio::test]
async fn missing_executable_is_a_command_failure_not_a_spawn_error() {
    let report = execute(
        vec![Command::new("definitely_not_a_command_xyz")],
        ROOMY,
        BatchOptions::default(),
    )
    .await
    .expect("the shell itself spawns fine");

    assert_eq!(report.outcome, BatchOutcome::SomeFailed { first_failure: 0 });
    assert_eq!(report.results[0].exit_code, 127);
}

#[tokio::test]
async fn stop_on_first_failure_returns_only_the_prefix() {
    let options = BatchOptions {
        stop_on_first_failure: true,
        ..Default::default()
    };

    let report = execute(
        vec![Command::new("exit 1"), Command::new("echo never")],
        ROOMY,
        options,
    )
    .await
    .expect("batch should run");
    assert_eq!(report.outcome, BatchOutcome::SomeFailed { first_failure: 0 });
    assert_eq!(report.results.len(), 1);
    assert!(!report.transcript.contains("never"));

    let report = execute(
        vec![
            Command::new("echo foo"),
            Command::new("exit 1"),
            Command::new("echo never"),
        ],
        ROOMY,
        options,
    )
    .await
    .expect("batch should run");
    assert_eq!(report.outcome, BatchOutcome::SomeFailed { first_failure: 1 });
    assert_eq!(report.results.len(), 2);
    assert!(!report.transcript.contains("never"));
}

#[tokio::test]
async fn individual_logs_match_the_transcript_blocks() {
    let options = BatchOptions {
        capture_individual_logs: true,
        ..Default::default()
    };

    let report = execute(
        vec![Command::new("echo foo"), Command::new("echo bar")],
        ROOMY,
        options,
    )
    .await
    .expect("batch should run");

    assert_eq!(
        report.results[0].log.as_deref(),
        Some(transcript_block("echo foo", "foo\n", "")).as_deref()
    );
    assert_eq!(
        report.results[1].log.as_deref(),
        Some(transcript_block("echo bar", "bar\n", "")).as_deref()
    );
    // The shared transcript is exactly the blocks in submission order.
    assert_eq!(
        report.transcript,
        format!(
            "{}{}",
            transcript_block("echo foo", "foo\n", ""),
            transcript_block("echo bar", "bar\n", "")
        )
    );
}

#[tokio::test]
async fn logs_are_absent_without_capture() {
    let report = execute(
        vec![Command::new("echo foo")],
        ROOMY,
        BatchOptions::default(),
    )
    .await
    .expect("batch should run");

    assert!(report.results[0].log.is_none());
}

#[tokio::test]
async fn deadline_expiry_terminates_the_hung_command() {
    let report = execute(
        vec![
            Command::new("echo fast"),
            Command::new("sleep 30"),
            Command::new("echo never"),
        ],
        Duration::from_millis(500),
        BatchOptions::default(),
    )
    .await
    .expect("batch should run");

    assert_eq!(report.outcome, BatchOutcome::TimedOut { completed: 2 });
    assert_eq!(report.results.len(), 2);
    // The completed command's output is never lost.
    assert_eq!(report.results[0].stdout, "fast\n");
    // The terminated command still has a recorded, nonzero exit.
    assert_ne!(report.results[1].exit_code, 0);
    // Nothing after the in-flight command was started.
    assert!(!report.transcript.contains("never"));
}

#[tokio::test]
async fn deadline_expiry_reaps_the_whole_process_group() {
    // The background child belongs to the same process group as the shell,
    // so the forced termination takes it down too: the batch returns right
    // after the deadline instead of waiting out the 30s sleep.
    let start = std::time::Instant::now();
    let report = execute(
        vec![Command::new("sleep 30 & wait")],
        Duration::from_millis(500),
        BatchOptions::default(),
    )
    .await
    .expect("batch should run");

    assert_eq!(report.outcome, BatchOutcome::TimedOut { completed: 1 });
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn an_empty_batch_succeeds() {
    let report = execute(vec![], ROOMY, BatchOptions::default())
        .await
        .expect("batch should run");

    assert_eq!(report.outcome, BatchOutcome::AllSucceeded);
    assert!(report.results.is_empty());
    assert!(report.transcript.is_empty());
}
