use remotest::config::PhaseTimeout;
use remotest::engine::{AGGREGATE_LOG_NAME, PhasePlan, PhaseTimeouts, orchestrate};
use remotest::exec::Command;

fn minutes(m: f64) -> PhaseTimeout {
    PhaseTimeout::from_minutes(m).expect("valid timeout")
}

fn roomy() -> PhaseTimeouts {
    PhaseTimeouts {
        setup: minutes(1.0),
        run: minutes(1.0),
        teardown: minutes(1.0),
    }
}

fn plan_with_suites(suites: Vec<Command>) -> PhasePlan {
    PhasePlan {
        setup: vec![Command::new("echo starting cluster")],
        run: suites,
        teardown: vec![Command::new("echo terminating cluster")],
    }
}

#[tokio::test]
async fn all_suites_passing_produce_summary_and_artifacts() {
    let plan = plan_with_suites(vec![
        Command::labeled("A", "echo a"),
        Command::labeled("B", "echo b"),
    ]);

    let out = orchestrate(plan, &roomy(), "nightly")
        .await
        .expect("orchestration should run");

    assert_eq!(out.report, "A: Pass\nB: Pass\n\n");

    let names: Vec<&str> = out.artifacts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, [AGGREGATE_LOG_NAME, "A_results.txt", "B_results.txt"]);

    // Aggregate transcript spans all three phases, in order.
    let aggregate = &out.artifacts[0].contents;
    let setup_at = aggregate.find("starting cluster").expect("setup logged");
    let suite_at = aggregate.find("echo a").expect("suite logged");
    let teardown_at = aggregate.find("terminating cluster").expect("teardown logged");
    assert!(setup_at < suite_at && suite_at < teardown_at);

    assert_eq!(
        out.artifacts[1].contents,
        "Command:\n\necho a\n\nStdout:\n\na\n\nStderr:\n\n\n"
    );
}

#[tokio::test]
async fn failing_suite_is_reported_as_fail() {
    let plan = plan_with_suites(vec![
        Command::labeled("A", "echo a"),
        Command::labeled("B", "exit 1"),
    ]);

    let out = orchestrate(plan, &roomy(), "nightly")
        .await
        .expect("orchestration should run");

    assert_eq!(out.report, "A: Pass\nB: Fail\n\n");
    // Both suites ran, so both get artifacts.
    assert_eq!(out.artifacts.len(), 3);
}

#[tokio::test]
async fn run_timeout_names_the_untested_suites() {
    let plan = plan_with_suites(vec![
        Command::labeled("A", "sleep 30"),
        Command::labeled("B", "echo b"),
    ]);
    let timeouts = PhaseTimeouts {
        setup: minutes(1.0),
        run: minutes(0.005),
        teardown: minutes(1.0),
    };

    let out = orchestrate(plan, &timeouts, "nightly")
        .await
        .expect("orchestration should run");

    // The terminated suite is reported, the rest are named as untested.
    assert!(out.report.starts_with("A: Fail\n\n"));
    assert!(out.report.contains("The timeout occurred while running the A test suite."));
    assert!(out.report.contains("The following test suites were not tested: B"));

    // Only the suite that actually ran produced an artifact.
    let names: Vec<&str> = out.artifacts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, [AGGREGATE_LOG_NAME, "A_results.txt"]);

    // Teardown still ran.
    assert!(out.artifacts[0].contents.contains("terminating cluster"));
}

#[tokio::test]
async fn setup_failure_skips_the_run_phase_but_not_teardown() {
    let plan = PhasePlan {
        setup: vec![Command::new("exit 1")],
        run: vec![Command::labeled("A", "echo a")],
        teardown: vec![Command::new("echo terminating cluster")],
    };

    let out = orchestrate(plan, &roomy(), "nightly")
        .await
        .expect("orchestration should run");

    assert!(out.report.contains("There were problems in starting the cluster"));
    assert!(!out.report.contains("A:"));

    let aggregate = &out.artifacts[0].contents;
    assert!(!aggregate.contains("echo a"));
    assert!(aggregate.contains("terminating cluster"));
    assert_eq!(out.artifacts.len(), 1);
}

#[tokio::test]
async fn setup_timeout_skips_the_run_phase_but_not_teardown() {
    let plan = PhasePlan {
        setup: vec![Command::new("sleep 30")],
        run: vec![Command::labeled("A", "echo a")],
        teardown: vec![Command::new("echo terminating cluster")],
    };
    let timeouts = PhaseTimeouts {
        setup: minutes(0.005),
        run: minutes(1.0),
        teardown: minutes(1.0),
    };

    let out = orchestrate(plan, &timeouts, "nightly")
        .await
        .expect("orchestration should run");

    assert!(
        out.report
            .contains("The maximum allowable cluster setup time of 0.005 minute(s) was exceeded.")
    );
    assert!(!out.report.contains("A:"));
    assert!(out.artifacts[0].contents.contains("terminating cluster"));
}

#[tokio::test]
async fn teardown_failure_carries_the_manual_verification_warning() {
    let plan = PhasePlan {
        setup: vec![Command::new("echo starting cluster")],
        run: vec![Command::labeled("A", "echo a")],
        teardown: vec![Command::new("exit 1")],
    };

    let out = orchestrate(plan, &roomy(), "nightly-tag")
        .await
        .expect("orchestration should run");

    assert!(out.report.starts_with("A: Pass\n\n"));
    assert!(out.report.contains("There were problems in terminating the cluster"));
    assert!(out.report.contains(
        "IMPORTANT: You should check that the cluster labelled with the tag 'nightly-tag' was \
         properly terminated."
    ));
}

#[tokio::test]
async fn teardown_timeout_warning_survives_a_setup_failure() {
    let plan = PhasePlan {
        setup: vec![Command::new("exit 1")],
        run: vec![Command::labeled("A", "echo a")],
        teardown: vec![Command::new("sleep 30")],
    };
    let timeouts = PhaseTimeouts {
        setup: minutes(1.0),
        run: minutes(1.0),
        teardown: minutes(0.005),
    };

    let out = orchestrate(plan, &timeouts, "nightly")
        .await
        .expect("orchestration should run");

    assert!(out.report.contains("There were problems in starting the cluster"));
    assert!(out.report.contains(
        "The maximum allowable cluster termination time of 0.005 minute(s) was exceeded."
    ));
    assert!(out.report.contains("IMPORTANT:"));
}
