// src/lib.rs

pub mod cli;
pub mod cluster;
pub mod config;
pub mod engine;
pub mod exec;
pub mod logging;
pub mod notify;

use anyhow::Result;
use tracing::info;

use crate::cli::CliArgs;
use crate::cluster::ClusterCli;
use crate::config::{PhaseTimeout, SpotBid};
use crate::engine::{PhasePlan, PhaseTimeouts, orchestrate};
use crate::notify::{Notifier, OutboxNotifier, StdoutNotifier, compose};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - timeout validation
/// - config / recipients / email settings parsing
/// - cluster command templating
/// - the three-phase orchestration
/// - report delivery
pub async fn run(args: CliArgs) -> Result<()> {
    let timeouts = PhaseTimeouts {
        setup: PhaseTimeout::from_minutes(args.setup_timeout)?,
        run: PhaseTimeout::from_minutes(args.run_timeout)?,
        teardown: PhaseTimeout::from_minutes(args.teardown_timeout)?,
    };
    let spot_bid = args
        .spot_bid
        .map(|dollars| SpotBid::from_dollars(dollars, args.suppress_spot_bid_check))
        .transpose()?;

    // Parse every input file up front so format problems surface before a
    // single remote resource is touched.
    let suites = config::load_suite_config(&args.config)?;
    let recipients = config::load_recipients(&args.recipients)?;
    let settings = config::load_email_settings(&args.email_settings)?;

    let cluster = ClusterCli {
        exe: args.cluster_exe,
        config: args.cluster_config,
        tag: args.cluster_tag,
        template: args.cluster_template,
        spot_bid,
        user: args.user,
    };
    let plan = cluster.phase_plan(&suites);

    if args.dry_run {
        print_dry_run(&plan);
        return Ok(());
    }

    info!(
        suites = suites.len(),
        cluster_tag = %cluster.tag,
        "starting orchestration"
    );
    let orchestration = orchestrate(plan, &timeouts, &cluster.tag).await?;

    let message = compose(&settings, &recipients, orchestration);
    let notifier: Box<dyn Notifier> = match args.outbox {
        Some(dir) => Box::new(OutboxNotifier { dir }),
        None => Box::new(StdoutNotifier),
    };
    notifier.deliver(&message)
}

/// Simple dry-run output: print the planned commands per phase.
fn print_dry_run(plan: &PhasePlan) {
    println!("remotest dry-run");
    println!();

    println!("setup:");
    for cmd in &plan.setup {
        println!("  {}", cmd.text);
    }

    println!("test suites ({}):", plan.run.len());
    for cmd in &plan.run {
        match &cmd.label {
            Some(label) => println!("  [{label}] {}", cmd.text),
            None => println!("  {}", cmd.text),
        }
    }

    println!("teardown:");
    for cmd in &plan.teardown {
        println!("  {}", cmd.text);
    }
}
