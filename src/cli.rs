// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `remotest`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "remotest",
    version,
    about = "Run test suites on an ephemeral remote cluster and report the results.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the test suite config file (one `label<TAB>command` per line).
    #[arg(long, value_name = "PATH")]
    pub config: PathBuf,

    /// Path to the cluster-management config file (passed through to the
    /// cluster tool, never parsed here).
    #[arg(long, value_name = "PATH")]
    pub cluster_config: PathBuf,

    /// Path to the recipients file (one email address per line).
    #[arg(long, value_name = "PATH")]
    pub recipients: PathBuf,

    /// Path to the email settings file (`key<TAB>value` lines).
    #[arg(long, value_name = "PATH")]
    pub email_settings: PathBuf,

    /// Remote user the test suites run as.
    #[arg(long, value_name = "NAME")]
    pub user: String,

    /// Tag naming the cluster instance to start and terminate.
    #[arg(long, value_name = "TAG")]
    pub cluster_tag: String,

    /// Cluster template to use; the tool's default template when omitted.
    #[arg(long, value_name = "NAME")]
    pub cluster_template: Option<String>,

    /// Maximum bid in USD for spot instances; on-demand instances when
    /// omitted.
    #[arg(long, value_name = "DOLLARS")]
    pub spot_bid: Option<f64>,

    /// Accept a spot bid above the built-in sanity ceiling.
    #[arg(long)]
    pub suppress_spot_bid_check: bool,

    /// Path to the cluster-management executable.
    #[arg(long, value_name = "PATH", default_value = "starcluster")]
    pub cluster_exe: String,

    /// Minutes to allow for cluster setup (fractional allowed, > 0).
    #[arg(long, value_name = "MINUTES", default_value_t = 20.0)]
    pub setup_timeout: f64,

    /// Minutes to allow for *all* test suites to run (fractional allowed, > 0).
    #[arg(long, value_name = "MINUTES", default_value_t = 240.0)]
    pub run_timeout: f64,

    /// Minutes to allow for cluster termination (fractional allowed, > 0).
    #[arg(long, value_name = "MINUTES", default_value_t = 20.0)]
    pub teardown_timeout: f64,

    /// Write the results message and log attachments into this directory
    /// instead of printing to stdout.
    #[arg(long, value_name = "DIR")]
    pub outbox: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `REMOTEST_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the planned commands, but don't execute any.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
