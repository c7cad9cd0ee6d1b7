// src/cluster.rs

//! Cluster-management command templating.
//!
//! Builds the opaque shell strings the executor runs: one command to start
//! the cluster, one remote-execution command per test suite, and one to
//! terminate the cluster. The executor never looks inside these strings.

use std::path::PathBuf;

use crate::config::{SpotBid, TestSuite};
use crate::engine::PhasePlan;
use crate::exec::Command;

/// Identity of the cluster-management CLI and the cluster it operates on.
#[derive(Debug, Clone)]
pub struct ClusterCli {
    /// Path to the cluster-management executable.
    pub exe: String,
    /// Config file handed to the cluster tool (opaque to us).
    pub config: PathBuf,
    /// Tag naming the cluster instance.
    pub tag: String,
    /// Optional cluster template; the tool's default is used when absent.
    pub template: Option<String>,
    /// Optional max bid for spot instances; on-demand instances when absent.
    pub spot_bid: Option<SpotBid>,
    /// Remote user the test suites run as.
    pub user: String,
}

impl ClusterCli {
    pub fn start_command(&self) -> Command {
        let mut text = format!("{} -c {} start ", self.exe, self.config.display());
        if let Some(template) = &self.template {
            text.push_str(&format!("-c {template} "));
        }
        if let Some(bid) = &self.spot_bid {
            text.push_str(&format!("-b {:.2} --force-spot-master ", bid.dollars()));
        }
        text.push_str(&self.tag);
        Command::new(text)
    }

    pub fn suite_command(&self, suite: &TestSuite) -> Command {
        Command::labeled(
            &suite.label,
            format!(
                "{} -c {} sshmaster -u {} {} '{}'",
                self.exe,
                self.config.display(),
                self.user,
                self.tag,
                suite.executable
            ),
        )
    }

    pub fn terminate_command(&self) -> Command {
        // The trailing -c tells the cluster tool not to prompt for
        // termination confirmation.
        Command::new(format!(
            "{} -c {} terminate -c {}",
            self.exe,
            self.config.display(),
            self.tag
        ))
    }

    /// Assemble the full three-phase plan for the given suites.
    pub fn phase_plan(&self, suites: &[TestSuite]) -> PhasePlan {
        PhasePlan {
            setup: vec![self.start_command()],
            run: suites.iter().map(|s| self.suite_command(s)).collect(),
            teardown: vec![self.terminate_command()],
        }
    }
}
