// src/engine/report.rs

use std::fmt::Write;

/// One paragraph of the final report, recorded as the phases run and
/// rendered to text at the very end.
///
/// Keeping the sections as data (instead of concatenating strings on the
/// fly) keeps the rendering order independent of the order in which phase
/// outcomes become known.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportSection {
    SetupTimedOut {
        minutes: f64,
    },
    SetupFailed,
    /// Per-suite pass/fail lines, in submission order.
    SuiteSummary {
        statuses: Vec<(String, bool)>,
    },
    RunTimedOut {
        minutes: f64,
        /// Suite that was in flight when the deadline expired.
        during: String,
        /// Suites that never ran; always listed explicitly, never dropped.
        untested: Vec<String>,
    },
    TeardownTimedOut {
        minutes: f64,
        cluster_tag: String,
    },
    TeardownFailed {
        cluster_tag: String,
    },
}

impl ReportSection {
    pub fn render(&self) -> String {
        match self {
            ReportSection::SetupTimedOut { minutes } => format!(
                "The maximum allowable cluster setup time of {minutes} minute(s) was \
                 exceeded.\n\n"
            ),
            ReportSection::SetupFailed => "There were problems in starting the cluster while \
                 preparing to execute the test suite(s). Please check the attached log for more \
                 details.\n\n"
                .to_string(),
            ReportSection::SuiteSummary { statuses } => render_suite_summary(statuses),
            ReportSection::RunTimedOut {
                minutes,
                during,
                untested,
            } => {
                let mut out = format!(
                    "The maximum allowable time of {minutes} minute(s) for all test suites to \
                     run was exceeded. The timeout occurred while running the {during} test \
                     suite."
                );
                if !untested.is_empty() {
                    let _ = write!(
                        out,
                        " The following test suites were not tested: {}",
                        untested.join(", ")
                    );
                }
                out.push_str("\n\n");
                out
            }
            ReportSection::TeardownTimedOut {
                minutes,
                cluster_tag,
            } => format!(
                "The maximum allowable cluster termination time of {minutes} minute(s) was \
                 exceeded.\n\n{}",
                termination_warning(cluster_tag)
            ),
            ReportSection::TeardownFailed { cluster_tag } => format!(
                "There were problems in terminating the cluster. Please check the attached log \
                 for more details.\n\n{}",
                termination_warning(cluster_tag)
            ),
        }
    }
}

/// Render the recorded sections into the final multi-paragraph report.
pub fn render_report(sections: &[ReportSection]) -> String {
    sections.iter().map(ReportSection::render).collect()
}

/// `label: Pass` / `label: Fail` lines followed by a blank line, or nothing
/// at all when no suite produced a result.
fn render_suite_summary(statuses: &[(String, bool)]) -> String {
    if statuses.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    for (label, passed) in statuses {
        let verdict = if *passed { "Pass" } else { "Fail" };
        let _ = writeln!(out, "{label}: {verdict}");
    }
    out.push('\n');
    out
}

/// An un-terminated cluster keeps accruing charges, so this warning is
/// attached to every teardown problem and is never dropped.
fn termination_warning(cluster_tag: &str) -> String {
    format!(
        "IMPORTANT: You should check that the cluster labelled with the tag '{cluster_tag}' \
         was properly terminated. If not, you should manually terminate it.\n\n"
    )
}
