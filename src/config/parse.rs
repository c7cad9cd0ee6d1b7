// src/config/parse.rs

use std::collections::HashSet;

use thiserror::Error;

use crate::config::model::{EmailSettings, TestSuite};

const REQUIRED_SETTINGS: [&str; 4] = ["smtp_server", "smtp_port", "sender", "password"];

/// Everything that can be wrong with the input files or timeout flags.
///
/// All of these are fatal and surface before a single command is executed.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("line {line} of the test suite config must contain exactly two tab-separated fields")]
    SuiteFieldCount { line: usize },

    #[error("the test suite label '{label}' is used more than once; labels must be unique")]
    DuplicateLabel { label: String },

    #[error("the test suite label '{label}' must not contain a path separator; labels name log files")]
    BadLabel { label: String },

    #[error("the test suite config must contain at least one test suite to run")]
    NoSuites,

    #[error("'{address}' does not look like a valid email address")]
    BadAddress { address: String },

    #[error("there are no email addresses to send the test suite results to")]
    NoRecipients,

    #[error("line {line} of the email settings must contain exactly two tab-separated fields")]
    SettingFieldCount { line: usize },

    #[error("unrecognized setting '{key}' in email settings (valid settings are {REQUIRED_SETTINGS:?})")]
    UnknownSetting { key: String },

    #[error("the email settings are missing the required field '{key}'")]
    MissingSetting { key: &'static str },

    #[error("smtp_port '{value}' is not a valid port number")]
    BadPort { value: String },

    #[error("a phase timeout must be a positive number of minutes (got {minutes})")]
    InvalidTimeout { minutes: f64 },

    #[error("the max spot bid of ${dollars:.2} must be greater than zero")]
    InvalidSpotBid { dollars: f64 },

    #[error(
        "the max spot bid of ${dollars:.2} seems very high; if this really is the bid you want, \
         pass --suppress-spot-bid-check"
    )]
    SpotBidTooHigh { dollars: f64 },
}

/// A line carries no content when, after trimming, it is empty or a comment.
pub fn can_ignore(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Parse the test suite config: one `label<TAB>executable` pair per line.
pub fn parse_suite_config(contents: &str) -> Result<Vec<TestSuite>, ConfigError> {
    let mut suites = Vec::new();
    let mut seen = HashSet::new();

    for (idx, line) in contents.lines().enumerate() {
        if can_ignore(line) {
            continue;
        }
        let fields: Vec<&str> = line.trim().split('\t').collect();
        let &[label, executable] = fields.as_slice() else {
            return Err(ConfigError::SuiteFieldCount { line: idx + 1 });
        };
        // Labels become `<label>_results.txt` file names; a separator would
        // let a label write outside the delivery directory.
        if label.contains(['/', '\\']) {
            return Err(ConfigError::BadLabel {
                label: label.to_string(),
            });
        }
        if !seen.insert(label.to_string()) {
            return Err(ConfigError::DuplicateLabel {
                label: label.to_string(),
            });
        }
        suites.push(TestSuite {
            label: label.to_string(),
            executable: executable.to_string(),
        });
    }

    if suites.is_empty() {
        return Err(ConfigError::NoSuites);
    }
    Ok(suites)
}

/// Parse the recipients file: one address per line.
///
/// Validation is deliberately shallow: an address just has to contain a
/// `@`; actual deliverability is the notifier's problem.
pub fn parse_recipients(contents: &str) -> Result<Vec<String>, ConfigError> {
    let recipients: Vec<String> = contents
        .lines()
        .filter(|line| !can_ignore(line))
        .map(|line| line.trim().to_string())
        .collect();

    if recipients.is_empty() {
        return Err(ConfigError::NoRecipients);
    }
    for address in &recipients {
        if !address.contains('@') {
            return Err(ConfigError::BadAddress {
                address: address.clone(),
            });
        }
    }
    Ok(recipients)
}

/// Parse the email settings file: `key<TAB>value` pairs with exactly the
/// keys `smtp_server`, `smtp_port`, `sender`, and `password`.
pub fn parse_email_settings(contents: &str) -> Result<EmailSettings, ConfigError> {
    let mut smtp_server = None;
    let mut smtp_port = None;
    let mut sender = None;
    let mut password = None;

    for (idx, line) in contents.lines().enumerate() {
        if can_ignore(line) {
            continue;
        }
        let fields: Vec<&str> = line.trim().split('\t').collect();
        let &[key, value] = fields.as_slice() else {
            return Err(ConfigError::SettingFieldCount { line: idx + 1 });
        };
        match key {
            "smtp_server" => smtp_server = Some(value.to_string()),
            "smtp_port" => {
                smtp_port = Some(value.parse::<u16>().map_err(|_| ConfigError::BadPort {
                    value: value.to_string(),
                })?)
            }
            "sender" => sender = Some(value.to_string()),
            "password" => password = Some(value.to_string()),
            other => {
                return Err(ConfigError::UnknownSetting {
                    key: other.to_string(),
                });
            }
        }
    }

    Ok(EmailSettings {
        smtp_server: smtp_server.ok_or(ConfigError::MissingSetting { key: "smtp_server" })?,
        smtp_port: smtp_port.ok_or(ConfigError::MissingSetting { key: "smtp_port" })?,
        sender: sender.ok_or(ConfigError::MissingSetting { key: "sender" })?,
        password: password.ok_or(ConfigError::MissingSetting { key: "password" })?,
    })
}
