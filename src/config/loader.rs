// src/config/loader.rs

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::model::{EmailSettings, TestSuite};
use crate::config::parse::{parse_email_settings, parse_recipients, parse_suite_config};

/// Load and parse the test suite config file.
pub fn load_suite_config(path: impl AsRef<Path>) -> Result<Vec<TestSuite>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading test suite config at {path:?}"))?;
    let suites = parse_suite_config(&contents)
        .with_context(|| format!("parsing test suite config from {path:?}"))?;
    Ok(suites)
}

/// Load and parse the recipients file.
pub fn load_recipients(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading recipients file at {path:?}"))?;
    let recipients = parse_recipients(&contents)
        .with_context(|| format!("parsing recipients from {path:?}"))?;
    Ok(recipients)
}

/// Load and parse the email settings file.
pub fn load_email_settings(path: impl AsRef<Path>) -> Result<EmailSettings> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading email settings at {path:?}"))?;
    let settings = parse_email_settings(&contents)
        .with_context(|| format!("parsing email settings from {path:?}"))?;
    Ok(settings)
}
