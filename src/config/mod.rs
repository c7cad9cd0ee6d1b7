// src/config/mod.rs

//! Configuration loading and validation.
//!
//! Responsibilities:
//! - Define the parsed data model (`model.rs`).
//! - Line-based parsers for the tab-separated input files (`parse.rs`).
//! - Load files from disk with path context (`loader.rs`).
//!
//! Every configuration problem is fatal and is reported before any remote
//! resource is touched.

pub mod loader;
pub mod model;
pub mod parse;

pub use loader::{load_email_settings, load_recipients, load_suite_config};
pub use model::{EmailSettings, MAX_SPOT_BID, PhaseTimeout, SpotBid, TestSuite};
pub use parse::{ConfigError, parse_email_settings, parse_recipients, parse_suite_config};
