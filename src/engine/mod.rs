// src/engine/mod.rs

//! Orchestration engine.
//!
//! This module ties together:
//! - the three-phase state machine (setup → run → teardown) with one
//!   deadline per phase (`orchestrator.rs`)
//! - the report sections recorded along the way and rendered at the end
//!   (`report.rs`)

pub mod orchestrator;
pub mod report;

pub use orchestrator::{
    AGGREGATE_LOG_NAME, Artifact, Orchestration, PhasePlan, PhaseTimeouts, orchestrate,
};
pub use report::{ReportSection, render_report};
