// src/exec/mod.rs

//! Process execution layer.
//!
//! This module owns the one genuinely concurrent part of the crate:
//!
//! - [`command`] is the leaf that spawns a single shell command in its own
//!   process group and drains its output.
//! - [`batch`] drives an ordered list of commands through the leaf under a
//!   single wall-clock deadline, with a cancellation protocol that forcibly
//!   terminates whatever is in flight when the deadline expires.

pub mod batch;
pub mod command;

pub use batch::{
    BatchOptions, BatchOutcome, BatchReport, Command, CommandResult, execute, transcript_block,
};
pub use command::ExecError;
