// src/exec/command.rs

use std::process::Stdio;

use thiserror::Error;
use tokio::process::{Child, Command as ProcessCommand};
use tracing::{debug, warn};

/// Errors that can cross the batch boundary.
///
/// Nonzero exit codes are *not* errors; they are recorded as data in the
/// command's result. The only hard failures are being unable to spawn a
/// shell at all, or losing the worker task itself.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to spawn shell for command '{command}'")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to collect output of command '{command}'")]
    Collect {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command worker task failed")]
    Worker(#[from] tokio::task::JoinError),
}

/// Captured output of one finished shell command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// A shell command that has been spawned but not yet waited on.
pub struct RunningCommand {
    text: String,
    child: Child,
}

/// Spawn `text` through a platform shell with both output streams piped.
///
/// On Unix the child is made the leader of a fresh process group, so the
/// command and any children it spawns can later be terminated as a unit.
pub fn spawn_shell(text: &str) -> Result<RunningCommand, ExecError> {
    let mut cmd = if cfg!(windows) {
        let mut c = ProcessCommand::new("cmd");
        c.arg("/C").arg(text);
        c
    } else {
        let mut c = ProcessCommand::new("sh");
        c.arg("-c").arg(text);
        c
    };

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(unix)]
    cmd.process_group(0);

    let child = cmd.spawn().map_err(|source| ExecError::Spawn {
        command: text.to_string(),
        source,
    })?;

    debug!(command = %text, pid = ?child.id(), "spawned shell command");

    Ok(RunningCommand {
        text: text.to_string(),
        child,
    })
}

impl RunningCommand {
    /// Process-group id to signal for forced termination.
    ///
    /// `None` once the child has been reaped (or on platforms where the id
    /// is unavailable).
    pub fn group_id(&self) -> Option<i32> {
        self.child.id().map(|pid| pid as i32)
    }

    /// Wait for the command to exit, draining stdout and stderr completely.
    ///
    /// Draining happens concurrently with the wait, so a child blocked on
    /// writing to a full pipe can never deadlock against us.
    pub async fn collect(self) -> Result<CommandOutput, ExecError> {
        let text = self.text;
        let output = self
            .child
            .wait_with_output()
            .await
            .map_err(|source| ExecError::Collect {
                command: text.clone(),
                source,
            })?;

        let exit_code = exit_code_of(&output.status);
        debug!(command = %text, exit_code, "shell command exited");

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code,
        })
    }
}

/// Raw exit code of a finished process.
///
/// On Unix a signal-terminated child has no code; report the negated signal
/// number instead so callers still see a nonzero value.
fn exit_code_of(status: &std::process::ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        status
            .code()
            .or_else(|| status.signal().map(|sig| -sig))
            .unwrap_or(-1)
    }
    #[cfg(not(unix))]
    {
        status.code().unwrap_or(-1)
    }
}

/// Send SIGTERM to an entire process group.
///
/// Idempotent: a group that has already exited (ESRCH) is not an error.
#[cfg(unix)]
pub fn terminate_group(pgid: i32) {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    match killpg(Pid::from_raw(pgid), Signal::SIGTERM) {
        Ok(()) => debug!(pgid, "sent SIGTERM to process group"),
        Err(Errno::ESRCH) => debug!(pgid, "process group already gone"),
        Err(err) => warn!(pgid, error = %err, "failed to signal process group"),
    }
}

#[cfg(not(unix))]
pub fn terminate_group(pgid: i32) {
    // Process groups are unavailable here; kill_on_drop reclaims the direct
    // child when the batch is dropped.
    warn!(pgid, "process-group termination not supported on this platform");
}
