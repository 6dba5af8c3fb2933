//! Sequential shell command execution with fail-fast semantics.
//!
//! Commands are naive whitespace-split into a program and arguments;
//! there is no shell-quoting support, so a quoted argument containing
//! spaces will be split incorrectly. This is a documented limitation
//! carried over from the original pipe, not something to fix silently.

use std::env;
use std::path::PathBuf;
use std::process::Command;

use serde::Serialize;

use crate::error::{Error, Result};

/// Outcome of one successfully executed command.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub command: String,
    pub exit_code: i32,
    pub log: String,
}

/// Restores the process working directory when dropped.
///
/// The batch runs with the process cwd switched to the requested
/// directory; the guard puts the previous cwd back on every exit path,
/// including failures.
struct WorkingDirGuard {
    previous: PathBuf,
}

impl WorkingDirGuard {
    fn enter(dir: &str) -> Result<WorkingDirGuard> {
        let previous = env::current_dir()?;
        env::set_current_dir(dir).map_err(|e| Error::Command {
            command: format!("cd {}", dir),
            detail: e.to_string(),
        })?;
        Ok(WorkingDirGuard { previous })
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        // Nothing sensible to do if the previous directory vanished.
        let _ = env::set_current_dir(&self.previous);
    }
}

/// Run a batch of commands in order inside `working_dir`.
///
/// Stops at the first spawn failure or non-zero exit; commands that
/// already ran are not rolled back. Subprocesses inherit the host's
/// standard streams. Returns one [`ExecutionResult`] per executed
/// command on success.
pub fn run_batch(working_dir: &str, commands: &[String]) -> Result<Vec<ExecutionResult>> {
    let _guard = WorkingDirGuard::enter(working_dir)?;
    let mut results = Vec::with_capacity(commands.len());

    for command in commands {
        let mut parts = command.split_whitespace();
        let Some(program) = parts.next() else {
            // Splitting a runtime script on ';' can yield empty entries.
            continue;
        };

        let status = Command::new(program)
            .args(parts)
            .status()
            .map_err(|e| Error::Command {
                command: command.clone(),
                detail: e.to_string(),
            })?;

        let exit_code = status.code().unwrap_or(-1);
        if !status.success() {
            return Err(Error::Command {
                command: command.clone(),
                detail: format!("exited with status {}", exit_code),
            });
        }

        results.push(ExecutionResult {
            command: command.clone(),
            exit_code,
            log: format!("exec => {} returned {}", command, exit_code),
        });
    }

    Ok(results)
}
