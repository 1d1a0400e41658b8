//! Spawning external commands.
//!
//! The [`CommandRunner`] trait is the seam between the manager and the
//! host: production code spawns real processes, tests script the output.

use std::io::ErrorKind;
use std::process::Command;

use vdesk_common::constants::COMMAND_NOT_FOUND;
use vdesk_common::types::CommandOutput;

/// Runs a program to completion and captures its output.
///
/// Failing to spawn is not an error: it is reported as a
/// [`CommandOutput`] with a non-zero return code, exactly like a command
/// that ran and failed.
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args`, blocking until it exits.
    fn run(&self, program: &str, args: &[String]) -> CommandOutput;
}

/// Runner that spawns real processes with [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> CommandOutput {
        tracing::debug!(program, ?args, "spawning command");
        match Command::new(program).args(args).output() {
            Ok(output) => CommandOutput {
                returncode: output.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            },
            Err(e) => {
                let returncode = if e.kind() == ErrorKind::NotFound {
                    COMMAND_NOT_FOUND
                } else {
                    1
                };
                tracing::error!(program, error = %e, "command failed to spawn");
                CommandOutput {
                    returncode,
                    stdout: String::new(),
                    stderr: e.to_string(),
                }
            }
        }
    }
}

/// Renders a command line for logs.
#[must_use]
pub fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
