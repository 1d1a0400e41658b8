//! Thin wrapper over the `docker` CLI.
//!
//! All invocations go through a [`CommandRunner`] and are recorded in the
//! [`CommandLog`].

use std::path::Path;

use vdesk_common::types::CommandOutput;

use crate::logs::CommandLog;
use crate::runner::{CommandRunner, command_line};

const PS_SEPARATOR: &str = "|||";

/// One line of `docker ps -a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsEntry {
    /// Container name.
    pub name: String,
    /// Human-readable status (`Up 3 hours`, `Exited (0) 2 days ago`).
    pub status: String,
}

/// Docker client bound to a runner and a command log.
pub struct Docker {
    runner: Box<dyn CommandRunner>,
    log: CommandLog,
}

impl std::fmt::Debug for Docker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Docker").field("log", &self.log).finish_non_exhaustive()
    }
}

impl Docker {
    /// Creates a client that spawns commands through `runner`.
    #[must_use]
    pub fn new(runner: Box<dyn CommandRunner>, log: CommandLog) -> Self {
        Self { runner, log }
    }

    /// Whether a `docker` binary is on `PATH`.
    #[must_use]
    pub fn is_installed() -> bool {
        which::which("docker").is_ok()
    }

    /// Runs an arbitrary program and records it in the command log.
    pub fn run_logged(&self, program: &str, args: &[String]) -> CommandOutput {
        let output = self.runner.run(program, args);
        self.log.record(&command_line(program, args), &output);
        output
    }

    /// Runs `docker compose -f <compose_file> <args...>`.
    pub fn compose(&self, compose_file: &Path, args: &[&str]) -> CommandOutput {
        let mut full = vec![
            "compose".to_string(),
            "-f".to_string(),
            compose_file.display().to_string(),
        ];
        full.extend(args.iter().map(ToString::to_string));
        self.run_logged("docker", &full)
    }

    /// Lists every container known to docker, running or not.
    pub fn ps_all(&self) -> Vec<PsEntry> {
        let args = [
            "ps".to_string(),
            "-a".to_string(),
            "--format".to_string(),
            format!("{{{{.Names}}}}{PS_SEPARATOR}{{{{.Status}}}}"),
        ];
        let output = self.run_logged("docker", &args);
        parse_ps(&output.stdout)
    }

    /// Runner used for non-docker host checks.
    #[must_use]
    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    /// The command log every invocation is written to.
    #[must_use]
    pub const fn log(&self) -> &CommandLog {
        &self.log
    }
}

/// Parses `docker ps` output formatted as `name|||status` per line.
///
/// Blank and malformed lines are skipped.
#[must_use]
pub fn parse_ps(stdout: &str) -> Vec<PsEntry> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let (name, status) = line.split_once(PS_SEPARATOR)?;
            Some(PsEntry {
                name: name.to_string(),
                status: status.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
    }

    impl CommandRunner for std::sync::Arc<Recorder> {
        fn run(&self, program: &str, args: &[String]) -> CommandOutput {
            self.calls.lock().unwrap().push(command_line(program, args));
            CommandOutput {
                returncode: 0,
                stdout: "123456-my_ws-1|||Up 2 hours\n".into(),
                stderr: String::new(),
            }
        }
    }

    #[test]
    fn parse_ps_splits_name_and_status() {
        let entries = parse_ps("a|||Up 1 second\n\n  b|||Exited (0) 3 days ago  \nbroken line\n");
        assert_eq!(
            entries,
            vec![
                PsEntry {
                    name: "a".into(),
                    status: "Up 1 second".into()
                },
                PsEntry {
                    name: "b".into(),
                    status: "Exited (0) 3 days ago".into()
                },
            ]
        );
    }

    #[test]
    fn compose_builds_command_and_logs_it() {
        let dir = tempfile::tempdir().expect("tempdir");
        let recorder = std::sync::Arc::new(Recorder::default());
        let docker = Docker::new(
            Box::new(recorder.clone()),
            CommandLog::new(dir.path().join("commands.log")),
        );

        let out = docker.compose(Path::new("/c/123456/docker-compose.yml"), &["up", "-d"]);
        assert!(out.success());

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(
            calls.as_slice(),
            ["docker compose -f /c/123456/docker-compose.yml up -d"]
        );
        let logged = docker.log().read().expect("read log");
        assert!(
            logged.contains("CMD: docker compose -f /c/123456/docker-compose.yml up -d RETURN: 0")
        );
    }

    #[test]
    fn ps_all_uses_separator_format() {
        let dir = tempfile::tempdir().expect("tempdir");
        let recorder = std::sync::Arc::new(Recorder::default());
        let docker = Docker::new(
            Box::new(recorder.clone()),
            CommandLog::new(dir.path().join("commands.log")),
        );

        let entries = docker.ps_all();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "123456-my_ws-1");

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls[0], "docker ps -a --format {{.Names}}|||{{.Status}}");
    }
}
