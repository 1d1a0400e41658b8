//! Formatted output helpers for CLI commands.
//!
//! Provides the container table, command result reports and JSON printing.

use std::fmt::Write as _;

use serde::Serialize;
use vdesk_common::format::{format_bytes, or_dash};
use vdesk_common::types::{CommandOutput, ContainerInfo, HostResources};

/// Prints `value` as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Renders containers as an aligned table, or a notice when there are none.
#[must_use]
pub fn container_table(containers: &[ContainerInfo]) -> String {
    if containers.is_empty() {
        return "No containers found.".to_string();
    }
    let mut out = format!(
        "{:<8} {:<44} {:<5} {:<7} {:<7} {:<7} {:<6} {:<16} {}",
        "NAME", "IMAGE", "CPUS", "MEMORY", "SHM", "GPUS", "PORT", "STATE", "COMMENT"
    );
    for c in containers {
        let gpus = c.gpus.as_ref().map(|g| g.join(","));
        let port = c.port.map(|p| p.to_string());
        let _ = write!(
            out,
            "\n{:<8} {:<44} {:<5} {:<7} {:<7} {:<7} {:<6} {:<16} {}",
            c.name,
            or_dash(c.image.as_deref()),
            or_dash(c.cpus.as_deref()),
            or_dash(c.memory.as_deref()),
            or_dash(c.shm_size.as_deref()),
            or_dash(gpus.as_deref()),
            or_dash(port.as_deref()),
            or_dash(c.state.as_deref()),
            or_dash(c.comment.as_deref()),
        );
    }
    out
}

/// Summarises a finished command: its return code and any output.
#[must_use]
pub fn command_report(label: &str, output: &CommandOutput) -> String {
    let mut out = format!("{label}: exit {}", output.returncode);
    for (stream, text) in [("stdout", &output.stdout), ("stderr", &output.stderr)] {
        let text = text.trim_end();
        if !text.is_empty() {
            let _ = write!(out, "\n  {stream}:");
            for line in text.lines() {
                let _ = write!(out, "\n    {line}");
            }
        }
    }
    out
}

/// Describes the host's CPUs, memory and GPUs.
#[must_use]
pub fn host_report(host: &HostResources) -> String {
    let memory = host
        .memory_bytes
        .map_or_else(|| "unknown".to_string(), format_bytes);
    let mut out = format!("CPUs:   {}\nMemory: {memory}\nGPUs:   {}", host.cpus, host.gpus.len());
    for gpu in &host.gpus {
        let _ = write!(out, "\n  [{}] {}", gpu.id, gpu.name);
    }
    out
}

#[cfg(test)]
mod tests {
    use vdesk_common::types::GpuDevice;

    use super::*;

    #[test]
    fn empty_table_has_notice() {
        assert_eq!(container_table(&[]), "No containers found.");
    }

    #[test]
    fn table_fills_missing_fields_with_dashes() {
        let rows = vec![ContainerInfo {
            name: "123456".into(),
            image: Some("ubuntu:22.04".into()),
            gpus: Some(vec!["0".into(), "2".into()]),
            port: Some(33456),
            state: Some("idle".into()),
            ..ContainerInfo::default()
        }];
        let table = container_table(&rows);
        let mut lines = table.lines();
        assert!(lines.next().unwrap().starts_with("NAME"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("123456"));
        assert!(row.contains("0,2"));
        assert!(row.contains("33456"));
        assert!(row.contains(" - "));
    }

    #[test]
    fn report_indents_output_streams() {
        let output = CommandOutput {
            returncode: 1,
            stdout: String::new(),
            stderr: "no such service\n".into(),
        };
        assert_eq!(
            command_report("compose", &output),
            "compose: exit 1\n  stderr:\n    no such service"
        );
    }

    #[test]
    fn host_report_lists_gpus() {
        let host = HostResources {
            cpus: 16,
            memory_bytes: Some(2_147_483_648),
            gpus: vec![GpuDevice {
                id: "0".into(),
                name: "Tesla T4".into(),
            }],
        };
        let report = host_report(&host);
        assert!(report.contains("CPUs:   16"));
        assert!(report.contains("2.0 GiB"));
        assert!(report.contains("[0] Tesla T4"));
    }

    #[test]
    fn host_report_without_memory() {
        let report = host_report(&HostResources::default());
        assert!(report.contains("Memory: unknown"));
    }
}
