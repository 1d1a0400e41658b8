//! Host resource discovery: CPU count, total memory and installed GPUs.

use std::path::Path;

use vdesk_common::types::{GpuDevice, HostResources};

use crate::runner::CommandRunner;

/// Default location of the kernel memory report.
pub const MEMINFO_PATH: &str = "/proc/meminfo";

/// Detects the CPUs, memory and GPUs of the host.
///
/// Memory comes from `meminfo` (falling back to `free -b`); GPUs come from
/// `nvidia-smi`. Anything that cannot be determined is left empty.
pub fn detect(runner: &dyn CommandRunner, meminfo: &Path) -> HostResources {
    let cpus = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
    let memory_bytes = std::fs::read_to_string(meminfo)
        .ok()
        .and_then(|content| parse_meminfo(&content))
        .or_else(|| {
            tracing::debug!(path = %meminfo.display(), "meminfo unavailable, trying free -b");
            let out = runner.run("free", &["-b".to_string()]);
            parse_free(&out.stdout)
        });
    let gpus = {
        let out = runner.run(
            "nvidia-smi",
            &[
                "--query-gpu=index,name".to_string(),
                "--format=csv,noheader".to_string(),
            ],
        );
        if out.success() {
            parse_nvidia_smi(&out.stdout)
        } else {
            tracing::debug!(returncode = out.returncode, "nvidia-smi unavailable");
            Vec::new()
        }
    };
    tracing::info!(cpus, ?memory_bytes, gpus = gpus.len(), "detected host resources");
    HostResources {
        cpus,
        memory_bytes,
        gpus,
    }
}

/// Extracts `MemTotal` (reported in kB) from `/proc/meminfo`, in bytes.
#[must_use]
pub fn parse_meminfo(content: &str) -> Option<u64> {
    content
        .lines()
        .find(|line| line.starts_with("MemTotal:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|kb| kb.parse::<u64>().ok())
        .map(|kb| kb * 1024)
}

/// Extracts total memory from the second line of `free -b`.
#[must_use]
pub fn parse_free(stdout: &str) -> Option<u64> {
    stdout
        .lines()
        .nth(1)
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|total| total.parse().ok())
}

/// Parses `nvidia-smi --query-gpu=index,name --format=csv,noheader`.
#[must_use]
pub fn parse_nvidia_smi(stdout: &str) -> Vec<GpuDevice> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (id, name) = line.split_once(',').unwrap_or((line, ""));
            GpuDevice {
                id: id.trim().to_string(),
                name: name.trim().to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use vdesk_common::types::CommandOutput;

    use super::*;

    const MEMINFO: &str = "\
MemTotal:       65759880 kB
MemFree:        12345678 kB
MemAvailable:   40000000 kB
";

    const FREE: &str = "\
               total        used        free      shared  buff/cache   available
Mem:     67338117120  9876543210 12345678901    12345678 45678901234 56789012345
Swap:     2147483648           0  2147483648
";

    struct Scripted;

    impl CommandRunner for Scripted {
        fn run(&self, program: &str, _args: &[String]) -> CommandOutput {
            match program {
                "free" => CommandOutput {
                    returncode: 0,
                    stdout: FREE.into(),
                    stderr: String::new(),
                },
                "nvidia-smi" => CommandOutput {
                    returncode: 0,
                    stdout: "0, NVIDIA A100-SXM4-80GB\n1, NVIDIA A100-SXM4-80GB\n".into(),
                    stderr: String::new(),
                },
                _ => CommandOutput {
                    returncode: 127,
                    stdout: String::new(),
                    stderr: "not found".into(),
                },
            }
        }
    }

    struct NothingInstalled;

    impl CommandRunner for NothingInstalled {
        fn run(&self, _program: &str, _args: &[String]) -> CommandOutput {
            CommandOutput {
                returncode: 127,
                stdout: String::new(),
                stderr: "No such file or directory".into(),
            }
        }
    }

    #[test]
    fn meminfo_total_in_bytes() {
        assert_eq!(parse_meminfo(MEMINFO), Some(65_759_880 * 1024));
        assert_eq!(parse_meminfo("MemFree: 1 kB\n"), None);
    }

    #[test]
    fn free_second_line_total() {
        assert_eq!(parse_free(FREE), Some(67_338_117_120));
        assert_eq!(parse_free("only one line"), None);
    }

    #[test]
    fn nvidia_smi_lines() {
        let gpus = parse_nvidia_smi("0, Tesla T4\n\n1\n");
        assert_eq!(
            gpus,
            vec![
                GpuDevice {
                    id: "0".into(),
                    name: "Tesla T4".into()
                },
                GpuDevice {
                    id: "1".into(),
                    name: String::new()
                },
            ]
        );
    }

    #[test]
    fn detect_prefers_meminfo() {
        let dir = tempfile::tempdir().expect("tempdir");
        let meminfo = dir.path().join("meminfo");
        std::fs::write(&meminfo, MEMINFO).expect("write meminfo");

        let host = detect(&Scripted, &meminfo);
        assert!(host.cpus >= 1);
        assert_eq!(host.memory_bytes, Some(65_759_880 * 1024));
        assert_eq!(host.gpus.len(), 2);
    }

    #[test]
    fn detect_falls_back_to_free() {
        let dir = tempfile::tempdir().expect("tempdir");
        let host = detect(&Scripted, &dir.path().join("missing"));
        assert_eq!(host.memory_bytes, Some(67_338_117_120));
    }

    #[test]
    fn detect_without_tools_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let host = detect(&NothingInstalled, &dir.path().join("missing"));
        assert_eq!(host.memory_bytes, None);
        assert!(host.gpus.is_empty());
    }
}
