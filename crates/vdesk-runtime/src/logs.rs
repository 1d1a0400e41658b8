//! The command log.
//!
//! Every command the manager runs is appended to `commands.log` together
//! with its return code and output. The file is rotated once it grows past
//! a size limit, keeping a fixed number of numbered backups.

use std::io::Write;
use std::path::PathBuf;

use vdesk_common::constants::{LOG_BACKUPS, LOG_MAX_BYTES};
use vdesk_common::error::{Result, VdeskError};
use vdesk_common::types::CommandOutput;

/// Size-rotated append-only log file.
#[derive(Debug, Clone)]
pub struct CommandLog {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
}

impl CommandLog {
    /// Creates a log at `path` with the default rotation policy.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_bytes: LOG_MAX_BYTES,
            backups: LOG_BACKUPS,
        }
    }

    /// Overrides the rotation policy.
    #[must_use]
    pub const fn with_rotation(mut self, max_bytes: u64, backups: usize) -> Self {
        self.max_bytes = max_bytes;
        self.backups = backups;
        self
    }

    /// Path of the `n`th rotated backup (`commands.log.1`, ...).
    #[must_use]
    pub fn backup_path(&self, n: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }

    /// Records one command and its output, both to `tracing` and to disk.
    ///
    /// Failures to write the file are logged and otherwise ignored.
    pub fn record(&self, command: &str, output: &CommandOutput) {
        tracing::info!(command, returncode = output.returncode, "command finished");
        let mut lines = vec![format!("CMD: {command} RETURN: {}", output.returncode)];
        if !output.stdout.is_empty() {
            lines.push(format!("STDOUT: {}", output.stdout.trim_end()));
        }
        if !output.stderr.is_empty() {
            lines.push(format!("STDERR: {}", output.stderr.trim_end()));
        }
        for line in &lines {
            if let Err(e) = self.append("INFO", line) {
                tracing::warn!(error = %e, "failed to write command log");
                return;
            }
        }
    }

    /// Appends one timestamped line, rotating first if the file is full.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created or written.
    pub fn append(&self, level: &str, message: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| VdeskError::io(parent, e))?;
        }
        self.rotate_if_full()?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| VdeskError::io(&self.path, e))?;
        let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f");
        writeln!(file, "{stamp} [{level}] {message}").map_err(|e| VdeskError::io(&self.path, e))
    }

    /// Reads the live log file; empty if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn read(&self) -> Result<String> {
        if !self.path.exists() {
            return Ok(String::new());
        }
        std::fs::read_to_string(&self.path).map_err(|e| VdeskError::io(&self.path, e))
    }

    fn rotate_if_full(&self) -> Result<()> {
        let Ok(meta) = std::fs::metadata(&self.path) else {
            return Ok(());
        };
        if self.max_bytes == 0 || meta.len() < self.max_bytes {
            return Ok(());
        }
        if self.backups == 0 {
            return std::fs::remove_file(&self.path).map_err(|e| VdeskError::io(&self.path, e));
        }
        tracing::debug!(path = %self.path.display(), "rotating command log");
        let oldest = self.backup_path(self.backups);
        if oldest.exists() {
            std::fs::remove_file(&oldest).map_err(|e| VdeskError::io(&oldest, e))?;
        }
        for n in (1..self.backups).rev() {
            let from = self.backup_path(n);
            if from.exists() {
                let to = self.backup_path(n + 1);
                std::fs::rename(&from, &to).map_err(|e| VdeskError::io(&from, e))?;
            }
        }
        let first = self.backup_path(1);
        std::fs::rename(&self.path, &first).map_err(|e| VdeskError::io(&self.path, e))
    }
}
