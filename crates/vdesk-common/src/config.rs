//! Global configuration model for vdesk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;

/// Root configuration for the container manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VdeskConfig {
    /// Directory holding one compose project per container.
    pub containers_dir: PathBuf,
    /// Template compose file copied for each new container.
    pub template_compose: PathBuf,
    /// Script run against a freshly created container.
    pub patch_script: PathBuf,
    /// Directory holding the command log.
    pub log_dir: PathBuf,
    /// Prefix prepended to private registry images.
    pub registry_url: String,
    /// How long to wait for a new container to show up in `docker ps`.
    pub appear_timeout: Duration,
    /// Interval between `docker ps` polls.
    pub poll_interval: Duration,
}

impl VdeskConfig {
    /// Derives every path from a project root laid out as
    /// `<root>/scripts/...` and `<root>/web/{containers,logs}`.
    #[must_use]
    pub fn from_root(root: &Path) -> Self {
        let web = root.join(constants::WEB_DIR);
        Self {
            containers_dir: web.join(constants::CONTAINERS_DIR),
            template_compose: root.join(constants::TEMPLATE_COMPOSE),
            patch_script: root.join(constants::PATCH_SCRIPT),
            log_dir: web.join(constants::LOG_DIR),
            registry_url: constants::DEFAULT_REGISTRY_URL.to_string(),
            appear_timeout: Duration::from_secs(constants::APPEAR_TIMEOUT_SECS),
            poll_interval: Duration::from_secs(constants::APPEAR_POLL_SECS),
        }
    }

    /// Replaces the registry prefix.
    #[must_use]
    pub fn with_registry_url(mut self, url: impl Into<String>) -> Self {
        self.registry_url = url.into();
        self
    }

    /// Path of the command log file.
    #[must_use]
    pub fn command_log(&self) -> PathBuf {
        self.log_dir.join(constants::COMMAND_LOG_FILE)
    }

    /// Directory of the named container's compose project.
    #[must_use]
    pub fn container_dir(&self, name: &str) -> PathBuf {
        self.containers_dir.join(name)
    }

    /// Compose document of the named container.
    #[must_use]
    pub fn compose_path(&self, name: &str) -> PathBuf {
        self.container_dir(name).join(constants::COMPOSE_FILE_NAME)
    }
}

impl Default for VdeskConfig {
    fn default() -> Self {
        Self::from_root(Path::new("."))
    }
}
