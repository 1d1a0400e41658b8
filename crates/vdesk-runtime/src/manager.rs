//! The container manager.
//!
//! Coordinates the compose documents on disk with the `docker` CLI:
//! creating a container copies and edits the template, brings the project
//! up, waits for it to appear and runs the patch script; listing reads every
//! project back and joins it with `docker ps`.

use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use vdesk_common::config::VdeskConfig;
use vdesk_common::constants::COMPOSE_FILE_NAME;
use vdesk_common::error::{Result, VdeskError};
use vdesk_common::types::{
    CommandOutput, ContainerAction, ContainerInfo, CreateRequest, HostResources, ModifyRequest,
};
use vdesk_compose::{ComposeFile, service};

use crate::docker::Docker;
use crate::host;
use crate::logs::CommandLog;
use crate::runner::{CommandRunner, SystemRunner};

/// State reported for a project with no docker container.
pub const IDLE_STATE: &str = "idle";

/// Result of creating a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOutcome {
    /// Output of `docker compose up -d`.
    pub compose_result: CommandOutput,
    /// Output of the patch script.
    pub patch_result: CommandOutput,
    /// Root password written into the container environment.
    pub root_password: String,
}

/// Result of a lifecycle action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    /// Output of the last compose command run.
    pub result: CommandOutput,
    /// Whether the project directory was removed.
    pub deleted: bool,
}

/// High-level API over the container projects.
#[derive(Debug)]
pub struct Manager {
    config: VdeskConfig,
    docker: Docker,
    meminfo: PathBuf,
}

impl Manager {
    /// Creates a manager that spawns real processes.
    #[must_use]
    pub fn new(config: VdeskConfig) -> Self {
        Self::with_runner(config, Box::new(SystemRunner))
    }

    /// Creates a manager with a custom command runner.
    #[must_use]
    pub fn with_runner(config: VdeskConfig, runner: Box<dyn CommandRunner>) -> Self {
        let log = CommandLog::new(config.command_log());
        Self {
            config,
            docker: Docker::new(runner, log),
            meminfo: PathBuf::from(host::MEMINFO_PATH),
        }
    }

    /// Reads host memory from `path` instead of `/proc/meminfo`.
    #[must_use]
    pub fn with_meminfo(mut self, path: impl Into<PathBuf>) -> Self {
        self.meminfo = path.into();
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &VdeskConfig {
        &self.config
    }

    /// Whether a `docker` binary is available on this host.
    #[must_use]
    pub fn is_available(&self) -> bool {
        Docker::is_installed()
    }

    /// Creates, starts and patches a new container.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid, the container already
    /// exists, the template is missing, or the compose document cannot be
    /// prepared. A failing `docker` or patch command is reported in the
    /// outcome, not as an error.
    pub fn create(&self, request: &CreateRequest) -> Result<CreateOutcome> {
        request.validate()?;
        let name = request.name.as_str();
        let host_port = request.name.host_port()?;
        tracing::info!(name, host_port, image = %request.image, "creating container");

        let dest = self.config.container_dir(name);
        if dest.exists() {
            return Err(VdeskError::AlreadyExists {
                kind: "container",
                id: name.to_string(),
            });
        }
        if !self.config.template_compose.exists() {
            return Err(VdeskError::NotFound {
                kind: "compose template",
                id: self.config.template_compose.display().to_string(),
            });
        }

        let root_password = request
            .root_password
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(generate_password);

        let compose_path = dest.join(COMPOSE_FILE_NAME);
        let prepared =
            self.prepare_project(&dest, &compose_path, request, host_port, &root_password);
        if let Err(e) = prepared {
            tracing::warn!(name, error = %e, "removing half-created container directory");
            let _ = std::fs::remove_dir_all(&dest);
            return Err(e);
        }

        let compose_result = self.docker.compose(&compose_path, &["up", "-d"]);

        let container = request.name.service_container();
        if !self.wait_for_container(&container) {
            tracing::warn!(
                container = %container,
                timeout = ?self.config.appear_timeout,
                "container did not appear in time, running patch script anyway"
            );
        }
        let patch_result = self.docker.run_logged(
            "/bin/bash",
            &[self.config.patch_script.display().to_string(), container],
        );

        Ok(CreateOutcome {
            compose_result,
            patch_result,
            root_password,
        })
    }

    fn prepare_project(
        &self,
        dest: &Path,
        compose_path: &Path,
        request: &CreateRequest,
        host_port: u16,
        root_password: &str,
    ) -> Result<()> {
        std::fs::create_dir_all(dest).map_err(|e| VdeskError::io(dest, e))?;
        let _ = std::fs::copy(&self.config.template_compose, compose_path)
            .map_err(|e| VdeskError::io(&self.config.template_compose, e))?;
        let mut file = ComposeFile::load(compose_path)?;
        service::apply_create(&mut file, request, host_port, root_password);
        file.save(request.comment.as_deref())
    }

    /// Polls `docker ps -a` until `container` shows up or the timeout passes.
    fn wait_for_container(&self, container: &str) -> bool {
        let start = Instant::now();
        loop {
            let found = self
                .docker
                .ps_all()
                .iter()
                .any(|e| e.name == container || e.name.contains(container));
            if found {
                tracing::info!(
                    container,
                    elapsed = ?start.elapsed(),
                    "container appeared"
                );
                return true;
            }
            if start.elapsed() + self.config.poll_interval > self.config.appear_timeout {
                return false;
            }
            std::thread::sleep(self.config.poll_interval);
        }
    }

    /// Lists every container project, in name order.
    ///
    /// Directories without a readable compose document are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the containers directory exists but cannot be read.
    pub fn list(&self) -> Result<Vec<ContainerInfo>> {
        let dir = &self.config.containers_dir;
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut projects: Vec<(String, PathBuf)> = std::fs::read_dir(dir)
            .map_err(|e| VdeskError::io(dir, e))?
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.path().is_dir())
            .map(|entry| {
                (
                    entry.file_name().to_string_lossy().into_owned(),
                    entry.path().join(COMPOSE_FILE_NAME),
                )
            })
            .filter(|(_, compose)| compose.exists())
            .collect();
        projects.sort_by(|a, b| a.0.cmp(&b.0));

        let ps = if projects.is_empty() {
            Vec::new()
        } else {
            self.docker.ps_all()
        };

        let mut containers = Vec::with_capacity(projects.len());
        for (name, compose) in projects {
            let file = match ComposeFile::load(&compose) {
                Ok(file) => file,
                Err(e) => {
                    tracing::warn!(name, error = %e, "skipping unreadable compose file");
                    continue;
                }
            };
            let mut info = service::parse_info(&file);
            info.state = Some(
                ps.iter()
                    .find(|entry| entry.name.contains(&name))
                    .map_or_else(|| IDLE_STATE.to_string(), |entry| entry.status.clone()),
            );
            info.name = name;
            containers.push(info);
        }
        tracing::debug!(count = containers.len(), "listed containers");
        Ok(containers)
    }

    /// Applies changes to a container and recreates it.
    ///
    /// # Errors
    ///
    /// Returns [`VdeskError::NotFound`] for an unknown container and an
    /// error if its compose document cannot be read or written.
    pub fn modify(&self, name: &str, request: &ModifyRequest) -> Result<CommandOutput> {
        let dir = self.existing_project(name)?;
        tracing::info!(name, "modifying container");
        let compose_path = dir.join(COMPOSE_FILE_NAME);
        let mut file = ComposeFile::load(&compose_path)?;
        service::apply_modify(&mut file, request);
        file.save(request.comment.as_deref())?;
        Ok(self
            .docker
            .compose(&compose_path, &["up", "-d", "--force-recreate"]))
    }

    /// Starts, stops, restarts or deletes a container.
    ///
    /// # Errors
    ///
    /// Returns [`VdeskError::NotFound`] for an unknown container, or an I/O
    /// error if a deleted project directory cannot be removed.
    pub fn action(&self, name: &str, action: ContainerAction) -> Result<ActionOutcome> {
        let dir = self.existing_project(name)?;
        tracing::info!(name, %action, "container action");
        let compose_path = dir.join(COMPOSE_FILE_NAME);
        let outcome = match action {
            ContainerAction::Start => ActionOutcome {
                result: self.docker.compose(&compose_path, &["up", "-d"]),
                deleted: false,
            },
            ContainerAction::Stop => ActionOutcome {
                result: self.docker.compose(&compose_path, &["down"]),
                deleted: false,
            },
            ContainerAction::Restart => {
                let _ = self.docker.compose(&compose_path, &["down"]);
                ActionOutcome {
                    result: self.docker.compose(&compose_path, &["up", "-d"]),
                    deleted: false,
                }
            }
            ContainerAction::Delete => {
                let result = self.docker.compose(&compose_path, &["down"]);
                std::fs::remove_dir_all(&dir).map_err(|e| VdeskError::io(&dir, e))?;
                tracing::info!(name, "container directory removed");
                ActionOutcome {
                    result,
                    deleted: true,
                }
            }
        };
        Ok(outcome)
    }

    /// Images offered when creating a container.
    #[must_use]
    pub fn images(&self) -> Vec<String> {
        image_catalog(&self.config.registry_url)
    }

    /// Host CPUs, memory and GPUs.
    #[must_use]
    pub fn host(&self) -> HostResources {
        host::detect(self.docker.runner(), &self.meminfo)
    }

    /// Resolves `name` to an existing project directory.
    ///
    /// Names are single path components; anything else is treated as unknown.
    fn existing_project(&self, name: &str) -> Result<PathBuf> {
        let mut components = Path::new(name).components();
        let single = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        let dir = self.config.container_dir(name);
        if !single || !dir.is_dir() {
            return Err(VdeskError::NotFound {
                kind: "container",
                id: name.to_string(),
            });
        }
        Ok(dir)
    }
}

/// The fixed image catalogue, with private images under `registry_url`.
#[must_use]
pub fn image_catalog(registry_url: &str) -> Vec<String> {
    vec![
        "ubuntu:20.04".to_string(),
        "ubuntu:22.04".to_string(),
        format!("{registry_url}ubuntu-desktop-nomachine-cuda:22.04-cu12.4.1"),
        format!("{registry_url}ros2-humble-cu12.4.1-nomachine-priviledged:1.0"),
    ]
}

/// Generates a random 16-character root password.
#[must_use]
pub fn generate_password() -> String {
    let mut password = uuid::Uuid::new_v4().simple().to_string();
    password.truncate(16);
    password
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_uses_registry_prefix() {
        let images = image_catalog("reg.local/");
        assert_eq!(images.len(), 4);
        assert_eq!(images[0], "ubuntu:20.04");
        assert_eq!(images[2], "reg.local/ubuntu-desktop-nomachine-cuda:22.04-cu12.4.1");
    }

    #[test]
    fn generated_passwords_differ() {
        let a = generate_password();
        let b = generate_password();
        assert_eq!(a.len(), 16);
        assert_ne!(a, b);
    }

    #[test]
    fn traversal_names_are_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = VdeskConfig::from_root(dir.path());
        std::fs::create_dir_all(config.containers_dir.join("123456")).expect("mkdir");
        let manager = Manager::new(config);

        assert!(manager.existing_project("123456").is_ok());
        assert!(manager.existing_project("../containers").is_err());
        assert!(manager.existing_project("").is_err());
        assert!(manager.existing_project("/etc").is_err());
    }
}
