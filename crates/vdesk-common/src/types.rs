//! Domain primitive types used across the vdesk workspace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{Result, VdeskError};

/// Name of a managed container: exactly six ASCII digits (a user id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContainerName(String);

impl ContainerName {
    /// Validates and wraps a container name.
    ///
    /// # Errors
    ///
    /// Returns [`VdeskError::InvalidInput`] unless `name` is six ASCII digits.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.len() != constants::NAME_DIGITS || !name.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VdeskError::invalid("name", "name must be 6 digits"));
        }
        Ok(Self(name))
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Computes the published host port for this container.
    ///
    /// The first digit is `(d1 + d2) % 6`, followed by the last four digits
    /// of the name.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting port falls outside `1..=65535`
    /// (e.g. `000000` maps to port 0).
    pub fn host_port(&self) -> Result<u16> {
        let digits = self.0.as_bytes();
        let d1 = u32::from(digits[0] - b'0');
        let d2 = u32::from(digits[1] - b'0');
        let first = (d1 + d2) % 6;
        let port: u32 = format!("{first}{}", &self.0[2..])
            .parse()
            .map_err(|_| VdeskError::invalid("name", "computed port invalid"))?;
        u16::try_from(port)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or_else(|| VdeskError::invalid("name", "computed port out of range"))
    }

    /// Name docker compose gives the service container of this project.
    #[must_use]
    pub fn service_container(&self) -> String {
        format!("{}-{}-1", self.0, constants::SERVICE_NAME)
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ContainerName {
    type Error = VdeskError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ContainerName> for String {
    fn from(name: ContainerName) -> Self {
        name.0
    }
}

impl FromStr for ContainerName {
    type Err = VdeskError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Parameters for creating a new container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRequest {
    /// Six-digit user name; also the compose project name.
    pub name: ContainerName,
    /// Image reference for the `my_ws` service.
    pub image: String,
    /// CPU limit, between 1 and 32.
    pub cpus: u32,
    /// Memory limit, in compose notation (`16g`, `512m`).
    pub memory: String,
    /// Shared memory size.
    pub shm_size: Option<String>,
    /// GPU indices reserved for the container.
    #[serde(default)]
    pub gpus: Vec<u32>,
    /// Swap size passed through `SWAP_SIZE`.
    pub swap: Option<String>,
    /// Root password; generated when absent.
    pub root_password: Option<String>,
    /// Free-form note stored on the first line of the compose file.
    pub comment: Option<String>,
}

impl CreateRequest {
    /// Checks field bounds that the type system does not already enforce.
    ///
    /// # Errors
    ///
    /// Returns [`VdeskError::InvalidInput`] for an out-of-range CPU count or an
    /// empty image or memory value.
    pub fn validate(&self) -> Result<()> {
        if !(constants::MIN_CPUS..=constants::MAX_CPUS).contains(&self.cpus) {
            return Err(VdeskError::invalid(
                "cpus",
                format!(
                    "must be between {} and {}",
                    constants::MIN_CPUS,
                    constants::MAX_CPUS
                ),
            ));
        }
        if self.image.trim().is_empty() {
            return Err(VdeskError::invalid("image", "must not be empty"));
        }
        if self.memory.trim().is_empty() {
            return Err(VdeskError::invalid("memory", "must not be empty"));
        }
        Ok(())
    }
}

/// Changes applied to an existing container. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyRequest {
    /// New memory limit; ignored when empty.
    pub memory: Option<String>,
    /// New shared memory size; an empty string removes it.
    pub shm_size: Option<String>,
    /// New GPU set; an empty list removes the reservation.
    pub gpus: Option<Vec<u32>>,
    /// New swap size.
    pub swap: Option<String>,
    /// New root password.
    pub root_password: Option<String>,
    /// New comment; `None` keeps the existing one.
    pub comment: Option<String>,
}

/// A container as read back from its compose file and `docker ps`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInfo {
    /// Container (directory) name.
    pub name: String,
    /// Image reference.
    pub image: Option<String>,
    /// Memory limit.
    pub memory: Option<String>,
    /// Shared memory size.
    pub shm_size: Option<String>,
    /// CPU limit as written in the compose file.
    pub cpus: Option<String>,
    /// Reserved GPU device ids.
    pub gpus: Option<Vec<String>>,
    /// Published host port.
    pub port: Option<u16>,
    /// Swap size.
    pub swap: Option<String>,
    /// Root password.
    pub root_password: Option<String>,
    /// First-line comment.
    pub comment: Option<String>,
    /// `docker ps` status, or `idle` when no container exists.
    pub state: Option<String>,
}

/// Lifecycle operation on an existing container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerAction {
    /// `docker compose up -d`.
    Start,
    /// `docker compose down`.
    Stop,
    /// `down` followed by `up -d`.
    Restart,
    /// `down` followed by removal of the project directory.
    Delete,
}

impl fmt::Display for ContainerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Stop => write!(f, "stop"),
            Self::Restart => write!(f, "restart"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

impl FromStr for ContainerAction {
    type Err = VdeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "restart" => Ok(Self::Restart),
            "delete" => Ok(Self::Delete),
            _ => Err(VdeskError::invalid("action", format!("unknown action \"{s}\""))),
        }
    }
}

/// Captured result of a spawned command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    /// Process exit code; 127 when the binary could not be spawned.
    pub returncode: i32,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error, or the spawn error.
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the command exited with status zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.returncode == 0
    }
}

/// A GPU reported by `nvidia-smi`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuDevice {
    /// GPU index as reported by the driver.
    pub id: String,
    /// Marketing name, possibly empty.
    pub name: String,
}

/// Resources available on the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostResources {
    /// Logical CPU count.
    pub cpus: usize,
    /// Total memory in bytes, if it could be determined.
    pub memory_bytes: Option<u64>,
    /// Installed GPUs.
    pub gpus: Vec<GpuDevice>,
}
