//! System-wide constants and default paths.

/// Binary name for the CLI.
pub const BIN_NAME: &str = "vdesk";

/// Environment variable overriding the project root.
pub const ROOT_ENV: &str = "VDESK_ROOT";

/// Environment variable overriding the private image registry prefix.
pub const REGISTRY_ENV: &str = "VDESK_REGISTRY_URL";

/// Registry prefix used when [`REGISTRY_ENV`] is not set.
pub const DEFAULT_REGISTRY_URL: &str = "10.233.0.132:8000/hdm/";

/// Directory (relative to the project root) holding the web data.
pub const WEB_DIR: &str = "web";

/// Directory (relative to the web dir) with one compose project per container.
pub const CONTAINERS_DIR: &str = "containers";

/// Directory (relative to the web dir) holding the command log.
pub const LOG_DIR: &str = "logs";

/// File name of the command log.
pub const COMMAND_LOG_FILE: &str = "commands.log";

/// File receiving diagnostics while the interactive dashboard owns the screen.
pub const TUI_LOG_FILE: &str = "vdesk-tui.log";

/// Template compose file, relative to the project root.
pub const TEMPLATE_COMPOSE: &str = "scripts/docker-compose.yml.example";

/// Post-create patch script, relative to the project root.
pub const PATCH_SCRIPT: &str = "scripts/patches.sh";

/// Compose document name inside each container directory.
pub const COMPOSE_FILE_NAME: &str = "docker-compose.yml";

/// The single compose service every container is built from.
pub const SERVICE_NAME: &str = "my_ws";

/// Prefix of the optional first-line comment in a compose file.
pub const COMMENT_PREFIX: &str = "# comment:";

/// Container-side port used when the template declares none.
pub const DEFAULT_CONTAINER_PORT: &str = "22";

/// Environment key carrying the root password.
pub const ENV_ROOT_PASSWORD: &str = "ROOTPASSWORD";

/// Environment key carrying the swap size.
pub const ENV_SWAP_SIZE: &str = "SWAP_SIZE";

/// Lower bound on requested CPUs.
pub const MIN_CPUS: u32 = 1;

/// Upper bound on requested CPUs.
pub const MAX_CPUS: u32 = 32;

/// Length of a valid container name.
pub const NAME_DIGITS: usize = 6;

/// Maximum size of the command log before it is rotated (5 MiB).
pub const LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Number of rotated command log files kept.
pub const LOG_BACKUPS: usize = 7;

/// Seconds to wait for a freshly created container to appear.
pub const APPEAR_TIMEOUT_SECS: u64 = 30;

/// Seconds between `docker ps` polls while waiting.
pub const APPEAR_POLL_SECS: u64 = 1;

/// Exit code reported when a command binary cannot be spawned.
pub const COMMAND_NOT_FOUND: i32 = 127;
