//! CLI command definitions and dispatch.

pub mod action;
pub mod create;
pub mod host;
pub mod images;
pub mod list;
pub mod modify;
pub mod tui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vdesk_common::config::VdeskConfig;
use vdesk_common::constants::{BIN_NAME, REGISTRY_ENV, ROOT_ENV};
use vdesk_runtime::manager::Manager;

/// vdesk — per-user development containers on a shared host.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Project root holding `scripts/` and `web/`.
    #[arg(long, global = true, env = ROOT_ENV, default_value = ".")]
    pub root: PathBuf,

    /// Registry prefix for private images.
    #[arg(long, global = true, env = REGISTRY_ENV)]
    pub registry_url: Option<String>,

    /// Print JSON instead of human-readable output.
    #[arg(long, global = true)]
    pub json: bool,
}

impl Cli {
    /// Builds the configuration from the global options.
    #[must_use]
    pub fn config(&self) -> VdeskConfig {
        let config = VdeskConfig::from_root(&self.root);
        match &self.registry_url {
            Some(url) => config.with_registry_url(url.as_str()),
            None => config,
        }
    }
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create and start a new container.
    Create(create::CreateArgs),
    /// List containers with their resources and state.
    List(list::ListArgs),
    /// Change a container's resources and recreate it.
    Modify(modify::ModifyArgs),
    /// Start, stop, restart or delete a container.
    Action(action::ActionArgs),
    /// Show the images offered for new containers.
    Images(images::ImagesArgs),
    /// Show host CPUs, memory and GPUs.
    Host(host::HostArgs),
    /// Launch the interactive dashboard.
    Tui(tui::TuiArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let manager = Manager::new(cli.config());
    if !manager.is_available() {
        tracing::warn!("docker was not found on PATH");
    }
    let json = cli.json;
    match cli.command {
        Command::Create(args) => create::execute(args, &manager, json),
        Command::List(args) => list::execute(&args, &manager, json),
        Command::Modify(args) => modify::execute(&args, &manager, json),
        Command::Action(args) => action::execute(&args, &manager, json),
        Command::Images(args) => images::execute(&args, &manager, json),
        Command::Host(args) => host::execute(&args, &manager, json),
        Command::Tui(args) => tui::execute(&args, &manager),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn root_and_registry_shape_the_config() {
        let cli = Cli::try_parse_from([
            "vdesk",
            "--root",
            "/srv/desk",
            "--registry-url",
            "reg.local/",
            "images",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(config.containers_dir, Path::new("/srv/desk/web/containers"));
        assert_eq!(config.registry_url, "reg.local/");
    }

    #[test]
    fn tui_tick_defaults_to_event_tick_rate() {
        let cli = Cli::try_parse_from(["vdesk", "tui"]).unwrap();
        let Command::Tui(args) = cli.command else {
            panic!("expected the tui subcommand");
        };
        assert_eq!(args.tick_ms, vdesk_tui::event::TICK_RATE_MS);
    }

    #[test]
    fn action_is_parsed_from_its_name() {
        let cli = Cli::try_parse_from(["vdesk", "action", "123456", "restart"]).unwrap();
        let Command::Action(args) = cli.command else {
            panic!("expected the action subcommand");
        };
        assert_eq!(args.action, vdesk_common::types::ContainerAction::Restart);
        assert!(Cli::try_parse_from(["vdesk", "action", "123456", "explode"]).is_err());
    }
}
