//! `vdesk create` — Create and start a new container.

use clap::Args;
use vdesk_common::types::{ContainerName, CreateRequest};
use vdesk_runtime::manager::Manager;
use vdesk_tui::ui::form::parse_gpus;

use crate::output;

/// Arguments for the `create` command.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Six-digit user name; also determines the SSH host port.
    pub name: String,

    /// Image to run.
    #[arg(long)]
    pub image: String,

    /// CPU limit (1-32).
    #[arg(long)]
    pub cpus: u32,

    /// Memory limit, e.g. `16g`.
    #[arg(long)]
    pub memory: String,

    /// Shared memory size, e.g. `8g`.
    #[arg(long)]
    pub shm_size: Option<String>,

    /// Comma-separated GPU indices, e.g. `0,1`.
    #[arg(long, default_value = "")]
    pub gpus: String,

    /// Swap size passed to the container.
    #[arg(long)]
    pub swap: Option<String>,

    /// Root password; a random one is generated when omitted.
    #[arg(long)]
    pub root_password: Option<String>,

    /// Free-form note stored with the container.
    #[arg(long)]
    pub comment: Option<String>,
}

impl CreateArgs {
    fn into_request(self) -> anyhow::Result<CreateRequest> {
        Ok(CreateRequest {
            name: ContainerName::new(self.name)?,
            image: self.image,
            cpus: self.cpus,
            memory: self.memory,
            shm_size: self.shm_size,
            gpus: parse_gpus(&self.gpus)?,
            swap: self.swap,
            root_password: self.root_password,
            comment: self.comment,
        })
    }
}

/// Executes the `create` command.
///
/// # Errors
///
/// Returns an error if the request is invalid, the container cannot be
/// prepared, or `docker compose up` fails.
pub fn execute(args: CreateArgs, manager: &Manager, json: bool) -> anyhow::Result<()> {
    let request = args.into_request()?;
    let outcome = manager.create(&request)?;

    if json {
        output::print_json(&outcome)?;
    } else {
        println!(
            "Created {} on port {}",
            request.name,
            request.name.host_port()?
        );
        println!("Root password: {}", outcome.root_password);
        println!("{}", output::command_report("compose", &outcome.compose_result));
        println!("{}", output::command_report("patch", &outcome.patch_result));
    }

    anyhow::ensure!(
        outcome.compose_result.success(),
        "docker compose up exited with {}",
        outcome.compose_result.returncode
    );
    Ok(())
}
