//! `vdesk action` — Start, stop, restart or delete a container.

use clap::Args;
use vdesk_common::types::ContainerAction;
use vdesk_runtime::manager::Manager;

use crate::output;

/// Arguments for the `action` command.
#[derive(Args, Debug)]
pub struct ActionArgs {
    /// Container name.
    pub name: String,

    /// One of `start`, `stop`, `restart` or `delete`.
    pub action: ContainerAction,
}

/// Executes the `action` command.
///
/// # Errors
///
/// Returns an error if the container is unknown or the compose command fails.
pub fn execute(args: &ActionArgs, manager: &Manager, json: bool) -> anyhow::Result<()> {
    let outcome = manager.action(&args.name, args.action)?;

    if json {
        output::print_json(&outcome)?;
    } else {
        println!(
            "{}",
            output::command_report(&format!("{} {}", args.action, args.name), &outcome.result)
        );
        if outcome.deleted {
            println!("Removed {}", args.name);
        }
    }
    anyhow::ensure!(
        outcome.result.success(),
        "{} {} exited with {}",
        args.action,
        args.name,
        outcome.result.returncode
    );
    Ok(())
}
