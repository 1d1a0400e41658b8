//! `vdesk list` — List containers with their resources and state.

use clap::Args;
use vdesk_runtime::manager::Manager;

use crate::output;

/// Arguments for the `list` command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show containers whose state is not `idle`.
    #[arg(short, long)]
    pub running: bool,
}

/// Executes the `list` command.
///
/// # Errors
///
/// Returns an error if the containers directory cannot be read.
pub fn execute(args: &ListArgs, manager: &Manager, json: bool) -> anyhow::Result<()> {
    let mut containers = manager.list()?;
    if args.running {
        containers.retain(|c| {
            c.state
                .as_deref()
                .is_some_and(|s| s != vdesk_runtime::manager::IDLE_STATE)
        });
    }

    if json {
        output::print_json(&containers)
    } else {
        println!("{}", output::container_table(&containers));
        Ok(())
    }
}
