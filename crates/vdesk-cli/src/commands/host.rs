//! `vdesk host` — Show host CPUs, memory and GPUs.

use clap::Args;
use vdesk_runtime::manager::Manager;

use crate::output;

/// Arguments for the `host` command.
#[derive(Args, Debug)]
pub struct HostArgs {}

/// Executes the `host` command.
///
/// # Errors
///
/// Returns an error if JSON output fails.
pub fn execute(_args: &HostArgs, manager: &Manager, json: bool) -> anyhow::Result<()> {
    let host = manager.host();
    if json {
        return output::print_json(&host);
    }
    println!("{}", output::host_report(&host));
    Ok(())
}
