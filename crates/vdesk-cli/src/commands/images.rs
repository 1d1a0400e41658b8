//! `vdesk images` — Show the images offered for new containers.

use clap::Args;
use vdesk_runtime::manager::Manager;

use crate::output;

/// Arguments for the `images` command.
#[derive(Args, Debug)]
pub struct ImagesArgs {}

/// Executes the `images` command.
///
/// # Errors
///
/// Returns an error if JSON output fails.
pub fn execute(_args: &ImagesArgs, manager: &Manager, json: bool) -> anyhow::Result<()> {
    let images = manager.images();
    if json {
        return output::print_json(&images);
    }
    for image in &images {
        println!("{image}");
    }
    Ok(())
}
