//! `vdesk modify` — Change a container's resources and recreate it.

use clap::Args;
use vdesk_common::types::ModifyRequest;
use vdesk_runtime::manager::Manager;
use vdesk_tui::ui::form::parse_gpus;

use crate::output;

/// Arguments for the `modify` command.
#[derive(Args, Debug)]
pub struct ModifyArgs {
    /// Container name.
    pub name: String,

    /// New memory limit.
    #[arg(long)]
    pub memory: Option<String>,

    /// New shared memory size; an empty value removes it.
    #[arg(long)]
    pub shm_size: Option<String>,

    /// New comma-separated GPU indices; an empty value removes all GPUs.
    #[arg(long)]
    pub gpus: Option<String>,

    /// New swap size.
    #[arg(long)]
    pub swap: Option<String>,

    /// New root password.
    #[arg(long)]
    pub root_password: Option<String>,

    /// New comment; the existing one is kept when omitted.
    #[arg(long)]
    pub comment: Option<String>,
}

impl ModifyArgs {
    fn to_request(&self) -> anyhow::Result<ModifyRequest> {
        Ok(ModifyRequest {
            memory: self.memory.clone(),
            shm_size: self.shm_size.clone(),
            gpus: self.gpus.as_deref().map(parse_gpus).transpose()?,
            swap: self.swap.clone(),
            root_password: self.root_password.clone(),
            comment: self.comment.clone(),
        })
    }
}

/// Executes the `modify` command.
///
/// # Errors
///
/// Returns an error if the container is unknown, its compose file cannot be
/// updated, or the recreate fails.
pub fn execute(args: &ModifyArgs, manager: &Manager, json: bool) -> anyhow::Result<()> {
    let request = args.to_request()?;
    let result = manager.modify(&args.name, &request)?;

    if json {
        output::print_json(&result)?;
    } else {
        println!("{}", output::command_report("recreate", &result));
    }
    anyhow::ensure!(
        result.success(),
        "recreating {} exited with {}",
        args.name,
        result.returncode
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(gpus: Option<&str>) -> ModifyArgs {
        ModifyArgs {
            name: "123456".into(),
            memory: None,
            shm_size: None,
            gpus: gpus.map(str::to_string),
            swap: None,
            root_password: None,
            comment: None,
        }
    }

    #[test]
    fn omitted_gpus_are_left_alone() {
        assert_eq!(args(None).to_request().unwrap().gpus, None);
    }

    #[test]
    fn empty_gpus_clear_the_reservation() {
        assert_eq!(args(Some("")).to_request().unwrap().gpus, Some(vec![]));
    }

    #[test]
    fn gpu_list_is_parsed() {
        assert_eq!(args(Some("2,0")).to_request().unwrap().gpus, Some(vec![2, 0]));
        assert!(args(Some("two")).to_request().is_err());
    }
}
