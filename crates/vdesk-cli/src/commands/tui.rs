//! `vdesk tui` — Interactive container dashboard.
//!
//! Draws the container list, turns key presses into manager calls and
//! refreshes the table after each one. Manager calls block the loop until
//! the underlying `docker` commands finish.

use std::time::Duration;

use clap::Args;
use vdesk_runtime::manager::Manager;
use vdesk_tui::app::{App, AppCommand, Status};
use vdesk_tui::event::{EventSource, TICK_RATE_MS};
use vdesk_tui::ui;
use vdesk_tui::ui::container_list::ContainerList;

/// Arguments for the `tui` command.
#[derive(Args, Debug)]
pub struct TuiArgs {
    /// Milliseconds to wait for input before redrawing.
    #[arg(long, default_value_t = TICK_RATE_MS)]
    pub tick_ms: u64,
}

/// Restores the terminal however the dashboard exits.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

/// Executes the `tui` command.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up, drawn or read.
pub fn execute(args: &TuiArgs, manager: &Manager) -> anyhow::Result<()> {
    let mut app = App::new(
        ContainerList::default()
            .with_images(manager.images())
            .with_host(manager.host()),
    );
    if let Err(status) = refresh(&mut app, manager) {
        app.set_status(status);
    }
    let events = EventSource::new(Duration::from_millis(args.tick_ms));

    let mut terminal = ratatui::try_init()?;
    let _guard = TerminalGuard;
    tracing::info!("dashboard started");

    while app.running {
        let _ = terminal.draw(|frame| ui::render(frame, &app))?;
        let Some(command) = app.handle_event(&events.next()?) else {
            continue;
        };
        // Show the pending status before blocking on docker.
        let _ = terminal.draw(|frame| ui::render(frame, &app))?;
        run_command(&mut app, manager, command);
    }

    tracing::info!("dashboard closed");
    Ok(())
}

/// Executes `command` and reloads the list, leaving the outcome in the
/// status line.
fn run_command(app: &mut App, manager: &Manager, command: AppCommand) {
    let status = match command {
        AppCommand::Create(request) => match manager.create(&request) {
            Ok(outcome) if outcome.compose_result.success() => {
                app.list_mut().form_mut().clear();
                Status::Info(format!(
                    "created {}, root password {}",
                    request.name, outcome.root_password
                ))
            }
            Ok(outcome) => Status::Error(failure("create", &outcome.compose_result.stderr)),
            Err(e) => Status::Error(e.to_string()),
        },
        AppCommand::Action { name, action } => match manager.action(&name, action) {
            Ok(outcome) if outcome.result.success() => {
                Status::Info(format!("{action} {name}: done"))
            }
            Ok(outcome) => {
                Status::Error(failure(&format!("{action} {name}"), &outcome.result.stderr))
            }
            Err(e) => Status::Error(e.to_string()),
        },
        AppCommand::Refresh => Status::Info("refreshed".to_string()),
    };
    match refresh(app, manager) {
        Ok(()) => app.set_status(status),
        Err(error) => app.set_status(error),
    }
}

fn refresh(app: &mut App, manager: &Manager) -> Result<(), Status> {
    let containers = manager
        .list()
        .map_err(|e| Status::Error(format!("cannot list containers: {e}")))?;
    app.list_mut().set_containers(containers);
    Ok(())
}

fn failure(what: &str, stderr: &str) -> String {
    let reason = stderr.lines().rev().find(|l| !l.trim().is_empty());
    match reason {
        Some(line) => format!("{what} failed: {}", line.trim()),
        None => format!("{what} failed"),
    }
}
