//! TUI application state machine.
//!
//! Turns keyboard input into edits of the [`ContainerList`] state and into
//! [`AppCommand`]s that the caller executes against the container manager.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use vdesk_common::types::{ContainerAction, CreateRequest};

use crate::event::TerminalEvent;
use crate::ui::container_list::{ContainerList, Focus};

/// Work the application asks its host to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Create a container from the submitted form.
    Create(CreateRequest),
    /// Run a lifecycle action on a container.
    Action {
        /// Container name.
        name: String,
        /// Action to run.
        action: ContainerAction,
    },
    /// Reload the container list.
    Refresh,
}

/// One-line message shown at the bottom of the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Informational message.
    Info(String),
    /// Something went wrong.
    Error(String),
}

/// Root application state for the TUI.
#[derive(Debug)]
pub struct App {
    /// Whether the app should continue running.
    pub running: bool,
    list: ContainerList,
    status: Option<Status>,
}

impl App {
    /// Creates a new application state around `list`.
    #[must_use]
    pub const fn new(list: ContainerList) -> Self {
        Self {
            running: true,
            list,
            status: None,
        }
    }

    /// Signals the app to quit.
    pub const fn quit(&mut self) {
        self.running = false;
    }

    /// The container list view.
    #[must_use]
    pub const fn list(&self) -> &ContainerList {
        &self.list
    }

    /// The container list view, for updates.
    pub const fn list_mut(&mut self) -> &mut ContainerList {
        &mut self.list
    }

    /// Current status line.
    #[must_use]
    pub const fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// Replaces the status line.
    pub fn set_status(&mut self, status: Status) {
        self.status = Some(status);
    }

    /// Dispatches a terminal event.
    pub fn handle_event(&mut self, event: &TerminalEvent) -> Option<AppCommand> {
        match event {
            TerminalEvent::Key(key) => self.handle_key(*key),
            TerminalEvent::Resize(..) | TerminalEvent::Tick => None,
        }
    }

    /// Applies a key press, returning a command when one is requested.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AppCommand> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c'));
        if ctrl_c || key.code == KeyCode::Esc {
            self.quit();
            return None;
        }
        if matches!(key.code, KeyCode::Tab | KeyCode::BackTab) {
            self.list.toggle_focus();
            return None;
        }
        match self.list.focus() {
            Focus::Form => self.handle_form_key(key.code),
            Focus::Table => self.handle_table_key(key.code),
        }
    }

    fn handle_form_key(&mut self, code: KeyCode) -> Option<AppCommand> {
        let form = self.list.form_mut();
        match code {
            KeyCode::Up => form.focus_prev(),
            KeyCode::Down => form.focus_next(),
            KeyCode::Backspace => form.pop_char(),
            KeyCode::Char(c) => form.push_char(c),
            KeyCode::Enter => match form.to_request() {
                Ok(request) => {
                    self.status = Some(Status::Info(format!(
                        "creating container {}...",
                        request.name
                    )));
                    return Some(AppCommand::Create(request));
                }
                Err(e) => self.status = Some(Status::Error(e.to_string())),
            },
            _ => {}
        }
        None
    }

    fn handle_table_key(&mut self, code: KeyCode) -> Option<AppCommand> {
        let action = match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.list.select_prev();
                return None;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.list.select_next();
                return None;
            }
            KeyCode::Char('q') => {
                self.quit();
                return None;
            }
            KeyCode::Char('g') => return Some(AppCommand::Refresh),
            KeyCode::Char('s') => ContainerAction::Start,
            KeyCode::Char('x') => ContainerAction::Stop,
            KeyCode::Char('r') => ContainerAction::Restart,
            KeyCode::Char('d') => ContainerAction::Delete,
            _ => return None,
        };
        let name = self.list.selected()?.name.clone();
        self.status = Some(Status::Info(format!("{action} {name}...")));
        Some(AppCommand::Action { name, action })
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(ContainerList::default())
    }
}

#[cfg(test)]
mod tests {
    use vdesk_common::types::ContainerInfo;

    use super::*;
    use crate::ui::form::Field;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            let _ = app.handle_key(press(KeyCode::Char(c)));
        }
    }

    fn app_with_rows() -> App {
        let rows = ["111111", "222222"]
            .iter()
            .map(|n| ContainerInfo {
                name: (*n).to_string(),
                ..ContainerInfo::default()
            })
            .collect();
        App::new(ContainerList::default().with_containers(rows))
    }

    #[test]
    fn new_app_is_running() {
        let app = App::new(ContainerList::default());
        assert!(app.running);
        assert_eq!(app.status(), None);
    }

    #[test]
    fn escape_quits() {
        let mut app = App::new(ContainerList::default());
        assert_eq!(app.handle_key(press(KeyCode::Esc)), None);
        assert!(!app.running);
    }

    #[test]
    fn ctrl_c_quits() {
        let mut app = App::new(ContainerList::default());
        let _ = app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }

    #[test]
    fn q_in_form_is_typed() {
        let mut app = App::new(ContainerList::default());
        let _ = app.handle_key(press(KeyCode::Char('q')));
        assert!(app.running);
        assert_eq!(app.list().form().value(Field::Name), "q");
    }

    #[test]
    fn filling_the_form_submits_create() {
        let mut app = App::new(ContainerList::default());
        type_str(&mut app, "123456");
        let _ = app.handle_key(press(KeyCode::Down));
        type_str(&mut app, "ubuntu:22.04");
        let _ = app.handle_key(press(KeyCode::Down));
        type_str(&mut app, "4");
        let _ = app.handle_key(press(KeyCode::Down));
        type_str(&mut app, "16g");

        let Some(AppCommand::Create(request)) = app.handle_key(press(KeyCode::Enter)) else {
            panic!("expected a create command");
        };
        assert_eq!(request.name.as_str(), "123456");
        assert_eq!(request.memory, "16g");
        assert!(matches!(app.status(), Some(Status::Info(_))));
    }

    #[test]
    fn invalid_form_sets_error_status() {
        let mut app = App::new(ContainerList::default());
        type_str(&mut app, "12");
        assert_eq!(app.handle_key(press(KeyCode::Enter)), None);
        assert!(matches!(app.status(), Some(Status::Error(msg)) if msg.contains("6 digits")));
    }

    #[test]
    fn table_keys_emit_actions_for_selection() {
        let mut app = app_with_rows();
        let _ = app.handle_key(press(KeyCode::Tab));
        let _ = app.handle_key(press(KeyCode::Down));

        assert_eq!(
            app.handle_key(press(KeyCode::Char('r'))),
            Some(AppCommand::Action {
                name: "222222".into(),
                action: ContainerAction::Restart,
            })
        );
        assert_eq!(app.handle_key(press(KeyCode::Char('g'))), Some(AppCommand::Refresh));
    }

    #[test]
    fn table_action_without_rows_does_nothing() {
        let mut app = App::new(ContainerList::default());
        let _ = app.handle_key(press(KeyCode::Tab));
        assert_eq!(app.handle_key(press(KeyCode::Char('d'))), None);
    }

    #[test]
    fn q_in_table_quits() {
        let mut app = app_with_rows();
        let _ = app.handle_key(press(KeyCode::Tab));
        let _ = app.handle_key(press(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut app = App::new(ContainerList::default());
        let mut key = press(KeyCode::Esc);
        key.kind = KeyEventKind::Release;
        let _ = app.handle_key(key);
        assert!(app.running);
    }
}
