//! Rendering of the dashboard.

pub mod container_list;
pub mod form;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::app::{App, Status};
use crate::component::Component;

/// Renders the whole dashboard: the container list and a status line.
///
/// A view that cannot render (e.g. a terminal too small) is replaced by its
/// error message.
pub fn render(frame: &mut Frame<'_>, app: &App) {
    let [main, status] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

    if let Err(e) = app.list().render(frame, main) {
        tracing::debug!(error = %e, "container list not rendered");
        frame.render_widget(
            Paragraph::new(e.to_string()).style(Style::new().fg(Color::Red)),
            main,
        );
    }

    let line = match app.status() {
        Some(Status::Info(msg)) => Line::styled(msg.as_str(), Style::new().fg(Color::Green)),
        Some(Status::Error(msg)) => Line::styled(msg.as_str(), Style::new().fg(Color::Red)),
        None => Line::from("vdesk"),
    };
    frame.render_widget(Paragraph::new(line), status);
}
