//! The container list view.
//!
//! A "Create Container" form on top, with host resources and the image
//! catalogue beside it, and the "Containers" table below. With no data it
//! renders a blank form and an empty table.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Paragraph, Row, Table, TableState, Wrap};
use vdesk_common::format::{format_bytes, or_dash};
use vdesk_common::types::{ContainerInfo, HostResources};

use super::form::{CreateForm, Field};
use crate::component::{Component, RenderError};

/// Title of the form block.
pub const FORM_TITLE: &str = "Create Container";
/// Title prefix of the table block.
pub const TABLE_TITLE: &str = "Containers";

const FORM_HEIGHT: u16 = 12;
const MIN_WIDTH: u16 = 60;
const MIN_HEIGHT: u16 = FORM_HEIGHT + 4;
const LABEL_WIDTH: usize = 15;

const COLUMNS: [&str; 10] = [
    "NAME", "IMAGE", "STATE", "PORT", "CPUS", "MEMORY", "SHM", "GPUS", "SWAP", "COMMENT",
];

/// Which half of the view receives keyboard input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    /// The create form.
    #[default]
    Form,
    /// The container table.
    Table,
}

/// The create form plus the table of managed containers.
#[derive(Debug, Clone, Default)]
pub struct ContainerList {
    containers: Vec<ContainerInfo>,
    images: Vec<String>,
    host: Option<HostResources>,
    form: CreateForm,
    focus: Focus,
    selected: usize,
}

impl ContainerList {
    /// Replaces the table rows.
    #[must_use]
    pub fn with_containers(mut self, containers: Vec<ContainerInfo>) -> Self {
        self.set_containers(containers);
        self
    }

    /// Sets the image catalogue shown beside the form.
    #[must_use]
    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    /// Sets the host resources shown beside the form.
    #[must_use]
    pub fn with_host(mut self, host: HostResources) -> Self {
        self.host = Some(host);
        self
    }

    /// Replaces the table rows, keeping the selection in range.
    pub fn set_containers(&mut self, containers: Vec<ContainerInfo>) {
        self.containers = containers;
        self.selected = self.selected.min(self.containers.len().saturating_sub(1));
    }

    /// Rows currently shown.
    #[must_use]
    pub fn containers(&self) -> &[ContainerInfo] {
        &self.containers
    }

    /// The create form.
    #[must_use]
    pub const fn form(&self) -> &CreateForm {
        &self.form
    }

    /// The create form, for editing.
    pub const fn form_mut(&mut self) -> &mut CreateForm {
        &mut self.form
    }

    /// Where keyboard input goes.
    #[must_use]
    pub const fn focus(&self) -> Focus {
        self.focus
    }

    /// Switches focus between the form and the table.
    pub const fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Form => Focus::Table,
            Focus::Table => Focus::Form,
        };
    }

    /// The highlighted container, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&ContainerInfo> {
        self.containers.get(self.selected)
    }

    /// Moves the selection down, stopping at the last row.
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.containers.len() {
            self.selected += 1;
        }
    }

    /// Moves the selection up, stopping at the first row.
    pub const fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn render_form(&self, frame: &mut Frame<'_>, area: Rect) {
        let focused = self.focus == Focus::Form;
        let block = Block::bordered()
            .title(format!(" {FORM_TITLE} "))
            .border_style(border_style(focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [fields_area, info_area] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(inner);

        let mut lines: Vec<Line<'_>> = Field::ALL
            .iter()
            .map(|&field| {
                let active = focused && self.form.focused() == field;
                let mut value = self.form.display_value(field);
                if active {
                    value.push('_');
                }
                let value_style = if active {
                    Style::new().add_modifier(Modifier::REVERSED)
                } else {
                    Style::new()
                };
                Line::from(vec![
                    Span::styled(
                        format!("{:<LABEL_WIDTH$}", field.label()),
                        Style::new().fg(Color::Cyan),
                    ),
                    Span::styled(value, value_style),
                ])
            })
            .collect();
        lines.push(Line::styled(
            "[Enter] Create  [Tab] Switch  [Esc] Quit",
            Style::new().add_modifier(Modifier::DIM),
        ));
        frame.render_widget(Paragraph::new(lines), fields_area);

        frame.render_widget(
            Paragraph::new(self.info_lines()).wrap(Wrap { trim: true }),
            info_area,
        );
    }

    fn info_lines(&self) -> Vec<Line<'_>> {
        let host = self.host.as_ref().map_or_else(
            || "Host: -".to_string(),
            |h| {
                format!(
                    "Host: {} CPUs, {}, {} GPUs",
                    h.cpus,
                    h.memory_bytes.map_or_else(|| "? memory".to_string(), format_bytes),
                    h.gpus.len()
                )
            },
        );
        let mut lines = vec![Line::from(host)];
        if let Some(h) = &self.host {
            lines.extend(
                h.gpus
                    .iter()
                    .map(|g| Line::from(format!("  GPU {}: {}", g.id, g.name))),
            );
        }
        lines.push(Line::from("Images:"));
        if self.images.is_empty() {
            lines.push(Line::from("  -"));
        } else {
            lines.extend(self.images.iter().map(|i| Line::from(format!("  {i}"))));
        }
        lines
    }

    fn render_table(&self, frame: &mut Frame<'_>, area: Rect) {
        let focused = self.focus == Focus::Table;
        let block = Block::bordered()
            .title(format!(" {TABLE_TITLE} ({}) ", self.containers.len()))
            .border_style(border_style(focused));

        if self.containers.is_empty() {
            frame.render_widget(Paragraph::new("No containers").block(block), area);
            return;
        }

        let header = Row::new(COLUMNS).style(Style::new().add_modifier(Modifier::BOLD));
        let rows = self.containers.iter().map(|c| {
            let state = or_dash(c.state.as_deref()).to_string();
            let state_style = state_style(&state);
            Row::new(vec![
                Cell::from(c.name.clone()),
                Cell::from(or_dash(c.image.as_deref()).to_string()),
                Cell::from(state).style(state_style),
                Cell::from(c.port.map_or_else(|| "-".to_string(), |p| p.to_string())),
                Cell::from(or_dash(c.cpus.as_deref()).to_string()),
                Cell::from(or_dash(c.memory.as_deref()).to_string()),
                Cell::from(or_dash(c.shm_size.as_deref()).to_string()),
                Cell::from(
                    c.gpus
                        .as_ref()
                        .filter(|g| !g.is_empty())
                        .map_or_else(|| "-".to_string(), |g| g.join(",")),
                ),
                Cell::from(or_dash(c.swap.as_deref()).to_string()),
                Cell::from(or_dash(c.comment.as_deref()).to_string()),
            ])
        });
        let widths = [
            Constraint::Length(8),
            Constraint::Fill(2),
            Constraint::Length(18),
            Constraint::Length(6),
            Constraint::Length(5),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Fill(1),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::new().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(focused.then_some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::new().fg(Color::Yellow)
    } else {
        Style::new()
    }
}

fn state_style(state: &str) -> Style {
    let color = if state.starts_with("Up") {
        Color::Green
    } else if state.starts_with("Exited") {
        Color::Red
    } else if state == "idle" || state == "-" {
        Color::DarkGray
    } else {
        Color::Yellow
    };
    Style::new().fg(color)
}

impl Component for ContainerList {
    fn name(&self) -> &'static str {
        "ContainerList"
    }

    fn min_size(&self) -> (u16, u16) {
        (MIN_WIDTH, MIN_HEIGHT)
    }

    fn render(&self, frame: &mut Frame<'_>, area: Rect) -> Result<(), RenderError> {
        self.check_area(area)?;
        let [form_area, table_area] =
            Layout::vertical([Constraint::Length(FORM_HEIGHT), Constraint::Min(4)]).areas(area);
        self.render_form(frame, form_area);
        self.render_table(frame, table_area);
        Ok(())
    }
}
