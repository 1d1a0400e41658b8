//! # vdesk-tui
//!
//! Terminal dashboard for managing vdesk containers.
//!
//! Built with `ratatui` and `crossterm`, providing:
//! - The [`ContainerList`](ui::container_list::ContainerList) view: a
//!   "Create Container" form above the "Containers" table.
//! - Keyboard-driven application state that turns input into
//!   [`AppCommand`](app::AppCommand)s for the caller to execute.
//! - A render smoke harness ([`smoke`]) that mounts a component on an
//!   in-memory backend and checks its text.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod app;
pub mod component;
pub mod event;
pub mod smoke;
pub mod ui;
