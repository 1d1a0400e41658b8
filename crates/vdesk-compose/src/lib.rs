//! # vdesk-compose
//!
//! Reading and editing the `docker-compose.yml` document that backs each
//! vdesk container.
//!
//! Handles:
//! - **Document**: loading and saving, including the first-line
//!   `# comment:` note.
//! - **Service**: applying create/modify requests to the `my_ws` service and
//!   reading a [`ContainerInfo`](vdesk_common::types::ContainerInfo) back.
//! - **Env**: the dict and `KEY=VALUE` list forms of `environment`.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod document;
pub mod env;
pub mod service;

pub use document::ComposeFile;
