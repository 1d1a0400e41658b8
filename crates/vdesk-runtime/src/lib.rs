//! Container lifecycle management for vdesk.
//!
//! Every container is a `docker compose` project living in its own
//! directory. This crate drives the `docker` CLI against those projects,
//! detects the CPUs, memory and GPUs of the host, and records every command it
//! runs in a rotating log.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod docker;
pub mod host;
pub mod logs;
pub mod manager;
pub mod runner;
