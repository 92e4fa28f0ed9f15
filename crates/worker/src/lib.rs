// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! mr-worker: executes Map and Reduce tasks handed out by the leader (§4.4–4.7).
//!
//! A [`runtime::Worker`] discovers the current leader through a
//! [`client::MasterClient`], polls for work, runs the caller-supplied Map or
//! Reduce body, and atomically publishes its output under the artifact
//! layout `mr-core::artifact` defines, heartbeating through
//! [`heartbeat::spawn`] while a task is in flight.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod heartbeat;
pub mod map;
pub mod reduce;
pub mod runtime;

pub use client::MasterClient;
pub use config::WorkerConfig;
pub use error::{ConfigError, WorkerError};
pub use runtime::{MapFn, ReduceFn, Worker};
