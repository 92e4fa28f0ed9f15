// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! mr-wire: RPC payload types and the wire transport (§4.3, §6).
//!
//! Holds both the worker-facing DTOs and the consensus-internal RPC
//! envelope, since both travel over the same framed TCP connection and
//! the same [`request::Request`]/[`request::Response`] tagged enums.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod codec;
pub mod dto;
pub mod error;
pub mod request;

pub use codec::{read_frame, write_frame, MAX_FRAME_BYTES};
pub use dto::{
    CurrentTask, GetWorkerCountReply, HeartbeatArgs, HeartbeatDirective, HeartbeatReply,
    ReportTaskArgs, ReportTaskReply, RequestTaskArgs, RequestTaskReply, TaskAssignment,
    WithLeaderHint,
};
pub use error::WireError;
pub use request::{Request, Response};
