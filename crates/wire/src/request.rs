// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The top-level RPC envelope (§6): one tagged enum per direction, carried
//! whole over the length-prefixed transport in [`crate::codec`].

use mr_consensus::{AppendEntriesArgs, AppendEntriesReply, RequestVoteArgs, RequestVoteReply};

use crate::dto::{
    GetWorkerCountReply, HeartbeatArgs, HeartbeatReply, ReportTaskArgs, ReportTaskReply,
    RequestTaskArgs, RequestTaskReply, WithLeaderHint,
};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    RequestTask(RequestTaskArgs),
    ReportTask(ReportTaskArgs),
    Heartbeat(HeartbeatArgs),
    GetWorkerCount,
    ConsensusRequestVote(RequestVoteArgs),
    ConsensusAppendEntries(AppendEntriesArgs),
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    RequestTask(WithLeaderHint<RequestTaskReply>),
    ReportTask(WithLeaderHint<ReportTaskReply>),
    Heartbeat(WithLeaderHint<HeartbeatReply>),
    GetWorkerCount(WithLeaderHint<GetWorkerCountReply>),
    ConsensusRequestVote(RequestVoteReply),
    ConsensusAppendEntries(AppendEntriesReply),
    /// The target wasn't able to service the request at all (e.g. a
    /// malformed request, or a consensus RPC delivered to the wrong kind
    /// of request path).
    Error { message: String },
}
