// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Consensus-internal RPC payloads (§4.1). Pure data; `mr-wire` wraps these
//! in its tagged request/response envelope for the length-prefixed
//! transport and `mr-master` supplies the actual network send.

use crate::types::{LogIndex, NodeId, Term};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RequestVoteArgs {
    pub term: Term,
    pub candidate_id: NodeId,
    pub last_log_index: LogIndex,
    pub last_log_term: Term,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RequestVoteReply {
    pub term: Term,
    pub vote_granted: bool,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AppendEntriesArgs {
    pub term: Term,
    pub leader_id: NodeId,
    pub prev_log_index: LogIndex,
    pub prev_log_term: Term,
    pub entries: Vec<crate::types::LogRecord>,
    pub leader_commit: LogIndex,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AppendEntriesReply {
    pub term: Term,
    pub success: bool,
    /// Hint for fast back-off: the follower's log length when rejecting,
    /// so the leader can retry from there instead of decrementing by one.
    pub conflict_index: Option<LogIndex>,
}
