// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound RPC boundary (§6). `mr-consensus` only knows how to build
//! requests and fold replies; `mr-master` supplies the actual TCP dialer
//! built on `mr-wire`'s length-prefixed codec.

use crate::rpc::{AppendEntriesArgs, AppendEntriesReply, RequestVoteArgs, RequestVoteReply};
use crate::types::NodeId;

#[derive(Debug, thiserror::Error)]
#[error("rpc to {peer} failed: {reason}")]
pub struct TransportError {
    pub peer: NodeId,
    pub reason: String,
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn request_vote(
        &self,
        peer: &NodeId,
        args: RequestVoteArgs,
    ) -> Result<RequestVoteReply, TransportError>;

    async fn append_entries(
        &self,
        peer: &NodeId,
        args: AppendEntriesArgs,
    ) -> Result<AppendEntriesReply, TransportError>;
}
