// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Implements [`mr_consensus::Transport`] by dialing a peer master over
//! TCP and framing the RPC through `mr-wire` (§6).
//!
//! A fresh connection per call keeps this simple and matches the
//! reference behavior: peers are few, RPCs are small, and a dead peer
//! should fail fast rather than hold a stale pooled connection open.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Duration;

use mr_consensus::{AppendEntriesArgs, AppendEntriesReply, RequestVoteArgs, RequestVoteReply, Transport, TransportError};
use mr_core::MasterId;
use mr_wire::{read_frame, write_frame, Request, Response};
use tokio::net::TcpStream;

pub struct TcpTransport {
    peer_addrs: BTreeMap<MasterId, SocketAddr>,
    rpc_timeout: Duration,
}

impl TcpTransport {
    pub fn new(peer_addrs: BTreeMap<MasterId, SocketAddr>, rpc_timeout: Duration) -> Self {
        Self { peer_addrs, rpc_timeout }
    }

    async fn call(&self, peer: &MasterId, request: Request) -> Result<Response, TransportError> {
        let to_err = |reason: String| TransportError { peer: peer.clone(), reason };

        let addr = self
            .peer_addrs
            .get(peer)
            .ok_or_else(|| to_err("unknown peer address".to_string()))?;

        tokio::time::timeout(self.rpc_timeout, self.call_inner(*addr, request))
            .await
            .map_err(|_| to_err("rpc timed out".to_string()))?
            .map_err(|e| to_err(e.to_string()))
    }

    async fn call_inner(&self, addr: SocketAddr, request: Request) -> Result<Response, mr_wire::WireError> {
        let mut stream = TcpStream::connect(addr).await?;
        write_frame(&mut stream, &request).await?;
        read_frame(&mut stream).await
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn request_vote(&self, peer: &MasterId, args: RequestVoteArgs) -> Result<RequestVoteReply, TransportError> {
        match self.call(peer, Request::ConsensusRequestVote(args)).await? {
            Response::ConsensusRequestVote(reply) => Ok(reply),
            other => Err(TransportError { peer: peer.clone(), reason: format!("unexpected reply {other:?}") }),
        }
    }

    async fn append_entries(&self, peer: &MasterId, args: AppendEntriesArgs) -> Result<AppendEntriesReply, TransportError> {
        match self.call(peer, Request::ConsensusAppendEntries(args)).await? {
            Response::ConsensusAppendEntries(reply) => Ok(reply),
            other => Err(TransportError { peer: peer.clone(), reason: format!("unexpected reply {other:?}") }),
        }
    }
}
