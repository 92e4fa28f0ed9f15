// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Leader discovery and the RPC client (§4.4 steps 1–2).
//!
//! Tries its current guess at the leader first, and on a failed connection
//! rotates through every other configured master in turn. Any reply's
//! `leader_hint` updates the guess for next time, so after the first
//! `Redirect`-carrying reply the worker dials the real leader directly.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Duration;

use mr_core::{LeaderHint, MasterId};
use mr_wire::{read_frame, write_frame, Request, Response, WireError};
use tokio::net::TcpStream;
use tracing::debug;

use crate::error::WorkerError;

pub struct MasterClient {
    addrs: Vec<(MasterId, SocketAddr)>,
    current: usize,
    rpc_timeout: Duration,
}

impl MasterClient {
    pub fn new(peers: &BTreeMap<String, SocketAddr>, rpc_timeout: Duration) -> Self {
        let addrs = peers.iter().map(|(id, addr)| (MasterId::new(id.clone()), *addr)).collect();
        Self { addrs, current: 0, rpc_timeout }
    }

    /// Sends `request`, starting from the current leader guess and
    /// rotating through every configured master until one answers.
    pub async fn call(&mut self, request: &Request) -> Result<Response, WorkerError> {
        let n = self.addrs.len();
        let mut last_err = None;
        for offset in 0..n {
            let idx = (self.current + offset) % n;
            let (_, addr) = self.addrs[idx];
            match self.call_one(addr, request).await {
                Ok(response) => {
                    self.current = idx;
                    self.follow_leader_hint(leader_hint_of(&response));
                    return Ok(response);
                }
                Err(err) => {
                    debug!(%err, %addr, "master unreachable, trying next configured peer");
                    last_err = Some(err);
                }
            }
        }
        debug!(?last_err, "exhausted every configured master");
        Err(WorkerError::NoReachableMaster(n))
    }

    async fn call_one(&self, addr: SocketAddr, request: &Request) -> Result<Response, WireError> {
        let timeout_err = || WireError::Io(std::io::Error::new(std::io::ErrorKind::TimedOut, "rpc timed out"));

        let mut stream = tokio::time::timeout(self.rpc_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| timeout_err())??;
        write_frame(&mut stream, request).await?;
        tokio::time::timeout(self.rpc_timeout, read_frame(&mut stream))
            .await
            .map_err(|_| timeout_err())?
    }

    fn follow_leader_hint(&mut self, hint: LeaderHint) {
        let Some(leader) = hint else { return };
        if let Some(idx) = self.addrs.iter().position(|(id, _)| id == &leader) {
            self.current = idx;
        }
    }
}

fn leader_hint_of(response: &Response) -> LeaderHint {
    match response {
        Response::RequestTask(body) => body.leader_hint.clone(),
        Response::ReportTask(body) => body.leader_hint.clone(),
        Response::Heartbeat(body) => body.leader_hint.clone(),
        Response::GetWorkerCount(body) => body.leader_hint.clone(),
        Response::ConsensusRequestVote(_) | Response::ConsensusAppendEntries(_) | Response::Error { .. } => None,
    }
}
