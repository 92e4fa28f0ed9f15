// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The async shell around [`ConsensusState`] (§4.1, §10.3): owns the WAL,
//! drives the randomized election timer and the leader's heartbeat tick,
//! and publishes newly committed entries to whoever is listening.
//!
//! Mirrors the teacher daemon's background-task shape: a `CancellationToken`
//! for cooperative shutdown, `tracing`-instrumented loops, `tokio::select!`
//! between a timer and the cancellation signal.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::Rng;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use mr_core::defaults::{ELECTION_TIMEOUT_MAX_MS, ELECTION_TIMEOUT_MIN_MS, HEARTBEAT_INTERVAL_MS};
use mr_storage::Wal;

use crate::rpc::{AppendEntriesArgs, AppendEntriesReply, RequestVoteArgs, RequestVoteReply};
use crate::state::{ConsensusState, ProposeError};
use crate::transport::Transport;
use crate::types::{CommittedEntry, LogIndex, LogRecord, NodeId};

pub struct ConsensusNode {
    state: Arc<Mutex<ConsensusState>>,
    wal: Arc<Mutex<Wal<LogRecord>>>,
    transport: Arc<dyn Transport>,
    peers: Vec<NodeId>,
    committed_tx: mpsc::UnboundedSender<CommittedEntry>,
    cancel: CancellationToken,
}

impl ConsensusNode {
    pub fn new(
        id: NodeId,
        peers: Vec<NodeId>,
        wal: Wal<LogRecord>,
        transport: Arc<dyn Transport>,
    ) -> (Self, mpsc::UnboundedReceiver<CommittedEntry>) {
        let entries: Vec<LogRecord> = wal.entries_after(0).into_iter().map(|e| e.record).collect();
        let commit_index = wal.processed_seq();
        let state = ConsensusState::restore(id, peers.clone(), entries, commit_index);
        let (committed_tx, committed_rx) = mpsc::unbounded_channel();

        (
            Self {
                state: Arc::new(Mutex::new(state)),
                wal: Arc::new(Mutex::new(wal)),
                transport,
                peers,
                committed_tx,
                cancel: CancellationToken::new(),
            },
            committed_rx,
        )
    }

    pub fn leader_hint(&self) -> Option<NodeId> {
        self.state.lock().leader_hint().cloned()
    }

    pub fn is_leader(&self) -> bool {
        self.state.lock().is_leader()
    }

    /// Appends `command` to the log if this node is currently the leader.
    /// Durability of the append is synchronous; replication and commit
    /// happen on the background replication loop.
    #[allow(clippy::expect_used)]
    pub fn propose(&self, command: Vec<u8>) -> Result<LogIndex, ProposeError> {
        let index = self.state.lock().propose(command.clone())?;
        let term = self.state.lock().current_term();
        let mut wal = self.wal.lock();
        // `Wal::append` only errors on I/O failure against an already-open,
        // already-validated file; a well-formed in-memory record can't fail
        // to serialize.
        let seq = wal
            .append(LogRecord { term, command })
            .expect("wal append is infallible for a well-formed record");
        debug_assert_eq!(seq, index, "wal seq must track raft log index 1:1");
        if wal.needs_flush() {
            let _ = wal.flush();
        }
        self.drain_committed();
        Ok(index)
    }

    /// Polls until `index` has been committed (and applied to this node's
    /// own view via [`Self::drain_committed`]), or gives up after
    /// `timeout`. Used by the leader to avoid acknowledging an RPC whose
    /// effect could still vanish in a crash before it replicates.
    pub async fn wait_committed(&self, index: LogIndex, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.state.lock().commit_index() >= index {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    fn drain_committed(&self) {
        let committed = self.state.lock().take_committed();
        for entry in committed {
            self.wal.lock().mark_processed(entry.index);
            let _ = self.committed_tx.send(entry);
        }
    }

    /// Handles an inbound `RequestVote` RPC from a peer (§4.1).
    pub fn handle_request_vote(&self, args: &RequestVoteArgs) -> RequestVoteReply {
        self.state.lock().handle_request_vote(args)
    }

    /// Handles an inbound `AppendEntries` RPC from the current leader (§4.1).
    /// May advance our own commit index, so it drains newly committed
    /// entries before returning.
    pub fn handle_append_entries(&self, args: &AppendEntriesArgs) -> AppendEntriesReply {
        let mut state = self.state.lock();
        let reply = state.handle_append_entries(args);
        if reply.success && !args.entries.is_empty() {
            let entries: Vec<mr_storage::WalEntry<LogRecord>> = state
                .log_entries()
                .iter()
                .enumerate()
                .map(|(i, record)| mr_storage::WalEntry {
                    seq: i as u64 + 1,
                    record: record.clone(),
                })
                .collect();
            drop(state);
            let mut wal = self.wal.lock();
            if let Err(err) = wal.resync(entries) {
                warn!(%err, "failed to resync follower wal after append_entries");
            } else if wal.needs_flush() {
                let _ = wal.flush();
            }
        }
        self.drain_committed();
        reply
    }

    /// Spawns the election-timeout and heartbeat background loops. Returns
    /// immediately; call [`Self::shutdown`] to stop them.
    #[instrument(skip_all, fields(node = %self.state.lock().id()))]
    pub fn run(self: &Arc<Self>) {
        self.clone().spawn_election_timer();
        self.clone().spawn_heartbeat_loop();
    }

    pub async fn shutdown(&self) {
        self.cancel.cancel();
    }

    fn spawn_election_timer(self: Arc<Self>) {
        tokio::spawn(async move {
            loop {
                let timeout = random_election_timeout();
                tokio::select! {
                    _ = tokio::time::sleep(timeout) => {
                        if !self.is_leader() {
                            self.run_election().await;
                        }
                    }
                    _ = self.cancel.cancelled() => {
                        info!("election timer shutting down");
                        return;
                    }
                }
            }
        });
    }

    fn spawn_heartbeat_loop(self: Arc<Self>) {
        tokio::spawn(async move {
            let interval = Duration::from_millis(HEARTBEAT_INTERVAL_MS);
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {
                        if self.is_leader() {
                            self.replicate_to_all_peers().await;
                        }
                    }
                    _ = self.cancel.cancelled() => {
                        info!("heartbeat loop shutting down");
                        return;
                    }
                }
            }
        });
    }

    #[instrument(skip(self))]
    async fn run_election(&self) {
        let args = self.state.lock().start_election();
        info!(term = args.term, "starting election");

        for peer in self.peers.clone() {
            let args = args.clone();
            match self.transport.request_vote(&peer, args).await {
                Ok(reply) => {
                    self.state.lock().record_vote_reply(peer, reply);
                    if self.is_leader() {
                        info!(term = self.state.lock().current_term(), "won election");
                        self.drain_committed();
                    }
                }
                Err(err) => warn!(%err, "request_vote failed"),
            }
        }
    }

    async fn replicate_to_all_peers(&self) {
        for peer in self.peers.clone() {
            let args = self.state.lock().replication_request_for(&peer);
            let sent_up_to = args.prev_log_index + args.entries.len() as LogIndex;
            match self.transport.append_entries(&peer, args).await {
                Ok(reply) => {
                    self.state.lock().record_append_entries_reply(peer, sent_up_to, reply);
                    self.drain_committed();
                }
                Err(err) => debug!(%err, "append_entries failed, will retry next tick"),
            }
        }
    }
}

fn random_election_timeout() -> Duration {
    let ms = rand::thread_rng().gen_range(ELECTION_TIMEOUT_MIN_MS..=ELECTION_TIMEOUT_MAX_MS);
    Duration::from_millis(ms)
}
