// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires a [`mr_consensus::ConsensusNode`] to a [`mr_jsm::JsmState`]: the
//! piece that turns "an entry got committed" into "the state machine
//! reflects it" on every replica, leader and follower alike (§4.1, §4.2).

use std::sync::Arc;
use std::time::Duration;

use mr_consensus::{CommittedEntry, ConsensusNode, LogIndex, ProposeError};
use mr_core::defaults::SNAPSHOT_ENTRY_THRESHOLD;
use mr_core::Clock;
use mr_jsm::{Command, JsmState};
use mr_storage::Snapshot;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::config::Config;

pub struct Replica<C: Clock> {
    consensus: Arc<ConsensusNode>,
    jsm: Arc<Mutex<JsmState>>,
    snapshot_path: std::path::PathBuf,
    rpc_timeout: Duration,
    clock: C,
}

impl<C: Clock> Replica<C> {
    pub fn new(
        config: &Config,
        consensus: Arc<ConsensusNode>,
        committed_rx: mpsc::UnboundedReceiver<CommittedEntry>,
        initial_jsm: JsmState,
        clock: C,
        cancel: CancellationToken,
    ) -> Arc<Self> {
        let replica = Arc::new(Self {
            consensus,
            jsm: Arc::new(Mutex::new(initial_jsm)),
            snapshot_path: config.snapshot_path(),
            rpc_timeout: Duration::from_millis(config.reaper_interval_ms * 5),
            clock,
        });
        replica.clone().spawn_apply_loop(committed_rx, cancel);
        replica
    }

    pub fn jsm_snapshot(&self) -> JsmState {
        self.jsm.lock().clone()
    }

    pub fn consensus(&self) -> &ConsensusNode {
        &self.consensus
    }

    pub fn is_leader(&self) -> bool {
        self.consensus.is_leader()
    }

    pub fn leader_hint(&self) -> mr_core::LeaderHint {
        self.consensus.leader_hint()
    }

    /// Proposes `command`, waiting for it to commit (and thus be reflected
    /// in [`Self::jsm_snapshot`]) before returning. `Ok(false)` means the
    /// propose succeeded locally but didn't commit before `self.rpc_timeout`
    /// — the caller should treat this the same as a failed RPC and retry.
    #[allow(clippy::expect_used)]
    pub async fn propose_and_wait(&self, command: &Command) -> Result<bool, ProposeError> {
        // `Command` derives `Serialize` over plain data (ids, strings,
        // numbers); there's no type in it `serde_json` can refuse to encode.
        let bytes = serde_json::to_vec(command).expect("jsm commands always serialize");
        let index = self.consensus.propose(bytes)?;
        Ok(self.consensus.wait_committed(index, self.rpc_timeout).await)
    }

    fn spawn_apply_loop(
        self: Arc<Self>,
        mut committed_rx: mpsc::UnboundedReceiver<CommittedEntry>,
        cancel: CancellationToken,
    ) {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    entry = committed_rx.recv() => {
                        match entry {
                            Some(entry) => self.apply_committed(entry),
                            None => return,
                        }
                    }
                    _ = cancel.cancelled() => return,
                }
            }
        });
    }

    fn apply_committed(&self, entry: CommittedEntry) {
        match serde_json::from_slice::<Command>(&entry.command) {
            Ok(command) => {
                self.jsm.lock().apply(command);
                if entry.index % SNAPSHOT_ENTRY_THRESHOLD == 0 {
                    self.write_snapshot(entry.index);
                }
            }
            Err(err) => error!(%err, index = entry.index, "committed entry failed to deserialize as a jsm command"),
        }
    }

    fn write_snapshot(&self, index: LogIndex) {
        let state = self.jsm.lock().clone();
        let snapshot = Snapshot::new(index, state, self.clock.epoch_ms());
        if let Err(err) = snapshot.write_to(&self.snapshot_path) {
            warn!(%err, "failed to write jsm snapshot");
        }
    }
}
