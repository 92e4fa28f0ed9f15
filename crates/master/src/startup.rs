// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Master process startup (§10.4): acquire the lock file, replay durable
//! state, bind the RPC listener, then wire up the consensus node, the
//! replicated job state machine, and the background reaper and
//! job-timeout watchdogs.
//!
//! Ordering mirrors the teacher's own daemon startup: the lock is taken
//! first so two processes racing on the same data directory fail fast
//! rather than corrupting each other's WAL, and the listener is bound
//! last, only once every fallible step before it has succeeded.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use fs2::FileExt;
use mr_consensus::ConsensusNode;
use mr_core::{Clock, MasterId, SystemClock};
use mr_jsm::JsmState;
use mr_storage::{snapshot, Wal};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Config;
use crate::error::MasterError;
use crate::job_timeout;
use crate::reaper;
use crate::replica::Replica;
use crate::rpc_server::RpcServer;
use crate::transport::TcpTransport;
use crate::workers::WorkerRegistry;

/// Everything a running master needs: the accepted listener plus the
/// pieces that serve it. Dropping this (or calling [`Self::shutdown`])
/// stops every background task and releases the lock file.
pub struct MasterHandle {
    pub replica: Arc<Replica<SystemClock>>,
    pub workers: Arc<WorkerRegistry>,
    pub worker_liveness_window_ms: u64,
    rpc_server: Arc<RpcServer<SystemClock>>,
    listener: TcpListener,
    cancel: CancellationToken,
    _lock_file: std::fs::File,
}

impl MasterHandle {
    /// Runs the RPC accept loop until [`Self::shutdown`] is called. Does
    /// not return otherwise.
    pub async fn serve(self) {
        self.rpc_server.clone().serve(self.listener, self.cancel.clone()).await;
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// A clone of the cancellation token [`Self::serve`] watches, so a
    /// caller can arrange for shutdown (e.g. on Ctrl-C) before moving
    /// `self` into `serve`.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Live worker count as of `now_ms`, used to size `n_reduce` dynamically
    /// at `StartJob` time (§4.2) absent a `WORKER_COUNT` override.
    pub fn active_worker_count(&self, now_ms: u64) -> u32 {
        self.workers.active_count(now_ms, self.worker_liveness_window_ms)
    }
}

pub async fn startup(config: &Config) -> Result<MasterHandle, MasterError> {
    std::fs::create_dir_all(&config.data_dir)?;

    // Lock first: a second process racing on the same data directory
    // must fail here rather than open the WAL out from under us.
    let lock_path = config.lock_path();
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(|_| MasterError::AlreadyRunning(lock_path.clone()))?;
    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file;

    let (initial_jsm, processed_seq) = match snapshot::load_or_none::<JsmState>(config.snapshot_path())? {
        Some(snap) => {
            info!(seq = snap.seq, "loaded jsm snapshot");
            (snap.state, snap.seq)
        }
        None => {
            info!("no jsm snapshot found, starting with an empty job state machine");
            (JsmState::new(), 0)
        }
    };

    let wal = Wal::open(config.wal_path(), processed_seq)?;

    let self_id = config.self_id();
    let peer_ids = config.peer_ids();
    let peer_addrs = peer_ids
        .iter()
        .filter_map(|id| config.peer_addr(id).map(|addr| (id.clone(), addr)))
        .collect::<std::collections::BTreeMap<MasterId, _>>();
    let transport = Arc::new(TcpTransport::new(peer_addrs, Duration::from_millis(config.task_timeout_map_ms)));

    let (consensus, committed_rx) = ConsensusNode::new(self_id, peer_ids, wal, transport);
    let consensus = Arc::new(consensus);
    consensus.run();

    let cancel = CancellationToken::new();
    let clock = SystemClock;
    let replica = Replica::new(config, consensus, committed_rx, initial_jsm, clock.clone(), cancel.clone());

    reaper::spawn(replica.clone(), clock.clone(), config.reaper_interval_ms, cancel.clone());
    job_timeout::spawn(replica.clone(), clock.clone(), config.reaper_interval_ms, cancel.clone());

    let workers = Arc::new(WorkerRegistry::new());
    let rpc_server = RpcServer::new(
        replica.clone(),
        workers.clone(),
        clock,
        config.task_timeout_map_ms,
        config.task_timeout_reduce_ms,
        config.worker_liveness_window_ms,
    );

    let listen_addr = config.listen_addr()?;
    let listener = TcpListener::bind(listen_addr).await?;
    info!(id = %config.id, addr = %listen_addr, "master started");

    Ok(MasterHandle {
        replica,
        workers,
        worker_liveness_window_ms: config.worker_liveness_window_ms,
        rpc_server,
        listener,
        cancel,
        _lock_file: lock_file,
    })
}
