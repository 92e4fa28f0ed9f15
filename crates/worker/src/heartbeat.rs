// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The heartbeat ticker run alongside an in-flight task (§4.4 step 4): a
//! background task, cancelled once the task either completes or fails,
//! that keeps the leader's soft worker-liveness record fresh so
//! `GetWorkerCount` reflects busy workers too, not only idle ones, and
//! that watches for an `Abort` directive (§4.3, §5) telling this worker
//! the leader already reassigned the task it's still computing.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use mr_core::WorkerId;
use mr_wire::{CurrentTask, HeartbeatArgs, HeartbeatDirective, Request, Response};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::MasterClient;

/// Handle to a running ticker: cancel it once the accompanying task
/// finishes, and check [`Self::is_aborted`] to see whether the leader told
/// it to give up first.
pub struct HeartbeatHandle {
    cancel: CancellationToken,
    aborted: Arc<AtomicBool>,
}

impl HeartbeatHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// True if any heartbeat while this handle was live came back `Abort`.
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Relaxed)
    }
}

/// Spawns the ticker for `current`, heartbeating every `interval` until
/// [`HeartbeatHandle::cancel`] is called.
pub fn spawn(peers: BTreeMap<String, SocketAddr>, rpc_timeout: Duration, worker: WorkerId, current: CurrentTask, interval: Duration) -> HeartbeatHandle {
    let cancel = CancellationToken::new();
    let task_cancel = cancel.clone();
    let aborted = Arc::new(AtomicBool::new(false));
    let aborted_writer = aborted.clone();
    tokio::spawn(async move {
        let mut client = MasterClient::new(&peers, rpc_timeout);
        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    let request = Request::Heartbeat(HeartbeatArgs {
                        worker: worker.clone(),
                        current: Some(current.clone()),
                    });
                    match client.call(&request).await {
                        Ok(Response::Heartbeat(reply)) if reply.body.directive == HeartbeatDirective::Abort => {
                            aborted_writer.store(true, Ordering::Relaxed);
                        }
                        Ok(_) => {}
                        Err(err) => debug!(%err, "heartbeat failed, will retry next tick"),
                    }
                }
                _ = task_cancel.cancelled() => return,
            }
        }
    });
    HeartbeatHandle { cancel, aborted }
}
