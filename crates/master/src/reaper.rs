// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The timeout reaper (§4.3): scans `InProgress` tasks past their
//! deadline and proposes `ReassignTask` for each. Runs continuously on
//! every replica but is a no-op unless this replica is currently leader —
//! cheaper than wiring a "become leader"/"step down" notification, and
//! self-correcting the moment leadership actually changes hands.

use std::sync::Arc;
use std::time::Duration;

use mr_core::Clock;
use mr_jsm::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::replica::Replica;

pub fn spawn<C: Clock>(replica: Arc<Replica<C>>, clock: C, interval_ms: u64, cancel: CancellationToken) {
    tokio::spawn(async move {
        let interval = Duration::from_millis(interval_ms);
        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    if replica.is_leader() {
                        reap_once(&replica, &clock).await;
                    }
                }
                _ = cancel.cancelled() => {
                    debug!("reaper shutting down");
                    return;
                }
            }
        }
    });
}

async fn reap_once<C: Clock>(replica: &Replica<C>, clock: &C) {
    let now_ms = clock.epoch_ms();
    let state = replica.jsm_snapshot();

    let expired: Vec<_> = state
        .map_tasks
        .iter()
        .chain(state.reduce_tasks.iter())
        .filter(|t| t.is_in_progress() && t.deadline_ms.is_some_and(|d| now_ms >= d))
        .map(|t| (t.kind, t.index))
        .collect();

    for (kind, index) in expired {
        let command = Command::ReassignTask { kind, index };
        if let Err(err) = replica.propose_and_wait(&command).await {
            warn!(%err, ?kind, index, "reaper failed to propose ReassignTask");
        }
    }
}
