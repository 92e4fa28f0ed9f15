// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job-level timeout watchdog (§5): aborts a job that has been running
//! longer than its overall deadline, independent of any single task's
//! own timeout — guards against a job that keeps making forward progress
//! one retried task at a time but never actually finishes.

use std::sync::Arc;
use std::time::Duration;

use mr_core::Clock;
use mr_jsm::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::replica::Replica;

pub fn spawn<C: Clock>(replica: Arc<Replica<C>>, clock: C, poll_interval_ms: u64, cancel: CancellationToken) {
    tokio::spawn(async move {
        let interval = Duration::from_millis(poll_interval_ms);
        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    if replica.is_leader() {
                        check_once(&replica, &clock).await;
                    }
                }
                _ = cancel.cancelled() => {
                    debug!("job timeout watchdog shutting down");
                    return;
                }
            }
        }
    });
}

async fn check_once<C: Clock>(replica: &Replica<C>, clock: &C) {
    let now_ms = clock.epoch_ms();
    let Some(job) = replica.jsm_snapshot().job else { return };

    if job.is_expired(now_ms) {
        let command = Command::AbortJob { reason: "job exceeded its overall deadline".to_string() };
        if let Err(err) = replica.propose_and_wait(&command).await {
            warn!(%err, job_id = %job.id, "failed to propose AbortJob for an expired job");
        }
    }
}
