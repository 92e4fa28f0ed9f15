// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `mapreduce master <id> <files,csv>` (§6): runs this process as one
//! replica of the coordination plane, and — once it becomes leader —
//! submits the one-shot `StartJob` naming the given input files.

use std::sync::Arc;
use std::time::Duration;

use mr_core::{Clock, JobId, SystemClock};
use mr_jsm::Command;
use mr_master::{Config, Replica, WorkerRegistry};
use tracing::info;

pub async fn run(id: String, files: String) -> anyhow::Result<()> {
    let mut config = Config::load_from_env()?;
    config.id = id;
    let job_timeout_ms = config.job_timeout_ms;

    let input_files: Vec<String> =
        files.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect();

    let handle = mr_master::startup(&config).await?;
    let replica = handle.replica.clone();
    let workers = handle.workers.clone();
    let worker_liveness_window_ms = handle.worker_liveness_window_ms;
    let cancel = handle.cancel_token();

    if !input_files.is_empty() {
        tokio::spawn(submit_start_job_when_leader(replica, workers, worker_liveness_window_ms, input_files, job_timeout_ms));
    }

    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("ctrl-c received, shutting down");
            cancel.cancel();
        }
    });

    handle.serve().await;
    Ok(())
}

/// Polls until this replica becomes leader with no job currently running,
/// then proposes `StartJob` — retrying on a failed commit (e.g. a leader
/// change mid-propose) until it succeeds or a job is already underway.
async fn submit_start_job_when_leader(
    replica: Arc<Replica<SystemClock>>,
    workers: Arc<WorkerRegistry>,
    worker_liveness_window_ms: u64,
    input_files: Vec<String>,
    job_timeout_ms: u64,
) {
    let clock = SystemClock;
    loop {
        if replica.is_leader() {
            let state = replica.jsm_snapshot();
            let already_running = state.job.as_ref().map(|job| !job.phase.is_terminal()).unwrap_or(false);
            if already_running {
                return;
            }

            let n_reduce = std::env::var("WORKER_COUNT")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or_else(|| workers.active_count(clock.epoch_ms(), worker_liveness_window_ms).max(1));

            let command = Command::StartJob {
                job_id: JobId::new(),
                input_files: input_files.clone(),
                n_reduce,
                now_ms: clock.epoch_ms(),
                timeout_ms: job_timeout_ms,
            };
            match replica.propose_and_wait(&command).await {
                Ok(true) => {
                    info!(n_reduce, "job started");
                    return;
                }
                _ => { /* lost leadership or commit timed out mid-propose; retry */ }
            }
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
}
