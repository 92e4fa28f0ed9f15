// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The worker loop itself (§4.4): discover a leader, pull tasks, execute
//! Map or Reduce, report back, repeat until the job is done.

use std::path::PathBuf;
use std::time::Duration;

use mr_core::{TaskKind, WorkerId};
use mr_wire::{CurrentTask, HeartbeatArgs, ReportTaskArgs, Request, RequestTaskArgs, RequestTaskReply, Response, TaskAssignment};
use tracing::{info, warn};

use crate::client::MasterClient;
use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::heartbeat;
use crate::map::run_map;
use crate::reduce::run_reduce;

pub type MapFn = dyn Fn(&str, &str) -> Vec<(String, String)> + Send + Sync;
pub type ReduceFn = dyn Fn(&str, &[String]) -> String + Send + Sync;

/// One running worker process: its identity, a client that remembers its
/// current leader guess, and the user-supplied Map/Reduce bodies.
pub struct Worker {
    id: WorkerId,
    working_dir: PathBuf,
    client: MasterClient,
    config: WorkerConfig,
    map_fn: Box<MapFn>,
    reduce_fn: Box<ReduceFn>,
}

impl Worker {
    pub fn new(config: WorkerConfig, map_fn: Box<MapFn>, reduce_fn: Box<ReduceFn>) -> Self {
        let rpc_timeout = Duration::from_millis(config.rpc_timeout_ms);
        let client = MasterClient::new(&config.peers, rpc_timeout);
        Self {
            id: WorkerId::generate(),
            working_dir: config.working_dir.clone(),
            client,
            config,
            map_fn,
            reduce_fn,
        }
    }

    /// Runs the poll/execute/report loop until the job completes. Returns
    /// once `RequestTask` reports `JobComplete`.
    pub async fn run(mut self) -> Result<(), WorkerError> {
        std::fs::create_dir_all(&self.working_dir)?;
        let mut backoff_ms = self.config.retry_backoff_floor_ms;

        loop {
            let request = Request::RequestTask(RequestTaskArgs { worker: self.id.clone() });
            let response = match self.client.call(&request).await {
                Ok(response) => response,
                Err(err) => {
                    warn!(%err, "request_task failed against every configured master, backing off");
                    self.sleep_backoff(&mut backoff_ms).await;
                    continue;
                }
            };

            let Response::RequestTask(with_hint) = response else {
                warn!("unexpected reply shape to request_task");
                self.sleep_backoff(&mut backoff_ms).await;
                continue;
            };

            match with_hint.body {
                RequestTaskReply::JobComplete => {
                    info!(worker = %self.id, "job complete, exiting");
                    return Ok(());
                }
                RequestTaskReply::NoTaskAvailable => {
                    // Nothing to execute yet, so the in-task heartbeat ticker
                    // never runs; ping once here so `GetWorkerCount` still
                    // sees this worker as live (§4.3), including before any
                    // job exists to size a new job's `n_reduce` from.
                    self.send_heartbeat().await;
                    self.sleep_backoff(&mut backoff_ms).await;
                }
                RequestTaskReply::Assigned(assignment) => {
                    backoff_ms = self.config.retry_backoff_floor_ms;
                    self.execute_and_report(assignment).await;
                }
            }
        }
    }

    async fn send_heartbeat(&mut self) {
        let request = Request::Heartbeat(HeartbeatArgs { worker: self.id.clone(), current: None });
        if let Err(err) = self.client.call(&request).await {
            warn!(%err, "idle heartbeat failed against every configured master");
        }
    }

    async fn sleep_backoff(&self, backoff_ms: &mut u64) {
        tokio::time::sleep(Duration::from_millis(*backoff_ms)).await;
        *backoff_ms = (*backoff_ms * 2).min(self.config.retry_backoff_cap_ms);
    }

    async fn execute_and_report(&mut self, assignment: TaskAssignment) {
        let phase_timeout_ms = match assignment.kind {
            TaskKind::Map => self.config.task_timeout_map_ms,
            TaskKind::Reduce => self.config.task_timeout_reduce_ms,
        };
        let current = CurrentTask { kind: assignment.kind, index: assignment.index, attempt: assignment.attempt };
        let heartbeat = heartbeat::spawn(
            self.config.peers.clone(),
            Duration::from_millis(self.config.rpc_timeout_ms),
            self.id.clone(),
            current,
            Duration::from_millis(phase_timeout_ms / 2),
        );

        let result = self.execute(&assignment);
        let aborted = heartbeat.is_aborted();
        heartbeat.cancel();

        if aborted {
            warn!(job_id = %assignment.job_id, index = assignment.index, "task was reassigned mid-execution; discarding result instead of reporting");
            return;
        }

        let (success, error) = match result {
            Ok(()) => (true, None),
            Err(err) => {
                warn!(%err, job_id = %assignment.job_id, index = assignment.index, "task execution failed");
                (false, Some(err.to_string()))
            }
        };

        let report = Request::ReportTask(ReportTaskArgs {
            worker: self.id.clone(),
            job_id: assignment.job_id,
            kind: assignment.kind,
            index: assignment.index,
            attempt: assignment.attempt,
            success,
            error,
        });
        if let Err(err) = self.client.call(&report).await {
            warn!(%err, "report_task failed against every configured master; task result will surface via timeout instead");
        }
    }

    fn execute(&self, assignment: &TaskAssignment) -> Result<(), WorkerError> {
        match assignment.kind {
            TaskKind::Map => {
                let input_file = assignment
                    .input_file
                    .as_deref()
                    .ok_or_else(|| WorkerError::Map("map assignment missing its input file".to_string()))?;
                run_map(&self.working_dir, assignment.index, input_file, assignment.n_reduce, assignment.attempt, &*self.map_fn)
            }
            TaskKind::Reduce => {
                run_reduce(&self.working_dir, assignment.index as u32, assignment.n_map, assignment.attempt, &*self.reduce_fn)
            }
        }
    }
}
