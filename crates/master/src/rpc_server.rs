// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The TCP RPC server (§6): one listener accepts both worker RPCs and
//! peer-master consensus RPCs, since both travel the same framed
//! envelope. Consensus RPCs are served regardless of role (a follower
//! must answer `RequestVote`/`AppendEntries`); worker RPCs are served
//! only by the leader, everyone else replies with a leader hint so the
//! worker can redirect (§4.3).

use std::sync::Arc;

use mr_core::{Clock, TaskState};
use mr_jsm::Command;
use mr_wire::{
    read_frame, write_frame, GetWorkerCountReply, HeartbeatArgs, HeartbeatDirective, HeartbeatReply,
    ReportTaskArgs, ReportTaskReply, Request, RequestTaskArgs, RequestTaskReply, Response,
    WithLeaderHint,
};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::dispatch::{self, NextTask};
use crate::replica::Replica;
use crate::workers::WorkerRegistry;

pub struct RpcServer<C: Clock> {
    replica: Arc<Replica<C>>,
    workers: Arc<WorkerRegistry>,
    clock: C,
    task_timeout_map_ms: u64,
    task_timeout_reduce_ms: u64,
    worker_liveness_window_ms: u64,
}

impl<C: Clock> RpcServer<C> {
    pub fn new(
        replica: Arc<Replica<C>>,
        workers: Arc<WorkerRegistry>,
        clock: C,
        task_timeout_map_ms: u64,
        task_timeout_reduce_ms: u64,
        worker_liveness_window_ms: u64,
    ) -> Arc<Self> {
        Arc::new(Self {
            replica,
            workers,
            clock,
            task_timeout_map_ms,
            task_timeout_reduce_ms,
            worker_liveness_window_ms,
        })
    }

    pub async fn serve(self: Arc<Self>, listener: TcpListener, cancel: CancellationToken) {
        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, addr)) => {
                            let this = self.clone();
                            tokio::spawn(async move {
                                if let Err(err) = this.serve_one(stream).await {
                                    debug!(%err, %addr, "connection ended with an error");
                                }
                            });
                        }
                        Err(err) => warn!(%err, "accept failed"),
                    }
                }
                _ = cancel.cancelled() => {
                    debug!("rpc server shutting down");
                    return;
                }
            }
        }
    }

    async fn serve_one(&self, mut stream: TcpStream) -> Result<(), mr_wire::WireError> {
        let request: Request = read_frame(&mut stream).await?;
        let response = self.handle(request).await;
        write_frame(&mut stream, &response).await
    }

    async fn handle(&self, request: Request) -> Response {
        match request {
            Request::ConsensusRequestVote(args) => {
                Response::ConsensusRequestVote(self.replica.consensus().handle_request_vote(&args))
            }
            Request::ConsensusAppendEntries(args) => {
                Response::ConsensusAppendEntries(self.replica.consensus().handle_append_entries(&args))
            }
            Request::RequestTask(args) => {
                Response::RequestTask(self.with_leader_hint(self.handle_request_task(args).await))
            }
            Request::ReportTask(args) => {
                Response::ReportTask(self.with_leader_hint(self.handle_report_task(args).await))
            }
            Request::Heartbeat(args) => {
                Response::Heartbeat(self.with_leader_hint(self.handle_heartbeat(args)))
            }
            Request::GetWorkerCount => {
                let active_workers = self
                    .workers
                    .active_count(self.clock.epoch_ms(), self.worker_liveness_window_ms);
                Response::GetWorkerCount(self.with_leader_hint(GetWorkerCountReply { active_workers }))
            }
        }
    }

    fn with_leader_hint<T>(&self, body: T) -> WithLeaderHint<T> {
        WithLeaderHint { leader_hint: self.replica.leader_hint(), body }
    }

    async fn handle_request_task(&self, args: RequestTaskArgs) -> RequestTaskReply {
        if !self.replica.is_leader() {
            return RequestTaskReply::NoTaskAvailable;
        }

        let state = self.replica.jsm_snapshot();
        let phase_timeout = match state.job.as_ref().map(|j| j.phase) {
            Some(mr_core::Phase::Reduce) => self.task_timeout_reduce_ms,
            _ => self.task_timeout_map_ms,
        };
        let deadline_ms = self.clock.epoch_ms() + phase_timeout;

        match dispatch::next_task_for(&state, deadline_ms) {
            NextTask::Assign(assignment) => {
                let command = Command::AssignTask {
                    kind: assignment.kind,
                    index: assignment.index,
                    worker: args.worker,
                    deadline_ms,
                    attempt: assignment.attempt,
                };
                match self.replica.propose_and_wait(&command).await {
                    Ok(true) => RequestTaskReply::Assigned(assignment),
                    _ => RequestTaskReply::NoTaskAvailable,
                }
            }
            NextTask::NoneIdle => RequestTaskReply::NoTaskAvailable,
            NextTask::JobComplete => RequestTaskReply::JobComplete,
        }
    }

    /// Updates the soft worker record and answers whether `args.current`
    /// (if any) is still the task this worker is assigned to, so it knows
    /// whether to keep computing or discard its result (§4.3, §5).
    fn handle_heartbeat(&self, args: HeartbeatArgs) -> HeartbeatReply {
        let directive = match &args.current {
            None => HeartbeatDirective::Continue,
            Some(current) => {
                let state = self.replica.jsm_snapshot();
                let still_assigned = state
                    .task(current.kind, current.index)
                    .map(|task| task.matches_attempt(&args.worker, current.attempt))
                    .unwrap_or(false);
                if still_assigned {
                    HeartbeatDirective::Continue
                } else {
                    HeartbeatDirective::Abort
                }
            }
        };
        self.workers.record_heartbeat(args.worker, self.clock.epoch_ms(), args.current);
        HeartbeatReply { directive }
    }

    async fn handle_report_task(&self, args: ReportTaskArgs) -> ReportTaskReply {
        if !self.replica.is_leader() {
            return ReportTaskReply { accepted: false };
        }

        let command = if args.success {
            Command::CompleteTask {
                kind: args.kind,
                index: args.index,
                worker: args.worker,
                attempt: args.attempt,
            }
        } else {
            Command::ReassignTask { kind: args.kind, index: args.index }
        };

        let state = self.replica.jsm_snapshot();
        let already_final = state
            .task(args.kind, args.index)
            .map(|t| t.state != TaskState::InProgress)
            .unwrap_or(true);
        if already_final {
            // Stale/duplicate report for a task already moved on: ack
            // without re-proposing, since the JSM would drop it anyway.
            return ReportTaskReply { accepted: true };
        }

        match self.replica.propose_and_wait(&command).await {
            Ok(accepted) => ReportTaskReply { accepted },
            Err(_) => ReportTaskReply { accepted: false },
        }
    }
}
