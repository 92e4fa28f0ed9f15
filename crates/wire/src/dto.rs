// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker-facing RPC payloads (§4.3, §6).

use mr_core::{JobId, LeaderHint, TaskKind, WorkerId};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RequestTaskArgs {
    pub worker: WorkerId,
}

/// Everything a worker needs to execute a task without consulting the
/// master again: which job, which file(s), and how to name its output
/// (§4.7's artifact layout is derived from `n_map`/`n_reduce`/`index`).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TaskAssignment {
    pub job_id: JobId,
    pub kind: TaskKind,
    pub index: usize,
    pub attempt: u32,
    pub deadline_ms: u64,
    pub n_map: usize,
    pub n_reduce: u32,
    /// Populated for Map tasks; a Reduce task instead reads every
    /// `mr-<m>-<index>` intermediate file for `m` in `0..n_map`.
    pub input_file: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum RequestTaskReply {
    Assigned(TaskAssignment),
    /// No Idle task right now; the worker should back off and retry (§4.4).
    NoTaskAvailable,
    /// The job has reached a terminal phase; the worker should exit its loop.
    JobComplete,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ReportTaskArgs {
    pub worker: WorkerId,
    pub job_id: JobId,
    pub kind: TaskKind,
    pub index: usize,
    pub attempt: u32,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ReportTaskReply {
    pub accepted: bool,
}

/// Which attempt of a task a worker is currently executing, carried on
/// every in-task heartbeat so the leader can tell it apart from one it has
/// since reassigned to someone else (§4.3).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CurrentTask {
    pub kind: TaskKind,
    pub index: usize,
    pub attempt: u32,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HeartbeatArgs {
    pub worker: WorkerId,
    /// `None` while idle between tasks.
    pub current: Option<CurrentTask>,
}

/// Told to a worker in reply to its `Heartbeat` (§4.3, §5 cancellation):
/// `Continue` executing `current`, or `Abort` because the leader already
/// reassigned it to a different attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeartbeatDirective {
    Continue,
    Abort,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HeartbeatReply {
    pub directive: HeartbeatDirective,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GetWorkerCountReply {
    /// Workers with a heartbeat inside the liveness window (§4.3).
    pub active_workers: u32,
}

/// Wraps any worker-facing reply with a hint at the current leader, so a
/// client that guessed wrong can redirect without a round trip to nowhere.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WithLeaderHint<T> {
    pub leader_hint: LeaderHint,
    pub body: T,
}
