// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The command vocabulary the master group agrees on through consensus (§4.2).
//!
//! Every field a [`Command`] needs to apply deterministically is carried in
//! the command itself — including `now_ms` — so that every replica reaches
//! the same [`crate::state::JsmState`] regardless of when it happens to
//! process the committed entry. Only the leader reads the wall clock; it
//! stamps the reading into the command before proposing it.

use mr_core::{JobId, TaskKind, WorkerId};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Starts a new job, superseding any job already in a terminal phase.
    /// Ignored if the current job is still running (§4.2 supersession rule).
    StartJob {
        job_id: JobId,
        input_files: Vec<String>,
        n_reduce: u32,
        now_ms: u64,
        timeout_ms: u64,
    },

    /// A worker was handed a task. Ignored unless the task is currently Idle.
    AssignTask {
        kind: TaskKind,
        index: usize,
        worker: WorkerId,
        deadline_ms: u64,
        attempt: u32,
    },

    /// A worker reported a task done. Ignored unless `worker`/`attempt`
    /// match the task's current assignment (stale or duplicate reports are
    /// silently dropped, §4.2 category 4 / duplicate-completion edge case).
    CompleteTask {
        kind: TaskKind,
        index: usize,
        worker: WorkerId,
        attempt: u32,
    },

    /// The reaper observed a task past its deadline. Returns it to Idle,
    /// unless its attempt count has exhausted `max_attempts`, in which case
    /// this folds into an `AbortJob` instead (§4.2 retry-exhaustion rule).
    ReassignTask { kind: TaskKind, index: usize },

    /// Terminates the running job as Failed (timeout watchdog or
    /// retry-exhaustion), marking every non-terminal task Failed.
    AbortJob { reason: String },

    /// Carries no state change. Committed by a newly elected leader to
    /// confirm its commit index before serving any RPCs (Raft §8).
    Noop,
}
