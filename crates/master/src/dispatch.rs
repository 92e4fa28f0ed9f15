// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Leader-side task selection policy (§4.2, §4.3 `RequestTask`).
//!
//! The JSM tracks task state; this module just decides, given a snapshot
//! of that state, which Idle task (if any) a requesting worker should
//! get next. Lowest index first, Map phase fully drained before any
//! Reduce task is handed out — mirrors the phase invariant the JSM itself
//! already enforces, so this never has to special-case a Reduce task
//! showing up while Map tasks remain.

use mr_core::{Phase, TaskKind};
use mr_jsm::JsmState;
use mr_wire::TaskAssignment;

pub enum NextTask {
    Assign(TaskAssignment),
    NoneIdle,
    JobComplete,
}

pub fn next_task_for(state: &JsmState, deadline_ms: u64) -> NextTask {
    let Some(job) = &state.job else {
        return NextTask::NoneIdle;
    };

    if job.phase.is_terminal() {
        return NextTask::JobComplete;
    }

    let tasks = match job.phase {
        Phase::Map => &state.map_tasks,
        Phase::Reduce => &state.reduce_tasks,
        Phase::Done | Phase::Failed => unreachable!("handled by the is_terminal check above"),
    };

    match tasks.iter().find(|t| t.is_idle()) {
        Some(task) => NextTask::Assign(TaskAssignment {
            job_id: job.id.clone(),
            kind: task.kind,
            index: task.index,
            attempt: task.attempt + 1,
            deadline_ms,
            n_map: state.map_tasks.len(),
            n_reduce: state.reduce_tasks.len() as u32,
            input_file: match task.kind {
                TaskKind::Map => job.input_files.get(task.index).cloned(),
                TaskKind::Reduce => None,
            },
        }),
        None => NextTask::NoneIdle,
    }
}
