// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The job state machine itself (§4.2): `apply(state, command) -> state'`.
//!
//! This is the function every master replica runs over the committed
//! consensus log, in the same order, to stay in sync. It never touches a
//! clock, the filesystem, or the network — every input it needs arrives
//! inside the [`Command`].

use mr_core::defaults::MAX_ATTEMPTS;
use mr_core::{Job, Phase, Task, TaskKind};

use crate::command::Command;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct JsmState {
    pub job: Option<Job>,
    pub map_tasks: Vec<Task>,
    pub reduce_tasks: Vec<Task>,
}

impl JsmState {
    pub fn new() -> Self {
        Self::default()
    }

    fn task_mut(&mut self, kind: TaskKind, index: usize) -> Option<&mut Task> {
        match kind {
            TaskKind::Map => self.map_tasks.get_mut(index),
            TaskKind::Reduce => self.reduce_tasks.get_mut(index),
        }
    }

    pub fn task(&self, kind: TaskKind, index: usize) -> Option<&Task> {
        match kind {
            TaskKind::Map => self.map_tasks.get(index),
            TaskKind::Reduce => self.reduce_tasks.get(index),
        }
    }

    fn all_map_completed(&self) -> bool {
        !self.map_tasks.is_empty() && self.map_tasks.iter().all(Task::is_completed)
    }

    fn all_reduce_completed(&self) -> bool {
        !self.reduce_tasks.is_empty() && self.reduce_tasks.iter().all(Task::is_completed)
    }

    fn fail_job(&mut self, reason: impl Into<String>) {
        if let Some(job) = &mut self.job {
            job.mark_failed(reason);
        }
        for task in self.map_tasks.iter_mut().chain(self.reduce_tasks.iter_mut()) {
            if !task.is_terminal_failed() && !task.is_completed() {
                task.fail_terminal();
            }
        }
    }

    /// Applies one committed [`Command`]. Total and idempotent: a command
    /// whose preconditions no longer hold (stale attempt, already-idle
    /// task, job already terminal) is silently dropped rather than erring,
    /// since the consensus log never rolls back an entry once committed.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::StartJob {
                job_id,
                input_files,
                n_reduce,
                now_ms,
                timeout_ms,
            } => self.apply_start_job(job_id, input_files, n_reduce, now_ms, timeout_ms),
            Command::AssignTask {
                kind,
                index,
                worker,
                deadline_ms,
                attempt,
            } => self.apply_assign_task(kind, index, worker, deadline_ms, attempt),
            Command::CompleteTask {
                kind,
                index,
                worker,
                attempt,
            } => self.apply_complete_task(kind, index, worker, attempt),
            Command::ReassignTask { kind, index } => self.apply_reassign_task(kind, index),
            Command::AbortJob { reason } => self.fail_job(reason),
            Command::Noop => {}
        }
    }

    fn apply_start_job(
        &mut self,
        job_id: mr_core::JobId,
        input_files: Vec<String>,
        n_reduce: u32,
        now_ms: u64,
        timeout_ms: u64,
    ) {
        let supersedable = self.job.as_ref().map(|j| j.phase.is_terminal()).unwrap_or(true);
        if !supersedable {
            return;
        }
        let job = Job::new(job_id, input_files, n_reduce, now_ms, timeout_ms);
        self.map_tasks = (0..job.num_map_tasks()).map(|i| Task::idle(TaskKind::Map, i)).collect();
        self.reduce_tasks = (0..job.num_reduce_tasks()).map(|i| Task::idle(TaskKind::Reduce, i)).collect();
        self.job = Some(job);
    }

    fn apply_assign_task(
        &mut self,
        kind: TaskKind,
        index: usize,
        worker: mr_core::WorkerId,
        deadline_ms: u64,
        attempt: u32,
    ) {
        if let Some(task) = self.task_mut(kind, index) {
            if task.is_idle() {
                task.assign(worker, deadline_ms, attempt);
            }
        }
    }

    fn apply_complete_task(&mut self, kind: TaskKind, index: usize, worker: mr_core::WorkerId, attempt: u32) {
        let matched = match self.task_mut(kind, index) {
            Some(task) if task.matches_attempt(&worker, attempt) => {
                task.complete();
                true
            }
            _ => false,
        };
        if !matched {
            return;
        }

        let Some(job) = &mut self.job else { return };
        if job.phase == Phase::Map && self.all_map_completed() {
            job.phase = Phase::Reduce;
        } else if job.phase == Phase::Reduce && self.all_reduce_completed() {
            job.mark_done();
        }
    }

    fn apply_reassign_task(&mut self, kind: TaskKind, index: usize) {
        let exhausted = match self.task(kind, index) {
            Some(task) if task.is_in_progress() => task.attempt >= MAX_ATTEMPTS,
            _ => return,
        };

        if exhausted {
            self.fail_job(format!("{kind} task {index} exhausted {MAX_ATTEMPTS} attempts"));
        } else if let Some(task) = self.task_mut(kind, index) {
            task.reassign();
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "state_proptests.rs"]
mod proptests;
