// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task identity and lifecycle state (§3).

use crate::ids::{MasterId, WorkerId};
use serde::{Deserialize, Serialize};

/// Which half of a MapReduce job a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Map,
    Reduce,
}

crate::simple_display! {
    TaskKind {
        Map => "map",
        Reduce => "reduce",
    }
}

/// Lifecycle state of a single task (I1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Idle,
    InProgress,
    Completed,
    /// Terminal-failed: reached only via job abort (§4.2, §7 category 6).
    Failed,
}

crate::simple_display! {
    TaskState {
        Idle => "idle",
        InProgress => "in_progress",
        Completed => "completed",
        Failed => "failed",
    }
}

/// A single unit of work tracked by the JSM.
///
/// `(kind, index)` is the task's stable identity across its whole lifetime;
/// `attempt` disambiguates which execution of that identity is referred to
/// by a given `Assign`/`Complete`/`Reassign` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub kind: TaskKind,
    pub index: usize,
    pub state: TaskState,
    /// None iff state=Idle (I1).
    pub assignee: Option<WorkerId>,
    /// Epoch-ms deadline by which `assignee` must report. None iff state=Idle (I1).
    pub deadline_ms: Option<u64>,
    /// Monotonically increasing; incremented on every Idle->InProgress transition.
    pub attempt: u32,
}

impl Task {
    pub fn idle(kind: TaskKind, index: usize) -> Self {
        Self { kind, index, state: TaskState::Idle, assignee: None, deadline_ms: None, attempt: 0 }
    }

    pub fn is_idle(&self) -> bool {
        self.state == TaskState::Idle
    }

    pub fn is_in_progress(&self) -> bool {
        self.state == TaskState::InProgress
    }

    pub fn is_completed(&self) -> bool {
        self.state == TaskState::Completed
    }

    pub fn is_terminal_failed(&self) -> bool {
        self.state == TaskState::Failed
    }

    /// Apply an `Assign` transition: Idle -> InProgress (I1).
    pub fn assign(&mut self, worker: WorkerId, deadline_ms: u64, attempt: u32) {
        self.state = TaskState::InProgress;
        self.assignee = Some(worker);
        self.deadline_ms = Some(deadline_ms);
        self.attempt = attempt;
    }

    /// Apply a `Complete` transition: InProgress -> Completed.
    pub fn complete(&mut self) {
        self.state = TaskState::Completed;
        self.assignee = None;
        self.deadline_ms = None;
    }

    /// Apply a `Reassign` transition: InProgress -> Idle.
    pub fn reassign(&mut self) {
        self.state = TaskState::Idle;
        self.assignee = None;
        self.deadline_ms = None;
    }

    /// Apply an `AbortJob` transition for a non-terminal task.
    pub fn fail_terminal(&mut self) {
        self.state = TaskState::Failed;
        self.assignee = None;
        self.deadline_ms = None;
    }

    /// True if `worker`/`attempt` match this task's current assignment
    /// (used to reject stale `Complete`/`Reassign` commands, §4.2).
    pub fn matches_attempt(&self, worker: &WorkerId, attempt: u32) -> bool {
        self.state == TaskState::InProgress
            && self.attempt == attempt
            && self.assignee.as_ref() == Some(worker)
    }
}

/// Who currently holds the consensus leadership role (§4.1 `Role()`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Leader,
    Follower,
    Candidate,
}

crate::simple_display! {
    Role {
        Leader => "leader",
        Follower => "follower",
        Candidate => "candidate",
    }
}

/// A hint at which master is believed to be the current leader (§4.1 `LeaderHint()`).
pub type LeaderHint = Option<MasterId>;

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
