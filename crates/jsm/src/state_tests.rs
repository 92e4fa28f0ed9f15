use super::*;
use mr_core::{JobId, TaskState, WorkerId};

fn worker(s: &str) -> WorkerId {
    WorkerId::new(s)
}

fn start_job(state: &mut JsmState, files: usize, n_reduce: u32) {
    state.apply(Command::StartJob {
        job_id: JobId::new(),
        input_files: (0..files).map(|i| format!("f{i}.txt")).collect(),
        n_reduce,
        now_ms: 0,
        timeout_ms: 300_000,
    });
}

#[test]
fn start_job_creates_idle_tasks_for_every_input_and_partition() {
    let mut state = JsmState::new();
    start_job(&mut state, 3, 2);

    assert_eq!(state.map_tasks.len(), 3);
    assert_eq!(state.reduce_tasks.len(), 2);
    assert!(state.map_tasks.iter().all(|t| t.state == TaskState::Idle));
    assert_eq!(state.job.as_ref().unwrap().phase, mr_core::Phase::Map);
}

#[test]
fn start_job_is_ignored_while_a_job_is_still_running() {
    let mut state = JsmState::new();
    start_job(&mut state, 3, 2);
    let first_id = state.job.as_ref().unwrap().id.clone();

    start_job(&mut state, 5, 9);
    assert_eq!(state.job.as_ref().unwrap().id, first_id);
    assert_eq!(state.map_tasks.len(), 3);
}

#[test]
fn start_job_supersedes_a_job_that_already_reached_a_terminal_phase() {
    let mut state = JsmState::new();
    start_job(&mut state, 1, 1);
    state.apply(Command::AbortJob { reason: "boom".into() });
    assert_eq!(state.job.as_ref().unwrap().status, mr_core::JobStatus::Failed);

    start_job(&mut state, 4, 4);
    assert_eq!(state.map_tasks.len(), 4);
    assert_eq!(state.job.as_ref().unwrap().status, mr_core::JobStatus::Running);
}

#[test]
fn assign_task_moves_idle_task_to_in_progress() {
    let mut state = JsmState::new();
    start_job(&mut state, 2, 1);

    state.apply(Command::AssignTask {
        kind: mr_core::TaskKind::Map,
        index: 0,
        worker: worker("w1"),
        deadline_ms: 10_000,
        attempt: 1,
    });

    let task = state.task(mr_core::TaskKind::Map, 0).unwrap();
    assert_eq!(task.state, TaskState::InProgress);
    assert_eq!(task.assignee, Some(worker("w1")));
}

#[test]
fn assign_task_on_an_already_assigned_task_is_a_no_op() {
    let mut state = JsmState::new();
    start_job(&mut state, 1, 1);

    state.apply(Command::AssignTask {
        kind: mr_core::TaskKind::Map,
        index: 0,
        worker: worker("w1"),
        deadline_ms: 10_000,
        attempt: 1,
    });
    state.apply(Command::AssignTask {
        kind: mr_core::TaskKind::Map,
        index: 0,
        worker: worker("w2"),
        deadline_ms: 20_000,
        attempt: 2,
    });

    let task = state.task(mr_core::TaskKind::Map, 0).unwrap();
    assert_eq!(task.assignee, Some(worker("w1")), "second assign must be ignored");
}

#[test]
fn complete_task_requires_matching_worker_and_attempt() {
    let mut state = JsmState::new();
    start_job(&mut state, 1, 1);
    state.apply(Command::AssignTask {
        kind: mr_core::TaskKind::Map,
        index: 0,
        worker: worker("w1"),
        deadline_ms: 10_000,
        attempt: 1,
    });

    // Wrong worker: dropped.
    state.apply(Command::CompleteTask {
        kind: mr_core::TaskKind::Map,
        index: 0,
        worker: worker("imposter"),
        attempt: 1,
    });
    assert_eq!(state.task(mr_core::TaskKind::Map, 0).unwrap().state, TaskState::InProgress);

    // Correct worker and attempt: applied.
    state.apply(Command::CompleteTask {
        kind: mr_core::TaskKind::Map,
        index: 0,
        worker: worker("w1"),
        attempt: 1,
    });
    assert_eq!(state.task(mr_core::TaskKind::Map, 0).unwrap().state, TaskState::Completed);
}

#[test]
fn duplicate_complete_task_after_already_completed_is_dropped() {
    let mut state = JsmState::new();
    start_job(&mut state, 1, 1);
    state.apply(Command::AssignTask {
        kind: mr_core::TaskKind::Map,
        index: 0,
        worker: worker("w1"),
        deadline_ms: 10_000,
        attempt: 1,
    });
    state.apply(Command::CompleteTask {
        kind: mr_core::TaskKind::Map,
        index: 0,
        worker: worker("w1"),
        attempt: 1,
    });

    // A retried/duplicate report for the same attempt arrives again.
    state.apply(Command::CompleteTask {
        kind: mr_core::TaskKind::Map,
        index: 0,
        worker: worker("w1"),
        attempt: 1,
    });
    assert_eq!(state.task(mr_core::TaskKind::Map, 0).unwrap().state, TaskState::Completed);
}

#[test]
fn phase_advances_to_reduce_once_every_map_task_completes() {
    let mut state = JsmState::new();
    start_job(&mut state, 2, 1);

    for index in 0..2 {
        state.apply(Command::AssignTask {
            kind: mr_core::TaskKind::Map,
            index,
            worker: worker("w1"),
            deadline_ms: 10_000,
            attempt: 1,
        });
        state.apply(Command::CompleteTask {
            kind: mr_core::TaskKind::Map,
            index,
            worker: worker("w1"),
            attempt: 1,
        });
    }

    assert_eq!(state.job.as_ref().unwrap().phase, mr_core::Phase::Reduce);
}

#[test]
fn job_is_marked_done_once_every_reduce_task_completes() {
    let mut state = JsmState::new();
    start_job(&mut state, 1, 1);
    state.apply(Command::AssignTask {
        kind: mr_core::TaskKind::Map,
        index: 0,
        worker: worker("w1"),
        deadline_ms: 10_000,
        attempt: 1,
    });
    state.apply(Command::CompleteTask {
        kind: mr_core::TaskKind::Map,
        index: 0,
        worker: worker("w1"),
        attempt: 1,
    });
    state.apply(Command::AssignTask {
        kind: mr_core::TaskKind::Reduce,
        index: 0,
        worker: worker("w2"),
        deadline_ms: 10_000,
        attempt: 1,
    });
    state.apply(Command::CompleteTask {
        kind: mr_core::TaskKind::Reduce,
        index: 0,
        worker: worker("w2"),
        attempt: 1,
    });

    let job = state.job.as_ref().unwrap();
    assert_eq!(job.phase, mr_core::Phase::Done);
    assert_eq!(job.status, mr_core::JobStatus::Done);
}

#[test]
fn reassign_task_returns_an_in_progress_task_to_idle() {
    let mut state = JsmState::new();
    start_job(&mut state, 1, 1);
    state.apply(Command::AssignTask {
        kind: mr_core::TaskKind::Map,
        index: 0,
        worker: worker("w1"),
        deadline_ms: 10_000,
        attempt: 1,
    });

    state.apply(Command::ReassignTask { kind: mr_core::TaskKind::Map, index: 0 });

    let task = state.task(mr_core::TaskKind::Map, 0).unwrap();
    assert_eq!(task.state, TaskState::Idle);
    assert_eq!(task.assignee, None);
}

#[test]
fn reassign_task_past_max_attempts_fails_the_whole_job() {
    let mut state = JsmState::new();
    start_job(&mut state, 1, 1);

    for attempt in 1..=mr_core::defaults::MAX_ATTEMPTS {
        state.apply(Command::AssignTask {
            kind: mr_core::TaskKind::Map,
            index: 0,
            worker: worker("w1"),
            deadline_ms: 10_000,
            attempt,
        });
        state.apply(Command::ReassignTask { kind: mr_core::TaskKind::Map, index: 0 });
    }

    let job = state.job.as_ref().unwrap();
    assert_eq!(job.status, mr_core::JobStatus::Failed);
    assert_eq!(state.task(mr_core::TaskKind::Map, 0).unwrap().state, TaskState::Failed);
}

#[test]
fn abort_job_fails_every_non_terminal_task() {
    let mut state = JsmState::new();
    start_job(&mut state, 2, 1);
    state.apply(Command::AssignTask {
        kind: mr_core::TaskKind::Map,
        index: 0,
        worker: worker("w1"),
        deadline_ms: 10_000,
        attempt: 1,
    });
    state.apply(Command::CompleteTask {
        kind: mr_core::TaskKind::Map,
        index: 0,
        worker: worker("w1"),
        attempt: 1,
    });

    state.apply(Command::AbortJob { reason: "worker storm".into() });

    assert_eq!(state.task(mr_core::TaskKind::Map, 0).unwrap().state, TaskState::Completed);
    assert_eq!(state.task(mr_core::TaskKind::Map, 1).unwrap().state, TaskState::Failed);
    assert_eq!(state.job.as_ref().unwrap().failure_reason.as_deref(), Some("worker storm"));
}

#[test]
fn noop_changes_nothing() {
    let mut state = JsmState::new();
    start_job(&mut state, 1, 1);
    let before = state.clone();
    state.apply(Command::Noop);
    assert_eq!(state.job.as_ref().unwrap().id, before.job.as_ref().unwrap().id);
    assert_eq!(state.map_tasks, before.map_tasks);
}
