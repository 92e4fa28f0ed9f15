//! Replay idempotence (§8 P3): this crate's `apply` reads nothing but its
//! two arguments, so replaying any committed prefix against a fresh state
//! must reproduce the original byte-for-byte, regardless of which commands
//! appear in it or in what order.

use mr_core::{TaskKind, WorkerId};
use proptest::prelude::*;

use crate::command::Command;
use crate::state::JsmState;

fn worker_id() -> impl Strategy<Value = WorkerId> {
    (0u8..4).prop_map(|n| WorkerId::new(format!("w{n}")))
}

fn task_kind() -> impl Strategy<Value = TaskKind> {
    prop_oneof![Just(TaskKind::Map), Just(TaskKind::Reduce)]
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        (1usize..4, 1u32..4, 0u64..1_000, 1u64..10_000).prop_map(
            |(n_files, n_reduce, now_ms, timeout_ms)| Command::StartJob {
                job_id: mr_core::JobId::new(),
                input_files: (0..n_files).map(|i| format!("f{i}.txt")).collect(),
                n_reduce,
                now_ms,
                timeout_ms,
            }
        ),
        (task_kind(), 0usize..4, worker_id(), 0u64..1_000, 0u32..4).prop_map(
            |(kind, index, worker, deadline_ms, attempt)| Command::AssignTask {
                kind,
                index,
                worker,
                deadline_ms,
                attempt,
            }
        ),
        (task_kind(), 0usize..4, worker_id(), 0u32..4).prop_map(
            |(kind, index, worker, attempt)| Command::CompleteTask { kind, index, worker, attempt }
        ),
        (task_kind(), 0usize..4).prop_map(|(kind, index)| Command::ReassignTask { kind, index }),
        "[a-z]{0,8}".prop_map(|reason| Command::AbortJob { reason }),
        Just(Command::Noop),
    ]
}

proptest! {
    /// Applying the same command sequence to two independent fresh states
    /// always yields identical serialized state.
    #[test]
    fn replaying_a_command_sequence_is_deterministic(commands in proptest::collection::vec(command(), 0..32)) {
        let mut original = JsmState::new();
        for command in &commands {
            original.apply(command.clone());
        }

        let mut replayed = JsmState::new();
        for command in &commands {
            replayed.apply(command.clone());
        }

        let original_bytes = serde_json::to_vec(&original).unwrap();
        let replayed_bytes = serde_json::to_vec(&replayed).unwrap();
        prop_assert_eq!(original_bytes, replayed_bytes);
    }
}
