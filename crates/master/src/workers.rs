// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker liveness bookkeeping (§4.3 `GetWorkerCount`, §3 worker record).
//!
//! Deliberately kept out of the replicated JSM: which workers have
//! recently said hello (and what they're currently working on) is soft
//! state, rebuilt for free after a leader failover as workers re-heartbeat,
//! and would only add churn to the consensus log if it were made durable.

use std::collections::HashMap;

use mr_core::WorkerId;
use mr_wire::CurrentTask;
use parking_lot::Mutex;

struct WorkerRecord {
    last_seen_ms: u64,
    current: Option<CurrentTask>,
}

#[derive(Default)]
pub struct WorkerRegistry {
    records: Mutex<HashMap<WorkerId, WorkerRecord>>,
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_heartbeat(&self, worker: WorkerId, now_ms: u64, current: Option<CurrentTask>) {
        self.records.lock().insert(worker, WorkerRecord { last_seen_ms: now_ms, current });
    }

    /// Number of workers whose most recent heartbeat is inside `window_ms`.
    pub fn active_count(&self, now_ms: u64, window_ms: u64) -> u32 {
        self.records
            .lock()
            .values()
            .filter(|record| now_ms.saturating_sub(record.last_seen_ms) <= window_ms)
            .count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_count_excludes_workers_past_the_liveness_window() {
        let registry = WorkerRegistry::new();
        registry.record_heartbeat(WorkerId::new("fresh"), 1_000, None);
        registry.record_heartbeat(WorkerId::new("stale"), 0, None);

        assert_eq!(registry.active_count(1_000, 500), 1);
    }

    #[test]
    fn repeated_heartbeats_from_the_same_worker_update_rather_than_duplicate() {
        let registry = WorkerRegistry::new();
        registry.record_heartbeat(WorkerId::new("w1"), 0, None);
        registry.record_heartbeat(WorkerId::new("w1"), 100, None);

        assert_eq!(registry.active_count(100, 50), 1);
    }
}
