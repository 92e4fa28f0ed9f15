// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Default tunables named throughout the spec (§4.3, §4.1, §5, §7).
//!
//! Centralized so `mr-master`, `mr-worker`, and `mr-cli`'s config loader
//! agree on the same numbers unless a config explicitly overrides them.

/// Default Map task deadline.
pub const TASK_TIMEOUT_MAP_MS: u64 = 10_000;
/// Default Reduce task deadline.
pub const TASK_TIMEOUT_REDUCE_MS: u64 = 30_000;
/// Window within which a worker's last heartbeat counts as "active" (§4.3 `GetWorkerCount`).
pub const WORKER_LIVENESS_WINDOW_MS: u64 = 15_000;
/// How often the leader's timeout reaper scans `InProgress` tasks (§4.3).
pub const REAPER_INTERVAL_MS: u64 = 2_000;
/// Overall job wall-clock cap (§5).
pub const JOB_TIMEOUT_MS: u64 = 5 * 60 * 1_000;
/// Retries allowed per task before the job aborts (§4.2, §7 category 4).
pub const MAX_ATTEMPTS: u32 = 3;
/// Worker RPC deadline before treating a master as unresponsive (§5).
pub const RPC_TIMEOUT_MS: u64 = 30_000;
/// Cap on a worker's `Retry` backoff (§4.4).
pub const RETRY_BACKOFF_CAP_MS: u64 = 1_000;
/// Floor of a worker's `Retry` backoff, doubled on each consecutive retry up to the cap.
pub const RETRY_BACKOFF_FLOOR_MS: u64 = 50;

/// Minimum of the randomized consensus election timeout range (§4.1).
pub const ELECTION_TIMEOUT_MIN_MS: u64 = 150;
/// Maximum of the randomized consensus election timeout range (§4.1).
pub const ELECTION_TIMEOUT_MAX_MS: u64 = 300;
/// Leader heartbeat (empty `AppendEntries`) interval (§4.1).
pub const HEARTBEAT_INTERVAL_MS: u64 = 50;
/// Bounded drain deadline given to a background task on shutdown (§9, §10.3).
pub const SHUTDOWN_DRAIN_MS: u64 = 5_000;
/// Log-entry-count threshold past which a replica may snapshot and compact (§4.1, §10.2).
pub const SNAPSHOT_ENTRY_THRESHOLD: u64 = 10_000;
