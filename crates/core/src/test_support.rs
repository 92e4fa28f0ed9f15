// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builders and fixtures shared by this crate's and downstream crates' tests.

use crate::ids::JobId;
use crate::job::{Job, Phase};

crate::builder! {
    pub struct JobBuilder => Job {
        into {
            input_files: Vec<String> = vec!["a.txt".to_string(), "b.txt".to_string()],
        }
        set {
            n_reduce: u32 = 2,
            phase: Phase = Phase::Map,
            created_at_ms: u64 = 0,
            deadline_ms: u64 = 300_000,
            status: crate::job::JobStatus = crate::job::JobStatus::Running,
        }
        option {
            failure_reason: String = None,
        }
        computed {
            id: JobId = JobId::new(),
        }
    }
}
