// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared consensus vocabulary (§4.1).
//!
//! `mr-consensus` never looks inside a command: it replicates and commits
//! opaque bytes produced by `mr-jsm` and hands them back out once
//! committed. Keeping the log generic over the command payload is what
//! lets this crate be tested without a `mr-jsm` dependency at all.

use mr_core::MasterId;

/// Raft term number. `0` is the pre-election sentinel term.
pub type Term = u64;

/// 1-based position in the replicated log; `0` means "nothing logged yet".
pub type LogIndex = u64;

pub type NodeId = MasterId;

/// A single durable log entry: the term it was proposed in plus an opaque
/// serialized command. `index` is reconstructed from the WAL's `seq`
/// rather than stored redundantly.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LogRecord {
    pub term: Term,
    pub command: Vec<u8>,
}

/// A [`LogRecord`] paired with the index it was committed at, as handed
/// back to the application layer once committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedEntry {
    pub index: LogIndex,
    pub term: Term,
    pub command: Vec<u8>,
}
