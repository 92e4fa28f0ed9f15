// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! mr-storage: durable, corruption-tolerant persistence primitives.
//!
//! Two pieces, both generic over the records/state they hold so the
//! consensus log and the per-replica job-state-machine snapshot can share
//! one implementation: the append-only [`wal::Wal`] and the compressed
//! [`snapshot::Snapshot`].

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod bak;
pub mod error;
pub mod snapshot;
pub mod wal;

pub use error::{SnapshotError, WalError};
pub use snapshot::Snapshot;
pub use wal::{Wal, WalEntry};
