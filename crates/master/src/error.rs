// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#[derive(Debug, thiserror::Error)]
pub enum MasterError {
    #[error("config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("storage error: {0}")]
    Storage(#[from] mr_storage::WalError),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] mr_storage::SnapshotError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("another master process already holds the lock file at {0}")]
    AlreadyRunning(std::path::PathBuf),
}
