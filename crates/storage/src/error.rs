// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage-layer error taxonomy (§10.4 error-handling note: library crates
//! surface `thiserror` enums; only binaries fold them into `anyhow`).

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum WalError {
    #[error("failed to open wal at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read wal at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write wal at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to rotate backup generations for {path}: {source}")]
    Rotate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("record at seq {seq} failed to serialize: {source}")]
    Encode {
        seq: u64,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to write snapshot at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read snapshot at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot at {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("snapshot payload failed to (de)serialize: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("snapshot payload failed to (de)compress: {0}")]
    Compression(#[from] std::io::Error),
}
