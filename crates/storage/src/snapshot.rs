// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Point-in-time, compressed dump of a replica's materialized state.
//!
//! Pairs with [`crate::wal::Wal`]: once a snapshot at log index `seq` is
//! durable, WAL entries up to `seq` become redundant and can be compacted
//! away with [`crate::wal::Wal::truncate_before`].

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::bak;
use crate::error::SnapshotError;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Snapshot<S> {
    pub version: u32,
    /// Highest WAL seq (consensus log index) folded into `state`.
    pub seq: u64,
    pub state: S,
    pub created_at_ms: u64,
}

const FORMAT_VERSION: u32 = 1;

impl<S> Snapshot<S>
where
    S: Serialize + DeserializeOwned,
{
    pub fn new(seq: u64, state: S, created_at_ms: u64) -> Self {
        Self {
            version: FORMAT_VERSION,
            seq,
            state,
            created_at_ms,
        }
    }

    /// Writes the snapshot zstd-compressed to `path`, rotating any existing
    /// file at `path` into the `.bak` chain first.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let json = serde_json::to_vec(self)?;
        let compressed = zstd::encode_all(json.as_slice(), 0)?;

        if path.exists() {
            bak::rotate_in(path).map_err(|source| SnapshotError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(path, compressed).map_err(|source| SnapshotError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let compressed = std::fs::read(path).map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let json = zstd::decode_all(compressed.as_slice())?;
        let snapshot: Self = serde_json::from_slice(&json)?;

        if snapshot.version != FORMAT_VERSION {
            return Err(SnapshotError::Corrupt {
                path: path.to_path_buf(),
                reason: format!(
                    "unsupported snapshot format version {} (expected {FORMAT_VERSION})",
                    snapshot.version
                ),
            });
        }

        Ok(snapshot)
    }
}

/// Best-effort load: a missing file means "no snapshot yet", a corrupt one
/// is rotated into `.bak` and treated the same way rather than failing
/// startup outright.
pub fn load_or_none<S>(path: impl AsRef<Path>) -> Result<Option<Snapshot<S>>, SnapshotError>
where
    S: Serialize + DeserializeOwned,
{
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    match Snapshot::<S>::read_from(path) {
        Ok(snapshot) => Ok(Some(snapshot)),
        Err(_) => {
            let _ = bak::rotate_in(path);
            Ok(None)
        }
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
