// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only, length-delimited JSON log.
//!
//! Used twice in this workspace: as the replicated consensus log's durable
//! backing store (`mr-consensus`, one [`WalEntry`] per `LogEntry`, `seq`
//! doubling as Raft log index) and as the write side of the job-state-machine
//! command trail kept alongside each master's snapshot. Neither caller is
//! aware of the other; this crate only knows "records with an integer seq".
//!
//! Corruption tolerance: a line that fails to parse — truncated write,
//! torn `fsync`, bad UTF-8 — ends replay at the last good line. The
//! original file is preserved by rotating it into the `.bak` chain; a
//! fresh file containing only the valid prefix replaces it.

use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::bak;
use crate::error::WalError;

/// Entries are flushed once this many are buffered, regardless of elapsed time.
pub const FLUSH_THRESHOLD_COUNT: usize = 100;
/// ...or once this much time has passed since the last flush, whichever is first.
pub const FLUSH_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WalEntry<T> {
    pub seq: u64,
    pub record: T,
}

pub struct Wal<T> {
    path: PathBuf,
    file: File,
    entries: Vec<WalEntry<T>>,
    pending: Vec<u8>,
    write_seq: u64,
    processed_seq: u64,
    read_pos: u64,
    last_flush: Instant,
}

impl<T> Wal<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Opens (creating if absent) the log at `path`. `processed_seq` seeds
    /// the read cursor, typically the `seq` recorded in the last snapshot.
    pub fn open(path: impl AsRef<Path>, processed_seq: u64) -> Result<Self, WalError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            File::create(&path).map_err(|source| WalError::Open {
                path: path.clone(),
                source,
            })?;
        }

        let raw = std::fs::read(&path).map_err(|source| WalError::Read {
            path: path.clone(),
            source,
        })?;

        let (entries, corrupt) = Self::parse_lenient(&raw);

        if corrupt {
            bak::rotate_in(&path).map_err(|source| WalError::Rotate {
                path: path.clone(),
                source,
            })?;
            let mut clean = Vec::new();
            for entry in &entries {
                Self::encode_into(&mut clean, entry)?;
            }
            std::fs::write(&path, &clean).map_err(|source| WalError::Write {
                path: path.clone(),
                source,
            })?;
        }

        let write_seq = entries.last().map(|e| e.seq).unwrap_or(0);

        let file = OpenOptions::new()
            .append(true)
            .open(&path)
            .map_err(|source| WalError::Open {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            file,
            entries,
            pending: Vec::new(),
            write_seq,
            processed_seq,
            read_pos: processed_seq,
            last_flush: Instant::now(),
        })
    }

    /// Parses as many whole, valid lines as possible. Returns the valid
    /// prefix and whether anything past it had to be discarded.
    fn parse_lenient(raw: &[u8]) -> (Vec<WalEntry<T>>, bool) {
        let text = match std::str::from_utf8(raw) {
            Ok(t) => t,
            Err(_) => return (Vec::new(), !raw.is_empty()),
        };

        let mut entries = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<WalEntry<T>>(line) {
                Ok(entry) => entries.push(entry),
                Err(_) => return (entries, true),
            }
        }
        (entries, false)
    }

    fn encode_into(buf: &mut Vec<u8>, entry: &WalEntry<T>) -> Result<(), WalError> {
        let line = serde_json::to_vec(entry).map_err(|source| WalError::Encode {
            seq: entry.seq,
            source,
        })?;
        buf.extend_from_slice(&line);
        buf.push(b'\n');
        Ok(())
    }

    /// Appends `record`, assigning it the next sequence number. Buffered
    /// in memory until [`Self::flush`] (explicit or threshold-triggered).
    pub fn append(&mut self, record: T) -> Result<u64, WalError> {
        let seq = self.write_seq + 1;
        let entry = WalEntry { seq, record };
        Self::encode_into(&mut self.pending, &entry)?;
        self.entries.push(entry);
        self.write_seq = seq;
        Ok(seq)
    }

    /// Forces buffered appends to disk.
    pub fn flush(&mut self) -> Result<(), WalError> {
        if !self.pending.is_empty() {
            self.file
                .write_all(&self.pending)
                .map_err(|source| WalError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            self.file.flush().map_err(|source| WalError::Write {
                path: self.path.clone(),
                source,
            })?;
            self.pending.clear();
        }
        self.last_flush = Instant::now();
        Ok(())
    }

    /// Whether buffered writes have crossed the flush threshold — by
    /// count or by elapsed time since the last flush.
    pub fn needs_flush(&self) -> bool {
        !self.pending.is_empty()
            && (self.pending_entry_count() >= FLUSH_THRESHOLD_COUNT
                || self.last_flush.elapsed() >= FLUSH_INTERVAL)
    }

    fn pending_entry_count(&self) -> usize {
        self.pending.iter().filter(|&&b| b == b'\n').count()
    }

    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    pub fn processed_seq(&self) -> u64 {
        self.processed_seq
    }

    /// Marks `seq` as durably applied to the materialized state. Distinct
    /// from the internal read cursor advanced by [`Self::next_unprocessed`].
    pub fn mark_processed(&mut self, seq: u64) {
        self.processed_seq = seq;
    }

    /// Returns the next entry past the internal read cursor, advancing it.
    pub fn next_unprocessed(&mut self) -> Option<WalEntry<T>> {
        let next = self.entries.iter().find(|e| e.seq > self.read_pos)?.clone();
        self.read_pos = next.seq;
        Some(next)
    }

    /// All entries strictly after `seq`, without touching the read cursor.
    /// Used to ship missing suffixes to a lagging consensus follower.
    pub fn entries_after(&self, seq: u64) -> Vec<WalEntry<T>> {
        self.entries
            .iter()
            .filter(|e| e.seq > seq)
            .cloned()
            .collect()
    }

    /// Wholesale replaces the in-memory and on-disk log with `entries`,
    /// resetting `write_seq` to the last entry's seq. Used by a consensus
    /// follower to resync its durable log after `AppendEntries` truncates
    /// a conflicting suffix — an operation the append-only API otherwise
    /// has no way to express.
    pub fn resync(&mut self, entries: Vec<WalEntry<T>>) -> Result<(), WalError> {
        self.entries = entries;
        self.write_seq = self.entries.last().map(|e| e.seq).unwrap_or(0);
        self.rewrite_file()
    }

    /// Drops entries older than `seq` from memory and compacts the file to
    /// match, once a snapshot has made them redundant.
    pub fn truncate_before(&mut self, seq: u64) -> Result<(), WalError> {
        self.entries.retain(|e| e.seq >= seq);
        self.rewrite_file()
    }

    /// Rewrites the on-disk file to hold exactly `self.entries`, then
    /// reopens it in append mode for subsequent [`Self::flush`]es.
    fn rewrite_file(&mut self) -> Result<(), WalError> {
        let mut clean = Vec::new();
        for entry in &self.entries {
            Self::encode_into(&mut clean, entry)?;
        }
        std::fs::write(&self.path, &clean).map_err(|source| WalError::Write {
            path: self.path.clone(),
            source,
        })?;
        self.pending.clear();
        self.file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|source| WalError::Open {
                path: self.path.clone(),
                source,
            })?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "wal_proptests.rs"]
mod proptests;
