// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker configuration (§10.4): the same `MAPREDUCE_CONFIG` TOML file and
//! `peers` table the master group reads, so one file describes the whole
//! cluster; a worker just never listens, it only dials out.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use mr_core::defaults;

use crate::error::ConfigError;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct WorkerConfig {
    /// Every master in the group, by id, so this worker can rotate through
    /// them on leader discovery (§4.4 step 1).
    pub peers: BTreeMap<String, SocketAddr>,
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    #[serde(default = "defaults_rpc_timeout_ms")]
    pub rpc_timeout_ms: u64,
    #[serde(default = "defaults_retry_backoff_floor_ms")]
    pub retry_backoff_floor_ms: u64,
    #[serde(default = "defaults_retry_backoff_cap_ms")]
    pub retry_backoff_cap_ms: u64,

    /// Mirrors the master's own task deadlines, used only to size this
    /// worker's heartbeat interval while a task is in flight (§4.4 step 4).
    #[serde(default = "defaults_task_timeout_map_ms")]
    pub task_timeout_map_ms: u64,
    #[serde(default = "defaults_task_timeout_reduce_ms")]
    pub task_timeout_reduce_ms: u64,
}

fn default_working_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn defaults_rpc_timeout_ms() -> u64 {
    defaults::RPC_TIMEOUT_MS
}
fn defaults_retry_backoff_floor_ms() -> u64 {
    defaults::RETRY_BACKOFF_FLOOR_MS
}
fn defaults_retry_backoff_cap_ms() -> u64 {
    defaults::RETRY_BACKOFF_CAP_MS
}
fn defaults_task_timeout_map_ms() -> u64 {
    defaults::TASK_TIMEOUT_MAP_MS
}
fn defaults_task_timeout_reduce_ms() -> u64 {
    defaults::TASK_TIMEOUT_REDUCE_MS
}

impl WorkerConfig {
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let path = std::env::var("MAPREDUCE_CONFIG").unwrap_or_else(|_| "mapreduce.toml".to_string());
        Self::load(Path::new(&path))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.log_level = Some(level);
        }
        if let Ok(file) = std::env::var("LOG_FILE") {
            self.log_file = Some(PathBuf::from(file));
        }
    }
}
