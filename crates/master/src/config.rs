// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Master configuration (§10.4): a TOML file named by `MAPREDUCE_CONFIG`,
//! with a handful of env var overrides for container deployments where
//! editing a file on disk is awkward. Built once at startup and handed
//! around by reference — no global state.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use mr_core::MasterId;
use mr_core::defaults;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// This replica's id within `peers`.
    pub id: String,
    /// Every master in the group, including this one, by id. This replica
    /// listens on `peers[&id]` — one config file is shared across every
    /// replica in a deployment, distinguished only by `id`.
    pub peers: BTreeMap<String, SocketAddr>,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    #[serde(default = "defaults_task_timeout_map_ms")]
    pub task_timeout_map_ms: u64,
    #[serde(default = "defaults_task_timeout_reduce_ms")]
    pub task_timeout_reduce_ms: u64,
    #[serde(default = "defaults_worker_liveness_window_ms")]
    pub worker_liveness_window_ms: u64,
    #[serde(default = "defaults_reaper_interval_ms")]
    pub reaper_interval_ms: u64,
    #[serde(default = "defaults_job_timeout_ms")]
    pub job_timeout_ms: u64,
    #[serde(default = "defaults_max_attempts")]
    pub max_attempts: u32,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn defaults_task_timeout_map_ms() -> u64 {
    defaults::TASK_TIMEOUT_MAP_MS
}
fn defaults_task_timeout_reduce_ms() -> u64 {
    defaults::TASK_TIMEOUT_REDUCE_MS
}
fn defaults_worker_liveness_window_ms() -> u64 {
    defaults::WORKER_LIVENESS_WINDOW_MS
}
fn defaults_reaper_interval_ms() -> u64 {
    defaults::REAPER_INTERVAL_MS
}
fn defaults_job_timeout_ms() -> u64 {
    defaults::JOB_TIMEOUT_MS
}
fn defaults_max_attempts() -> u32 {
    defaults::MAX_ATTEMPTS
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("this replica's id {id:?} is not present in the configured peers table")]
    UnknownId { id: String },
}

impl Config {
    /// Loads from the path named by `MAPREDUCE_CONFIG`, then applies
    /// `LOG_LEVEL`/`LOG_FILE` env var overrides on top.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let path = std::env::var("MAPREDUCE_CONFIG").unwrap_or_else(|_| "mapreduce.toml".to_string());
        Self::load(Path::new(&path))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
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

    pub fn self_id(&self) -> MasterId {
        MasterId::new(self.id.clone())
    }

    /// This replica's listen address, looked up in `peers` by `id`.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.peers.get(&self.id).copied().ok_or_else(|| ConfigError::UnknownId { id: self.id.clone() })
    }

    pub fn peer_ids(&self) -> Vec<MasterId> {
        self.peers
            .keys()
            .filter(|peer| *peer != &self.id)
            .map(|peer| MasterId::new(peer.clone()))
            .collect()
    }

    pub fn peer_addr(&self, id: &MasterId) -> Option<SocketAddr> {
        self.peers.get(id.as_str()).copied()
    }

    pub fn wal_path(&self) -> PathBuf {
        self.data_dir.join("consensus.wal")
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join("jsm.snapshot")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.data_dir.join("master.lock")
    }
}
