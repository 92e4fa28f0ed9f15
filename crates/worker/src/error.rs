// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("wire error: {0}")]
    Wire(#[from] mr_wire::WireError),

    #[error("no reachable master among {0} configured")]
    NoReachableMaster(usize),

    #[error("map function failed: {0}")]
    Map(String),

    #[error("reduce function failed: {0}")]
    Reduce(String),

    #[error("missing intermediate file {0}")]
    MissingIntermediate(std::path::PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file at {path}: {source}")]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
