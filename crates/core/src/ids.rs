// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifiers used throughout the coordination plane.

crate::define_id! {
    /// Unique identifier for a job run.
    ///
    /// A new job replaces any prior job once the prior job reaches a
    /// terminal phase (`Done` or `Failed`); the id distinguishes runs in
    /// logs and in `ReportTask` replies that arrive after the job they
    /// targeted has already been superseded.
    pub struct JobId("job-");
}

/// Identifier for a worker process.
///
/// Unlike [`JobId`], a `WorkerId` is not centrally generated: each worker
/// mints its own on startup (host + pid + random suffix is the reference
/// scheme) and presents it on every RPC. The master never validates its
/// shape, only its uniqueness as a map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct WorkerId(pub String);

impl WorkerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a worker id from the local hostname, pid, and a random suffix.
    pub fn generate() -> Self {
        let host = hostname();
        Self(format!("{host}-{}-{}", std::process::id(), nanoid::nanoid!(6)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn hostname() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| {
            std::fs::read_to_string("/etc/hostname").ok().map(|s| s.trim().to_string())
        })
        .unwrap_or_else(|| "worker".to_string())
}

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WorkerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WorkerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::borrow::Borrow<str> for WorkerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Identifier for a master replica, as configured at process start (§4.1).
///
/// Masters are statically configured, so this is simply the peer's index
/// or name in the membership list, not a randomly generated id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct MasterId(pub String);

impl MasterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MasterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MasterId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MasterId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
