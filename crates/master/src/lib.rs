// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! mr-master: the replicated coordination plane (§4, §6, §10.4).
//!
//! Every master runs the same stack: a [`mr_consensus::ConsensusNode`]
//! replicating a log of [`mr_jsm::Command`]s, a [`replica::Replica`]
//! applying committed entries to a [`mr_jsm::JsmState`], and an
//! [`rpc_server::RpcServer`] that answers both worker RPCs (leader only)
//! and peer consensus RPCs (every replica, every role). [`startup::startup`]
//! assembles the whole thing from a [`config::Config`].

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod job_timeout;
pub mod reaper;
pub mod replica;
pub mod rpc_server;
pub mod startup;
pub mod transport;
pub mod workers;

pub use config::Config;
pub use error::MasterError;
pub use replica::Replica;
pub use rpc_server::RpcServer;
pub use startup::{startup, MasterHandle};
pub use transport::TcpTransport;
pub use workers::WorkerRegistry;
