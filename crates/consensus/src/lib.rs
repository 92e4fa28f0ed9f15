// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! mr-consensus: the replicated log underneath the master group (§4.1).
//!
//! [`state::ConsensusState`] is the pure Raft-family step function; a
//! [`node::ConsensusNode`] wraps it with a durable `mr-storage::Wal`, a
//! pluggable [`transport::Transport`], and the background election and
//! heartbeat tasks. Nothing here knows a command is a MapReduce task
//! assignment — that's `mr-jsm`'s job once an entry is committed.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod node;
pub mod role;
pub mod rpc;
pub mod state;
pub mod transport;
pub mod types;

pub use node::ConsensusNode;
pub use role::NodeRole;
pub use rpc::{AppendEntriesArgs, AppendEntriesReply, RequestVoteArgs, RequestVoteReply};
pub use state::{ConsensusState, ProposeError};
pub use transport::{Transport, TransportError};
pub use types::{CommittedEntry, LogIndex, LogRecord, NodeId, Term};
