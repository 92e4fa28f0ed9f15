// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node roles (§4.1): every replica is a Follower, Candidate, or Leader.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Follower,
    Candidate,
    Leader,
}

impl Default for NodeRole {
    fn default() -> Self {
        Self::Follower
    }
}

mr_core::simple_display! {
    NodeRole {
        Follower => "follower",
        Candidate => "candidate",
        Leader => "leader",
    }
}
