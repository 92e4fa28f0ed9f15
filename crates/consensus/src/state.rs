// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure Raft state transitions (§4.1).
//!
//! Deliberately free of I/O, `tokio`, and wall-clock reads: every method
//! here is a total function of `(state, input) -> (state, output)`, which
//! is what makes the replicated job state machine itself (`mr-jsm`)
//! trustworthy — the same safety argument applies one layer down, to the
//! log that carries its commands. [`crate::node::ConsensusNode`] is the
//! thin async shell that drives this with real timers and a real
//! transport.

use std::collections::HashMap;

use crate::role::NodeRole;
use crate::rpc::{AppendEntriesArgs, AppendEntriesReply, RequestVoteArgs, RequestVoteReply};
use crate::types::{CommittedEntry, LogIndex, LogRecord, NodeId, Term};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProposeError {
    #[error("not the leader; last known leader is {0:?}")]
    NotLeader(Option<NodeId>),
}

pub struct ConsensusState {
    id: NodeId,
    peers: Vec<NodeId>,

    role: NodeRole,
    current_term: Term,
    voted_for: Option<NodeId>,
    leader_hint: Option<NodeId>,

    /// 1-indexed: `log[0]` is entry at index 1.
    log: Vec<LogRecord>,
    commit_index: LogIndex,
    last_applied: LogIndex,

    votes_received: Vec<NodeId>,
    next_index: HashMap<NodeId, LogIndex>,
    match_index: HashMap<NodeId, LogIndex>,
}

impl ConsensusState {
    pub fn new(id: NodeId, peers: Vec<NodeId>) -> Self {
        Self {
            id,
            peers,
            role: NodeRole::Follower,
            current_term: 0,
            voted_for: None,
            leader_hint: None,
            log: Vec::new(),
            commit_index: 0,
            last_applied: 0,
            votes_received: Vec::new(),
            next_index: HashMap::new(),
            match_index: HashMap::new(),
        }
    }

    /// Rehydrates from a durable WAL replay plus an optional snapshot cursor.
    /// `entries` must be contiguous starting at index 1.
    pub fn restore(id: NodeId, peers: Vec<NodeId>, entries: Vec<LogRecord>, commit_index: LogIndex) -> Self {
        let mut state = Self::new(id, peers);
        state.log = entries;
        state.commit_index = commit_index.min(state.log.len() as LogIndex);
        state
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    pub fn current_term(&self) -> Term {
        self.current_term
    }

    pub fn leader_hint(&self) -> Option<&NodeId> {
        self.leader_hint.as_ref()
    }

    pub fn commit_index(&self) -> LogIndex {
        self.commit_index
    }

    pub fn last_applied(&self) -> LogIndex {
        self.last_applied
    }

    pub fn is_leader(&self) -> bool {
        self.role == NodeRole::Leader
    }

    pub fn last_log_index(&self) -> LogIndex {
        self.log.len() as LogIndex
    }

    /// The full in-memory log, 1-indexed. Used by the durable layer to
    /// resync its on-disk copy after a truncating `AppendEntries`.
    pub fn log_entries(&self) -> &[LogRecord] {
        &self.log
    }

    pub fn last_log_term(&self) -> Term {
        self.log.last().map(|e| e.term).unwrap_or(0)
    }

    fn term_at(&self, index: LogIndex) -> Term {
        if index == 0 {
            return 0;
        }
        self.log.get(index as usize - 1).map(|e| e.term).unwrap_or(0)
    }

    fn step_down_if_stale(&mut self, their_term: Term) {
        if their_term > self.current_term {
            self.current_term = their_term;
            self.voted_for = None;
            self.role = NodeRole::Follower;
        }
    }

    /// Candidate's log is at least as up to date as ours (§5.4.1 Raft paper).
    fn log_is_up_to_date(&self, last_log_index: LogIndex, last_log_term: Term) -> bool {
        match last_log_term.cmp(&self.last_log_term()) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => last_log_index >= self.last_log_index(),
        }
    }

    pub fn handle_request_vote(&mut self, args: &RequestVoteArgs) -> RequestVoteReply {
        self.step_down_if_stale(args.term);

        if args.term < self.current_term {
            return RequestVoteReply {
                term: self.current_term,
                vote_granted: false,
            };
        }

        let can_vote = match &self.voted_for {
            None => true,
            Some(candidate) => candidate == &args.candidate_id,
        };

        let grant = can_vote && self.log_is_up_to_date(args.last_log_index, args.last_log_term);
        if grant {
            self.voted_for = Some(args.candidate_id.clone());
        }

        RequestVoteReply {
            term: self.current_term,
            vote_granted: grant,
        }
    }

    pub fn handle_append_entries(&mut self, args: &AppendEntriesArgs) -> AppendEntriesReply {
        self.step_down_if_stale(args.term);

        if args.term < self.current_term {
            return AppendEntriesReply {
                term: self.current_term,
                success: false,
                conflict_index: None,
            };
        }

        // A valid leader for our term; follow it even from Candidate.
        self.role = NodeRole::Follower;
        self.leader_hint = Some(args.leader_id.clone());

        if args.prev_log_index > 0 {
            let consistent = args.prev_log_index <= self.last_log_index()
                && self.term_at(args.prev_log_index) == args.prev_log_term;
            if !consistent {
                return AppendEntriesReply {
                    term: self.current_term,
                    success: false,
                    conflict_index: Some(self.last_log_index().min(args.prev_log_index)),
                };
            }
        }

        self.log.truncate(args.prev_log_index as usize);
        self.log.extend(args.entries.iter().cloned());

        if args.leader_commit > self.commit_index {
            self.commit_index = args.leader_commit.min(self.last_log_index());
        }

        AppendEntriesReply {
            term: self.current_term,
            success: true,
            conflict_index: None,
        }
    }

    pub fn record_vote_reply(&mut self, from: NodeId, reply: RequestVoteReply) {
        self.step_down_if_stale(reply.term);
        if self.role != NodeRole::Candidate || reply.term != self.current_term || !reply.vote_granted {
            return;
        }
        if !self.votes_received.contains(&from) {
            self.votes_received.push(from);
        }
        if self.has_quorum(self.votes_received.len() + 1) {
            self.become_leader();
        }
    }

    fn has_quorum(&self, count: usize) -> bool {
        let cluster_size = self.peers.len() + 1;
        count * 2 > cluster_size
    }

    /// Begins a new election: bumps the term, votes for self, and returns
    /// the `RequestVoteArgs` to broadcast to every peer.
    ///
    /// A single-replica group has no peer to grant it a majority, so the
    /// self-vote alone already satisfies `has_quorum` — check immediately
    /// rather than waiting on a `record_vote_reply` that will never come.
    pub fn start_election(&mut self) -> RequestVoteArgs {
        self.current_term += 1;
        self.role = NodeRole::Candidate;
        self.voted_for = Some(self.id.clone());
        self.leader_hint = None;
        self.votes_received.clear();

        if self.has_quorum(1) {
            self.become_leader();
        }

        RequestVoteArgs {
            term: self.current_term,
            candidate_id: self.id.clone(),
            last_log_index: self.last_log_index(),
            last_log_term: self.last_log_term(),
        }
    }

    fn become_leader(&mut self) {
        self.role = NodeRole::Leader;
        self.leader_hint = Some(self.id.clone());
        let next = self.last_log_index() + 1;
        self.next_index = self.peers.iter().map(|p| (p.clone(), next)).collect();
        self.match_index = self.peers.iter().map(|p| (p.clone(), 0)).collect();
        if self.peers.is_empty() {
            self.advance_commit_index();
        }
    }

    /// Appends `command` to the leader's log at the current term. Single-node
    /// clusters commit immediately since there is no quorum to wait on.
    pub fn propose(&mut self, command: Vec<u8>) -> Result<LogIndex, ProposeError> {
        if !self.is_leader() {
            return Err(ProposeError::NotLeader(self.leader_hint.clone()));
        }
        self.log.push(LogRecord {
            term: self.current_term,
            command,
        });
        let index = self.last_log_index();
        if self.peers.is_empty() {
            self.advance_commit_index();
        }
        Ok(index)
    }

    /// What an `AppendEntries` RPC to `peer` should currently carry.
    pub fn replication_request_for(&self, peer: &NodeId) -> AppendEntriesArgs {
        let next = *self.next_index.get(peer).unwrap_or(&(self.last_log_index() + 1));
        let prev_log_index = next.saturating_sub(1);
        let prev_log_term = self.term_at(prev_log_index);
        let entries = self
            .log
            .get(prev_log_index as usize..)
            .map(|s| s.to_vec())
            .unwrap_or_default();

        AppendEntriesArgs {
            term: self.current_term,
            leader_id: self.id.clone(),
            prev_log_index,
            prev_log_term,
            entries,
            leader_commit: self.commit_index,
        }
    }

    /// Folds a follower's reply to an `AppendEntries` RPC back into
    /// `next_index`/`match_index`, then recomputes the commit index.
    pub fn record_append_entries_reply(&mut self, peer: NodeId, sent_up_to: LogIndex, reply: AppendEntriesReply) {
        self.step_down_if_stale(reply.term);
        if !self.is_leader() || reply.term != self.current_term {
            return;
        }

        if reply.success {
            self.match_index.insert(peer.clone(), sent_up_to);
            self.next_index.insert(peer, sent_up_to + 1);
            self.advance_commit_index();
        } else {
            let retry_from = reply
                .conflict_index
                .unwrap_or_else(|| self.next_index.get(&peer).copied().unwrap_or(1).saturating_sub(1));
            self.next_index.insert(peer, retry_from.max(1));
        }
    }

    /// Raft §5.3/§5.4: a leader may only commit by counting replicas of an
    /// entry from its *own* current term, to avoid the Figure 8 hazard of
    /// re-committing a prior leader's uncommitted, overwritten entry.
    fn advance_commit_index(&mut self) {
        let mut match_indices: Vec<LogIndex> = self.match_index.values().copied().collect();
        match_indices.push(self.last_log_index()); // our own match index
        match_indices.sort_unstable_by(|a, b| b.cmp(a));

        let quorum_size = (self.peers.len() + 1) / 2 + 1;
        let candidate = match_indices.get(quorum_size - 1).copied().unwrap_or(0);

        if candidate > self.commit_index && self.term_at(candidate) == self.current_term {
            self.commit_index = candidate;
        }
    }

    /// Drains newly committed entries for application to the state machine.
    pub fn take_committed(&mut self) -> Vec<CommittedEntry> {
        let mut out = Vec::new();
        while self.last_applied < self.commit_index {
            let index = self.last_applied + 1;
            if let Some(entry) = self.log.get(index as usize - 1) {
                out.push(CommittedEntry {
                    index,
                    term: entry.term,
                    command: entry.command.clone(),
                });
            }
            self.last_applied = index;
        }
        out
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
