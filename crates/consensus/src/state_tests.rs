use super::*;
use mr_core::MasterId;

fn id(s: &str) -> NodeId {
    MasterId::new(s)
}

#[test]
fn single_node_cluster_commits_immediately_on_propose() {
    let mut state = ConsensusState::new(id("a"), vec![]);
    state.start_election();
    state.record_vote_reply(id("a"), RequestVoteReply { term: 1, vote_granted: true });
    assert!(state.is_leader());

    let index = state.propose(b"cmd-1".to_vec()).unwrap();
    assert_eq!(index, 1);
    assert_eq!(state.commit_index(), 1);

    let committed = state.take_committed();
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0].command, b"cmd-1");
}

#[test]
fn propose_on_non_leader_is_rejected() {
    let mut state = ConsensusState::new(id("a"), vec![id("b"), id("c")]);
    let err = state.propose(b"cmd".to_vec()).unwrap_err();
    assert_eq!(err, ProposeError::NotLeader(None));
}

#[test]
fn candidate_becomes_leader_once_quorum_of_votes_is_in() {
    let mut state = ConsensusState::new(id("a"), vec![id("b"), id("c")]);
    state.start_election();
    assert_eq!(state.role(), NodeRole::Candidate);

    state.record_vote_reply(id("b"), RequestVoteReply { term: 1, vote_granted: true });
    assert!(state.is_leader(), "2 of 3 votes (self + b) should be quorum");
}

#[test]
fn single_vote_is_not_quorum_in_a_three_node_cluster() {
    let mut state = ConsensusState::new(id("a"), vec![id("b"), id("c")]);
    state.start_election();
    // Only self-vote counted so far (implicit); no peer reply yet.
    assert_eq!(state.role(), NodeRole::Candidate);
}

#[test]
fn higher_term_in_a_vote_reply_steps_a_leader_down() {
    let mut state = ConsensusState::new(id("a"), vec![id("b")]);
    state.start_election();
    state.record_vote_reply(id("b"), RequestVoteReply { term: 1, vote_granted: true });
    assert!(state.is_leader());

    state.record_vote_reply(id("b"), RequestVoteReply { term: 5, vote_granted: false });
    assert_eq!(state.role(), NodeRole::Follower);
    assert_eq!(state.current_term(), 5);
}

#[test]
fn request_vote_rejects_a_stale_term() {
    let mut state = ConsensusState::new(id("a"), vec![id("b")]);
    state.start_election(); // term 1
    state.start_election(); // term 2

    let reply = state.handle_request_vote(&RequestVoteArgs {
        term: 1,
        candidate_id: id("b"),
        last_log_index: 0,
        last_log_term: 0,
    });
    assert!(!reply.vote_granted);
    assert_eq!(reply.term, 2);
}

#[test]
fn request_vote_denies_a_second_candidate_in_the_same_term() {
    let mut state = ConsensusState::new(id("a"), vec![id("b"), id("c")]);
    let first = state.handle_request_vote(&RequestVoteArgs {
        term: 1,
        candidate_id: id("b"),
        last_log_index: 0,
        last_log_term: 0,
    });
    assert!(first.vote_granted);

    let second = state.handle_request_vote(&RequestVoteArgs {
        term: 1,
        candidate_id: id("c"),
        last_log_index: 0,
        last_log_term: 0,
    });
    assert!(!second.vote_granted);
}

#[test]
fn request_vote_denies_a_candidate_with_a_stale_log() {
    let mut state = ConsensusState::new(id("a"), vec![]);
    state.start_election();
    state.record_vote_reply(id("a"), RequestVoteReply { term: 1, vote_granted: true });
    state.propose(b"cmd".to_vec()).unwrap();
    assert_eq!(state.last_log_index(), 1);

    let reply = state.handle_request_vote(&RequestVoteArgs {
        term: 2,
        candidate_id: id("b"),
        last_log_index: 0,
        last_log_term: 0,
    });
    assert!(!reply.vote_granted);
}

#[test]
fn append_entries_from_current_leader_extends_the_follower_log() {
    let mut follower = ConsensusState::new(id("b"), vec![id("a")]);
    let reply = follower.handle_append_entries(&AppendEntriesArgs {
        term: 1,
        leader_id: id("a"),
        prev_log_index: 0,
        prev_log_term: 0,
        entries: vec![LogRecord { term: 1, command: b"x".to_vec() }],
        leader_commit: 1,
    });
    assert!(reply.success);
    assert_eq!(follower.last_log_index(), 1);
    assert_eq!(follower.commit_index(), 1);
    assert_eq!(follower.leader_hint(), Some(&id("a")));
}

#[test]
fn append_entries_rejects_a_gap_and_reports_a_conflict_index() {
    let mut follower = ConsensusState::new(id("b"), vec![id("a")]);
    let reply = follower.handle_append_entries(&AppendEntriesArgs {
        term: 1,
        leader_id: id("a"),
        prev_log_index: 5,
        prev_log_term: 1,
        entries: vec![],
        leader_commit: 0,
    });
    assert!(!reply.success);
    assert_eq!(reply.conflict_index, Some(0));
}

#[test]
fn append_entries_truncates_a_conflicting_suffix_before_appending() {
    let mut follower = ConsensusState::new(id("b"), vec![id("a")]);
    follower.handle_append_entries(&AppendEntriesArgs {
        term: 1,
        leader_id: id("a"),
        prev_log_index: 0,
        prev_log_term: 0,
        entries: vec![
            LogRecord { term: 1, command: b"a".to_vec() },
            LogRecord { term: 1, command: b"b-stale".to_vec() },
        ],
        leader_commit: 0,
    });

    // New leader (term 2) overwrites index 2 with a different entry.
    let reply = follower.handle_append_entries(&AppendEntriesArgs {
        term: 2,
        leader_id: id("c"),
        prev_log_index: 1,
        prev_log_term: 1,
        entries: vec![LogRecord { term: 2, command: b"b-new".to_vec() }],
        leader_commit: 2,
    });
    assert!(reply.success);
    assert_eq!(follower.last_log_index(), 2);
}

#[test]
fn leader_commits_once_a_majority_has_replicated_current_term_entry() {
    let mut leader = ConsensusState::new(id("a"), vec![id("b"), id("c")]);
    leader.start_election();
    leader.record_vote_reply(id("b"), RequestVoteReply { term: 1, vote_granted: true });
    assert!(leader.is_leader());

    leader.propose(b"cmd".to_vec()).unwrap();
    assert_eq!(leader.commit_index(), 0, "no quorum replication yet");

    leader.record_append_entries_reply(
        id("b"),
        1,
        AppendEntriesReply { term: 1, success: true, conflict_index: None },
    );
    assert_eq!(leader.commit_index(), 1, "leader + b is a quorum of 3");
}

#[test]
fn leader_backs_off_next_index_on_a_rejected_append_entries() {
    let mut leader = ConsensusState::new(id("a"), vec![id("b")]);
    leader.start_election();
    leader.record_vote_reply(id("b"), RequestVoteReply { term: 1, vote_granted: true });
    leader.propose(b"x".to_vec()).unwrap();

    let before = leader.replication_request_for(&id("b"));
    assert_eq!(before.prev_log_index, 0);

    leader.record_append_entries_reply(
        id("b"),
        1,
        AppendEntriesReply { term: 1, success: false, conflict_index: Some(0) },
    );
    let retried = leader.replication_request_for(&id("b"));
    assert_eq!(retried.prev_log_index, 0);
    assert_eq!(retried.entries.len(), 1);
}
