use super::*;
use tempfile::tempdir;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
struct Cmd {
    label: String,
}

fn cmd(label: &str) -> Cmd {
    Cmd {
        label: label.to_string(),
    }
}

#[test]
fn append_assigns_increasing_seq() {
    let dir = tempdir().unwrap();
    let mut wal: Wal<Cmd> = Wal::open(dir.path().join("wal.log"), 0).unwrap();

    assert_eq!(wal.append(cmd("a")).unwrap(), 1);
    assert_eq!(wal.append(cmd("b")).unwrap(), 2);
    assert_eq!(wal.write_seq(), 2);
}

#[test]
fn append_is_buffered_until_flush() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");
    let mut wal: Wal<Cmd> = Wal::open(&path, 0).unwrap();

    wal.append(cmd("a")).unwrap();
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);

    wal.flush().unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn next_unprocessed_drains_without_requiring_flush() {
    let dir = tempdir().unwrap();
    let mut wal: Wal<Cmd> = Wal::open(dir.path().join("wal.log"), 0).unwrap();

    wal.append(cmd("a")).unwrap();
    wal.append(cmd("b")).unwrap();

    assert_eq!(wal.next_unprocessed().unwrap().record, cmd("a"));
    assert_eq!(wal.next_unprocessed().unwrap().record, cmd("b"));
    assert!(wal.next_unprocessed().is_none());
}

#[test]
fn mark_processed_is_independent_of_read_cursor() {
    let dir = tempdir().unwrap();
    let mut wal: Wal<Cmd> = Wal::open(dir.path().join("wal.log"), 0).unwrap();

    wal.append(cmd("a")).unwrap();
    wal.flush().unwrap();
    let entry = wal.next_unprocessed().unwrap();

    assert_eq!(wal.processed_seq(), 0);
    wal.mark_processed(entry.seq);
    assert_eq!(wal.processed_seq(), 1);
}

#[test]
fn entries_after_does_not_advance_read_cursor() {
    let dir = tempdir().unwrap();
    let mut wal: Wal<Cmd> = Wal::open(dir.path().join("wal.log"), 0).unwrap();

    wal.append(cmd("a")).unwrap();
    wal.append(cmd("b")).unwrap();
    wal.append(cmd("c")).unwrap();

    let suffix = wal.entries_after(1);
    assert_eq!(suffix.len(), 2);
    assert_eq!(suffix[0].record, cmd("b"));

    // next_unprocessed should still start from the top.
    assert_eq!(wal.next_unprocessed().unwrap().record, cmd("a"));
}

#[test]
fn reopen_with_processed_seq_resumes_read_cursor_there() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");
    {
        let mut wal: Wal<Cmd> = Wal::open(&path, 0).unwrap();
        wal.append(cmd("a")).unwrap();
        wal.append(cmd("b")).unwrap();
        wal.append(cmd("c")).unwrap();
        wal.flush().unwrap();
    }

    let mut wal: Wal<Cmd> = Wal::open(&path, 2).unwrap();
    assert_eq!(wal.write_seq(), 3);
    let next = wal.next_unprocessed().unwrap();
    assert_eq!(next.seq, 3);
    assert_eq!(next.record, cmd("c"));
    assert!(wal.next_unprocessed().is_none());
}

#[test]
fn truncate_before_drops_older_entries_in_memory_and_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");
    let mut wal: Wal<Cmd> = Wal::open(&path, 0).unwrap();
    wal.append(cmd("a")).unwrap();
    wal.append(cmd("b")).unwrap();
    wal.append(cmd("c")).unwrap();
    wal.flush().unwrap();

    wal.truncate_before(2).unwrap();

    let remaining = wal.entries_after(0);
    assert_eq!(remaining.len(), 2);
    assert_eq!(remaining[0].seq, 2);

    let reopened: Wal<Cmd> = Wal::open(&path, 0).unwrap();
    assert_eq!(reopened.entries_after(0).len(), 2);
}

#[test]
fn needs_flush_once_threshold_count_is_crossed() {
    let dir = tempdir().unwrap();
    let mut wal: Wal<Cmd> = Wal::open(dir.path().join("wal.log"), 0).unwrap();

    assert!(!wal.needs_flush());
    for i in 0..FLUSH_THRESHOLD_COUNT {
        wal.append(cmd(&format!("entry-{i}"))).unwrap();
    }
    assert!(wal.needs_flush());

    wal.flush().unwrap();
    assert!(!wal.needs_flush());
}

#[test]
fn open_corrupt_wal_creates_bak_and_preserves_valid_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");

    let mut good = Vec::new();
    Wal::<Cmd>::encode_into(&mut good, &WalEntry { seq: 1, record: cmd("a") }).unwrap();
    Wal::<Cmd>::encode_into(&mut good, &WalEntry { seq: 2, record: cmd("b") }).unwrap();
    good.extend_from_slice(b"not-valid-json\n");
    std::fs::write(&path, &good).unwrap();

    let wal: Wal<Cmd> = Wal::open(&path, 0).unwrap();

    assert_eq!(wal.write_seq(), 2);
    assert_eq!(wal.entries_after(0).len(), 2);
    assert!(dir.path().join("wal.log.bak").exists());
}

#[test]
fn repeated_corruption_rotates_bak_generations_and_caps_at_three() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");

    for _ in 0..5 {
        std::fs::write(&path, b"\xff\xfe not json at all").unwrap();
        let wal: Wal<Cmd> = Wal::open(&path, 0).unwrap();
        assert_eq!(wal.write_seq(), 0);
    }

    assert!(dir.path().join("wal.log.bak").exists());
    assert!(dir.path().join("wal.log.bak.2").exists());
    assert!(dir.path().join("wal.log.bak.3").exists());
    assert!(!dir.path().join("wal.log.bak.4").exists());
}

#[test]
fn reopening_a_clean_wal_does_not_create_a_bak() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.log");
    {
        let mut wal: Wal<Cmd> = Wal::open(&path, 0).unwrap();
        wal.append(cmd("a")).unwrap();
        wal.flush().unwrap();
    }

    let _wal: Wal<Cmd> = Wal::open(&path, 0).unwrap();
    assert!(!dir.path().join("wal.log.bak").exists());
}
