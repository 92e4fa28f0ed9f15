use super::*;
use tempfile::tempdir;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
struct State {
    counter: u64,
}

#[test]
fn round_trips_through_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.bin");

    let snapshot = Snapshot::new(42, State { counter: 7 }, 1_000);
    snapshot.write_to(&path).unwrap();

    let loaded: Snapshot<State> = Snapshot::read_from(&path).unwrap();
    assert_eq!(loaded.seq, 42);
    assert_eq!(loaded.state, State { counter: 7 });
}

#[test]
fn write_to_existing_path_rotates_previous_into_bak() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.bin");

    Snapshot::new(1, State { counter: 1 }, 1).write_to(&path).unwrap();
    Snapshot::new(2, State { counter: 2 }, 2).write_to(&path).unwrap();

    assert!(dir.path().join("snapshot.bin.bak").exists());
    let current: Snapshot<State> = Snapshot::read_from(&path).unwrap();
    assert_eq!(current.seq, 2);
}

#[test]
fn load_or_none_is_none_for_missing_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.bin");
    let loaded: Option<Snapshot<State>> = load_or_none(&missing).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn load_or_none_quarantines_corrupt_file_instead_of_failing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.bin");
    std::fs::write(&path, b"not a zstd frame").unwrap();

    let loaded: Option<Snapshot<State>> = load_or_none(&path).unwrap();
    assert!(loaded.is_none());
    assert!(dir.path().join("snapshot.bin.bak").exists());
}
