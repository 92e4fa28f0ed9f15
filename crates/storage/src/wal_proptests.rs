use proptest::prelude::*;
use tempfile::tempdir;

use crate::wal::Wal;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
struct Record(u32);

proptest! {
    /// Appending N records, flushing, then reopening always yields the same
    /// suffix back — replay is idempotent regardless of flush cadence.
    #[test]
    fn replay_after_reopen_matches_appended_order(values in proptest::collection::vec(any::<u32>(), 0..64)) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wal.log");
        {
            let mut wal: Wal<Record> = Wal::open(&path, 0).unwrap();
            for v in &values {
                wal.append(Record(*v)).unwrap();
            }
            wal.flush().unwrap();
        }

        let wal: Wal<Record> = Wal::open(&path, 0).unwrap();
        let replayed: Vec<u32> = wal.entries_after(0).into_iter().map(|e| e.record.0).collect();
        prop_assert_eq!(replayed, values);
    }

    /// Truncating a garbage tail onto an otherwise-valid log never loses a
    /// valid record and never panics, however the corruption is shaped.
    #[test]
    fn corrupt_tail_of_any_shape_preserves_valid_prefix(
        values in proptest::collection::vec(any::<u32>(), 1..16),
        garbage in proptest::collection::vec(any::<u8>(), 0..32),
    ) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wal.log");
        {
            let mut wal: Wal<Record> = Wal::open(&path, 0).unwrap();
            for v in &values {
                wal.append(Record(*v)).unwrap();
            }
            wal.flush().unwrap();
        }

        let mut bytes = std::fs::read(&path).unwrap();
        bytes.extend_from_slice(&garbage);
        std::fs::write(&path, &bytes).unwrap();

        let wal: Wal<Record> = Wal::open(&path, 0).unwrap();
        let recovered: Vec<u32> = wal.entries_after(0).into_iter().map(|e| e.record.0).collect();
        prop_assert_eq!(recovered, values);
    }
}
