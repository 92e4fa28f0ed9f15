// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Map task execution (§4.5).

use std::fs::{self, File};
use std::io::{BufWriter, Write as _};
use std::path::Path;

use mr_core::artifact;

use crate::error::WorkerError;
use crate::format::write_record;

/// Runs the user `Map` function over `input_file`, partitions the
/// resulting pairs by `partition(key) mod n_reduce`, and atomically
/// publishes one intermediate artifact per partition.
pub fn run_map(
    working_dir: &Path,
    map_index: usize,
    input_file: &str,
    n_reduce: u32,
    attempt: u32,
    map_fn: &(dyn Fn(&str, &str) -> Vec<(String, String)> + Send + Sync),
) -> Result<(), WorkerError> {
    let content = fs::read_to_string(working_dir.join(input_file))?;
    let pairs = map_fn(input_file, &content);

    let mut buckets: Vec<Vec<(String, String)>> = (0..n_reduce).map(|_| Vec::new()).collect();
    for (key, value) in pairs {
        let partition = artifact::partition(&key, n_reduce) as usize;
        buckets[partition].push((key, value));
    }

    for (partition, records) in buckets.into_iter().enumerate() {
        let final_name = artifact::intermediate_name(map_index, partition as u32);
        let temp_name = artifact::temp_name(&final_name, attempt);
        let temp_path = working_dir.join(&temp_name);

        {
            let mut writer = BufWriter::new(File::create(&temp_path)?);
            for (key, value) in &records {
                write_record(&mut writer, key, value)?;
            }
            writer.flush()?;
        }
        fs::rename(&temp_path, working_dir.join(&final_name))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn word_count_map(_file: &str, content: &str) -> Vec<(String, String)> {
        content.split_whitespace().map(|word| (word.to_string(), "1".to_string())).collect()
    }

    #[test]
    fn partitions_pairs_across_every_reduce_bucket_and_publishes_under_final_names() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "the cat sat").unwrap();

        run_map(dir.path(), 0, "a.txt", 2, 1, &word_count_map).unwrap();

        assert!(dir.path().join("mr-0-0").exists());
        assert!(dir.path().join("mr-0-1").exists());
        assert!(!dir.path().join("mr-0-0.tmp-1").exists());
    }

    #[test]
    fn a_later_attempt_overwrites_the_earlier_one_under_the_same_final_name() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "the cat sat").unwrap();

        run_map(dir.path(), 0, "a.txt", 1, 1, &word_count_map).unwrap();
        run_map(dir.path(), 0, "a.txt", 1, 2, &word_count_map).unwrap();

        assert!(dir.path().join("mr-0-0").exists());
        assert!(!dir.path().join("mr-0-0.tmp-2").exists());
    }
}
