// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reduce task execution (§4.6).

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write as _};
use std::path::Path;

use mr_core::artifact;

use crate::error::WorkerError;
use crate::format::read_records;

/// Runs the user `Reduce` function over partition `partition`'s
/// intermediate files from every Map task, and atomically publishes the
/// final output file.
pub fn run_reduce(
    working_dir: &Path,
    partition: u32,
    n_map: usize,
    attempt: u32,
    reduce_fn: &(dyn Fn(&str, &[String]) -> String + Send + Sync),
) -> Result<(), WorkerError> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for map_index in 0..n_map {
        let name = artifact::intermediate_name(map_index, partition);
        let path = working_dir.join(&name);
        let file = File::open(&path).map_err(|_| WorkerError::MissingIntermediate(path.clone()))?;
        let mut reader = BufReader::new(file);
        for (key, value) in read_records(&mut reader)? {
            grouped.entry(key).or_default().push(value);
        }
    }

    let final_name = artifact::output_name(partition);
    let temp_name = artifact::temp_name(&final_name, attempt);
    let temp_path = working_dir.join(&temp_name);

    {
        let mut writer = BufWriter::new(File::create(&temp_path)?);
        for (key, values) in &grouped {
            let reduced = reduce_fn(key, values);
            writeln!(writer, "{key}\t{reduced}")?;
        }
        writer.flush()?;
    }
    fs::rename(&temp_path, working_dir.join(&final_name))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::write_record;
    use tempfile::tempdir;

    fn sum_reduce(_key: &str, values: &[String]) -> String {
        values.len().to_string()
    }

    #[test]
    fn groups_values_by_key_across_every_map_partition_and_writes_the_final_file() {
        let dir = tempdir().unwrap();

        let mut m0 = std::fs::File::create(dir.path().join("mr-0-0")).unwrap();
        write_record(&mut m0, "the", "1").unwrap();
        write_record(&mut m0, "cat", "1").unwrap();
        drop(m0);

        let mut m1 = std::fs::File::create(dir.path().join("mr-1-0")).unwrap();
        write_record(&mut m1, "the", "1").unwrap();
        drop(m1);

        run_reduce(dir.path(), 0, 2, 1, &sum_reduce).unwrap();

        let output = std::fs::read_to_string(dir.path().join("mr-out-0")).unwrap();
        assert!(output.contains("the\t2\n"));
        assert!(output.contains("cat\t1\n"));
    }

    #[test]
    fn a_missing_intermediate_file_fails_the_task_rather_than_silently_omitting_it() {
        let dir = tempdir().unwrap();
        let err = run_reduce(dir.path(), 0, 1, 1, &sum_reduce).unwrap_err();
        assert!(matches!(err, WorkerError::MissingIntermediate(_)));
    }
}
