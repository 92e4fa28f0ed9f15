// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `mapreduce worker` (§6): runs this process as a worker, executing the
//! built-in word-count Map/Reduce until the job completes.

use mr_worker::{Worker, WorkerConfig};

use crate::wordcount;

pub async fn run() -> anyhow::Result<()> {
    let config = WorkerConfig::load_from_env()?;
    let worker = Worker::new(config, Box::new(wordcount::map), Box::new(wordcount::reduce));
    worker.run().await?;
    Ok(())
}
