// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `mapreduce` binary (§6): starts this process as either a master
//! replica or a worker. Additional roles from the original tool
//! (`dashboard`, `elect-leader`) are external to the engine and are not
//! reproduced here — `elect-leader` in particular never performed a real
//! election in the source it was distilled from, so carrying it forward
//! would misrepresent the consensus layer this binary actually runs (§9).

mod logging;

use clap::{Parser, Subcommand};
use mr_cli::commands;

#[derive(Parser)]
#[command(name = "mapreduce", about = "Fault-tolerant MapReduce coordination plane and worker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start as master replica `id`, optionally submitting a job over `files`.
    Master {
        /// This replica's id within the configured `peers` table.
        id: String,
        /// Comma-separated input files for the job this replica should
        /// submit once it becomes leader. Pass an empty string to run a
        /// pure standby replica that never submits a job itself.
        #[arg(default_value = "")]
        files: String,
    },
    /// Start as a worker, pulling and executing tasks until the job completes.
    Worker,
}

fn main() {
    let cli = Cli::parse();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_file = std::env::var("LOG_FILE").ok().map(std::path::PathBuf::from);
    let _logging_guard = logging::init(log_level.as_deref(), log_file.as_deref());

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to start the async runtime: {err}");
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(async move {
        match cli.command {
            Commands::Master { id, files } => commands::master::run(id, files).await,
            Commands::Worker => commands::worker::run().await,
        }
    });

    if let Err(err) = result {
        eprintln!("fatal: {err:#}");
        std::process::exit(1);
    }
}
