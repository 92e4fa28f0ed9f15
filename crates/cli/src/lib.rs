// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! mr-cli: the `mapreduce` binary's reusable pieces, split out of
//! `src/main.rs` so integration tests can drive a master or worker process
//! in-process exactly as the binary does.

pub mod commands;
pub mod wordcount;
