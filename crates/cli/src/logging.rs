// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured logging setup (§6, §10.4): `tracing` + `tracing-subscriber`
//! with an `EnvFilter` driven by `LOG_LEVEL`, and an optional
//! `tracing-appender` file sink named by `LOG_FILE`. Called exactly once,
//! at process startup, before any other component runs.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Guard that must be held for the lifetime of the process when logging to
/// a file — dropping it stops the background writer thread.
pub struct LoggingGuard(#[allow(dead_code)] Option<tracing_appender::non_blocking::WorkerGuard>);

pub fn init(log_level: Option<&str>, log_file: Option<&std::path::Path>) -> LoggingGuard {
    let filter = log_level
        .map(str::to_ascii_lowercase)
        .and_then(|level| EnvFilter::try_new(level).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("mapreduce.log"));
            let file_appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            LoggingGuard(Some(guard))
        }
        None => {
            tracing_subscriber::registry().with(filter).with(fmt::layer()).init();
            LoggingGuard(None)
        }
    }
}
