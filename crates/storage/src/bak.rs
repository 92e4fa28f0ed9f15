// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared `.bak` generation rotation used by both the WAL and snapshot files.
//!
//! Keeps at most [`MAX_BAK_GENERATIONS`] prior corrupt/superseded copies
//! around a path: `foo.bak` is the newest, `foo.bak.3` the oldest, anything
//! older than that is dropped on the floor.

use std::path::{Path, PathBuf};

pub const MAX_BAK_GENERATIONS: u32 = 3;

pub fn bak_path(path: &Path, generation: u32) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    if generation > 1 {
        name.push(format!(".{generation}"));
    }
    PathBuf::from(name)
}

/// Shifts any existing `.bak[.N]` chain up by one generation, dropping the
/// oldest, then renames `path` into the now-vacant `.bak` slot.
pub fn rotate_in(path: &Path) -> std::io::Result<()> {
    for generation in (1..=MAX_BAK_GENERATIONS).rev() {
        let from = bak_path(path, generation);
        if !from.exists() {
            continue;
        }
        if generation == MAX_BAK_GENERATIONS {
            std::fs::remove_file(&from)?;
            continue;
        }
        let to = bak_path(path, generation + 1);
        std::fs::rename(&from, &to)?;
    }
    std::fs::rename(path, bak_path(path, 1))
}
