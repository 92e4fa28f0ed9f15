// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Intermediate artifact record format (§6): a sequence of
//! `[key_len:u32 BE][key][val_len:u32 BE][val]` records, EOF-terminated.
//!
//! Distinct from `mr-wire`'s RPC frames: this is the Map→Reduce handoff
//! format written to and read from local files, never sent over the wire.

use std::io::{Read, Write};

use crate::error::WorkerError;

/// Appends one `(key, value)` record to `writer`.
pub fn write_record(writer: &mut impl Write, key: &str, value: &str) -> Result<(), WorkerError> {
    writer.write_all(&(key.len() as u32).to_be_bytes())?;
    writer.write_all(key.as_bytes())?;
    writer.write_all(&(value.len() as u32).to_be_bytes())?;
    writer.write_all(value.as_bytes())?;
    Ok(())
}

/// Reads every `(key, value)` record from `reader` until EOF.
pub fn read_records(reader: &mut impl Read) -> Result<Vec<(String, String)>, WorkerError> {
    let mut records = Vec::new();
    loop {
        let mut len_buf = [0u8; 4];
        match reader.read_exact(&mut len_buf) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(err) => return Err(err.into()),
        }
        let key = read_len_prefixed(reader, u32::from_be_bytes(len_buf))?;

        reader.read_exact(&mut len_buf)?;
        let value = read_len_prefixed(reader, u32::from_be_bytes(len_buf))?;

        records.push((key, value));
    }
    Ok(records)
}

fn read_len_prefixed(reader: &mut impl Read, len: u32) -> Result<String, WorkerError> {
    let mut buf = vec![0u8; len as usize];
    reader.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|err| WorkerError::Reduce(format!("intermediate record is not valid utf-8: {err}")))
}
