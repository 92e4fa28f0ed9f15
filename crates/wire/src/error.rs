// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("i/o error on wire transport: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed frame: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("frame length {len} exceeds the {max} byte limit")]
    FrameTooLarge { len: u32, max: u32 },

    #[error("connection closed before a full frame arrived")]
    ConnectionClosed,
}
