//! Encoding engines.
//!
//! The orchestrator only talks to [`EncodeEngine`]; `ffmpeg` produces real MP4 output and
//! `memory` is a deterministic stand-in for tests and dry runs.

pub(crate) mod adapter;
pub(crate) mod ffmpeg;
pub(crate) mod memory;
