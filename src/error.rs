//! Error types for the vibrato engine and its parameter store.
//!
//! Only configuration and persistence can fail at runtime. Out-of-range
//! parameter values are clamped rather than rejected, and misuse of the
//! engine (processing before `prepare()`, too many channels) panics.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VibratoError {
    #[error("invalid sample rate: {0} Hz (must be finite and > 0)")]
    InvalidSampleRate(f32),

    #[error("invalid maximum block size: {0} samples (must be > 0)")]
    InvalidBlockSize(usize),

    #[error("invalid channel count: {0} (must be > 0)")]
    InvalidChannelCount(usize),

    #[error("unknown parameter id: {0:?}")]
    UnknownParameter(String),

    #[error("malformed plugin state: {0}")]
    State(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VibratoError>;
