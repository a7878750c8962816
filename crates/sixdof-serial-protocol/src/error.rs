//! Serial protocol error types.
//!
//! Malformed packets are diagnostics, not terminal conditions: callers log
//! the error and keep decoding from the next packet.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("invalid '{packet}' packet length: expected {expected}, got {actual}")]
    InvalidLength {
        packet: char,
        expected: usize,
        actual: usize,
    },

    #[error("'{packet}' packet shorter than minimum {minimum}, got {actual}")]
    TruncatedPacket {
        packet: char,
        minimum: usize,
        actual: usize,
    },
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
