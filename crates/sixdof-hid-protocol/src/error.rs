//! USB HID protocol error types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HidProtocolError {
    #[error("report too short: expected at least {expected}, got {actual}")]
    ReportTooShort { expected: usize, actual: usize },

    #[error("display position out of range: column {column}, row {row}")]
    PositionOutOfRange { column: u8, row: u8 },

    #[error("display data too long: at most {max} bytes per report, got {actual}")]
    DataTooLong { max: usize, actual: usize },
}

pub type HidProtocolResult<T> = Result<T, HidProtocolError>;
