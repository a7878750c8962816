//! Device-layer error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    #[error("invalid device selector {0:?}, expected \"vvvv:pppp\" hex USB ids")]
    InvalidSelector(String),

    #[error("device did not answer any identification probe")]
    NotRecognized,

    #[error("device disconnected")]
    Disconnected,

    #[error("failed to read from device: {0}")]
    ReadError(String),

    #[error("failed to write to device: {0}")]
    WriteError(String),

    #[error("operation not supported by this device")]
    Unsupported,

    #[error("device handle is closed")]
    Closed,

    #[error("HID error: {0}")]
    Hid(#[from] hidapi::HidError),

    #[error(transparent)]
    HidProtocol(#[from] sixdof_hid_protocol::HidProtocolError),
}

pub type DeviceResult<T> = Result<T, DeviceError>;
