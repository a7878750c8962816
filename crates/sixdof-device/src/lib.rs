//! Device handles for serial and USB 6DoF controllers.
//!
//! [`DeviceHandle`] ties a transport to the right protocol decoder and
//! exposes a uniform surface: non-blocking event reads, device metadata
//! (axes, buttons, names), and the optional capabilities some models
//! have (LED, SpacePilot LCD). USB devices are discovered and opened
//! through hidapi; serial devices are identified on a line the caller
//! opens and hands in as a [`SerialTransport`].
//!
//! Transports are traits with scripted mock implementations in
//! [`transport::mock`], so everything above the wire is testable without
//! hardware.

#![deny(static_mut_refs)]

pub mod error;
pub mod handle;
pub mod hid;
pub mod transport;

pub use error::{DeviceError, DeviceResult};
pub use handle::DeviceHandle;
pub use hid::{HidApiTransport, parse_usb_selector};
pub use transport::{HidTransport, SerialTransport};
