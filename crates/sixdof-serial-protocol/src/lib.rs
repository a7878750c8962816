//! Serial protocol decoding for Spaceball and Magellan 6DoF controllers.
//!
//! This crate is intentionally I/O-free: it operates on byte slices handed
//! in by whatever owns the serial line, and produces typed
//! [`sixdof_types::Event`] values. It covers the device catalog and
//! firmware-string identification heuristics, the carriage-return packet
//! framer, and one packet decoder per device family.
//!
//! The two families share a wire shape (one-byte packet id, payload,
//! `0x0D` terminator) but nothing else: Spaceball packets are escaped
//! binary with big-endian axis words, Magellan packets are printable
//! characters carrying 6- or 4-bit fields.

#![deny(static_mut_refs)]

pub mod catalog;
pub mod error;
pub mod framer;
pub mod identify;
pub mod magellan;
pub mod spaceball;

pub use catalog::{SerialModel, SerialModelInfo, model_info, serial_keymask};
pub use error::{ProtocolError, ProtocolResult};
pub use framer::{INPUT_BUFFER_CAPACITY, PacketFramer};
pub use identify::{
    MAGELLAN_MODE_COMPRESSED, MAGELLAN_MODE_NORMAL, MAGELLAN_PROBE_TIMEOUT,
    MAGELLAN_VERSION_QUERY, RESET_COMMAND, RESET_PROBE_TIMEOUT, SPACEBALL_INIT_COMMANDS,
    SPACEBALL_RESPONSE_PREAMBLE, guess_model,
};
pub use magellan::{MagellanDecoder, MagellanMode};
pub use spaceball::{SpaceballDecoder, decode_escapes};
