//! Magellan SpaceMouse packet decoder.
//!
//! Magellan packets are printable characters with no escape layer. Two
//! motion wire formats exist, selected by the mode command sent during
//! identification:
//!
//! - turbo/compressed (`c33`, the default): 14-byte payload, two 6-bit
//!   fields per axis offset by `0x800`, plus a trailing 12-bit additive
//!   checksum. A checksum mismatch is logged but the decoded values are
//!   still delivered — integrity is best-effort on this link.
//! - normal (`c32`): 24-byte payload, four 4-bit nibbles per axis offset
//!   by `0x8000`, no checksum.

use std::collections::VecDeque;

use tracing::{debug, warn};

use sixdof_types::{AXIS_COUNT, Event, button_edges};

use crate::error::{ProtocolError, ProtocolResult};

const COMPRESSED_MOTION_LEN: usize = 14;
const NORMAL_MOTION_LEN: usize = 24;
const KEY_PACKET_MIN_LEN: usize = 3;

/// Motion wire format the device was switched into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MagellanMode {
    /// Turbo/compressed 14-byte motion packets (`c33`).
    #[default]
    Compressed,
    /// Plain 24-byte nibble-packed motion packets (`c32`).
    Normal,
}

/// Stateful decoder for one open Magellan device.
#[derive(Debug)]
pub struct MagellanDecoder {
    mode: MagellanMode,
    keystate: u16,
    axes: [i32; AXIS_COUNT],
}

impl Default for MagellanDecoder {
    fn default() -> Self {
        Self::new(MagellanMode::Compressed)
    }
}

impl MagellanDecoder {
    pub fn new(mode: MagellanMode) -> Self {
        Self {
            mode,
            keystate: 0,
            axes: [0; AXIS_COUNT],
        }
    }

    pub fn mode(&self) -> MagellanMode {
        self.mode
    }

    /// Decode one framed packet, pushing resulting events onto `events`.
    pub fn parse_packet(
        &mut self,
        id: u8,
        payload: &[u8],
        events: &mut VecDeque<Event>,
    ) -> ProtocolResult<()> {
        match id {
            b'd' => self.parse_motion(payload, events),
            b'k' => self.parse_keys(payload, events),
            b'e' => {
                match payload.first().copied() {
                    Some(1) => {
                        let command = payload
                            .get(1..3)
                            .map(|c| String::from_utf8_lossy(c).into_owned())
                            .unwrap_or_default();
                        warn!(command, "magellan error: illegal command");
                    }
                    Some(2) => warn!("magellan error: framing error"),
                    _ => warn!("magellan error: unknown device error"),
                }
                Ok(())
            }
            other => {
                debug!(id = %(other as char), len = payload.len(), "unrecognized magellan packet");
                Ok(())
            }
        }
    }

    fn parse_motion(&mut self, data: &[u8], events: &mut VecDeque<Event>) -> ProtocolResult<()> {
        let expected = match self.mode {
            MagellanMode::Compressed => COMPRESSED_MOTION_LEN,
            MagellanMode::Normal => NORMAL_MOTION_LEN,
        };
        if data.len() != expected {
            return Err(ProtocolError::InvalidLength {
                packet: 'd',
                expected,
                actual: data.len(),
            });
        }

        let mut changed = false;
        match self.mode {
            MagellanMode::Compressed => {
                let mut sum: u32 = 0;
                for axis in 0..AXIS_COUNT {
                    let offset = axis * 2;
                    let hi = u32::from(data[offset] & 0x3F);
                    let lo = u32::from(data[offset + 1] & 0x3F);
                    let value = (hi << 6 | lo) as i32 - 0x800;
                    sum += u32::from(data[offset]) + u32::from(data[offset + 1]);
                    if value != self.axes[axis] {
                        self.axes[axis] = value;
                        changed = true;
                    }
                }
                let received =
                    u32::from(data[12] & 0x3F) << 6 | u32::from(data[13] & 0x3F);
                if sum != received {
                    // Best-effort integrity: report it, keep the values.
                    warn!(
                        expected = received,
                        computed = sum,
                        "magellan motion checksum mismatch"
                    );
                }
            }
            MagellanMode::Normal => {
                for axis in 0..AXIS_COUNT {
                    let offset = axis * 4;
                    let mut value: i32 = 0;
                    for nibble in 0..4 {
                        value = value << 4 | i32::from(data[offset + nibble] & 0xF);
                    }
                    let value = value - 0x8000;
                    if value != self.axes[axis] {
                        self.axes[axis] = value;
                        changed = true;
                    }
                }
            }
        }

        if changed {
            events.push_back(Event::Motion {
                axes: self.axes,
                period: 0,
            });
        }
        Ok(())
    }

    fn parse_keys(&mut self, data: &[u8], events: &mut VecDeque<Event>) -> ProtocolResult<()> {
        if data.len() < KEY_PACKET_MIN_LEN {
            return Err(ProtocolError::TruncatedPacket {
                packet: 'k',
                minimum: KEY_PACKET_MIN_LEN,
                actual: data.len(),
            });
        }

        // One 4-bit lane per byte; the fourth byte is optional (extended
        // key mode on newer firmware).
        let mut keystate = u16::from(data[0] & 0xF)
            | u16::from(data[1] & 0xF) << 4
            | u16::from(data[2] & 0xF) << 8;
        if let Some(&extra) = data.get(3) {
            keystate |= u16::from(extra & 0xF) << 12;
        }

        if keystate != self.keystate {
            for (index, pressed) in
                button_edges(u64::from(self.keystate), u64::from(keystate))
            {
                events.push_back(Event::Button { index, pressed });
            }
            self.keystate = keystate;
        }
        Ok(())
    }
}
