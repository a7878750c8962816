//! Spaceball family packet decoder.
//!
//! Spaceball packets are escaped binary: the device replaces flow-control
//! bytes with two-byte `^x` sequences that must be undecoded before
//! parsing. Packet types:
//!
//! - `D` — motion: 2-byte period header plus six big-endian 16-bit axis
//!   words (14 decoded bytes).
//! - `K` — buttons on everything up to the 3003 (2 bytes).
//! - `.` — buttons on the 4000FLX/5000FLX-A (2 bytes); its first
//!   occurrence migrates an 8-button firmware-2.42 guess to 12 buttons.
//! - `E` — device-reported error, logged.
//! - `M`, `?` — mode-switch echo and unrecognized-command noise, ignored.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use sixdof_types::{AXIS_COUNT, Event, button_edges};

use crate::catalog::{SerialModel, model_info, serial_keymask};
use crate::error::{ProtocolError, ProtocolResult};

const MOTION_PACKET_LEN: usize = 14;
const KEY_PACKET_LEN: usize = 2;

/// Undo Spaceball escape sequences.
///
/// `^Q`, `^S`, `^M`, `^^` decode to `0x11`, `0x13`, `0x0D`, `^`. Any other
/// `^x` pair (including a trailing lone `^`) is invalid; it is logged and
/// dropped from the output. Input without `^` bytes passes through
/// unchanged, so decoding is idempotent on already-decoded data.
pub fn decode_escapes(raw: &[u8], decoded: &mut Vec<u8>) {
    decoded.clear();
    let mut iter = raw.iter().copied();
    while let Some(byte) = iter.next() {
        if byte != b'^' {
            decoded.push(byte);
            continue;
        }
        match iter.next() {
            Some(b'Q') => decoded.push(0x11),
            Some(b'S') => decoded.push(0x13),
            Some(b'M') => decoded.push(0x0D),
            Some(b'^') => decoded.push(b'^'),
            other => {
                warn!(escape = ?other, "ignoring invalid spaceball escape code");
            }
        }
    }
}

/// Stateful decoder for one open Spaceball device.
#[derive(Debug)]
pub struct SpaceballDecoder {
    model: SerialModel,
    keystate: u16,
    keymask: u16,
    sb4000: bool,
    axes: [i32; AXIS_COUNT],
    scratch: Vec<u8>,
}

impl SpaceballDecoder {
    pub fn new(model: SerialModel) -> Self {
        Self {
            model,
            keystate: 0,
            keymask: serial_keymask(model_info(model).button_count),
            sb4000: false,
            axes: [0; AXIS_COUNT],
            scratch: Vec::with_capacity(32),
        }
    }

    /// The current model, reflecting any runtime migration.
    pub fn model(&self) -> SerialModel {
        self.model
    }

    /// Decode one framed packet, pushing resulting events onto `events`.
    ///
    /// Malformed packets return an error for the caller to log; decoding
    /// state stays valid and the next packet is unaffected.
    pub fn parse_packet(
        &mut self,
        id: u8,
        payload: &[u8],
        events: &mut VecDeque<Event>,
    ) -> ProtocolResult<()> {
        let mut scratch = std::mem::take(&mut self.scratch);
        decode_escapes(payload, &mut scratch);
        let result = self.parse_decoded(id, &scratch, events);
        self.scratch = scratch;
        result
    }

    fn parse_decoded(
        &mut self,
        id: u8,
        data: &[u8],
        events: &mut VecDeque<Event>,
    ) -> ProtocolResult<()> {
        match id {
            b'D' => self.parse_motion(data, events),
            b'K' => self.parse_keys(data, events),
            b'.' => self.parse_sb4000_keys(data, events),
            b'E' => {
                warn!(packet = %format_bytes(data), "spaceball device error");
                Ok(())
            }
            // Mode-switch echoes and unrecognized-command noise.
            b'M' | b'?' => Ok(()),
            other => {
                debug!(
                    id = %(other as char),
                    packet = %format_bytes(data),
                    "unrecognized spaceball packet"
                );
                Ok(())
            }
        }
    }

    fn parse_motion(&mut self, data: &[u8], events: &mut VecDeque<Event>) -> ProtocolResult<()> {
        if data.len() != MOTION_PACKET_LEN {
            return Err(ProtocolError::InvalidLength {
                packet: 'D',
                expected: MOTION_PACKET_LEN,
                actual: data.len(),
            });
        }

        let period = u32::from(u16::from_be_bytes([data[0], data[1]]));

        let mut changed = false;
        for axis in 0..AXIS_COUNT {
            let offset = 2 + axis * 2;
            let value = i32::from(i16::from_be_bytes([data[offset], data[offset + 1]]));
            if value != self.axes[axis] {
                self.axes[axis] = value;
                changed = true;
            }
        }

        if changed {
            events.push_back(Event::Motion {
                axes: self.axes,
                period,
            });
        }
        Ok(())
    }

    fn parse_keys(&mut self, data: &[u8], events: &mut VecDeque<Event>) -> ProtocolResult<()> {
        if data.len() != KEY_PACKET_LEN {
            return Err(ProtocolError::InvalidLength {
                packet: 'K',
                expected: KEY_PACKET_LEN,
                actual: data.len(),
            });
        }
        // 4000-family devices report buttons via '.' packets; their 'K'
        // packets carry stale aliases and are dropped.
        if self.sb4000 {
            return Ok(());
        }

        // data[1] bits 0-3 -> buttons 0-3
        // data[1] bits 4,5 (3003 L/R) -> buttons 0,1
        // data[0] bits 0-2 -> buttons 4-6
        // data[0] bit 4 (2003 pick) -> button 7
        let d0 = u16::from(data[0]);
        let d1 = u16::from(data[1]);
        let keystate = ((d1 & 0xF) | (d1 >> 4 & 3) | ((d0 & 7) << 4) | ((d0 & 0x10) << 3))
            & self.keymask;
        self.push_key_edges(keystate, events);
        Ok(())
    }

    fn parse_sb4000_keys(
        &mut self,
        data: &[u8],
        events: &mut VecDeque<Event>,
    ) -> ProtocolResult<()> {
        if data.len() != KEY_PACKET_LEN {
            return Err(ProtocolError::InvalidLength {
                packet: '.',
                expected: KEY_PACKET_LEN,
                actual: data.len(),
            });
        }

        if !self.sb4000 {
            // Firmware 2.42 is shared between the 2003C and the 4000FLX;
            // the '.' packet type settles it. This migration is one-way.
            info!("switching to Spaceball 4000FLX/5000FLX-A mode (12 buttons)");
            self.sb4000 = true;
            self.model = SerialModel::Spaceball4000;
            self.keymask = serial_keymask(model_info(self.model).button_count);
        }

        // data[1] bits 0-5 -> buttons 0-5
        // data[1] bit 7 -> button 6
        // data[0] bits 0-4 -> buttons 7-11
        let d0 = u16::from(data[0]);
        let d1 = u16::from(data[1]);
        let keystate = (d1 & 0x3F) | ((d1 & 0x80) >> 1) | ((d0 & 0x1F) << 7);
        self.push_key_edges(keystate, events);
        Ok(())
    }

    fn push_key_edges(&mut self, keystate: u16, events: &mut VecDeque<Event>) {
        if keystate == self.keystate {
            return;
        }
        for (index, pressed) in button_edges(u64::from(self.keystate), u64::from(keystate)) {
            events.push_back(Event::Button { index, pressed });
        }
        self.keystate = keystate;
    }
}

fn format_bytes(data: &[u8]) -> String {
    data.iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                format!(" {}", b as char)
            } else {
                format!(" {b:02x}h")
            }
        })
        .collect()
}
