//! Carriage-return packet framing over a bounded input buffer.

use tracing::warn;

/// Capacity of the serial input buffer.
pub const INPUT_BUFFER_CAPACITY: usize = 256;

const DELIMITER: u8 = b'\r';

/// Accumulates raw serial bytes and extracts `\r`-delimited packets.
///
/// Each packet is the byte sequence between delimiters: the first byte is
/// the packet-type id, the rest is the payload handed to the family
/// decoder. Unconsumed bytes (the suffix after the last delimiter) are
/// compacted to the front of the buffer between calls.
///
/// If the buffer fills without a delimiter, the framer makes one
/// best-effort decode attempt on the raw contents and then discards them
/// so the stream can make progress; the loss is logged.
#[derive(Debug)]
pub struct PacketFramer {
    buf: [u8; INPUT_BUFFER_CAPACITY],
    len: usize,
}

impl Default for PacketFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketFramer {
    pub fn new() -> Self {
        Self {
            buf: [0; INPUT_BUFFER_CAPACITY],
            len: 0,
        }
    }

    /// Bytes currently buffered and not yet resolved into a packet.
    pub fn buffered(&self) -> usize {
        self.len
    }

    /// Feed newly received bytes, invoking `on_packet(id, payload)` for
    /// every complete packet found. Never blocks; returns once `bytes` is
    /// exhausted.
    pub fn feed(&mut self, mut bytes: &[u8], mut on_packet: impl FnMut(u8, &[u8])) {
        loop {
            let space = INPUT_BUFFER_CAPACITY - self.len;
            let take = bytes.len().min(space);
            if let (Some(dst), Some(src)) = (
                self.buf.get_mut(self.len..self.len + take),
                bytes.get(..take),
            ) {
                dst.copy_from_slice(src);
            }
            self.len += take;
            bytes = bytes.get(take..).unwrap_or_default();

            self.scan(&mut on_packet);

            if self.len == INPUT_BUFFER_CAPACITY {
                // Full buffer with no delimiter: force one decode attempt
                // on what we have, then drop it to make room.
                warn!(
                    buffered = self.len,
                    "input buffer full with no delimiter; forcing a decode \
                     attempt and discarding the buffer"
                );
                if let Some((&id, payload)) = self.buf.split_first() {
                    on_packet(id, payload);
                }
                self.len = 0;
            }

            if bytes.is_empty() {
                return;
            }
        }
    }

    /// Extract every complete packet and compact the remainder.
    fn scan(&mut self, on_packet: &mut impl FnMut(u8, &[u8])) {
        let mut start = 0;
        let mut cursor = 0;
        while cursor < self.len {
            if self.buf.get(cursor).copied() == Some(DELIMITER) {
                if let Some(packet) = self.buf.get(start..cursor) {
                    // Empty segments (consecutive delimiters) carry nothing.
                    if let Some((&id, payload)) = packet.split_first() {
                        on_packet(id, payload);
                    }
                }
                start = cursor + 1;
            }
            cursor += 1;
        }

        if start > 0 {
            self.buf.copy_within(start..self.len, 0);
            self.len -= start;
        }
    }
}
