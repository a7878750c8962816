//! Input-report decoding.
//!
//! The decoder is stateful: split-layout devices report translation and
//! rotation independently, so the last known value of every axis is kept
//! and each motion report emits a full six-axis snapshot. Button reports
//! carry levels, not edges; the decoder diffs them against the previous
//! report and emits one event per changed button, lowest index first.

use std::collections::VecDeque;

use tracing::{debug, warn};

use sixdof_types::{button_edges, AXIS_COUNT, Event};

use crate::error::{HidProtocolError, HidProtocolResult};
use crate::ids::ReportLayout;

/// Report length for split-layout devices: ID byte plus three LE i16 axes.
pub const SPLIT_REPORT_LEN: usize = 7;

/// Report length for combined-layout devices: ID byte plus six LE i16 axes.
pub const COMBINED_REPORT_LEN: usize = 13;

/// Button report length: ID byte plus six bytes of button levels.
pub const BUTTON_REPORT_LEN: usize = 7;

/// Most buttons any button report can carry.
pub const MAX_USB_BUTTONS: usize = 48;

/// Documented axis range; values outside it are reported but not clamped.
pub const AXIS_MIN: i32 = -512;
pub const AXIS_MAX: i32 = 511;
pub const AXIS_DEADZONE: i32 = 0;

/// Input report IDs common to both layouts.
pub mod report_ids {
    /// Translation on split devices, all six axes on combined devices.
    pub const TRANSLATION: u8 = 0x01;
    /// Rotation; only sent by split-layout devices.
    pub const ROTATION: u8 = 0x02;
    /// Button levels, six bytes.
    pub const BUTTONS: u8 = 0x03;
}

/// Stateful decoder for one device's input reports.
#[derive(Debug, Clone)]
pub struct ReportDecoder {
    layout: ReportLayout,
    axes: [i32; AXIS_COUNT],
    buttons: u64,
}

impl ReportDecoder {
    pub fn new(layout: ReportLayout) -> Self {
        Self {
            layout,
            axes: [0; AXIS_COUNT],
            buttons: 0,
        }
    }

    pub fn layout(&self) -> ReportLayout {
        self.layout
    }

    /// Current button levels, bit N for button N.
    pub fn buttons(&self) -> u64 {
        self.buttons
    }

    /// Last reported value of every axis.
    pub fn axes(&self) -> [i32; AXIS_COUNT] {
        self.axes
    }

    /// Decode one raw input report, report ID in the first byte.
    ///
    /// Events are appended to `events`; a single report can produce zero
    /// events (no buttons changed) or several (multiple buttons changed).
    /// Reports with an unrecognized ID are logged and skipped.
    pub fn decode_report(
        &mut self,
        report: &[u8],
        events: &mut VecDeque<Event>,
    ) -> HidProtocolResult<()> {
        let (&id, payload) = report
            .split_first()
            .ok_or(HidProtocolError::ReportTooShort {
                expected: 1,
                actual: 0,
            })?;

        match (id, self.layout) {
            (report_ids::TRANSLATION, ReportLayout::Split) => {
                self.update_axes(report.len(), SPLIT_REPORT_LEN, payload, 0)?;
                events.push_back(Event::Motion {
                    axes: self.axes,
                    period: 0,
                });
            }
            (report_ids::ROTATION, ReportLayout::Split) => {
                self.update_axes(report.len(), SPLIT_REPORT_LEN, payload, 3)?;
                events.push_back(Event::Motion {
                    axes: self.axes,
                    period: 0,
                });
            }
            (report_ids::TRANSLATION, ReportLayout::Combined) => {
                self.update_axes(report.len(), COMBINED_REPORT_LEN, payload, 0)?;
                events.push_back(Event::Motion {
                    axes: self.axes,
                    period: 0,
                });
            }
            (report_ids::BUTTONS, _) => {
                self.update_buttons(report.len(), payload, events)?;
            }
            _ => {
                debug!(id, report = ?report, "ignoring unrecognized input report");
            }
        }
        Ok(())
    }

    fn update_axes(
        &mut self,
        report_len: usize,
        expected_len: usize,
        payload: &[u8],
        first_axis: usize,
    ) -> HidProtocolResult<()> {
        if report_len < expected_len {
            return Err(HidProtocolError::ReportTooShort {
                expected: expected_len,
                actual: report_len,
            });
        }
        let count = (expected_len - 1) / 2;
        for (i, chunk) in payload.chunks_exact(2).take(count).enumerate() {
            let value = i32::from(i16::from_le_bytes([chunk[0], chunk[1]]));
            if !(AXIS_MIN..=AXIS_MAX).contains(&value) {
                warn!(axis = first_axis + i, value, "axis value out of documented range");
            }
            self.axes[first_axis + i] = value;
        }
        Ok(())
    }

    fn update_buttons(
        &mut self,
        report_len: usize,
        payload: &[u8],
        events: &mut VecDeque<Event>,
    ) -> HidProtocolResult<()> {
        if report_len < BUTTON_REPORT_LEN {
            return Err(HidProtocolError::ReportTooShort {
                expected: BUTTON_REPORT_LEN,
                actual: report_len,
            });
        }
        // Byte-major, bit-minor: button N lives at byte N/8, bit N%8,
        // which is exactly a little-endian 48-bit integer.
        let mut levels = 0u64;
        for (i, &b) in payload.iter().take(MAX_USB_BUTTONS / 8).enumerate() {
            levels |= u64::from(b) << (8 * i);
        }

        for (index, pressed) in button_edges(self.buttons, levels) {
            events.push_back(Event::Button { index, pressed });
        }
        self.buttons = levels;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axes_report(id: u8, axes: &[i16]) -> Vec<u8> {
        let mut report = vec![id];
        for v in axes {
            report.extend_from_slice(&v.to_le_bytes());
        }
        report
    }

    #[test]
    fn test_split_translation_then_rotation() {
        let mut dec = ReportDecoder::new(ReportLayout::Split);
        let mut events = VecDeque::new();

        dec.decode_report(&axes_report(1, &[10, -20, 30]), &mut events)
            .expect("decode");
        assert_eq!(
            events.pop_front(),
            Some(Event::Motion {
                axes: [10, -20, 30, 0, 0, 0],
                period: 0,
            })
        );

        // Rotation keeps the translation half of the snapshot.
        dec.decode_report(&axes_report(2, &[-1, 2, -3]), &mut events)
            .expect("decode");
        assert_eq!(
            events.pop_front(),
            Some(Event::Motion {
                axes: [10, -20, 30, -1, 2, -3],
                period: 0,
            })
        );
    }

    #[test]
    fn test_combined_motion() {
        let mut dec = ReportDecoder::new(ReportLayout::Combined);
        let mut events = VecDeque::new();

        dec.decode_report(&axes_report(1, &[1, 2, 3, 4, 5, -6]), &mut events)
            .expect("decode");
        assert_eq!(
            events.pop_front(),
            Some(Event::Motion {
                axes: [1, 2, 3, 4, 5, -6],
                period: 0,
            })
        );
    }

    #[test]
    fn test_short_motion_report_rejected() {
        let mut dec = ReportDecoder::new(ReportLayout::Combined);
        let mut events = VecDeque::new();

        let err = dec
            .decode_report(&axes_report(1, &[1, 2, 3]), &mut events)
            .expect_err("short report");
        assert_eq!(
            err,
            HidProtocolError::ReportTooShort {
                expected: COMBINED_REPORT_LEN,
                actual: 7,
            }
        );
        assert!(events.is_empty());
        // State is untouched by the rejected report.
        assert_eq!(dec.axes(), [0; 6]);
    }

    #[test]
    fn test_button_edges_ascending() {
        let mut dec = ReportDecoder::new(ReportLayout::Split);
        let mut events = VecDeque::new();

        dec.decode_report(&[3, 0b101, 0, 0, 0, 0, 0], &mut events)
            .expect("decode");
        assert_eq!(
            events.drain(..).collect::<Vec<_>>(),
            vec![
                Event::Button { index: 0, pressed: true },
                Event::Button { index: 2, pressed: true },
            ]
        );

        // Release one, press another in the last byte.
        dec.decode_report(&[3, 0b001, 0, 0, 0, 0, 0x80], &mut events)
            .expect("decode");
        assert_eq!(
            events.drain(..).collect::<Vec<_>>(),
            vec![
                Event::Button { index: 2, pressed: false },
                Event::Button { index: 47, pressed: true },
            ]
        );
        assert_eq!(dec.buttons(), 1 | (1 << 47));
    }

    #[test]
    fn test_unchanged_buttons_emit_nothing() {
        let mut dec = ReportDecoder::new(ReportLayout::Combined);
        let mut events = VecDeque::new();

        dec.decode_report(&[3, 1, 0, 0, 0, 0, 0], &mut events)
            .expect("decode");
        events.clear();
        dec.decode_report(&[3, 1, 0, 0, 0, 0, 0], &mut events)
            .expect("decode");
        assert!(events.is_empty());
    }

    #[test]
    fn test_rotation_report_on_combined_is_ignored() {
        let mut dec = ReportDecoder::new(ReportLayout::Combined);
        let mut events = VecDeque::new();

        dec.decode_report(&axes_report(2, &[1, 2, 3]), &mut events)
            .expect("decode");
        assert!(events.is_empty());
    }

    #[test]
    fn test_unknown_report_id_is_ignored() {
        let mut dec = ReportDecoder::new(ReportLayout::Split);
        let mut events = VecDeque::new();

        dec.decode_report(&[0x17, 1, 2, 3, 4, 5, 6], &mut events)
            .expect("decode");
        assert!(events.is_empty());
    }

    #[test]
    fn test_empty_report_rejected() {
        let mut dec = ReportDecoder::new(ReportLayout::Split);
        let mut events = VecDeque::new();

        let err = dec.decode_report(&[], &mut events).expect_err("empty");
        assert_eq!(
            err,
            HidProtocolError::ReportTooShort {
                expected: 1,
                actual: 0,
            }
        );
    }

    #[test]
    fn test_out_of_range_axis_kept_verbatim() {
        let mut dec = ReportDecoder::new(ReportLayout::Combined);
        let mut events = VecDeque::new();

        dec.decode_report(&axes_report(1, &[700, -600, 0, 0, 0, 0]), &mut events)
            .expect("decode");
        assert_eq!(
            events.pop_front(),
            Some(Event::Motion {
                axes: [700, -600, 0, 0, 0, 0],
                period: 0,
            })
        );
    }
}
