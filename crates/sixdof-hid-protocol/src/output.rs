//! Output and feature report builders.
//!
//! The LED report goes out as a plain output report. The SpacePilot LCD
//! commands are feature reports; the transport layer decides which write
//! path to use. Builders only produce bytes, they never touch a device.

use crate::error::{HidProtocolError, HidProtocolResult};

/// LED output report length: report ID plus one state byte.
pub const LED_REPORT_LEN: usize = 2;

const LED_REPORT_ID: u8 = 0x04;

/// SpacePilot LCD feature report IDs.
pub mod lcd_report_ids {
    /// Set the write position (row, column) for subsequent data.
    pub const POSITION: u8 = 0x0C;
    /// Raw column data, up to seven 8-pixel-tall columns per report.
    pub const DATA: u8 = 0x0D;
    /// Run-length packed column data, three count/pattern pairs.
    pub const PACKED: u8 = 0x0E;
    /// Backlight control.
    pub const BACKLIGHT: u8 = 0x10;
}

/// LCD width in columns.
pub const LCD_COLUMNS: u8 = 240;

/// LCD height in rows of 8 vertically-packed pixels.
pub const LCD_ROWS: u8 = 8;

/// Columns a single [`lcd_report_ids::DATA`] report can carry.
pub const LCD_DATA_MAX_COLUMNS: usize = 7;

/// Build the LED on/off output report.
pub fn build_led_report(on: bool) -> [u8; LED_REPORT_LEN] {
    [LED_REPORT_ID, u8::from(on)]
}

/// Build the position feature report. Subsequent data reports fill
/// columns left to right starting here.
pub fn build_lcd_position_report(column: u8, row: u8) -> HidProtocolResult<[u8; 3]> {
    if column >= LCD_COLUMNS || row >= LCD_ROWS {
        return Err(HidProtocolError::PositionOutOfRange { column, row });
    }
    Ok([lcd_report_ids::POSITION, row, column])
}

/// Build a raw data feature report from up to seven column bytes.
/// Each byte is one column, LSB at the top. Short payloads are padded
/// with zero columns; the report is always eight bytes on the wire.
pub fn build_lcd_data_report(columns: &[u8]) -> HidProtocolResult<[u8; 8]> {
    if columns.len() > LCD_DATA_MAX_COLUMNS {
        return Err(HidProtocolError::DataTooLong {
            max: LCD_DATA_MAX_COLUMNS,
            actual: columns.len(),
        });
    }
    let mut report = [0u8; 8];
    report[0] = lcd_report_ids::DATA;
    report[1..1 + columns.len()].copy_from_slice(columns);
    Ok(report)
}

/// Build a packed (run-length) data feature report. Each pair is
/// (repeat count, column pattern); unused pairs should be (0, 0).
pub fn build_lcd_packed_report(pairs: [(u8, u8); 3]) -> [u8; 7] {
    [
        lcd_report_ids::PACKED,
        pairs[0].0,
        pairs[0].1,
        pairs[1].0,
        pairs[1].1,
        pairs[2].0,
        pairs[2].1,
    ]
}

/// Build the backlight feature report. The firmware wants 0x00 for on
/// and 0x02 for off.
pub fn build_lcd_backlight_report(on: bool) -> [u8; 2] {
    [lcd_report_ids::BACKLIGHT, if on { 0x00 } else { 0x02 }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_led_report() {
        assert_eq!(build_led_report(true), [0x04, 0x01]);
        assert_eq!(build_led_report(false), [0x04, 0x00]);
    }

    #[test]
    fn test_position_report() {
        assert_eq!(
            build_lcd_position_report(0, 0).expect("in range"),
            [0x0C, 0, 0]
        );
        assert_eq!(
            build_lcd_position_report(239, 7).expect("in range"),
            [0x0C, 7, 239]
        );
    }

    #[test]
    fn test_position_out_of_range() {
        assert_eq!(
            build_lcd_position_report(240, 0),
            Err(HidProtocolError::PositionOutOfRange { column: 240, row: 0 })
        );
        assert_eq!(
            build_lcd_position_report(0, 8),
            Err(HidProtocolError::PositionOutOfRange { column: 0, row: 8 })
        );
    }

    #[test]
    fn test_data_report_pads_short_payloads() {
        let report = build_lcd_data_report(&[0xFF, 0x81]).expect("fits");
        assert_eq!(report, [0x0D, 0xFF, 0x81, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_data_report_rejects_overflow() {
        let err = build_lcd_data_report(&[0; 8]).expect_err("too long");
        assert_eq!(err, HidProtocolError::DataTooLong { max: 7, actual: 8 });
    }

    #[test]
    fn test_packed_report() {
        let report = build_lcd_packed_report([(240, 0x00), (0, 0), (0, 0)]);
        assert_eq!(report, [0x0E, 240, 0x00, 0, 0, 0, 0]);
    }

    #[test]
    fn test_backlight_report() {
        assert_eq!(build_lcd_backlight_report(true), [0x10, 0x00]);
        assert_eq!(build_lcd_backlight_report(false), [0x10, 0x02]);
    }
}
