//! USB HID protocol support for 3Dconnexion-family 6DoF controllers.
//!
//! This crate is intentionally I/O-free: it provides the (vendor, product)
//! device catalog, the two input-report decoders used across the catalog,
//! and builders for the output/feature reports the devices accept. All
//! parsing operates on byte slices handed in by the transport layer.
//!
//! Two report layouts exist. Older devices send translation and rotation
//! as two separate 7-byte reports (sub-type 1 and 2); newer ones send all
//! six axes in a single 13-byte report (sub-type 1). Button reports
//! (sub-type 3) are identical in both layouts: six bytes of per-bit
//! levels, up to 48 buttons.

#![deny(static_mut_refs)]

pub mod error;
pub mod ids;
pub mod input;
pub mod output;

pub use error::{HidProtocolError, HidProtocolResult};
pub use ids::{
    LOGITECH_VENDOR_ID, ReportLayout, SPACEPILOT_PRODUCT_ID, THREEDCONNEXION_VENDOR_ID,
    UsbDeviceInfo, is_known_vendor, lookup_device,
};
pub use input::{
    AXIS_DEADZONE, AXIS_MAX, AXIS_MIN, BUTTON_REPORT_LEN, COMBINED_REPORT_LEN, MAX_USB_BUTTONS,
    ReportDecoder, SPLIT_REPORT_LEN, report_ids,
};
pub use output::{
    LCD_COLUMNS, LCD_DATA_MAX_COLUMNS, LCD_ROWS, LED_REPORT_LEN, build_lcd_backlight_report,
    build_lcd_data_report, build_lcd_packed_report, build_lcd_position_report, build_led_report,
    lcd_report_ids,
};
