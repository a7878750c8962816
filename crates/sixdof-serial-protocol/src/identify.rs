//! Identification handshake constants and firmware-string heuristics.
//!
//! The handshake itself (writes, bounded reads) is driven by the device
//! layer; this module owns the exact command byte strings and the logic
//! that maps a returned version string to a catalog model.

use std::time::Duration;

use tracing::warn;

use crate::catalog::SerialModel;

/// Reset / version query sent first; Spaceballs answer with a `@1` banner.
pub const RESET_COMMAND: &[u8] = b"\r@RESET\r";

/// Substring of the reset response that marks a Spaceball-family device.
pub const SPACEBALL_RESPONSE_PREAMBLE: &str = "\r@1";

/// Spaceball setup: binary mode (`CB`), auto data packets (`MSSV`), and an
/// immediate key report (`k`) so a 2.42 device can migrate to 12 buttons
/// before clients attach.
pub const SPACEBALL_INIT_COMMANDS: &[u8] = b"\rCB\rMSSV\rk\r";

/// Magellan version query; the response starts with `v`.
pub const MAGELLAN_VERSION_QUERY: &[u8] = b"vQ\r";

/// Magellan setup: 3D mode, no dominant axis, motion+button pass-through,
/// extended keys, turbo/compressed wire format.
pub const MAGELLAN_MODE_COMPRESSED: &[u8] = b"c33\r";

/// Same as [`MAGELLAN_MODE_COMPRESSED`] without the compressed wire format.
pub const MAGELLAN_MODE_NORMAL: &[u8] = b"c32\r";

/// How long to wait for the reset banner after powering the line.
pub const RESET_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// How long to wait for the Magellan version response.
pub const MAGELLAN_PROBE_TIMEOUT: Duration = Duration::from_millis(250);

const FIRMWARE_MARKER: &str = "Firmware version";

/// Map a device version string to a catalog model.
///
/// Spaceballs report `"Firmware version <major>.<minor>"`; known 2.x minors
/// select a model directly. Firmware 2.42 is shared by the Spaceball 2003C
/// and the 4000FLX, so it resolves to
/// [`SerialModel::Spaceball2003C`] and is migrated at runtime by the
/// decoder on the first `.` packet. Strings without a recognized firmware
/// number fall back to product-name substrings; anything else is reported
/// as unknown and decoded with generic 16-button semantics.
pub fn guess_model(version: &str) -> SerialModel {
    if let Some(pos) = version.find(FIRMWARE_MARKER) {
        let tail = version
            .get(pos + FIRMWARE_MARKER.len()..)
            .unwrap_or_default();
        if let Some((major, minor)) = parse_version_number(tail) {
            if major == 2 {
                match minor {
                    35 | 62 | 63 => return SerialModel::Spaceball3003,
                    43 | 45 => return SerialModel::Spaceball4000,
                    2 | 13 | 15 => return SerialModel::Spaceball2003,
                    42 => return SerialModel::Spaceball2003C,
                    _ => {}
                }
            }
        }
    }

    if version.contains("MAGELLAN") {
        return SerialModel::MagellanSpaceMouse;
    }
    if version.contains("SPACEBALL") {
        return SerialModel::Spaceball5000;
    }
    if version.contains("CadMan") {
        return SerialModel::CadMan;
    }
    if version.contains("SpaceExplorer") {
        return SerialModel::SpaceExplorer;
    }

    warn!(
        version,
        "unknown serial device; decoding with generic 16-button semantics, \
         please report the version string so it can be added to the catalog"
    );
    SerialModel::Unknown
}

/// Parse `"<major>.<minor>"` after the firmware marker, skipping leading
/// whitespace.
fn parse_version_number(tail: &str) -> Option<(u32, u32)> {
    let tail = tail.trim_start();
    let (major_str, rest) = tail.split_once('.')?;
    let major: u32 = major_str.parse().ok()?;
    let minor_str: String = rest.chars().take_while(char::is_ascii_digit).collect();
    let minor: u32 = minor_str.parse().ok()?;
    Some((major, minor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_firmware_2_43_is_sb4000() {
        let model = guess_model("@1 Spaceball alive and well. Firmware version 2.43 etc");
        assert_eq!(model, SerialModel::Spaceball4000);
    }

    #[test]
    fn test_firmware_2_42_starts_as_sb2003c() {
        let model = guess_model("@1 Firmware version 2.42 created whenever");
        assert_eq!(model, SerialModel::Spaceball2003C);
    }

    #[test]
    fn test_firmware_2_62_is_sb3003() {
        assert_eq!(
            guess_model("Firmware version 2.62"),
            SerialModel::Spaceball3003
        );
    }

    #[test]
    fn test_firmware_2_13_is_sb2003() {
        assert_eq!(
            guess_model("Firmware version 2.13"),
            SerialModel::Spaceball2003
        );
    }

    #[test]
    fn test_unknown_minor_falls_back_to_substrings() {
        assert_eq!(
            guess_model("Firmware version 2.99 SPACEBALL 5000"),
            SerialModel::Spaceball5000
        );
    }

    #[test]
    fn test_magellan_banner() {
        assert_eq!(
            guess_model("vQ MAGELLAN Version 6.70"),
            SerialModel::MagellanSpaceMouse
        );
    }

    #[test]
    fn test_cadman_banner() {
        assert_eq!(guess_model("CadMan thing"), SerialModel::CadMan);
    }

    #[test]
    fn test_space_explorer_banner() {
        assert_eq!(guess_model("SpaceExplorer"), SerialModel::SpaceExplorer);
    }

    #[test]
    fn test_garbage_is_unknown() {
        assert_eq!(guess_model("hello world"), SerialModel::Unknown);
    }

    #[test]
    fn test_truncated_version_number() {
        assert_eq!(guess_model("Firmware version 2."), SerialModel::Unknown);
        assert_eq!(guess_model("Firmware version"), SerialModel::Unknown);
    }
}
