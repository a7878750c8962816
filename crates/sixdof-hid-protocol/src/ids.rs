//! USB vendor/product ID catalog for supported 6DoF devices.
//!
//! Lookup is exact: there is no fuzzy matching on product IDs. A device
//! with a known vendor ID but an unknown product ID is worth reporting
//! (see the transport layer's enumeration diagnostics) so it can be added
//! here.

/// Logitech's vendor ID, used by the pre-3Dconnexion-split devices.
pub const LOGITECH_VENDOR_ID: u16 = 0x046D;

/// 3Dconnexion's own vendor ID.
pub const THREEDCONNEXION_VENDOR_ID: u16 = 0x256F;

/// SpacePilot (SP1 USB), the one catalog entry with an LCD peripheral.
pub const SPACEPILOT_PRODUCT_ID: u16 = 0xC625;

/// Which input-report framing a device model uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLayout {
    /// Translation and rotation arrive as two separate 7-byte reports.
    Split,
    /// All six axes arrive in one 13-byte report.
    Combined,
}

/// Catalog entry for one USB device model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsbDeviceInfo {
    pub vendor_id: u16,
    pub product_id: u16,
    pub layout: ReportLayout,
    pub name: &'static str,
    /// "P/N:" part number from the label or box, when known.
    pub part_number: &'static str,
    pub button_count: usize,
    /// May be shorter than `button_count` where names are not known;
    /// use [`UsbDeviceInfo::button_name`].
    pub button_names: &'static [&'static str],
}

impl UsbDeviceInfo {
    /// Name for a button index, `None` past `button_count`. Buttons whose
    /// label is not known come back as an empty string.
    pub fn button_name(&self, index: usize) -> Option<&'static str> {
        if index >= self.button_count {
            return None;
        }
        Some(self.button_names.get(index).copied().unwrap_or(""))
    }
}

use ReportLayout::{Combined, Split};

/// Every USB device model the decoders know about.
pub static DEVICES: &[UsbDeviceInfo] = &[
    UsbDeviceInfo {
        vendor_id: LOGITECH_VENDOR_ID,
        product_id: 0xC603,
        layout: Split,
        name: "SpaceMouse Plus XT USB",
        part_number: "",
        button_count: 10,
        button_names: &["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"],
    },
    UsbDeviceInfo {
        vendor_id: LOGITECH_VENDOR_ID,
        product_id: 0xC605,
        layout: Split,
        name: "CADman",
        part_number: "",
        button_count: 4,
        button_names: &["1", "2", "3", "4"],
    },
    UsbDeviceInfo {
        vendor_id: LOGITECH_VENDOR_ID,
        product_id: 0xC606,
        layout: Split,
        name: "SpaceMouse Classic USB",
        part_number: "",
        button_count: 8,
        button_names: &["1", "2", "3", "4", "5", "6", "7", "8"],
    },
    UsbDeviceInfo {
        vendor_id: LOGITECH_VENDOR_ID,
        product_id: 0xC621,
        layout: Split,
        name: "Spaceball 5000 USB",
        part_number: "5000 USB",
        button_count: 12,
        button_names: &["1", "2", "3", "4", "5", "6", "7", "8", "9", "A", "B", "C"],
    },
    UsbDeviceInfo {
        vendor_id: LOGITECH_VENDOR_ID,
        product_id: 0xC623,
        layout: Split,
        name: "SpaceTraveler",
        part_number: "",
        button_count: 8,
        button_names: &["1", "2", "3", "4", "5", "6", "7", "8"],
    },
    UsbDeviceInfo {
        vendor_id: LOGITECH_VENDOR_ID,
        product_id: SPACEPILOT_PRODUCT_ID,
        layout: Split,
        name: "SpacePilot",
        part_number: "SP1 USB",
        button_count: 21,
        button_names: &[
            "1", "2", "3", "4", "5", "6", "T", "L", "R", "F", "ESC", "ALT", "SHIFT", "CTRL",
            "FIT", "PANEL", "+", "-", "Dom", "3D Lock", "Config",
        ],
    },
    UsbDeviceInfo {
        vendor_id: LOGITECH_VENDOR_ID,
        product_id: 0xC626,
        layout: Split,
        name: "SpaceNavigator",
        part_number: "3DX-700028",
        button_count: 2,
        button_names: &["MENU", "FIT"],
    },
    UsbDeviceInfo {
        vendor_id: LOGITECH_VENDOR_ID,
        product_id: 0xC627,
        layout: Split,
        name: "SpaceExplorer",
        part_number: "3DX-700026",
        button_count: 15,
        button_names: &[
            "1", "2", "T", "L", "R", "F", "ESC", "ALT", "SHIFT", "CTRL", "FIT", "PANEL", "+",
            "-", "2D",
        ],
    },
    UsbDeviceInfo {
        vendor_id: LOGITECH_VENDOR_ID,
        product_id: 0xC628,
        layout: Split,
        name: "SpaceNavigator for Notebooks",
        part_number: "3DX-700034",
        button_count: 2,
        button_names: &["MENU", "FIT"],
    },
    UsbDeviceInfo {
        vendor_id: LOGITECH_VENDOR_ID,
        product_id: 0xC629,
        layout: Split,
        name: "SpacePilot Pro",
        part_number: "3DX-700036",
        button_count: 31,
        button_names: &[
            "MENU", "FIT", "T", "L", "R", "F", "B", "BK", "Roll +", "Roll -", "ISO1", "ISO2",
            "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "ESC", "ALT", "SHIFT", "CTRL",
            "Rot", "Pan/Zoom", "Dom", "+", "-",
        ],
    },
    UsbDeviceInfo {
        vendor_id: LOGITECH_VENDOR_ID,
        product_id: 0xC62B,
        layout: Split,
        name: "SpaceMouse Pro",
        part_number: "3DX-700040",
        button_count: 27,
        button_names: &[
            "Menu", "FIT", "T", "", "R", "F", "", "", "Roll +", "", "", "", "1", "2", "3", "4",
            "", "", "", "", "", "", "ESC", "ALT", "SHIFT", "CTRL", "Rot",
        ],
    },
    UsbDeviceInfo {
        vendor_id: LOGITECH_VENDOR_ID,
        product_id: 0xC640,
        layout: Split,
        name: "NuLOOQ",
        part_number: "",
        button_count: 5,
        button_names: &[],
    },
    UsbDeviceInfo {
        vendor_id: THREEDCONNEXION_VENDOR_ID,
        product_id: 0xC62C,
        layout: Combined,
        name: "LIPARI",
        part_number: "",
        button_count: 22,
        button_names: &[
            "MENU", "FIT", "T", "L", "R", "F", "B", "BK", "Roll +", "Roll -", "ISO1", "ISO2",
            "1", "2", "3", "4", "5", "6", "7", "8", "9", "10",
        ],
    },
    UsbDeviceInfo {
        vendor_id: THREEDCONNEXION_VENDOR_ID,
        product_id: 0xC62E,
        layout: Combined,
        name: "SpaceMouse Wireless (cabled)",
        part_number: "3DX-700043",
        button_count: 2,
        button_names: &["MENU", "FIT"],
    },
    UsbDeviceInfo {
        vendor_id: THREEDCONNEXION_VENDOR_ID,
        product_id: 0xC62F,
        layout: Combined,
        name: "SpaceMouse Wireless Receiver",
        part_number: "3DX-700043",
        button_count: 2,
        button_names: &["MENU", "FIT"],
    },
    UsbDeviceInfo {
        vendor_id: THREEDCONNEXION_VENDOR_ID,
        product_id: 0xC631,
        layout: Combined,
        name: "SpaceMouse Pro Wireless (cabled)",
        part_number: "3DX-700075",
        button_count: 27,
        button_names: &[
            "MENU", "FIT", "T", "", "R", "F", "", "", "Roll +", "", "", "", "1", "2", "3", "4",
            "", "", "", "", "", "", "ESC", "ALT", "SHIFT", "CTRL", "Rot",
        ],
    },
    UsbDeviceInfo {
        vendor_id: THREEDCONNEXION_VENDOR_ID,
        product_id: 0xC632,
        layout: Combined,
        name: "SpaceMouse Pro Wireless Receiver",
        part_number: "3DX-700075",
        button_count: 27,
        button_names: &[
            "MENU", "FIT", "T", "", "R", "F", "", "", "Roll +", "", "", "", "1", "2", "3", "4",
            "", "", "", "", "", "", "ESC", "ALT", "SHIFT", "CTRL", "Rot",
        ],
    },
    UsbDeviceInfo {
        vendor_id: THREEDCONNEXION_VENDOR_ID,
        product_id: 0xC633,
        layout: Combined,
        name: "SpaceMouse Enterprise",
        part_number: "3DX-700056",
        button_count: 31,
        button_names: &[
            "MENU", "FIT", "T", "", "R", "F", "", "", "Roll +", "", "ISO1", "", "1", "2", "3",
            "4", "5", "6", "7", "8", "9", "10", "ESC", "ALT", "SHIFT", "CTRL", "Rot",
        ],
    },
    UsbDeviceInfo {
        vendor_id: THREEDCONNEXION_VENDOR_ID,
        product_id: 0xC635,
        layout: Split,
        name: "SpaceMouse Compact",
        part_number: "3DX-700059",
        button_count: 2,
        button_names: &["MENU", "FIT"],
    },
    UsbDeviceInfo {
        vendor_id: THREEDCONNEXION_VENDOR_ID,
        product_id: 0xC636,
        layout: Split,
        name: "SpaceMouse Module",
        part_number: "",
        button_count: 0,
        button_names: &[],
    },
    UsbDeviceInfo {
        vendor_id: THREEDCONNEXION_VENDOR_ID,
        product_id: 0xC652,
        layout: Combined,
        name: "SpaceMouse Universal Receiver",
        part_number: "3DX-700069",
        button_count: 0,
        button_names: &[],
    },
];

/// Exact (vendor, product) catalog lookup.
pub fn lookup_device(vendor_id: u16, product_id: u16) -> Option<&'static UsbDeviceInfo> {
    DEVICES
        .iter()
        .find(|d| d.vendor_id == vendor_id && d.product_id == product_id)
}

/// True if any catalog entry uses this vendor ID.
pub fn is_known_vendor(vendor_id: u16) -> bool {
    DEVICES.iter().any(|d| d.vendor_id == vendor_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_spaceball_5000_usb() {
        let info = lookup_device(0x046D, 0xC621).expect("catalog entry");
        assert_eq!(info.name, "Spaceball 5000 USB");
        assert_eq!(info.layout, ReportLayout::Split);
        assert_eq!(info.button_count, 12);
    }

    #[test]
    fn test_lookup_spacemouse_wireless_is_combined() {
        let info = lookup_device(0x256F, 0xC62E).expect("catalog entry");
        assert_eq!(info.layout, ReportLayout::Combined);
        assert_eq!(info.button_count, 2);
    }

    #[test]
    fn test_lookup_unknown_product() {
        assert!(lookup_device(0x046D, 0x0001).is_none());
        assert!(lookup_device(0x1234, 0xC626).is_none());
    }

    #[test]
    fn test_known_vendors() {
        assert!(is_known_vendor(LOGITECH_VENDOR_ID));
        assert!(is_known_vendor(THREEDCONNEXION_VENDOR_ID));
        assert!(!is_known_vendor(0x1D50));
    }

    #[test]
    fn test_no_duplicate_ids() {
        for (i, a) in DEVICES.iter().enumerate() {
            for b in DEVICES.iter().skip(i + 1) {
                assert!(
                    (a.vendor_id, a.product_id) != (b.vendor_id, b.product_id),
                    "duplicate catalog entry {:#06x}:{:#06x}",
                    a.vendor_id,
                    a.product_id
                );
            }
        }
    }

    #[test]
    fn test_name_lists_never_exceed_button_count() {
        for dev in DEVICES {
            assert!(
                dev.button_names.len() <= dev.button_count,
                "{} has more names than buttons",
                dev.name
            );
        }
    }

    #[test]
    fn test_button_name_fallback() {
        let nulooq = lookup_device(0x046D, 0xC640).expect("catalog entry");
        assert_eq!(nulooq.button_name(0), Some(""));
        assert_eq!(nulooq.button_name(4), Some(""));
        assert_eq!(nulooq.button_name(5), None);

        let navigator = lookup_device(0x046D, 0xC626).expect("catalog entry");
        assert_eq!(navigator.button_name(0), Some("MENU"));
        assert_eq!(navigator.button_name(1), Some("FIT"));
        assert_eq!(navigator.button_name(2), None);
    }

    #[test]
    fn test_spacepilot_has_expected_id() {
        let info = lookup_device(LOGITECH_VENDOR_ID, SPACEPILOT_PRODUCT_ID).expect("catalog");
        assert_eq!(info.name, "SpacePilot");
    }
}
