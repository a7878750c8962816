//! Serial device catalog.
//!
//! Immutable model table keyed by a closed enum. Models are resolved from
//! the firmware version string at identification time (see
//! [`crate::identify::guess_model`]); the one runtime exception is the
//! firmware 2.42 ambiguity, where a device identified as a Spaceball 2003C
//! is migrated to [`SerialModel::Spaceball4000`] by the decoder the first
//! time it sees a `.` packet.

/// Every serial device model the decoders know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerialModel {
    /// Unrecognized device; decoding continues with 16 generic buttons.
    Unknown,
    /// Spaceball 1003/2003 (firmware 2.2 / 2.13 / 2.15).
    Spaceball2003,
    /// Spaceball 2003C (firmware 2.42, shared with the 4000FLX).
    Spaceball2003C,
    /// Spaceball 3003/3003C (firmware 2.35 / 2.62 / 2.63).
    Spaceball3003,
    /// Spaceball 4000FLX/5000FLX-A (firmware 2.43 / 2.45, or migrated
    /// from 2.42 on the first `.` packet).
    Spaceball4000,
    /// Magellan SpaceMouse.
    MagellanSpaceMouse,
    /// Spaceball 5000FLX.
    Spaceball5000,
    /// Logitech CadMan.
    CadMan,
    /// Space Explorer (serial variant).
    SpaceExplorer,
}

/// Catalog entry for one serial model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialModelInfo {
    pub name: &'static str,
    pub button_count: usize,
    pub button_names: &'static [&'static str],
}

/// Look up the immutable catalog entry for a model.
pub fn model_info(model: SerialModel) -> &'static SerialModelInfo {
    match model {
        SerialModel::Unknown => &SerialModelInfo {
            name: "Unknown serial device",
            button_count: 16,
            button_names: &[
                "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15",
                "16",
            ],
        },
        SerialModel::Spaceball2003 => &SerialModelInfo {
            name: "Spaceball 1003/2003",
            button_count: 8,
            button_names: &["1", "2", "3", "4", "5", "6", "7", "pick"],
        },
        SerialModel::Spaceball2003C => &SerialModelInfo {
            name: "Spaceball 2003C",
            button_count: 8,
            button_names: &["1", "2", "3", "4", "5", "6", "7", "8"],
        },
        SerialModel::Spaceball3003 => &SerialModelInfo {
            name: "Spaceball 3003/3003C",
            button_count: 2,
            button_names: &["R", "L"],
        },
        SerialModel::Spaceball4000 => &SerialModelInfo {
            name: "Spaceball 4000FLX/5000FLX-A",
            button_count: 12,
            button_names: &["1", "2", "3", "4", "5", "6", "7", "8", "9", "A", "B", "C"],
        },
        SerialModel::MagellanSpaceMouse => &SerialModelInfo {
            name: "Magellan SpaceMouse",
            button_count: 11,
            button_names: &["1", "2", "3", "4", "5", "6", "7", "8", "*", "+", "-"],
        },
        SerialModel::Spaceball5000 => &SerialModelInfo {
            name: "Spaceball 5000FLX",
            button_count: 12,
            button_names: &["1", "2", "3", "4", "5", "6", "7", "8", "9", "A", "B", "C"],
        },
        SerialModel::CadMan => &SerialModelInfo {
            name: "CadMan",
            button_count: 4,
            button_names: &["1", "2", "3", "4"],
        },
        SerialModel::SpaceExplorer => &SerialModelInfo {
            name: "Space Explorer",
            button_count: 14,
            button_names: &[
                "1", "2", "T", "L", "R", "F", "ALT", "ESC", "SHIFT", "CTRL", "Fit", "Panel", "+",
                "-",
            ],
        },
    }
}

/// Level-state mask for a serial device's button count (at most 16).
pub fn serial_keymask(button_count: usize) -> u16 {
    debug_assert!(button_count <= 16);
    0xFFFF >> (16 - button_count.min(16))
}
