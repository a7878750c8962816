//! Event model and axis metadata.

/// Number of degrees of freedom reported by every supported device.
pub const AXIS_COUNT: usize = 6;

/// Axis names in wire order: three translations, then three rotations.
pub const AXIS_NAMES: [&str; AXIS_COUNT] = ["Tx", "Ty", "Tz", "Rx", "Ry", "Rz"];

/// One decoded input event.
///
/// Decoders produce at most one event per packet bit-change; "nothing new
/// this call" is expressed as `Option<Event>` by the callers, not as a
/// variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Full six-axis displacement snapshot.
    ///
    /// Axes are in [`AXIS_NAMES`] order. For serial Spaceball devices
    /// `period` is the device-reported time since the previous motion
    /// packet (1/16 ms units); for devices that do not report it, zero.
    Motion { axes: [i32; AXIS_COUNT], period: u32 },
    /// A single button changed level.
    Button { index: u16, pressed: bool },
}

impl Event {
    /// True for [`Event::Motion`].
    pub fn is_motion(&self) -> bool {
        matches!(self, Event::Motion { .. })
    }

    /// True for [`Event::Button`].
    pub fn is_button(&self) -> bool {
        matches!(self, Event::Button { .. })
    }
}

/// Static per-axis range metadata resolved at open time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisProperty {
    pub name: &'static str,
    pub min: i32,
    pub max: i32,
    pub deadzone: i32,
}

impl AxisProperty {
    /// Build the fixed six-axis property list with one shared range.
    pub fn table(min: i32, max: i32, deadzone: i32) -> [AxisProperty; AXIS_COUNT] {
        let mut props = [AxisProperty {
            name: "",
            min,
            max,
            deadzone,
        }; AXIS_COUNT];
        for (prop, name) in props.iter_mut().zip(AXIS_NAMES) {
            prop.name = name;
        }
        props
    }
}
