//! Button keystate edge detection.
//!
//! Both the serial and USB decoders track button levels as a bitmask
//! (16 bits used on serial devices, up to 48 on USB) and synthesize one
//! press/release event per bit that changed between reads. The caller is
//! responsible for persisting the new level state.

/// Iterator over the button edges between two level bitmasks.
///
/// Yields `(index, pressed)` for every changed bit in ascending index
/// order, where `pressed` is the level of that bit in `current`.
#[derive(Debug, Clone)]
pub struct ButtonEdges {
    current: u64,
    diff: u64,
}

impl Iterator for ButtonEdges {
    type Item = (u16, bool);

    fn next(&mut self) -> Option<(u16, bool)> {
        if self.diff == 0 {
            return None;
        }
        let index = self.diff.trailing_zeros();
        self.diff &= self.diff - 1;
        Some((index as u16, self.current >> index & 1 != 0))
    }
}

/// Diff two button level bitmasks into discrete edge events.
///
/// Pure function: yields exactly `(previous ^ current).count_ones()`
/// events and touches no hidden state.
pub fn button_edges(previous: u64, current: u64) -> ButtonEdges {
    ButtonEdges {
        current,
        diff: previous ^ current,
    }
}
