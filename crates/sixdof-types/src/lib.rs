//! Shared types for 6DoF input device protocol decoders.
//!
//! This crate is I/O-free and allocation-free. It provides the event model
//! produced by every decoder in the workspace, the per-axis property
//! metadata, and the button edge detector shared by the serial and USB
//! decode paths.

#![deny(static_mut_refs)]

pub mod buttons;
pub mod event;

pub use buttons::{ButtonEdges, button_edges};
pub use event::{AXIS_COUNT, AXIS_NAMES, AxisProperty, Event};
