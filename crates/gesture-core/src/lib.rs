//! Trackpad Gesture Core
//!
//! Turns decoded multitouch events into relative pointer actions:
//! - **Rotation:** Map raw panel coordinates into screen orientation
//! - **Contact Tracking:** Per-slot initial/current positions
//! - **Classification:** Tap, move, two-finger scroll, three-finger drag
//!
//! This crate is pure computation with no I/O or platform dependencies.
//! All inputs are data; all outputs are data.

pub mod classifier;
pub mod rotation;
pub mod tracker;

pub use classifier::{GestureClassifier, GesturePhase};
pub use rotation::{rotate, ScreenBounds};
pub use tracker::{ContactTracker, TouchContact};
