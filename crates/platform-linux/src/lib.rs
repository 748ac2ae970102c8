//! Trackpad Linux Platform Integration
//!
//! Platform-specific implementations for Linux:
//! - **Discovery:** Find the touchscreen among `/dev/input/event*`
//! - **Source:** Decode evdev multitouch events into touch events
//! - **Emitter:** A uinput relative pointer that replays pointer actions
//! - **Routing:** Hide the raw touchscreen from the compositor
//! - **Permissions:** Capability detection and user guidance

pub mod discovery;
pub mod emitter;
pub mod permissions;
pub mod routing;
pub mod source;

pub use discovery::{find_touchscreen, open_touchscreen, TouchscreenInfo};
pub use emitter::UinputPointer;
pub use routing::HyprctlRouting;
pub use source::EvdevTouchSource;
