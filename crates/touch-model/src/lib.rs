//! Trackpad Touch Model
//!
//! Plain data shared by the gesture engine and its collaborators:
//! - Decoded multitouch events as delivered by an event source
//! - Pointer actions produced for a virtual relative device
//! - The JSONL trace format used to record and replay sessions

pub mod action;
pub mod event;

pub use action::{Button, PointerAction, Transition};
pub use event::{TimestampSecs, TouchEvent, TraceHeader, TRACKING_RELEASED};
