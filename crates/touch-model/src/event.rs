//! Decoded multitouch events.
//!
//! These are the typed records an event source hands to the gesture
//! engine, already lifted out of the raw kernel `input_event` layout.
//! The same records form the body of a JSONL trace file: one event per
//! line after a `# {header}` comment line.

use serde::{Deserialize, Serialize};

use trackpad_common::config::Orientation;

/// Event timestamp in fractional seconds.
pub type TimestampSecs = f64;

/// Tracking id reported when the contact in the selected slot lifts.
pub const TRACKING_RELEASED: i32 = -1;

/// A single decoded touch event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TouchEvent {
    /// Select the slot that subsequent tracking/position events apply to.
    SlotSelect { slot: u32 },

    /// Tracking id assignment for the selected slot.
    /// [`TRACKING_RELEASED`] means the contact lifted.
    Tracking { id: i32 },

    /// X position of the contact in the selected slot.
    PositionX { value: i32 },

    /// Y position of the contact in the selected slot.
    PositionY { value: i32 },

    /// Synchronization marker: all updates since the previous marker are
    /// now consistent.
    Sync,

    /// Whole-device touch presence transition.
    Touch {
        pressed: bool,
        #[serde(rename = "t")]
        timestamp: TimestampSecs,
    },
}

impl TouchEvent {
    /// Tracking assignment that starts a new contact.
    pub fn tracking(id: i32) -> Self {
        TouchEvent::Tracking { id }
    }

    /// Tracking release for the selected slot.
    pub fn release() -> Self {
        TouchEvent::Tracking {
            id: TRACKING_RELEASED,
        }
    }

    /// Touch presence transition to "pressed".
    pub fn touch_down(timestamp: TimestampSecs) -> Self {
        TouchEvent::Touch {
            pressed: true,
            timestamp,
        }
    }

    /// Touch presence transition to "released".
    pub fn touch_up(timestamp: TimestampSecs) -> Self {
        TouchEvent::Touch {
            pressed: false,
            timestamp,
        }
    }

    /// Whether this event is a synchronization marker.
    pub fn is_sync(&self) -> bool {
        matches!(self, TouchEvent::Sync)
    }
}

/// Metadata written as the first line of a trace file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Name reported by the touchscreen.
    pub device_name: String,

    /// Maximum raw X value reported by the device.
    pub max_x: i32,

    /// Maximum raw Y value reported by the device.
    pub max_y: i32,

    /// Orientation active while recording.
    #[serde(default)]
    pub orientation: Orientation,

    /// Wall-clock time the recording started (RFC 3339).
    pub recorded_at: String,
}

impl TraceHeader {
    pub const SCHEMA_VERSION: &'static str = "1.0";

    /// Header stamped with the current wall-clock time.
    pub fn now(
        device_name: impl Into<String>,
        max_x: i32,
        max_y: i32,
        orientation: Orientation,
    ) -> Self {
        Self {
            schema_version: Self::SCHEMA_VERSION.to_string(),
            device_name: device_name.into(),
            max_x,
            max_y,
            orientation,
            recorded_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Render `header` as the comment line that opens a trace.
pub fn header_line(header: &TraceHeader) -> Result<String, serde_json::Error> {
    Ok(format!("# {}", serde_json::to_string(header)?))
}

/// Parse events from JSONL content (one JSON object per line).
///
/// Blank lines and `#` comment lines are skipped.
pub fn parse_events(jsonl: &str) -> Result<Vec<TouchEvent>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Parse a complete trace: the `# {header}` line followed by events.
///
/// Returns `None` for the header when the first line is not a header
/// comment.
pub fn parse_trace(
    content: &str,
) -> Result<(Option<TraceHeader>, Vec<TouchEvent>), serde_json::Error> {
    let header = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.strip_prefix('#'))
        .map(|json| serde_json::from_str::<TraceHeader>(json.trim()))
        .transpose()?;
    let events = parse_events(content)?;
    Ok((header, events))
}

/// Serialize events to JSONL format.
pub fn serialize_events(events: &[TouchEvent]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}
