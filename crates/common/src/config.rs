//! Application configuration.
//!
//! Configuration is read once at startup and never changes afterwards.
//! Every field has a default so a missing or partial config file still
//! yields a usable setup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::{TrackpadError, TrackpadResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Gesture recognition parameters.
    pub gesture: GestureConfig,

    /// How the original touchscreen is kept away from the compositor.
    pub routing: RoutingConfig,

    /// Explicit touchscreen device node. Auto-detected when unset.
    pub device: Option<PathBuf>,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Screen orientation applied to touch coordinates before they become
/// pointer motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Orientation {
    Deg0,
    Deg90,
    Deg180,
    #[default]
    Deg270,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Deg0,
        Orientation::Deg90,
        Orientation::Deg180,
        Orientation::Deg270,
    ];

    /// Rotation angle in degrees.
    pub fn degrees(self) -> u16 {
        match self {
            Orientation::Deg0 => 0,
            Orientation::Deg90 => 90,
            Orientation::Deg180 => 180,
            Orientation::Deg270 => 270,
        }
    }

    /// The orientation that undoes this one.
    pub fn inverse(self) -> Self {
        match self {
            Orientation::Deg90 => Orientation::Deg270,
            Orientation::Deg270 => Orientation::Deg90,
            other => other,
        }
    }

    /// Whether this orientation exchanges the X and Y extents.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Orientation::Deg90 | Orientation::Deg270)
    }
}

impl TryFrom<u16> for Orientation {
    type Error = TrackpadError;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Orientation::Deg0),
            90 => Ok(Orientation::Deg90),
            180 => Ok(Orientation::Deg180),
            270 => Ok(Orientation::Deg270),
            other => Err(TrackpadError::config(format!(
                "invalid orientation {other}, expected one of 0, 90, 180, 270"
            ))),
        }
    }
}

impl From<Orientation> for u16 {
    fn from(orientation: Orientation) -> Self {
        orientation.degrees()
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Gesture recognition thresholds and sensitivities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Screen orientation.
    pub orientation: Orientation,

    /// Displacement (device units) separating a tap from a move.
    pub movement_threshold: i32,

    /// Longest touch (seconds) still recognized as a tap.
    pub tap_duration_secs: f64,

    /// Displacement (device units) each finger must travel before a
    /// two-finger scroll starts.
    pub scroll_threshold: i32,

    /// Wheel ticks emitted per scroll gesture.
    pub scroll_sensitivity: i32,

    /// Multiplier from rotated device units to relative pointer units.
    pub cursor_sensitivity: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Deg270,
            movement_threshold: 50,
            tap_duration_secs: 0.12,
            scroll_threshold: 50,
            scroll_sensitivity: 2,
            cursor_sensitivity: 0.6,
        }
    }
}

impl GestureConfig {
    /// Largest wheel step, in ticks, a single scroll gesture may emit.
    pub const MAX_SCROLL_SENSITIVITY: i32 = 120;

    /// Reject values the classifier cannot work with.
    pub fn validate(&self) -> TrackpadResult<()> {
        if self.movement_threshold < 0 {
            return Err(TrackpadError::config(format!(
                "movement threshold must be non-negative, got {}",
                self.movement_threshold
            )));
        }
        if self.scroll_threshold < 0 {
            return Err(TrackpadError::config(format!(
                "scroll threshold must be non-negative, got {}",
                self.scroll_threshold
            )));
        }
        if self.scroll_sensitivity.unsigned_abs() > Self::MAX_SCROLL_SENSITIVITY as u32 {
            return Err(TrackpadError::config(format!(
                "scroll sensitivity must be within ±{}, got {}",
                Self::MAX_SCROLL_SENSITIVITY,
                self.scroll_sensitivity
            )));
        }
        if !(self.tap_duration_secs.is_finite() && self.tap_duration_secs > 0.0) {
            return Err(TrackpadError::config(format!(
                "tap duration must be a positive number of seconds, got {}",
                self.tap_duration_secs
            )));
        }
        if !self.cursor_sensitivity.is_finite() {
            return Err(TrackpadError::config(
                "cursor sensitivity must be a finite number",
            ));
        }
        Ok(())
    }
}

/// Strategy used to stop the compositor from also acting on the raw
/// touchscreen while it is being emulated as a trackpad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingMode {
    /// Toggle the device through `hyprctl keyword device[...]:enabled`.
    #[default]
    Hyprctl,
    /// Take an exclusive evdev grab on the device.
    Grab,
    /// Leave the original device alone.
    None,
}

impl std::str::FromStr for RoutingMode {
    type Err = TrackpadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hyprctl" => Ok(RoutingMode::Hyprctl),
            "grab" => Ok(RoutingMode::Grab),
            "none" => Ok(RoutingMode::None),
            other => Err(TrackpadError::config(format!(
                "unknown routing mode '{other}', expected hyprctl|grab|none"
            ))),
        }
    }
}

/// Input routing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub mode: RoutingMode,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trackpad_gesture_core=trace,info").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("trackpad").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_from_degrees() {
        for orientation in Orientation::ALL {
            let degrees = u16::from(orientation);
            assert_eq!(Orientation::try_from(degrees).unwrap(), orientation);
        }
        assert!(matches!(
            Orientation::try_from(45),
            Err(TrackpadError::Config { .. })
        ));
    }

    #[test]
    fn test_orientation_inverse() {
        assert_eq!(Orientation::Deg90.inverse(), Orientation::Deg270);
        assert_eq!(Orientation::Deg270.inverse(), Orientation::Deg90);
        assert_eq!(Orientation::Deg180.inverse(), Orientation::Deg180);
        assert_eq!(Orientation::Deg0.inverse(), Orientation::Deg0);
    }

    #[test]
    fn test_orientation_serde_as_integer() {
        let json = serde_json::to_string(&Orientation::Deg90).unwrap();
        assert_eq!(json, "90");
        let parsed: Orientation = serde_json::from_str("180").unwrap();
        assert_eq!(parsed, Orientation::Deg180);
        assert!(serde_json::from_str::<Orientation>("100").is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let raw = r#"{ "gesture": { "orientation": 0, "cursor_sensitivity": 1.5 } }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.gesture.orientation, Orientation::Deg0);
        assert_eq!(config.gesture.cursor_sensitivity, 1.5);
        assert_eq!(config.gesture.movement_threshold, 50);
        assert_eq!(config.routing.mode, RoutingMode::Hyprctl);
        assert!(config.device.is_none());
    }

    #[test]
    fn test_default_gesture_config_is_valid() {
        assert!(GestureConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = GestureConfig {
            movement_threshold: -1,
            ..GestureConfig::default()
        };
        assert!(config.validate().is_err());

        let config = GestureConfig {
            tap_duration_secs: 0.0,
            ..GestureConfig::default()
        };
        assert!(config.validate().is_err());

        let config = GestureConfig {
            cursor_sensitivity: f64::NAN,
            ..GestureConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_scroll_sensitivity() {
        let config = GestureConfig {
            scroll_sensitivity: i32::MIN,
            ..GestureConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TrackpadError::Config { .. })
        ));

        let config = GestureConfig {
            scroll_sensitivity: -GestureConfig::MAX_SCROLL_SENSITIVITY,
            ..GestureConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_routing_mode_parse() {
        assert_eq!("grab".parse::<RoutingMode>().unwrap(), RoutingMode::Grab);
        assert_eq!("none".parse::<RoutingMode>().unwrap(), RoutingMode::None);
        assert!("udev".parse::<RoutingMode>().is_err());
    }
}
