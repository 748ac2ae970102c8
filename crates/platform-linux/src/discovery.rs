//! Touchscreen discovery via evdev.

use std::path::{Path, PathBuf};

use evdev::{AbsoluteAxisType, Device, Key, PropType};

use trackpad_common::error::{TrackpadError, TrackpadResult};
use trackpad_gesture_core::ScreenBounds;

/// Identity and geometry of a touchscreen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TouchscreenInfo {
    pub path: PathBuf,
    pub name: String,
    pub max_x: i32,
    pub max_y: i32,
}

impl TouchscreenInfo {
    /// Name the compositor uses for this device.
    pub fn routing_name(&self) -> String {
        routing_device_name(&self.name)
    }

    pub fn bounds(&self) -> ScreenBounds {
        ScreenBounds::new(self.max_x, self.max_y)
    }
}

/// Compositor-style device name: lowercase, spaces replaced by dashes.
pub fn routing_device_name(name: &str) -> String {
    name.replace(' ', "-").to_lowercase()
}

/// Whether `device` looks like a multitouch touchscreen.
pub fn is_touchscreen(device: &Device) -> bool {
    let direct = device.properties().contains(PropType::DIRECT);
    let multitouch = device.supported_absolute_axes().is_some_and(|axes| {
        axes.contains(AbsoluteAxisType::ABS_MT_POSITION_X)
            && axes.contains(AbsoluteAxisType::ABS_MT_POSITION_Y)
    });
    let touch_key = device
        .supported_keys()
        .is_some_and(|keys| keys.contains(Key::BTN_TOUCH));
    direct && multitouch && touch_key
}

/// Find the first touchscreen on the system.
pub fn find_touchscreen() -> TrackpadResult<(Device, TouchscreenInfo)> {
    for (path, device) in evdev::enumerate() {
        if !is_touchscreen(&device) {
            continue;
        }
        let info = describe(path, &device)?;
        tracing::info!(
            path = %info.path.display(),
            name = %info.name,
            max_x = info.max_x,
            max_y = info.max_y,
            "Touchscreen found"
        );
        return Ok((device, info));
    }
    Err(TrackpadError::DeviceNotFound)
}

/// Open a touchscreen at an explicit device node.
pub fn open_touchscreen(path: &Path) -> TrackpadResult<(Device, TouchscreenInfo)> {
    if !path.exists() {
        return Err(TrackpadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let device = Device::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            TrackpadError::PermissionDenied {
                message: format!("{}: {e}", path.display()),
            }
        } else {
            TrackpadError::device(format!("Failed to open {}: {e}", path.display()))
        }
    })?;
    if !is_touchscreen(&device) {
        tracing::warn!(
            path = %path.display(),
            "Device does not advertise multitouch touchscreen capabilities"
        );
    }
    let info = describe(path.to_path_buf(), &device)?;
    Ok((device, info))
}

fn describe(path: PathBuf, device: &Device) -> TrackpadResult<TouchscreenInfo> {
    let abs = device
        .get_abs_state()
        .map_err(|e| TrackpadError::device(format!("Failed to read axis ranges: {e}")))?;
    let maximum = |axis: AbsoluteAxisType| abs[axis.0 as usize].maximum;

    let max_x = match maximum(AbsoluteAxisType::ABS_X) {
        0 => maximum(AbsoluteAxisType::ABS_MT_POSITION_X),
        value => value,
    };
    let max_y = match maximum(AbsoluteAxisType::ABS_Y) {
        0 => maximum(AbsoluteAxisType::ABS_MT_POSITION_Y),
        value => value,
    };

    Ok(TouchscreenInfo {
        path,
        name: device.name().unwrap_or("unknown touchscreen").to_string(),
        max_x,
        max_y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_device_name() {
        assert_eq!(
            routing_device_name("GXTP7386:00 27C6:0113"),
            "gxtp7386:00-27c6:0113"
        );
    }

    #[test]
    fn test_info_bounds() {
        let info = TouchscreenInfo {
            path: PathBuf::from("/dev/input/event17"),
            name: "ELAN Touchscreen".to_string(),
            max_x: 2880,
            max_y: 1800,
        };
        assert_eq!(info.bounds(), ScreenBounds::new(2880, 1800));
        assert_eq!(info.routing_name(), "elan-touchscreen");
    }

    #[test]
    fn test_open_missing_path() {
        let result = open_touchscreen(Path::new("/dev/input/does-not-exist"));
        assert!(matches!(result, Err(TrackpadError::FileNotFound { .. })));
    }
}
