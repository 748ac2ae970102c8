//! Hyprland input routing through `hyprctl`.

use std::process::Command;

use trackpad_common::error::{TrackpadError, TrackpadResult};
use trackpad_input_session::InputRouting;

use crate::discovery::routing_device_name;

/// Enables or disables a device in the running Hyprland instance.
#[derive(Debug, Clone)]
pub struct HyprctlRouting {
    device_name: String,
}

impl HyprctlRouting {
    /// `device_name` is the name reported by evdev; it is normalized to
    /// the compositor's naming.
    pub fn new(device_name: &str) -> Self {
        Self {
            device_name: routing_device_name(device_name),
        }
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

/// Arguments passed to `hyprctl` to toggle a device.
pub fn hyprctl_args(device_name: &str, enabled: bool) -> Vec<String> {
    vec![
        "-r".to_string(),
        "keyword".to_string(),
        format!("device[{device_name}]:enabled"),
        if enabled { "1" } else { "0" }.to_string(),
    ]
}

impl InputRouting for HyprctlRouting {
    fn set_enabled(&mut self, enabled: bool) -> TrackpadResult<()> {
        let output = Command::new("hyprctl")
            .args(hyprctl_args(&self.device_name, enabled))
            .output()
            .map_err(|e| TrackpadError::routing(format!("Failed to run hyprctl: {e}")))?;

        if !output.status.success() {
            return Err(TrackpadError::routing(format!(
                "hyprctl exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        tracing::info!(device = %self.device_name, enabled, "Touchscreen routing updated");
        Ok(())
    }

    fn name(&self) -> &str {
        "hyprctl"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyprctl_args() {
        assert_eq!(
            hyprctl_args("elan-touchscreen", false),
            vec!["-r", "keyword", "device[elan-touchscreen]:enabled", "0"]
        );
        assert_eq!(
            hyprctl_args("elan-touchscreen", true).last().map(String::as_str),
            Some("1")
        );
    }

    #[test]
    fn test_device_name_is_normalized() {
        let routing = HyprctlRouting::new("ELAN Touch Screen");
        assert_eq!(routing.device_name(), "elan-touch-screen");
    }
}
