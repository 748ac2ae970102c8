//! Enable or disable the touchscreen in Hyprland.

use std::path::PathBuf;

use trackpad_input_session::InputRouting;
use trackpad_platform_linux::HyprctlRouting;

use super::locate_touchscreen;

pub fn run(enabled: bool, device: Option<PathBuf>) -> anyhow::Result<()> {
    let (_, info) = locate_touchscreen(device.as_deref())?;
    let mut routing = HyprctlRouting::new(&info.name);
    routing.set_enabled(enabled)?;
    println!(
        "{} {}",
        if enabled { "Enabled" } else { "Disabled" },
        routing.device_name()
    );
    Ok(())
}
