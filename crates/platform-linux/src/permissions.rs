//! Permission detection and guidance for Linux.
//!
//! The emulator reads a raw touchscreen, writes a virtual pointer through
//! uinput, and (by default) toggles the touchscreen via `hyprctl`.

use std::path::Path;

use trackpad_common::config::RoutingMode;

/// A system capability the emulator may need.
#[derive(Debug, Clone)]
pub struct Capability {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub required: bool,
    pub fix_instructions: Option<String>,
}

/// Check all capabilities relevant to `routing`.
pub fn check_capabilities(routing: RoutingMode) -> Vec<Capability> {
    vec![
        check_input_device_access(),
        check_uinput_access(),
        check_touchscreen_present(),
        check_hyprctl(routing == RoutingMode::Hyprctl),
    ]
}

/// Whether every required capability is available.
pub fn all_required_available(capabilities: &[Capability]) -> bool {
    capabilities
        .iter()
        .filter(|c| c.required)
        .all(|c| c.available)
}

fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

fn in_group(group: &str) -> bool {
    std::process::Command::new("groups")
        .output()
        .map(|o| {
            String::from_utf8_lossy(&o.stdout)
                .split_whitespace()
                .any(|g| g == group)
        })
        .unwrap_or(false)
}

/// Check if the user can read `/dev/input/event*`.
fn check_input_device_access() -> Capability {
    let input_dir = Path::new("/dev/input");
    let available = input_dir.exists() && (is_root() || in_group("input"));

    Capability {
        name: "Input Device Access".to_string(),
        description: "Read access to the raw touchscreen (evdev)".to_string(),
        available,
        required: true,
        fix_instructions: if !available {
            Some(
                "Add user to input group: sudo usermod -aG input $USER (logout required)"
                    .to_string(),
            )
        } else {
            None
        },
    }
}

/// Check if `/dev/uinput` can be opened for writing.
fn check_uinput_access() -> Capability {
    let path = Path::new("/dev/uinput");
    let exists = path.exists();
    let writable = exists
        && std::fs::OpenOptions::new()
            .write(true)
            .open(path)
            .is_ok();

    Capability {
        name: "uinput".to_string(),
        description: "Write access to /dev/uinput for the virtual pointer".to_string(),
        available: writable,
        required: true,
        fix_instructions: match (exists, writable) {
            (false, _) => Some("Load the kernel module: sudo modprobe uinput".to_string()),
            (true, false) => Some(
                "Grant access with a udev rule: KERNEL==\"uinput\", GROUP=\"input\", MODE=\"0660\""
                    .to_string(),
            ),
            _ => None,
        },
    }
}

/// Check that a multitouch touchscreen is visible.
fn check_touchscreen_present() -> Capability {
    let found = crate::discovery::find_touchscreen();
    let fix_instructions = match &found {
        Ok(_) => None,
        Err(e) => Some(format!(
            "{e}. Pass --device /dev/input/eventN or check input group membership"
        )),
    };

    Capability {
        name: "Touchscreen".to_string(),
        description: match &found {
            Ok((_, info)) => format!("{} at {}", info.name, info.path.display()),
            Err(_) => "Multitouch touchscreen device".to_string(),
        },
        available: found.is_ok(),
        required: true,
        fix_instructions,
    }
}

/// Check if `hyprctl` is usable from this session.
fn check_hyprctl(required: bool) -> Capability {
    let in_session = std::env::var("HYPRLAND_INSTANCE_SIGNATURE").is_ok();
    let installed = std::process::Command::new("hyprctl")
        .arg("version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);
    let available = in_session && installed;

    Capability {
        name: "hyprctl".to_string(),
        description: "Hyprland control socket for disabling the raw touchscreen".to_string(),
        available,
        required,
        fix_instructions: if available {
            None
        } else if !installed {
            Some("Install Hyprland or use --routing grab".to_string())
        } else {
            Some("Run from inside a Hyprland session or use --routing grab".to_string())
        },
    }
}

/// Print a user-friendly capability report.
pub fn print_capability_report(capabilities: &[Capability]) {
    println!("Trackpad System Capabilities:");
    println!("{}", "-".repeat(60));

    for cap in capabilities {
        let status = if cap.available {
            "[OK]"
        } else if cap.required {
            "[MISSING - REQUIRED]"
        } else {
            "[MISSING - OPTIONAL]"
        };

        println!("  {} {}: {}", status, cap.name, cap.description);

        if let Some(ref fix) = cap.fix_instructions {
            println!("    Fix: {fix}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capability(available: bool, required: bool) -> Capability {
        Capability {
            name: "test".to_string(),
            description: String::new(),
            available,
            required,
            fix_instructions: None,
        }
    }

    #[test]
    fn test_optional_missing_capability_is_tolerated() {
        let caps = vec![capability(true, true), capability(false, false)];
        assert!(all_required_available(&caps));
    }

    #[test]
    fn test_required_missing_capability_fails() {
        let caps = vec![capability(true, true), capability(false, true)];
        assert!(!all_required_available(&caps));
    }

    #[test]
    fn test_hyprctl_only_required_in_hyprctl_mode() {
        assert!(!check_hyprctl(false).required);
        assert!(check_hyprctl(true).required);
    }
}
