//! Check system capabilities.

use trackpad_common::config::{config_file_path, AppConfig};
use trackpad_platform_linux::permissions::{
    all_required_available, check_capabilities, print_capability_report,
};

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("Trackpad System Check");
    println!("{}", "=".repeat(50));

    let path = config_file_path();
    if path.exists() {
        println!("[OK] Config: {}", path.display());
    } else {
        println!("[--] Config: defaults ({} not found)", path.display());
    }
    let gesture = &config.gesture;
    println!(
        "     orientation {}, movement threshold {}, tap {:.2}s",
        gesture.orientation, gesture.movement_threshold, gesture.tap_duration_secs
    );
    println!(
        "     scroll threshold {}, scroll sensitivity {}, cursor sensitivity {}",
        gesture.scroll_threshold, gesture.scroll_sensitivity, gesture.cursor_sensitivity
    );
    if let Err(e) = gesture.validate() {
        println!("[WARN] {e}");
    }

    let capabilities = check_capabilities(config.routing.mode);
    println!();
    print_capability_report(&capabilities);

    println!();
    if all_required_available(&capabilities) {
        println!("All required capabilities are available. Trackpad is ready.");
    } else {
        println!("Some required capabilities are missing. See above for fixes.");
    }

    Ok(())
}
