pub mod check;
pub mod events;
pub mod replay;
pub mod run;
pub mod toggle;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Args;
use evdev::Device;

use trackpad_common::config::{GestureConfig, Orientation};
use trackpad_common::error::TrackpadResult;
use trackpad_platform_linux::{find_touchscreen, open_touchscreen, TouchscreenInfo};

/// Command-line overrides for the configured gesture parameters.
#[derive(Args, Debug, Default)]
pub struct GestureOverrides {
    /// Screen orientation in degrees: 0, 90, 180 or 270
    #[arg(long)]
    pub rotate: Option<u16>,

    /// Displacement separating a tap from a move (device units)
    #[arg(long, allow_negative_numbers = true)]
    pub movement_threshold: Option<i32>,

    /// Longest touch still recognized as a tap (seconds)
    #[arg(long, allow_negative_numbers = true)]
    pub tap_duration: Option<f64>,

    /// Per-finger displacement that starts a two-finger scroll
    #[arg(long, allow_negative_numbers = true)]
    pub scroll_threshold: Option<i32>,

    /// Wheel ticks per scroll gesture
    #[arg(long, allow_negative_numbers = true)]
    pub scroll_sensitivity: Option<i32>,

    /// Pointer units per device unit
    #[arg(long, allow_negative_numbers = true)]
    pub cursor_sensitivity: Option<f64>,
}

impl GestureOverrides {
    /// Apply the overrides and validate the result.
    pub fn apply(&self, config: &mut GestureConfig) -> TrackpadResult<()> {
        if let Some(degrees) = self.rotate {
            config.orientation = Orientation::try_from(degrees)?;
        }
        if let Some(value) = self.movement_threshold {
            config.movement_threshold = value;
        }
        if let Some(value) = self.tap_duration {
            config.tap_duration_secs = value;
        }
        if let Some(value) = self.scroll_threshold {
            config.scroll_threshold = value;
        }
        if let Some(value) = self.scroll_sensitivity {
            config.scroll_sensitivity = value;
        }
        if let Some(value) = self.cursor_sensitivity {
            config.cursor_sensitivity = value;
        }
        config.validate()
    }
}

/// Open `path` when given, otherwise auto-detect the touchscreen.
pub fn locate_touchscreen(path: Option<&Path>) -> TrackpadResult<(Device, TouchscreenInfo)> {
    match path {
        Some(path) => open_touchscreen(path),
        None => find_touchscreen(),
    }
}

/// Set `flag` once Ctrl+C or SIGTERM arrives.
pub fn stop_on_signal(flag: Arc<AtomicBool>) {
    tokio::spawn(async move {
        wait_for_shutdown().await;
        tracing::info!("Shutdown requested");
        flag.store(true, Ordering::SeqCst);
    });
}

async fn wait_for_shutdown() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl+C only");
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            }
        }
    }
}
