//! Replay a recorded trace through the gesture engine.

use std::path::PathBuf;

use trackpad_common::config::GestureConfig;
use trackpad_gesture_core::{GestureClassifier, ScreenBounds};
use trackpad_input_session::backends::{PrintSink, StubSource};
use trackpad_input_session::TouchpadSession;
use trackpad_touch_model::event::parse_trace;

use super::GestureOverrides;

pub async fn run(
    path: PathBuf,
    json: bool,
    overrides: GestureOverrides,
    mut config: GestureConfig,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read trace {}: {e}", path.display()))?;
    let (header, events) = parse_trace(&content)?;
    let header =
        header.ok_or_else(|| anyhow::anyhow!("{} has no '# {{header}}' line", path.display()))?;

    // The recorded orientation wins over the configured one; --rotate wins over both.
    config.orientation = header.orientation;
    overrides.apply(&mut config)?;

    tracing::info!(
        device = %header.device_name,
        recorded_at = %header.recorded_at,
        events = events.len(),
        orientation = %config.orientation,
        "Replaying trace"
    );

    let classifier = GestureClassifier::new(config, ScreenBounds::new(header.max_x, header.max_y))?;
    let mut session = TouchpadSession::new(
        Box::new(StubSource::new(events)),
        Box::new(PrintSink::new(json)),
        classifier,
    );
    let stats = session.run().await?;

    eprintln!(
        "Replayed {} events into {} actions",
        stats.events_processed, stats.actions_emitted
    );
    Ok(())
}
