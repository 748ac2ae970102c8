//! Run the trackpad emulator.

use std::path::PathBuf;

use trackpad_common::config::{AppConfig, RoutingMode};
use trackpad_gesture_core::GestureClassifier;
use trackpad_input_session::writer::TraceWriter;
use trackpad_input_session::TouchpadSession;
use trackpad_platform_linux::emitter::VIRTUAL_POINTER_NAME;
use trackpad_platform_linux::{EvdevTouchSource, HyprctlRouting, UinputPointer};
use trackpad_touch_model::event::TraceHeader;

use super::{locate_touchscreen, stop_on_signal, GestureOverrides};

pub async fn run(
    mut config: AppConfig,
    device: Option<PathBuf>,
    overrides: GestureOverrides,
    routing: Option<RoutingMode>,
    record: Option<PathBuf>,
) -> anyhow::Result<()> {
    overrides.apply(&mut config.gesture)?;
    let routing = routing.unwrap_or(config.routing.mode);

    let (device, info) = locate_touchscreen(device.or(config.device).as_deref())?;
    let classifier = GestureClassifier::new(config.gesture.clone(), info.bounds())?;
    let source = EvdevTouchSource::new(device, routing == RoutingMode::Grab)?;
    let pointer = UinputPointer::create(VIRTUAL_POINTER_NAME)?;

    let mut session = TouchpadSession::new(Box::new(source), Box::new(pointer), classifier);
    if routing == RoutingMode::Hyprctl {
        session = session.with_routing(Box::new(HyprctlRouting::new(&info.name)));
    }
    if let Some(path) = record {
        let header = TraceHeader::now(
            &info.name,
            info.max_x,
            info.max_y,
            config.gesture.orientation,
        );
        println!("Recording trace to: {}", path.display());
        session = session.with_recorder(TraceWriter::create(&path, &header)?);
    }

    println!("Touchscreen: {} ({})", info.name, info.path.display());
    println!(
        "  Range: {}x{}, orientation {}, routing {:?}",
        info.max_x, info.max_y, config.gesture.orientation, routing
    );
    println!("Press Ctrl+C to stop...");

    stop_on_signal(session.stop_flag());
    let stats = session.run().await?;

    println!();
    println!(
        "Stopped after {} events, {} actions",
        stats.events_processed, stats.actions_emitted
    );
    Ok(())
}
