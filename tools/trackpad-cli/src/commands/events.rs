//! Print decoded touchscreen events.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use trackpad_common::config::Orientation;
use trackpad_common::error::TrackpadResult;
use trackpad_input_session::writer::TraceWriter;
use trackpad_input_session::TouchSource;
use trackpad_platform_linux::EvdevTouchSource;
use trackpad_touch_model::event::TraceHeader;

use super::{locate_touchscreen, stop_on_signal};

/// Orientation to stamp into a recorded trace: `--rotate` when given,
/// otherwise the configured orientation.
pub fn recording_orientation(
    rotate: Option<u16>,
    configured: Orientation,
) -> TrackpadResult<Orientation> {
    match rotate {
        Some(degrees) => Orientation::try_from(degrees),
        None => Ok(configured),
    }
}

pub async fn run(
    device: Option<PathBuf>,
    json: bool,
    record: Option<PathBuf>,
    orientation: Orientation,
) -> anyhow::Result<()> {
    let (device, info) = locate_touchscreen(device.as_deref())?;
    println!("Listening on {} ({})", info.name, info.path.display());
    println!("  Range: {}x{}", info.max_x, info.max_y);

    let mut source = EvdevTouchSource::new(device, false)?;
    let mut recorder = match &record {
        Some(path) => {
            let header = TraceHeader::now(&info.name, info.max_x, info.max_y, orientation);
            println!("Recording trace to: {} (orientation {orientation})", path.display());
            Some(TraceWriter::create(path, &header)?)
        }
        None => None,
    };

    let stop = Arc::new(AtomicBool::new(false));
    stop_on_signal(stop.clone());

    while !stop.load(Ordering::Relaxed) {
        match source.poll()? {
            Some(event) => {
                if json {
                    println!("{}", serde_json::to_string(&event)?);
                } else {
                    println!("{event:?}");
                }
                if let Some(recorder) = recorder.as_mut() {
                    recorder.write_event(&event)?;
                }
            }
            None => tokio::time::sleep(tokio::time::Duration::from_millis(1)).await,
        }
    }

    if let Some(mut recorder) = recorder {
        recorder.flush()?;
        println!(
            "Recorded {} events in {} frames",
            recorder.events_written(),
            recorder.frames_written()
        );
    }
    Ok(())
}
