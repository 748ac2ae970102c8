//! Touch source backed by an evdev device node.

use std::collections::VecDeque;
use std::os::unix::io::AsRawFd;
use std::time::{SystemTime, UNIX_EPOCH};

use evdev::{AbsoluteAxisType, Device, InputEventKind, Key, Synchronization};

use trackpad_common::error::{TrackpadError, TrackpadResult};
use trackpad_input_session::TouchSource;
use trackpad_touch_model::event::{TimestampSecs, TouchEvent};

/// Reads a touchscreen without blocking and yields decoded touch events.
pub struct EvdevTouchSource {
    device: Device,
    name: String,
    pending: VecDeque<TouchEvent>,
    grabbed: bool,
}

impl EvdevTouchSource {
    /// Wrap an opened device. With `grab` set, the device is taken
    /// exclusively so no other reader sees its events.
    pub fn new(mut device: Device, grab: bool) -> TrackpadResult<Self> {
        set_nonblocking(&device)?;
        if grab {
            device
                .grab()
                .map_err(|e| TrackpadError::routing(format!("Failed to grab touchscreen: {e}")))?;
            tracing::info!("Touchscreen grabbed exclusively");
        }
        let name = device.name().unwrap_or("evdev").to_string();
        Ok(Self {
            device,
            name,
            pending: VecDeque::new(),
            grabbed: grab,
        })
    }

    fn ingest_events(&mut self) -> TrackpadResult<()> {
        match self.device.fetch_events() {
            Ok(events) => {
                for event in events {
                    if let Some(decoded) = decode_event(&event) {
                        self.pending.push_back(decoded);
                    }
                }
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => Ok(()),
            Err(err) => Err(TrackpadError::source(format!(
                "Failed reading {}: {err}",
                self.name
            ))),
        }
    }
}

impl TouchSource for EvdevTouchSource {
    fn poll(&mut self) -> TrackpadResult<Option<TouchEvent>> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }

        self.ingest_events()?;
        Ok(self.pending.pop_front())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for EvdevTouchSource {
    fn drop(&mut self) {
        if self.grabbed {
            if let Err(e) = self.device.ungrab() {
                tracing::warn!(error = %e, "Failed to release touchscreen grab");
            }
        }
    }
}

fn set_nonblocking(device: &Device) -> TrackpadResult<()> {
    let fd = device.as_raw_fd();
    // SAFETY: fd is owned by `device` and stays open for the duration of both calls.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(std::io::Error::last_os_error().into());
    }
    // SAFETY: as above.
    if unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) } < 0 {
        return Err(std::io::Error::last_os_error().into());
    }
    Ok(())
}

/// Map one kernel input event to a touch event. Returns `None` for
/// events the gesture engine does not use (pressure, touch major, ...).
pub fn decode_event(event: &evdev::InputEvent) -> Option<TouchEvent> {
    match event.kind() {
        InputEventKind::AbsAxis(axis) => match axis {
            AbsoluteAxisType::ABS_MT_SLOT => Some(TouchEvent::SlotSelect {
                slot: event.value().max(0) as u32,
            }),
            AbsoluteAxisType::ABS_MT_TRACKING_ID => Some(TouchEvent::Tracking {
                id: event.value(),
            }),
            AbsoluteAxisType::ABS_MT_POSITION_X => Some(TouchEvent::PositionX {
                value: event.value(),
            }),
            AbsoluteAxisType::ABS_MT_POSITION_Y => Some(TouchEvent::PositionY {
                value: event.value(),
            }),
            _ => None,
        },
        InputEventKind::Synchronization(Synchronization::SYN_REPORT) => Some(TouchEvent::Sync),
        InputEventKind::Key(Key::BTN_TOUCH) => Some(TouchEvent::Touch {
            pressed: event.value() != 0,
            timestamp: timestamp_secs(event.timestamp()),
        }),
        _ => None,
    }
}

fn timestamp_secs(time: SystemTime) -> TimestampSecs {
    time.duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use evdev::{EventType, InputEvent};
    use std::time::Duration;

    fn abs(axis: AbsoluteAxisType, value: i32) -> InputEvent {
        InputEvent::new(EventType::ABSOLUTE, axis.0, value)
    }

    #[test]
    fn test_decode_multitouch_axes() {
        assert_eq!(
            decode_event(&abs(AbsoluteAxisType::ABS_MT_SLOT, 2)),
            Some(TouchEvent::SlotSelect { slot: 2 })
        );
        assert_eq!(
            decode_event(&abs(AbsoluteAxisType::ABS_MT_TRACKING_ID, -1)),
            Some(TouchEvent::release())
        );
        assert_eq!(
            decode_event(&abs(AbsoluteAxisType::ABS_MT_POSITION_X, 812)),
            Some(TouchEvent::PositionX { value: 812 })
        );
        assert_eq!(
            decode_event(&abs(AbsoluteAxisType::ABS_MT_POSITION_Y, 40)),
            Some(TouchEvent::PositionY { value: 40 })
        );
    }

    #[test]
    fn test_decode_ignores_unused_axes() {
        assert_eq!(decode_event(&abs(AbsoluteAxisType::ABS_X, 10)), None);
        assert_eq!(decode_event(&abs(AbsoluteAxisType::ABS_MT_PRESSURE, 10)), None);
    }

    #[test]
    fn test_decode_sync_and_touch_key() {
        let sync = InputEvent::new(
            EventType::SYNCHRONIZATION,
            Synchronization::SYN_REPORT.0,
            0,
        );
        assert_eq!(decode_event(&sync), Some(TouchEvent::Sync));

        let down = InputEvent::new(EventType::KEY, Key::BTN_TOUCH.code(), 1);
        assert!(matches!(
            decode_event(&down),
            Some(TouchEvent::Touch { pressed: true, .. })
        ));

        let up = InputEvent::new(EventType::KEY, Key::BTN_TOUCH.code(), 0);
        assert!(matches!(
            decode_event(&up),
            Some(TouchEvent::Touch { pressed: false, .. })
        ));

        let other = InputEvent::new(EventType::KEY, Key::BTN_TOOL_FINGER.code(), 1);
        assert_eq!(decode_event(&other), None);
    }

    #[test]
    fn test_timestamp_secs() {
        let time = UNIX_EPOCH + Duration::from_millis(1_500);
        assert!((timestamp_secs(time) - 1.5).abs() < 1e-9);
    }
}
