//! Trackpad Input Session
//!
//! Drives the gesture engine from a touch source and forwards the
//! resulting actions to a pointer sink. The three collaborators are
//! traits so the same loop runs against real hardware, a recorded trace,
//! or test doubles:
//!
//! - **TouchSource:** Decoded multitouch events (evdev, trace replay)
//! - **PointerSink:** Relative pointer output (uinput, stdout)
//! - **InputRouting:** Disables the original device for the session's lifetime
//!
//! Optionally every consumed event is also appended to a JSONL trace.

pub mod backends;
pub mod writer;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use trackpad_common::error::TrackpadResult;
use trackpad_gesture_core::GestureClassifier;
use trackpad_touch_model::action::PointerAction;
use trackpad_touch_model::event::TouchEvent;

/// A producer of decoded touch events.
pub trait TouchSource: Send {
    /// Poll for the next event. Returns `None` if no event is available yet.
    fn poll(&mut self) -> TrackpadResult<Option<TouchEvent>>;

    /// Source name for logging.
    fn name(&self) -> &str;

    /// Whether the source will never produce another event.
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// A consumer of synthesized pointer actions.
pub trait PointerSink: Send {
    /// Emit one action.
    fn emit(&mut self, action: &PointerAction) -> TrackpadResult<()>;

    /// Sink name for logging.
    fn name(&self) -> &str;
}

/// Controls whether the compositor still receives the original device.
pub trait InputRouting: Send {
    /// Enable or disable the original device.
    fn set_enabled(&mut self, enabled: bool) -> TrackpadResult<()>;

    /// Routing strategy name for logging.
    fn name(&self) -> &str;
}

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub events_processed: u64,
    pub actions_emitted: u64,
}

/// One run of the emulator: routing disabled on entry, restored on exit.
pub struct TouchpadSession {
    source: Box<dyn TouchSource>,
    sink: Box<dyn PointerSink>,
    routing: Box<dyn InputRouting>,
    classifier: GestureClassifier,
    recorder: Option<writer::TraceWriter>,
    stop_flag: Arc<AtomicBool>,
    stats: SessionStats,
}

impl TouchpadSession {
    /// Create a session that leaves input routing untouched.
    pub fn new(
        source: Box<dyn TouchSource>,
        sink: Box<dyn PointerSink>,
        classifier: GestureClassifier,
    ) -> Self {
        Self {
            source,
            sink,
            routing: Box::new(backends::NoopRouting),
            classifier,
            recorder: None,
            stop_flag: Arc::new(AtomicBool::new(false)),
            stats: SessionStats::default(),
        }
    }

    /// Use `routing` to disable the original device while running.
    pub fn with_routing(mut self, routing: Box<dyn InputRouting>) -> Self {
        self.routing = routing;
        self
    }

    /// Append every consumed event to a trace file.
    pub fn with_recorder(mut self, recorder: writer::TraceWriter) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Run until the stop flag is set, the source is exhausted, or a
    /// collaborator fails.
    ///
    /// The original input routing is restored exactly once on every exit
    /// path, after any button still held has been released.
    pub async fn run(&mut self) -> TrackpadResult<SessionStats> {
        self.routing.set_enabled(false)?;
        tracing::info!(
            source = %self.source.name(),
            sink = %self.sink.name(),
            routing = %self.routing.name(),
            "Touchpad session started"
        );

        let outcome = self.pump().await;

        for action in self.classifier.cancel() {
            if let Err(e) = self.sink.emit(&action) {
                tracing::warn!(error = %e, %action, "Failed to release button on shutdown");
            }
        }
        if let Some(recorder) = self.recorder.as_mut() {
            if let Err(e) = recorder.flush() {
                tracing::warn!(error = %e, "Failed to flush trace");
            }
        }

        let restored = self.routing.set_enabled(true);
        if let Err(e) = &restored {
            tracing::error!(error = %e, "Failed to restore original input routing");
        }

        tracing::info!(
            events = self.stats.events_processed,
            actions = self.stats.actions_emitted,
            "Touchpad session stopped"
        );

        outcome?;
        restored?;
        Ok(self.stats)
    }

    async fn pump(&mut self) -> TrackpadResult<()> {
        while !self.stop_flag.load(Ordering::Relaxed) {
            if self.source.is_exhausted() {
                tracing::info!(source = %self.source.name(), "Touch source exhausted");
                break;
            }
            match self.source.poll() {
                Ok(Some(event)) => self.handle(&event)?,
                Ok(None) => {
                    // No event available, yield briefly
                    tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Touch source failed");
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    fn handle(&mut self, event: &TouchEvent) -> TrackpadResult<()> {
        self.stats.events_processed += 1;
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.write_event(event)?;
        }
        for action in self.classifier.process(event) {
            self.sink.emit(&action)?;
            self.stats.actions_emitted += 1;
        }
        Ok(())
    }

    /// Set the stop flag.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    /// Get the stop flag for external coordination.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Counters so far.
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backends::{RecordingSink, StubSource};
    use std::sync::Mutex;
    use trackpad_common::config::{GestureConfig, Orientation};
    use trackpad_common::error::TrackpadError;
    use trackpad_gesture_core::ScreenBounds;
    use trackpad_touch_model::action::Button;

    #[derive(Clone, Default)]
    struct RecordingRouting {
        calls: Arc<Mutex<Vec<bool>>>,
    }

    impl InputRouting for RecordingRouting {
        fn set_enabled(&mut self, enabled: bool) -> TrackpadResult<()> {
            self.calls.lock().unwrap().push(enabled);
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    struct FailingSource {
        remaining: Vec<TouchEvent>,
    }

    impl TouchSource for FailingSource {
        fn poll(&mut self) -> TrackpadResult<Option<TouchEvent>> {
            if self.remaining.is_empty() {
                Err(TrackpadError::source("device disappeared"))
            } else {
                Ok(Some(self.remaining.remove(0)))
            }
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn classifier() -> GestureClassifier {
        let config = GestureConfig {
            orientation: Orientation::Deg0,
            cursor_sensitivity: 1.0,
            ..GestureConfig::default()
        };
        GestureClassifier::new(config, ScreenBounds::new(1000, 1000)).unwrap()
    }

    fn open_three_finger_drag() -> Vec<TouchEvent> {
        let mut events = Vec::new();
        for slot in 0..3u32 {
            events.push(TouchEvent::SlotSelect { slot });
            events.push(TouchEvent::tracking(slot as i32));
            events.push(TouchEvent::PositionX {
                value: 100 * (slot as i32 + 1),
            });
            events.push(TouchEvent::PositionY { value: 100 });
        }
        events.push(TouchEvent::touch_down(0.0));
        events.push(TouchEvent::Sync);
        for step in 1..=3 {
            for slot in 0..3u32 {
                events.push(TouchEvent::SlotSelect { slot });
                events.push(TouchEvent::PositionY {
                    value: 100 + step * 60,
                });
            }
            events.push(TouchEvent::Sync);
        }
        events
    }

    #[tokio::test]
    async fn test_session_releases_drag_and_restores_routing() {
        let sink = RecordingSink::new();
        let routing = RecordingRouting::default();
        let mut session = TouchpadSession::new(
            Box::new(StubSource::new(open_three_finger_drag())),
            Box::new(sink.clone()),
            classifier(),
        )
        .with_routing(Box::new(routing.clone()));

        let stats = session.run().await.unwrap();

        let actions = sink.actions();
        assert_eq!(actions.first(), Some(&PointerAction::press(Button::Left)));
        assert_eq!(actions.last(), Some(&PointerAction::release(Button::Left)));
        assert_eq!(stats.actions_emitted as usize, actions.len() - 1);
        assert_eq!(*routing.calls.lock().unwrap(), vec![false, true]);
    }

    #[tokio::test]
    async fn test_stop_flag_ends_session_immediately() {
        let routing = RecordingRouting::default();
        let mut session = TouchpadSession::new(
            Box::new(StubSource::new(vec![TouchEvent::Sync])),
            Box::new(RecordingSink::new()),
            classifier(),
        )
        .with_routing(Box::new(routing.clone()));

        session.stop();
        let stats = session.run().await.unwrap();

        assert_eq!(stats.events_processed, 0);
        assert_eq!(*routing.calls.lock().unwrap(), vec![false, true]);
    }

    #[tokio::test]
    async fn test_source_failure_still_restores_routing() {
        let routing = RecordingRouting::default();
        let sink = RecordingSink::new();
        let mut session = TouchpadSession::new(
            Box::new(FailingSource {
                remaining: open_three_finger_drag(),
            }),
            Box::new(sink.clone()),
            classifier(),
        )
        .with_routing(Box::new(routing.clone()));

        let result = session.run().await;

        assert!(matches!(result, Err(TrackpadError::Source { .. })));
        assert_eq!(sink.actions().last(), Some(&PointerAction::release(Button::Left)));
        assert_eq!(*routing.calls.lock().unwrap(), vec![false, true]);
    }

    #[tokio::test]
    async fn test_stop_flag_from_another_task() {
        let mut session = TouchpadSession::new(
            Box::new(StubSource::empty()),
            Box::new(RecordingSink::new()),
            classifier(),
        );
        let flag = session.stop_flag();
        flag.store(true, Ordering::SeqCst);
        assert_eq!(session.run().await.unwrap(), SessionStats::default());
    }
}
