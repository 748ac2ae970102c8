//! In-process collaborators for replays and tests.

use std::sync::{Arc, Mutex};

use trackpad_common::error::TrackpadResult;
use trackpad_touch_model::action::PointerAction;
use trackpad_touch_model::event::TouchEvent;

use crate::{InputRouting, PointerSink, TouchSource};

/// Source that plays back a fixed list of events.
pub struct StubSource {
    events: Vec<TouchEvent>,
    index: usize,
}

impl StubSource {
    /// Create a stub source with pre-loaded events.
    pub fn new(events: Vec<TouchEvent>) -> Self {
        Self { events, index: 0 }
    }

    /// Create an empty stub that never produces events.
    pub fn empty() -> Self {
        Self {
            events: vec![],
            index: 0,
        }
    }
}

impl TouchSource for StubSource {
    fn poll(&mut self) -> TrackpadResult<Option<TouchEvent>> {
        if self.index < self.events.len() {
            let event = self.events[self.index].clone();
            self.index += 1;
            Ok(Some(event))
        } else {
            Ok(None)
        }
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn is_exhausted(&self) -> bool {
        self.index >= self.events.len()
    }
}

/// Sink that keeps every emitted action in a shared buffer.
#[derive(Clone, Default)]
pub struct RecordingSink {
    actions: Arc<Mutex<Vec<PointerAction>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the actions emitted so far.
    pub fn actions(&self) -> Vec<PointerAction> {
        self.actions
            .lock()
            .map(|actions| actions.clone())
            .unwrap_or_default()
    }
}

impl PointerSink for RecordingSink {
    fn emit(&mut self, action: &PointerAction) -> TrackpadResult<()> {
        if let Ok(mut actions) = self.actions.lock() {
            actions.push(*action);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Sink that prints each action to stdout.
pub struct PrintSink {
    json: bool,
}

impl PrintSink {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl PointerSink for PrintSink {
    fn emit(&mut self, action: &PointerAction) -> TrackpadResult<()> {
        if self.json {
            println!("{}", serde_json::to_string(action)?);
        } else {
            println!("{action}");
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "print"
    }
}

/// Routing that leaves the original device untouched.
pub struct NoopRouting;

impl InputRouting for NoopRouting {
    fn set_enabled(&mut self, enabled: bool) -> TrackpadResult<()> {
        tracing::debug!(enabled, "Input routing left unchanged");
        Ok(())
    }

    fn name(&self) -> &str {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stub_source_plays_back_in_order() {
        let mut source = StubSource::new(vec![TouchEvent::Sync, TouchEvent::release()]);
        assert!(!source.is_exhausted());
        assert_eq!(source.poll().unwrap(), Some(TouchEvent::Sync));
        assert_eq!(source.poll().unwrap(), Some(TouchEvent::release()));
        assert!(source.is_exhausted());
        assert_eq!(source.poll().unwrap(), None);
    }

    #[test]
    fn test_empty_stub_is_exhausted() {
        assert!(StubSource::empty().is_exhausted());
    }

    #[test]
    fn test_recording_sink_clones_share_buffer() {
        let sink = RecordingSink::new();
        let mut writer = sink.clone();
        writer
            .emit(&PointerAction::Move { dx: 1, dy: 2 })
            .unwrap();
        assert_eq!(sink.actions(), vec![PointerAction::Move { dx: 1, dy: 2 }]);
    }
}
