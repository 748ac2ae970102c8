//! Gesture classification state machine.
//!
//! The classifier consumes decoded touch events one at a time and returns
//! the pointer actions each event produces. A gesture episode runs from
//! the touch-down transition to the touch-up transition; within it:
//!
//! - Nothing is emitted until every active finger has travelled past the
//!   movement threshold (`Settling` → `Tracking`). The boundary that makes
//!   this transition only records the reference point.
//! - While tracking, one finger moves the cursor, two fingers scroll once,
//!   and three fingers hold the left button and drag.
//! - On touch-up a short, still episode becomes a left click (one finger)
//!   or right click (two fingers). Every button pressed during the
//!   episode is released exactly once.

use trackpad_common::config::GestureConfig;
use trackpad_common::error::TrackpadResult;
use trackpad_touch_model::action::{Button, PointerAction};
use trackpad_touch_model::event::{TimestampSecs, TouchEvent, TRACKING_RELEASED};

use crate::rotation::{rotate, ScreenBounds};
use crate::tracker::ContactTracker;

/// Coarse classifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    /// No finger on the panel.
    Idle,
    /// Fingers down, not all of them have moved yet.
    Settling,
    /// Fingers down and moving; actions are being emitted.
    Tracking,
}

/// Per-episode flags. Reset only when the episode ends.
#[derive(Debug, Default)]
struct EpisodeState {
    start_time: Option<TimestampSecs>,
    moved: bool,
    scrolled: bool,
    dragging: bool,
    last_reference: Option<(f64, f64)>,
    reference_contacts: usize,
    left_held: bool,
    right_held: bool,
}

impl EpisodeState {
    fn held(&mut self, button: Button) -> &mut bool {
        match button {
            Button::Left => &mut self.left_held,
            Button::Right => &mut self.right_held,
        }
    }
}

/// Sign of a delta: +1, -1 or 0.
pub fn qualify(delta: f64) -> i32 {
    if delta > 0.0 {
        1
    } else if delta < 0.0 {
        -1
    } else {
        0
    }
}

/// Multitouch gesture recognizer.
#[derive(Debug)]
pub struct GestureClassifier {
    config: GestureConfig,
    bounds: ScreenBounds,
    tracker: ContactTracker,
    episode: EpisodeState,
    current_slot: u32,
}

impl GestureClassifier {
    /// Create a classifier for a panel with the given bounds.
    pub fn new(config: GestureConfig, bounds: ScreenBounds) -> TrackpadResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            bounds,
            tracker: ContactTracker::new(),
            episode: EpisodeState::default(),
            current_slot: 0,
        })
    }

    /// Feed one event and collect the actions it produces.
    pub fn process(&mut self, event: &TouchEvent) -> Vec<PointerAction> {
        let mut actions = Vec::new();
        match *event {
            TouchEvent::SlotSelect { slot } => self.current_slot = slot,
            TouchEvent::Tracking { id } if id == TRACKING_RELEASED => {
                self.tracker.release_contact(self.current_slot);
            }
            TouchEvent::Tracking { .. } => self.tracker.begin_contact(self.current_slot),
            TouchEvent::PositionX { value } => {
                self.tracker.update_x(self.current_slot, value);
            }
            TouchEvent::PositionY { value } => {
                self.tracker.update_y(self.current_slot, value);
            }
            TouchEvent::Sync => self.on_sync(&mut actions),
            TouchEvent::Touch {
                pressed: true,
                timestamp,
            } => self.on_touch_down(timestamp),
            TouchEvent::Touch {
                pressed: false,
                timestamp,
            } => self.on_touch_up(timestamp, &mut actions),
        }
        for action in &actions {
            tracing::trace!(%action, "gesture action");
        }
        actions
    }

    /// Abandon the open episode, releasing any button still held.
    pub fn cancel(&mut self) -> Vec<PointerAction> {
        let mut actions = Vec::new();
        self.release_held(&mut actions);
        if !actions.is_empty() {
            tracing::info!(released = actions.len(), "Released held buttons on cancel");
        }
        self.reset_episode();
        actions
    }

    /// Current coarse state.
    pub fn phase(&self) -> GesturePhase {
        if self.tracker.is_empty() {
            GesturePhase::Idle
        } else if self.episode.moved {
            GesturePhase::Tracking
        } else {
            GesturePhase::Settling
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn bounds(&self) -> ScreenBounds {
        self.bounds
    }

    pub fn tracker(&self) -> &ContactTracker {
        &self.tracker
    }

    /// Whether a three-finger drag currently holds the left button.
    pub fn is_dragging(&self) -> bool {
        self.episode.dragging
    }

    /// Whether this episode already produced its scroll.
    pub fn has_scrolled(&self) -> bool {
        self.episode.scrolled
    }

    /// Reference point of the previous boundary, in screen orientation.
    pub fn last_reference(&self) -> Option<(f64, f64)> {
        self.episode.last_reference
    }

    fn on_sync(&mut self, actions: &mut Vec<PointerAction>) {
        let Some((cx, cy)) = self.tracker.centroid() else {
            return;
        };
        let current = rotate(cx, cy, self.config.orientation, self.bounds);
        let contacts = self.tracker.active_count();

        if !self.episode.moved {
            if self.tracker.all_moved_beyond(self.settle_threshold()) {
                tracing::debug!(contacts, "Motion started");
                self.episode.moved = true;
            }
        } else if let Some(last) = self.episode.last_reference {
            if self.episode.reference_contacts == contacts {
                self.dispatch(current, last, actions);
            } else {
                // Centroid of a different finger set; only rebase.
                tracing::debug!(
                    from = self.episode.reference_contacts,
                    to = contacts,
                    "Contact count changed"
                );
            }
        }

        if self.episode.moved {
            self.episode.last_reference = Some(current);
            self.episode.reference_contacts = contacts;
        }
    }

    /// Two resting fingers must clear the scroll threshold; any other
    /// posture uses the movement threshold.
    fn settle_threshold(&self) -> i32 {
        if self.tracker.active_count() == 2 {
            self.config.scroll_threshold
        } else {
            self.config.movement_threshold
        }
    }

    fn dispatch(
        &mut self,
        current: (f64, f64),
        last: (f64, f64),
        actions: &mut Vec<PointerAction>,
    ) {
        match self.tracker.active_count() {
            1 => actions.push(self.cursor_motion(current, last)),
            2 if !self.episode.scrolled => {
                let sensitivity = self.config.scroll_sensitivity;
                actions.push(PointerAction::Scroll {
                    dx_ticks: qualify(current.0 - last.0) * sensitivity,
                    dy_ticks: qualify(current.1 - last.1) * sensitivity,
                });
                self.episode.scrolled = true;
                tracing::debug!("Two-finger scroll");
            }
            3 => {
                if !self.episode.dragging {
                    self.press(Button::Left, actions);
                    self.episode.dragging = true;
                    tracing::debug!("Three-finger drag started");
                }
                actions.push(self.cursor_motion(current, last));
            }
            _ => {}
        }
    }

    fn cursor_motion(&self, current: (f64, f64), last: (f64, f64)) -> PointerAction {
        let sensitivity = self.config.cursor_sensitivity;
        PointerAction::Move {
            dx: ((current.0 - last.0) * sensitivity).round() as i32,
            dy: ((current.1 - last.1) * sensitivity).round() as i32,
        }
    }

    fn on_touch_down(&mut self, timestamp: TimestampSecs) {
        if self.episode.start_time.is_some() {
            tracing::debug!("Touch-down while an episode is open, restarting its clock");
        }
        self.episode.start_time = Some(timestamp);
        self.episode.last_reference = None;
    }

    fn on_touch_up(&mut self, timestamp: TimestampSecs, actions: &mut Vec<PointerAction>) {
        if let Some(start) = self.episode.start_time {
            let elapsed = timestamp - start;
            if self.is_tap(elapsed) {
                let fingers = self.tracker.episode_count();
                tracing::debug!(fingers, elapsed, "Tap recognized");
                match fingers {
                    2 => self.press(Button::Right, actions),
                    1 => self.press(Button::Left, actions),
                    _ => {}
                }
            }
        }
        self.release_held(actions);
        self.reset_episode();
    }

    fn is_tap(&self, elapsed: f64) -> bool {
        elapsed < self.config.tap_duration_secs
            && self
                .tracker
                .episode_contacts()
                .all(|contact| contact.stayed_within(self.config.movement_threshold))
    }

    fn press(&mut self, button: Button, actions: &mut Vec<PointerAction>) {
        let held = self.episode.held(button);
        if !*held {
            *held = true;
            actions.push(PointerAction::press(button));
        }
    }

    /// Release held buttons, right before left. Buttons that were never
    /// pressed get no up event, so the stream differs from an
    /// unconditional right-up/left-up pair at every episode end.
    fn release_held(&mut self, actions: &mut Vec<PointerAction>) {
        for button in [Button::Right, Button::Left] {
            let held = self.episode.held(button);
            if *held {
                *held = false;
                actions.push(PointerAction::release(button));
            }
        }
    }

    fn reset_episode(&mut self) {
        self.episode = EpisodeState::default();
        self.tracker.clear();
    }
}
