//! Virtual relative pointer backed by uinput.

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key, RelativeAxisType};

use trackpad_common::error::{TrackpadError, TrackpadResult};
use trackpad_input_session::PointerSink;
use trackpad_touch_model::action::{Button, PointerAction};

/// Default name of the virtual pointer.
pub const VIRTUAL_POINTER_NAME: &str = "Trackpad Emulator";

/// A uinput mouse with motion, both wheels, and left/right buttons.
pub struct UinputPointer {
    device: VirtualDevice,
}

impl UinputPointer {
    /// Create the virtual device. Requires write access to `/dev/uinput`.
    pub fn create(name: &str) -> TrackpadResult<Self> {
        let mut keys = AttributeSet::<Key>::new();
        keys.insert(Key::BTN_LEFT);
        keys.insert(Key::BTN_RIGHT);

        let mut axes = AttributeSet::<RelativeAxisType>::new();
        axes.insert(RelativeAxisType::REL_X);
        axes.insert(RelativeAxisType::REL_Y);
        axes.insert(RelativeAxisType::REL_WHEEL);
        axes.insert(RelativeAxisType::REL_HWHEEL);

        let device = VirtualDeviceBuilder::new()
            .and_then(|builder| builder.name(name).with_keys(&keys))
            .and_then(|builder| builder.with_relative_axes(&axes))
            .and_then(|builder| builder.build())
            .map_err(|e| TrackpadError::emitter(format!("Failed to create uinput device: {e}")))?;

        tracing::info!(name, "Virtual pointer created");
        Ok(Self { device })
    }
}

impl PointerSink for UinputPointer {
    fn emit(&mut self, action: &PointerAction) -> TrackpadResult<()> {
        let events = encode_action(action);
        if events.is_empty() {
            return Ok(());
        }
        self.device
            .emit(&events)
            .map_err(|e| TrackpadError::emitter(format!("Failed to write {action}: {e}")))
    }

    fn name(&self) -> &str {
        "uinput"
    }
}

/// Translate an action into the evdev events that realize it.
///
/// Zero-valued axes are dropped. The horizontal wheel is inverted so a
/// rightward swipe scrolls content to the right.
pub fn encode_action(action: &PointerAction) -> Vec<InputEvent> {
    let rel = |axis: RelativeAxisType, value: i32| {
        (value != 0).then(|| InputEvent::new(EventType::RELATIVE, axis.0, value))
    };
    match *action {
        PointerAction::Move { dx, dy } => [
            rel(RelativeAxisType::REL_X, dx),
            rel(RelativeAxisType::REL_Y, dy),
        ]
        .into_iter()
        .flatten()
        .collect(),
        PointerAction::Scroll { dx_ticks, dy_ticks } => [
            rel(RelativeAxisType::REL_HWHEEL, -dx_ticks),
            rel(RelativeAxisType::REL_WHEEL, dy_ticks),
        ]
        .into_iter()
        .flatten()
        .collect(),
        PointerAction::Button { button, transition } => {
            let key = match button {
                Button::Left => Key::BTN_LEFT,
                Button::Right => Key::BTN_RIGHT,
            };
            vec![InputEvent::new(
                EventType::KEY,
                key.code(),
                transition.key_value(),
            )]
        }
    }
}
