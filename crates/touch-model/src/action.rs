//! Pointer actions produced by the gesture engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Emulated pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    Left,
    Right,
}

/// Button state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Down,
    Up,
}

impl Transition {
    /// Key value as written to an evdev `EV_KEY` event.
    pub fn key_value(self) -> i32 {
        match self {
            Transition::Down => 1,
            Transition::Up => 0,
        }
    }
}

/// A synthesized action for a virtual relative pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PointerAction {
    /// Relative cursor motion.
    Move { dx: i32, dy: i32 },

    /// Wheel ticks, already scaled by the scroll sensitivity.
    Scroll { dx_ticks: i32, dy_ticks: i32 },

    /// Button press or release.
    Button {
        button: Button,
        transition: Transition,
    },
}

impl PointerAction {
    pub fn press(button: Button) -> Self {
        PointerAction::Button {
            button,
            transition: Transition::Down,
        }
    }

    pub fn release(button: Button) -> Self {
        PointerAction::Button {
            button,
            transition: Transition::Up,
        }
    }
}

impl fmt::Display for PointerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerAction::Move { dx, dy } => write!(f, "move dx={dx} dy={dy}"),
            PointerAction::Scroll { dx_ticks, dy_ticks } => {
                write!(f, "scroll dx={dx_ticks} dy={dy_ticks}")
            }
            PointerAction::Button { button, transition } => {
                write!(f, "button {button:?} {transition:?}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_release_helpers() {
        assert_eq!(
            PointerAction::press(Button::Right),
            PointerAction::Button {
                button: Button::Right,
                transition: Transition::Down
            }
        );
        assert_eq!(Transition::Down.key_value(), 1);
        assert_eq!(Transition::Up.key_value(), 0);
    }

    #[test]
    fn test_action_json_shape() {
        let json = serde_json::to_string(&PointerAction::Move { dx: 3, dy: -4 }).unwrap();
        assert_eq!(json, r#"{"action":"move","dx":3,"dy":-4}"#);

        let json = serde_json::to_string(&PointerAction::release(Button::Left)).unwrap();
        assert_eq!(
            json,
            r#"{"action":"button","button":"left","transition":"up"}"#
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            PointerAction::Scroll {
                dx_ticks: 0,
                dy_ticks: -2
            }
            .to_string(),
            "scroll dx=0 dy=-2"
        );
    }
}
