use std::path::PathBuf;

use trackpad_common::config::GestureConfig;
use trackpad_gesture_core::{GestureClassifier, GesturePhase, ScreenBounds};
use trackpad_touch_model::action::{Button, PointerAction};
use trackpad_touch_model::event::parse_trace;

fn replay_fixture(name: &str) -> (GestureClassifier, Vec<PointerAction>) {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("traces")
        .join(name);

    let content = std::fs::read_to_string(path).expect("fixture trace should be readable");
    let (header, events) = parse_trace(&content).expect("fixture trace should parse");
    let header = header.expect("fixture trace should carry a header");

    let config = GestureConfig {
        orientation: header.orientation,
        ..GestureConfig::default()
    };
    let mut classifier =
        GestureClassifier::new(config, ScreenBounds::new(header.max_x, header.max_y))
            .expect("default config is valid");

    let actions = events
        .iter()
        .flat_map(|event| classifier.process(event))
        .collect();
    (classifier, actions)
}

#[test]
fn tap_then_move_fixture() {
    let (classifier, actions) = replay_fixture("tap_then_move.jsonl");

    assert_eq!(
        actions,
        vec![
            PointerAction::press(Button::Left),
            PointerAction::release(Button::Left),
            PointerAction::Move { dx: -24, dy: 36 },
            PointerAction::Move { dx: -12, dy: 36 },
            PointerAction::Move { dx: -12, dy: 24 },
        ]
    );
    assert_eq!(classifier.phase(), GesturePhase::Idle);
}

#[test]
fn scroll_then_right_tap_fixture() {
    let (_, actions) = replay_fixture("scroll_then_right_tap.jsonl");

    assert_eq!(
        actions,
        vec![
            PointerAction::Scroll {
                dx_ticks: 0,
                dy_ticks: 2
            },
            PointerAction::press(Button::Right),
            PointerAction::release(Button::Right),
        ]
    );
}

#[test]
fn three_finger_drag_fixture_with_lagging_axes() {
    let (classifier, actions) = replay_fixture("three_finger_drag.jsonl");

    let mut expected = vec![PointerAction::press(Button::Left)];
    expected.extend(std::iter::repeat(PointerAction::Move { dx: 42, dy: 0 }).take(4));
    expected.push(PointerAction::release(Button::Left));

    assert_eq!(actions, expected);
    assert!(!classifier.is_dragging());
}

#[test]
fn every_fixture_balances_button_transitions() {
    for name in [
        "tap_then_move.jsonl",
        "scroll_then_right_tap.jsonl",
        "three_finger_drag.jsonl",
    ] {
        let (_, actions) = replay_fixture(name);
        for button in [Button::Left, Button::Right] {
            let downs = actions
                .iter()
                .filter(|a| **a == PointerAction::press(button))
                .count();
            let ups = actions
                .iter()
                .filter(|a| **a == PointerAction::release(button))
                .count();
            assert_eq!(downs, ups, "{name}: unbalanced {button:?} transitions");
        }
    }
}
