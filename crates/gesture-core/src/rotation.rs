//! Screen-orientation transform for touch coordinates.

use trackpad_common::config::Orientation;

/// Maximum raw coordinates reported by the touch panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenBounds {
    pub max_x: i32,
    pub max_y: i32,
}

impl ScreenBounds {
    pub fn new(max_x: i32, max_y: i32) -> Self {
        Self { max_x, max_y }
    }

    /// Bounds with X and Y extents exchanged, as seen after a quarter turn.
    pub fn swapped(self) -> Self {
        Self {
            max_x: self.max_y,
            max_y: self.max_x,
        }
    }
}

/// Rotate a raw point into screen orientation.
pub fn rotate(x: f64, y: f64, orientation: Orientation, bounds: ScreenBounds) -> (f64, f64) {
    let max_x = f64::from(bounds.max_x);
    let max_y = f64::from(bounds.max_y);
    match orientation {
        Orientation::Deg0 => (x, y),
        Orientation::Deg90 => (y, max_x - x),
        Orientation::Deg180 => (max_x - x, max_y - y),
        Orientation::Deg270 => (max_y - y, x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_identity() {
        let bounds = ScreenBounds::new(1000, 2000);
        assert_eq!(rotate(10.0, 20.0, Orientation::Deg0, bounds), (10.0, 20.0));
    }

    #[test]
    fn test_quarter_turn_example() {
        let bounds = ScreenBounds::new(1000, 2000);
        assert_eq!(rotate(100.0, 50.0, Orientation::Deg90, bounds), (50.0, 900.0));
    }

    #[test]
    fn test_half_and_three_quarter_turns() {
        let bounds = ScreenBounds::new(1000, 2000);
        assert_eq!(
            rotate(100.0, 50.0, Orientation::Deg180, bounds),
            (900.0, 1950.0)
        );
        assert_eq!(
            rotate(100.0, 50.0, Orientation::Deg270, bounds),
            (1950.0, 100.0)
        );
    }

    #[test]
    fn test_swapped_bounds() {
        assert_eq!(
            ScreenBounds::new(1000, 2000).swapped(),
            ScreenBounds::new(2000, 1000)
        );
    }

    fn bounds_for_inverse(orientation: Orientation, bounds: ScreenBounds) -> ScreenBounds {
        if orientation.swaps_axes() {
            bounds.swapped()
        } else {
            bounds
        }
    }

    proptest! {
        #[test]
        fn prop_half_turn_is_self_inverse(
            x in 0i32..4096,
            y in 0i32..4096,
            max_x in 1i32..8192,
            max_y in 1i32..8192,
        ) {
            let bounds = ScreenBounds::new(max_x, max_y);
            let (rx, ry) = rotate(f64::from(x), f64::from(y), Orientation::Deg180, bounds);
            let back = rotate(rx, ry, Orientation::Deg180, bounds);
            prop_assert_eq!(back, (f64::from(x), f64::from(y)));
        }

        #[test]
        fn prop_inverse_round_trips(
            x in 0i32..4096,
            y in 0i32..4096,
            max_x in 1i32..8192,
            max_y in 1i32..8192,
            index in 0usize..4,
        ) {
            let orientation = Orientation::ALL[index];
            let bounds = ScreenBounds::new(max_x, max_y);
            let (rx, ry) = rotate(f64::from(x), f64::from(y), orientation, bounds);
            let back = rotate(
                rx,
                ry,
                orientation.inverse(),
                bounds_for_inverse(orientation, bounds),
            );
            prop_assert_eq!(back, (f64::from(x), f64::from(y)));
        }
    }
}
