//! Per-slot touch contact tracking.
//!
//! The kernel multitouch protocol reports positions per slot and per
//! axis, and the two axes of a new contact may arrive one or more events
//! after its tracking id. A contact therefore stays "partial" until both
//! axes have been reported: it counts toward the number of fingers down
//! but is left out of the centroid.

use std::collections::BTreeMap;

/// One finger on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchContact {
    pub slot: u32,
    pub initial_x: Option<i32>,
    pub initial_y: Option<i32>,
    pub current_x: Option<i32>,
    pub current_y: Option<i32>,
}

impl TouchContact {
    fn new(slot: u32) -> Self {
        Self {
            slot,
            initial_x: None,
            initial_y: None,
            current_x: None,
            current_y: None,
        }
    }

    /// Current position, once both axes have been reported.
    pub fn position(&self) -> Option<(i32, i32)> {
        self.current_x.zip(self.current_y)
    }

    /// Absolute travel from the initial position on each axis.
    /// An axis that has not been reported yet has not moved.
    pub fn displacement(&self) -> (i32, i32) {
        fn axis(initial: Option<i32>, current: Option<i32>) -> i32 {
            match (initial, current) {
                (Some(i), Some(c)) => c.saturating_sub(i).saturating_abs(),
                _ => 0,
            }
        }
        (
            axis(self.initial_x, self.current_x),
            axis(self.initial_y, self.current_y),
        )
    }

    /// Travel exceeds `threshold` on at least one axis.
    pub fn moved_beyond(&self, threshold: i32) -> bool {
        let (dx, dy) = self.displacement();
        dx > threshold || dy > threshold
    }

    /// Travel stays below `threshold` on both axes.
    pub fn stayed_within(&self, threshold: i32) -> bool {
        let (dx, dy) = self.displacement();
        dx < threshold && dy < threshold
    }

    fn set_x(&mut self, value: i32) {
        if self.initial_x.is_none() {
            self.initial_x = Some(value);
        }
        self.current_x = Some(value);
    }

    fn set_y(&mut self, value: i32) {
        if self.initial_y.is_none() {
            self.initial_y = Some(value);
        }
        self.current_y = Some(value);
    }
}

/// Active contacts keyed by slot, plus the contacts already lifted during
/// the current gesture episode.
#[derive(Debug, Default)]
pub struct ContactTracker {
    active: BTreeMap<u32, TouchContact>,
    released: Vec<TouchContact>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh contact in `slot`.
    ///
    /// A contact still occupying the slot is retired as if it had lifted.
    pub fn begin_contact(&mut self, slot: u32) {
        if let Some(previous) = self.active.insert(slot, TouchContact::new(slot)) {
            tracing::debug!(slot, "slot reassigned without release");
            self.released.push(previous);
        }
    }

    /// Lift the contact in `slot`. Unknown slots are ignored.
    pub fn release_contact(&mut self, slot: u32) {
        if let Some(contact) = self.active.remove(&slot) {
            self.released.push(contact);
        }
    }

    /// Record an X report. Returns `false` if no contact occupies `slot`.
    pub fn update_x(&mut self, slot: u32, value: i32) -> bool {
        match self.active.get_mut(&slot) {
            Some(contact) => {
                contact.set_x(value);
                true
            }
            None => {
                tracing::trace!(slot, value, "x report for inactive slot ignored");
                false
            }
        }
    }

    /// Record a Y report. Returns `false` if no contact occupies `slot`.
    pub fn update_y(&mut self, slot: u32, value: i32) -> bool {
        match self.active.get_mut(&slot) {
            Some(contact) => {
                contact.set_y(value);
                true
            }
            None => {
                tracing::trace!(slot, value, "y report for inactive slot ignored");
                false
            }
        }
    }

    /// Active contacts ordered by slot.
    pub fn active_contacts(&self) -> impl Iterator<Item = &TouchContact> {
        self.active.values()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Every contact that touched down during the current episode.
    pub fn episode_contacts(&self) -> impl Iterator<Item = &TouchContact> {
        self.released.iter().chain(self.active.values())
    }

    pub fn episode_count(&self) -> usize {
        self.released.len() + self.active.len()
    }

    /// Mean current position of the contacts with both axes known.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        let (count, sum_x, sum_y) = self
            .active
            .values()
            .filter_map(TouchContact::position)
            .fold((0usize, 0i64, 0i64), |(n, sx, sy), (x, y)| {
                (n + 1, sx + i64::from(x), sy + i64::from(y))
            });
        if count == 0 {
            return None;
        }
        let n = count as f64;
        Some((sum_x as f64 / n, sum_y as f64 / n))
    }

    /// Whether every active contact, partial ones included, has travelled
    /// beyond `threshold`. False when nothing is active.
    pub fn all_moved_beyond(&self, threshold: i32) -> bool {
        !self.active.is_empty() && self.active.values().all(|c| c.moved_beyond(threshold))
    }

    /// Forget all contacts, active and released.
    pub fn clear(&mut self) {
        self.active.clear();
        self.released.clear();
    }
}
