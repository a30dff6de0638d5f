//! Per-player controller snapshots and the exchange point the device thread
//! writes into.
//!
//! Device polling lives outside the simulation. Each player owns one
//! [`InputSlot`]: the polling thread calls [`InputSlot::publish`], the
//! simulation calls [`InputSlot::snapshot`] once per tick and works from that
//! copy for the whole step.

use glam::Vec2;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Stick readings below this magnitude are treated as centred.
pub const DEAD_ZONE: f32 = 0.1;
/// Stick readings above this magnitude are treated as sensor noise.
pub const NOISE_CEILING: f32 = 10.0;

/// Controller buttons the simulation cares about, independent of device layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Jump when grounded.
    Jump,
    /// Fire a projectile.
    Fire,
    /// Pin the player in place while held.
    Hold,
}

/// One consistent reading of a controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    axes: Vec2,
    pressed: HashSet<Button>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stick value, applying [`filter_axis`] to each component.
    pub fn with_axes(mut self, x: f32, y: f32) -> Self {
        self.axes = Vec2::new(filter_axis(x), filter_axis(y));
        self
    }

    pub fn with_button(mut self, button: Button) -> Self {
        self.pressed.insert(button);
        self
    }

    pub fn set_button(&mut self, button: Button, down: bool) {
        if down {
            self.pressed.insert(button);
        } else {
            self.pressed.remove(&button);
        }
    }

    pub fn get_axes(&self) -> Vec2 {
        self.axes
    }

    pub fn is_button_pressed(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }
}

/// Zero out readings inside the dead zone or beyond the noise ceiling.
pub fn filter_axis(value: f32) -> f32 {
    let magnitude = value.abs();
    if magnitude < DEAD_ZONE || magnitude > NOISE_CEILING || value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Mutex-guarded exchange point for the latest reading of one controller.
#[derive(Debug, Default)]
pub struct InputSlot {
    latest: Mutex<InputSnapshot>,
}

/// Shared handle a player keeps to its slot.
pub type InputBinding = Arc<InputSlot>;

impl InputSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn binding() -> InputBinding {
        Arc::new(Self::new())
    }

    /// Replace the stored reading.
    pub fn publish(&self, snapshot: InputSnapshot) {
        match self.latest.lock() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => {
                log::warn!("input slot poisoned, overwriting");
                *poisoned.into_inner() = snapshot;
            }
        }
    }

    /// Copy out the stored reading.
    pub fn snapshot(&self) -> InputSnapshot {
        match self.latest.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => {
                log::warn!("input slot poisoned, reading last written value");
                poisoned.into_inner().clone()
            }
        }
    }
}

/// Query interface over every player's controller.
pub trait InputSource {
    fn get_axes(&self, player: u32) -> Vec2;
    fn is_button_pressed(&self, player: u32, button: Button) -> bool;
}

/// All player slots keyed by player id.
#[derive(Debug, Default)]
pub struct InputHub {
    slots: HashMap<u32, InputBinding>,
}

impl InputHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the slot for a player.
    pub fn bind(&mut self, player: u32) -> InputBinding {
        self.slots.entry(player).or_insert_with(InputSlot::binding).clone()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl InputSource for InputHub {
    fn get_axes(&self, player: u32) -> Vec2 {
        self.slots
            .get(&player)
            .map(|slot| slot.snapshot().get_axes())
            .unwrap_or(Vec2::ZERO)
    }

    fn is_button_pressed(&self, player: u32, button: Button) -> bool {
        self.slots
            .get(&player)
            .is_some_and(|slot| slot.snapshot().is_button_pressed(button))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn dead_zone_and_noise_filtered() {
        assert_eq!(filter_axis(0.05), 0.0);
        assert_eq!(filter_axis(-0.5), -0.5);
        assert_eq!(filter_axis(42.0), 0.0);
        assert_eq!(filter_axis(f32::NAN), 0.0);
    }

    #[test]
    fn snapshot_reflects_latest_publish_from_other_thread() {
        let slot = InputSlot::binding();
        let writer = slot.clone();
        thread::spawn(move || {
            writer.publish(InputSnapshot::new().with_axes(1.0, 0.0).with_button(Button::Fire));
        })
        .join()
        .expect("writer thread panicked");

        let snap = slot.snapshot();
        assert_eq!(snap.get_axes(), Vec2::new(1.0, 0.0));
        assert!(snap.is_button_pressed(Button::Fire));
        assert!(!snap.is_button_pressed(Button::Jump));
    }

    #[test]
    fn hub_answers_for_unknown_players() {
        let mut hub = InputHub::new();
        let slot = hub.bind(0);
        slot.publish(InputSnapshot::new().with_button(Button::Jump));
        assert!(hub.is_button_pressed(0, Button::Jump));
        assert!(!hub.is_button_pressed(7, Button::Jump));
        assert_eq!(hub.get_axes(7), Vec2::ZERO);
    }

    #[test]
    fn set_button_releases() {
        let mut snap = InputSnapshot::new().with_button(Button::Hold);
        snap.set_button(Button::Hold, false);
        assert!(!snap.is_button_pressed(Button::Hold));
    }
}
