//! Common components shared by players, zombies and projectiles.

/// Health component for damageable entities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// Pursuit state of a hostile unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AIState {
    /// No target acquired.
    #[default]
    Searching,
    /// Target held, outside attack range.
    Pursuing,
    /// Target within attack range.
    Attacking,
}
