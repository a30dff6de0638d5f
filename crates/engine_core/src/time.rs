//! Time management for the game loop.
//!
//! [`SimClock`] is the only clock the simulation reads: it advances by a fixed
//! step per tick so cooldowns replay identically. [`Time`] measures wall-clock
//! frames and tells the driver when the next fixed step is due.

use std::time::{Duration, Instant};

/// Default simulation rate in ticks per second.
pub const DEFAULT_TICK_RATE: f64 = 60.0;

/// Deterministic tick counter with a fixed step length.
#[derive(Debug, Clone)]
pub struct SimClock {
    tick: u64,
    step: Duration,
    elapsed: Duration,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_RATE)
    }
}

impl SimClock {
    pub fn new(rate_hz: f64) -> Self {
        Self {
            tick: 0,
            step: Duration::from_secs_f64(1.0 / rate_hz),
            elapsed: Duration::ZERO,
        }
    }

    /// Advance by exactly one step.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed += self.step;
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated time since the first tick, in milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    pub fn step(&self) -> Duration {
        self.step
    }
}

/// Manages frame timing and fixed-step accumulation for the driver loop.
#[derive(Debug)]
pub struct Time {
    /// Time of the last frame.
    last_frame: Instant,
    /// Duration of the last frame.
    delta: Duration,
    /// Fixed timestep for the simulation (default 60 Hz).
    fixed_timestep: Duration,
    /// Accumulated time for fixed updates.
    accumulator: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            fixed_timestep: Duration::from_secs_f64(1.0 / DEFAULT_TICK_RATE),
            accumulator: Duration::ZERO,
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_frame;
        self.last_frame = now;
        self.accumulator += self.delta;
    }

    /// Time left until the next fixed update is due.
    pub fn until_next_fixed(&self) -> Duration {
        self.fixed_timestep.saturating_sub(self.accumulator)
    }

    /// Check if a fixed update should run and consume the time.
    pub fn should_fixed_update(&mut self) -> bool {
        if self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            true
        } else {
            false
        }
    }

    /// Set the fixed timestep rate in Hz.
    pub fn set_fixed_rate(&mut self, hz: f64) {
        self.fixed_timestep = Duration::from_secs_f64(1.0 / hz);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_clock_advances_fixed_steps() {
        let mut clock = SimClock::new(50.0);
        for _ in 0..50 {
            clock.advance();
        }
        assert_eq!(clock.tick(), 50);
        assert_eq!(clock.elapsed_ms(), 1000);
    }

    #[test]
    fn fixed_update_consumes_accumulator() {
        let mut time = Time::new();
        time.set_fixed_rate(1000.0);
        time.accumulator = Duration::from_millis(3);
        assert!(time.should_fixed_update());
        assert!(time.should_fixed_update());
        assert!(time.should_fixed_update());
        assert!(!time.should_fixed_update());
    }
}
