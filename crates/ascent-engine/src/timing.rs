//! Fixed-timestep clock for the simulation loop.
//!
//! Wall-clock deltas are clamped and accumulated into whole controller ticks.

use std::time::Instant;

/// Maximum fixed updates run for one wall-clock frame.
const MAX_UPDATES_PER_FRAME: u32 = 10;

/// Frame timing manager.
#[derive(Debug)]
pub struct FrameTiming {
    /// Time of last frame start
    last_frame: Instant,
    /// Accumulator for fixed timestep
    accumulator: f32,
    /// Fixed timestep delta
    fixed_dt: f32,
    /// Maximum delta time to prevent spiral of death
    max_dt: f32,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FrameTiming {
    /// Create a clock ticking `tick_rate` times per second.
    #[must_use]
    pub fn new(tick_rate: u32) -> Self {
        Self {
            last_frame: Instant::now(),
            accumulator: 0.0,
            fixed_dt: 1.0 / tick_rate.max(1) as f32,
            max_dt: 0.25,
        }
    }

    /// Get the fixed timestep value.
    #[must_use]
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Calculate delta time since last frame, clamped to `max_dt`.
    pub fn delta_time(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        dt.min(self.max_dt)
    }

    /// Accumulate time for fixed timestep updates.
    /// Returns the number of fixed updates that should be performed.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        self.accumulator += dt;
        let mut count = 0;

        while self.accumulator >= self.fixed_dt && count < MAX_UPDATES_PER_FRAME {
            self.accumulator -= self.fixed_dt;
            count += 1;
        }

        // Still behind: drop the backlog
        if self.accumulator > self.fixed_dt * 2.0 {
            self.accumulator = 0.0;
        }

        count
    }

    /// Reset timing state.
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_frame_timing_creation() {
        let timing = FrameTiming::new(50);
        assert!((timing.fixed_dt() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_zero_tick_rate_is_clamped() {
        let timing = FrameTiming::new(0);
        assert_eq!(timing.fixed_dt(), 1.0);
    }

    #[test]
    fn test_frame_timing_max_dt() {
        let mut timing = FrameTiming::new(60);
        std::thread::sleep(Duration::from_millis(5));
        let dt = timing.delta_time();
        assert!(dt > 0.0);
        assert!(dt <= 0.25);
    }

    #[test]
    fn test_fixed_timestep() {
        let mut timing = FrameTiming::new(50);
        assert_eq!(timing.accumulate(0.05), 2);
        assert_eq!(timing.accumulate(0.005), 0);
        assert_eq!(timing.accumulate(0.011), 1);
    }

    #[test]
    fn test_accumulate_spiral_prevention() {
        let mut timing = FrameTiming::new(60);
        assert_eq!(timing.accumulate(1.0), MAX_UPDATES_PER_FRAME);
        assert_eq!(timing.accumulate(0.0), 0);
    }

    #[test]
    fn test_reset_timing() {
        let mut timing = FrameTiming::new(50);
        timing.accumulate(0.03);
        timing.reset();
        assert_eq!(timing.accumulate(0.01), 0);
    }
}
