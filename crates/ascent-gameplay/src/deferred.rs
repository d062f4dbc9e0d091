//! One-shot deferred actions polled once per tick.
//!
//! - [`Cooldown`] finishes after a fixed amount of elapsed time.
//! - [`LandingLatch`] finishes after the body leaves the ground and then
//!   touches it again.
//!
//! Both are cancellable, and cancelling an idle action does nothing.

use serde::{Deserialize, Serialize};

/// Single-shot timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Cooldown {
    /// Seconds left, `None` when idle
    remaining: Option<f32>,
}

impl Cooldown {
    /// Creates an idle cooldown.
    #[must_use]
    pub const fn new() -> Self {
        Self { remaining: None }
    }

    /// Starts the timer. Returns `false` if it was already running.
    pub fn start(&mut self, duration: f32) -> bool {
        if self.remaining.is_some() {
            return false;
        }
        self.remaining = Some(duration.max(0.0));
        true
    }

    /// Advances the timer. Returns `true` on the tick it expires.
    pub fn tick(&mut self, dt: f32) -> bool {
        match self.remaining {
            Some(remaining) if remaining - dt <= 0.0 => {
                self.remaining = None;
                true
            },
            Some(remaining) => {
                self.remaining = Some(remaining - dt);
                false
            },
            None => false,
        }
    }

    /// Stops the timer without expiring it. Returns `true` if it was running.
    pub fn cancel(&mut self) -> bool {
        self.remaining.take().is_some()
    }

    /// Whether the timer is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.remaining.is_some()
    }

    /// Seconds left, or zero when idle.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        self.remaining.unwrap_or(0.0)
    }
}

/// Phase of a [`LandingLatch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LatchPhase {
    /// Not armed
    #[default]
    Disarmed,
    /// Waiting for the grounded flag to go false
    AwaitingTakeoff,
    /// Waiting for the grounded flag to go true again
    AwaitingLanding,
}

/// Two-phase wait for a full takeoff and landing.
///
/// A single grounded reading never completes the latch; it must first observe
/// the body off the ground.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandingLatch {
    /// Current phase
    phase: LatchPhase,
}

impl LandingLatch {
    /// Creates a disarmed latch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: LatchPhase::Disarmed,
        }
    }

    /// Arms the latch. Returns `false` if it was already armed.
    pub fn arm(&mut self) -> bool {
        if self.is_armed() {
            return false;
        }
        self.phase = LatchPhase::AwaitingTakeoff;
        true
    }

    /// Feeds one grounded reading. Returns `true` when a landing completes.
    ///
    /// Each reading advances at most one phase, so takeoff and landing are
    /// never observed on the same tick.
    pub fn poll(&mut self, grounded: bool) -> bool {
        match self.phase {
            LatchPhase::Disarmed => false,
            LatchPhase::AwaitingTakeoff => {
                if !grounded {
                    self.phase = LatchPhase::AwaitingLanding;
                }
                false
            },
            LatchPhase::AwaitingLanding => {
                if grounded {
                    self.phase = LatchPhase::Disarmed;
                    true
                } else {
                    false
                }
            },
        }
    }

    /// Disarms the latch. Returns `true` if it was armed.
    pub fn cancel(&mut self) -> bool {
        let was_armed = self.is_armed();
        self.phase = LatchPhase::Disarmed;
        was_armed
    }

    /// Whether the latch is armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.phase != LatchPhase::Disarmed
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> LatchPhase {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_expires_once() {
        let mut cooldown = Cooldown::new();
        assert!(cooldown.start(1.0));

        assert!(!cooldown.tick(0.5));
        assert!(cooldown.is_active());
        assert!((cooldown.remaining() - 0.5).abs() < 1e-6);

        assert!(cooldown.tick(0.5));
        assert!(!cooldown.is_active());
        assert!(!cooldown.tick(0.5));
    }

    #[test]
    fn test_cooldown_rejects_restart_while_running() {
        let mut cooldown = Cooldown::new();
        assert!(cooldown.start(1.0));
        assert!(!cooldown.start(5.0));
        assert!(cooldown.remaining() <= 1.0);
    }

    #[test]
    fn test_cooldown_cancel_is_idempotent() {
        let mut cooldown = Cooldown::new();
        cooldown.start(1.0);

        assert!(cooldown.cancel());
        assert!(!cooldown.cancel());
        assert!(!cooldown.tick(2.0));
    }

    #[test]
    fn test_zero_cooldown_expires_next_tick() {
        let mut cooldown = Cooldown::new();
        cooldown.start(0.0);
        assert!(cooldown.is_active());
        assert!(cooldown.tick(0.016));
    }

    #[test]
    fn test_latch_requires_takeoff_before_landing() {
        let mut latch = LandingLatch::new();
        latch.arm();

        for _ in 0..3 {
            assert!(!latch.poll(true));
        }
        assert_eq!(latch.phase(), LatchPhase::AwaitingTakeoff);

        assert!(!latch.poll(false));
        assert!(!latch.poll(false));
        assert!(latch.poll(true));
        assert!(!latch.is_armed());
    }

    #[test]
    fn test_latch_ignores_readings_when_disarmed() {
        let mut latch = LandingLatch::new();
        assert!(!latch.poll(false));
        assert!(!latch.poll(true));
    }

    #[test]
    fn test_latch_arm_and_cancel_are_idempotent() {
        let mut latch = LandingLatch::new();
        assert!(latch.arm());
        assert!(!latch.arm());

        latch.poll(false);
        assert_eq!(latch.phase(), LatchPhase::AwaitingLanding);

        assert!(latch.cancel());
        assert!(!latch.cancel());
        assert!(!latch.poll(true));
    }
}
