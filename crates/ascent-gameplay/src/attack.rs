//! Melee attack timing.
//!
//! Firing activates the attack volume for a fixed duration. While the
//! cooldown runs, further fire requests are ignored.

use fastrand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::deferred::Cooldown;
use crate::hit::{resolve_hit, DamageProfile, HitOutcome, Hittable};

/// Trigger volume that deals damage while active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackArea {
    /// Whether the volume participates in overlaps
    active: bool,
    /// Times the volume has been switched on
    activations: u32,
}

impl AttackArea {
    /// Creates an inactive volume.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches the volume on.
    pub fn activate(&mut self) {
        if !self.active {
            self.active = true;
            self.activations += 1;
        }
    }

    /// Switches the volume off.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Whether the volume is on.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Times the volume has been switched on.
    #[must_use]
    pub fn activations(&self) -> u32 {
        self.activations
    }

    /// Resolves an overlap between this volume and `target`.
    ///
    /// `target` is `None` when the overlapped entity cannot be hit.
    pub fn resolve_overlap(
        &self,
        attacker_level: i32,
        damage: &DamageProfile,
        rng: &mut Rng,
        target: Option<&mut dyn Hittable>,
    ) -> HitOutcome {
        if !self.active {
            return HitOutcome::Inactive;
        }
        resolve_hit(attacker_level, damage, rng, target)
    }
}

/// Attack volume plus its cooldown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackState {
    area: AttackArea,
    cooldown: Cooldown,
    duration: f32,
}

impl AttackState {
    /// Creates an idle attack with the given cooldown duration.
    #[must_use]
    pub fn new(duration: f32) -> Self {
        Self {
            area: AttackArea::new(),
            cooldown: Cooldown::new(),
            duration: duration.max(0.0),
        }
    }

    /// Starts an attack. Returns `false` if one is already running.
    pub fn fire(&mut self) -> bool {
        if !self.cooldown.start(self.duration) {
            trace!("fire ignored, attack in progress");
            return false;
        }
        self.area.activate();
        true
    }

    /// Advances the cooldown. Returns `true` on the tick the attack ends.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.cooldown.tick(dt) {
            self.area.deactivate();
            true
        } else {
            false
        }
    }

    /// Ends any running attack without waiting for the cooldown.
    ///
    /// Returns `true` if an attack was running.
    pub fn cancel(&mut self) -> bool {
        self.area.deactivate();
        self.cooldown.cancel()
    }

    /// Whether an attack is running.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.cooldown.is_active()
    }

    /// The attack volume.
    #[must_use]
    pub fn area(&self) -> &AttackArea {
        &self.area
    }

    /// Seconds left on the cooldown.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        self.cooldown.remaining()
    }
}
