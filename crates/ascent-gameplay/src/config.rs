//! Controller tuning.
//!
//! Loaded once at startup and never re-derived during play.

use ascent_common::LayerMask;
use serde::{Deserialize, Serialize};

/// Layer index walls are placed on by default.
pub const DEFAULT_WALL_LAYER: u8 = 3;

/// Locomotion tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Base movement speed in units per second
    pub speed: f32,
    /// Speed multiplier while sprinting
    pub sprint_multiplier: f32,
    /// Rate the current speed approaches its target, in units per second squared
    pub acceleration: f32,
    /// Maximum turn rate in degrees per second
    pub rotation_speed: f32,
    /// Gravity acceleration (negative = downward)
    pub gravity: f32,
    /// Scale applied to gravity
    pub gravity_multiplier: f32,
    /// Vertical velocity set when a jump starts
    pub jump_power: f32,
    /// Jumps allowed before landing
    pub max_jumps: u32,
    /// Layers considered climbable walls
    pub wall_layers: LayerMask,
    /// Length of the forward wall probe
    pub wall_probe_length: f32,
    /// Walls must be strictly closer than this to start climbing
    pub climb_distance: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            sprint_multiplier: 2.0,
            acceleration: 20.0,
            rotation_speed: 500.0,
            gravity: -9.81,
            gravity_multiplier: 3.0,
            jump_power: 5.0,
            max_jumps: 2,
            wall_layers: LayerMask::layer(DEFAULT_WALL_LAYER),
            wall_probe_length: 1.0,
            climb_distance: 0.8,
        }
    }
}

impl MovementConfig {
    /// Speed the controller accelerates toward.
    #[must_use]
    pub fn target_speed(&self, sprinting: bool) -> f32 {
        if sprinting {
            self.speed * self.sprint_multiplier
        } else {
            self.speed
        }
    }
}

/// Melee attack tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackConfig {
    /// Seconds the attack volume stays active; also the reload time
    pub cooldown: f32,
    /// Damage dealt by a normal hit
    pub base_damage: f32,
    /// Chance of a critical hit, in percent (0-100)
    pub critical_chance: f32,
    /// Extra damage on a critical hit, as a fraction of base damage (0-1)
    pub critical_rate: f32,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            cooldown: 1.0,
            base_damage: 10.0,
            critical_chance: 70.0,
            critical_rate: 0.4,
        }
    }
}

/// Full controller configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Locomotion tuning
    pub movement: MovementConfig,
    /// Attack tuning
    pub attack: AttackConfig,
}

impl ControllerConfig {
    /// Clamp values to ranges the controller can run with.
    pub fn validate(&mut self) {
        let movement = &mut self.movement;
        movement.speed = movement.speed.max(0.0);
        movement.sprint_multiplier = movement.sprint_multiplier.max(0.0);
        movement.acceleration = movement.acceleration.max(0.0);
        movement.rotation_speed = movement.rotation_speed.max(0.0);
        movement.gravity_multiplier = movement.gravity_multiplier.max(0.0);
        movement.wall_probe_length = movement.wall_probe_length.max(0.0);
        movement.climb_distance = movement
            .climb_distance
            .clamp(0.0, movement.wall_probe_length);

        let attack = &mut self.attack;
        attack.cooldown = attack.cooldown.max(0.0);
        attack.base_damage = attack.base_damage.max(0.0);
        attack.critical_chance = attack.critical_chance.clamp(0.0, 100.0);
        attack.critical_rate = attack.critical_rate.clamp(0.0, 1.0);
    }
}
