//! Physical actions shared by the locomotion states.
//!
//! Every state except Climb runs movement, rotation and gravity in that order
//! each tick. Climb runs movement only.

use glam::{Quat, Vec2, Vec3};

use crate::body::{CharacterBody, WorldQuery};
use crate::config::MovementConfig;
use crate::locomotion::ControllerState;

/// Vertical velocity held while resting on the ground.
///
/// Slightly negative so the body keeps pressing into the floor and stays
/// grounded.
pub const LANDED_VELOCITY: f32 = -1.0;

/// Moves `current` toward `target` by at most `max_delta`.
#[must_use]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}

/// Yaw-only rotation whose +Z axis points along `direction`.
#[must_use]
pub fn look_rotation(direction: Vec3) -> Quat {
    Quat::from_rotation_y(direction.x.atan2(direction.z))
}

/// Rotates `from` toward `to` by at most `max_radians`.
#[must_use]
pub fn rotate_towards(from: Quat, to: Quat, max_radians: f32) -> Quat {
    let angle = from.angle_between(to);
    if angle <= max_radians {
        return to;
    }
    from.slerp(to, max_radians / angle)
}

/// Turns a 2D move input into a world direction relative to the camera yaw.
///
/// Input `y` maps to world +Z (forward) before the yaw is applied.
#[must_use]
pub fn camera_relative(input: Vec2, camera_yaw: f32) -> Vec3 {
    Quat::from_rotation_y(camera_yaw) * Vec3::new(input.x, 0.0, input.y)
}

/// Eases the current speed toward its target and moves the body.
pub fn apply_movement(
    state: &mut ControllerState,
    body: &mut dyn CharacterBody,
    config: &MovementConfig,
    dt: f32,
) {
    let target = config.target_speed(state.sprinting);
    state.current_speed = move_towards(state.current_speed, target, config.acceleration * dt);

    body.move_by(state.direction * state.current_speed * dt);
}

/// Turns the body toward the camera-relative input direction.
///
/// Does nothing without input, so the body keeps its facing at rest.
pub fn apply_rotation(
    state: &mut ControllerState,
    body: &mut dyn CharacterBody,
    config: &MovementConfig,
    camera_yaw: f32,
    dt: f32,
) {
    if state.move_input == Vec2::ZERO {
        return;
    }

    let heading = camera_relative(state.move_input, camera_yaw);
    state.direction = heading;

    let max_step = config.rotation_speed.to_radians() * dt;
    body.set_rotation(rotate_towards(
        body.rotation(),
        look_rotation(heading),
        max_step,
    ));
}

/// Integrates gravity into the vertical velocity.
pub fn apply_gravity(
    state: &mut ControllerState,
    grounded: bool,
    config: &MovementConfig,
    dt: f32,
) {
    if grounded && state.velocity_y < 0.0 {
        state.velocity_y = LANDED_VELOCITY;
    } else {
        state.velocity_y += config.gravity * config.gravity_multiplier * dt;
    }

    state.direction.y = state.velocity_y;
}

/// Starts a jump.
pub fn apply_jump_impulse(state: &mut ControllerState, config: &MovementConfig) {
    state.velocity_y = config.jump_power;
}

/// Result of the forward wall probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WallProbe {
    /// Nothing on the wall layers within probe length
    Clear,
    /// A wall was detected but is too far away to climb
    OutOfReach {
        /// Distance from the body to the hit point
        distance: f32,
    },
    /// A wall is close enough to climb
    Climbable {
        /// Distance from the body to the hit point
        distance: f32,
    },
}

impl WallProbe {
    /// Whether any wall was detected.
    #[must_use]
    pub fn detected(self) -> bool {
        !matches!(self, Self::Clear)
    }

    /// Whether climbing may start.
    #[must_use]
    pub fn climbable(self) -> bool {
        matches!(self, Self::Climbable { .. })
    }
}

/// Casts the forward wall probe from the body's position.
///
/// Walls between `climb_distance` and `wall_probe_length` are detected but
/// not climbable.
#[must_use]
pub fn probe_wall(
    body: &dyn CharacterBody,
    world: &dyn WorldQuery,
    config: &MovementConfig,
) -> WallProbe {
    let origin = body.position();
    let hit = world.raycast(
        origin,
        body.forward(),
        config.wall_probe_length,
        config.wall_layers,
    );

    match hit {
        None => WallProbe::Clear,
        Some(hit) => {
            let distance = origin.distance(hit.point);
            if distance < config.climb_distance {
                WallProbe::Climbable { distance }
            } else {
                WallProbe::OutOfReach { distance }
            }
        },
    }
}
