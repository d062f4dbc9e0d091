//! # Ascent Gameplay
//!
//! Player character control for Ascent.
//!
//! This crate provides the tick-driven controller and its parts:
//! - Generic state machine engine
//! - Locomotion states (Idle, Move, Jump, Fall, Climb)
//! - Movement, rotation, gravity and wall-probe actions
//! - Input publish/subscribe
//! - Melee attack cooldown and level-gated hit resolution
//! - Event bus for inter-system communication

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod actions;
pub mod attack;
pub mod body;
pub mod config;
pub mod deferred;
pub mod events;
pub mod hit;
pub mod input;
pub mod locomotion;
pub mod player;
pub mod state_machine;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::actions::*;
    pub use crate::attack::*;
    pub use crate::body::*;
    pub use crate::config::*;
    pub use crate::deferred::*;
    pub use crate::events::*;
    pub use crate::hit::*;
    pub use crate::input::*;
    pub use crate::locomotion::*;
    pub use crate::player::*;
    pub use crate::state_machine::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    #[test]
    fn test_controller_full_jump_cycle() {
        let mut reader = InputReader::new();
        let mut player = PlayerController::with_seed(ControllerConfig::default(), 7);
        let mut body = MockBody::new();
        let world = PlaneWorld::new();
        player.activate(&mut reader);

        reader.jump();
        player.update(&mut body, &world, 0.0, 0.02);
        assert_eq!(player.current_state(), LocomotionState::Jump);
        assert_eq!(player.jump_count(), 1);

        body.grounded = false;
        let mut ticks = 0;
        while player.current_state() != LocomotionState::Fall {
            player.update(&mut body, &world, 0.0, 0.02);
            ticks += 1;
            assert!(ticks < 100);
        }

        body.grounded = true;
        player.update(&mut body, &world, 0.0, 0.02);
        assert_eq!(player.current_state(), LocomotionState::Idle);
        assert_eq!(player.jump_count(), 0);
    }

    #[test]
    fn test_controller_attack_destroys_item() {
        let mut player = PlayerController::with_seed(ControllerConfig::default(), 7);
        let mut body = MockBody::new();
        let world = PlaneWorld::new();
        let mut item = Destructible::new(ItemSpec {
            level_required: 1,
            max_health: 25.0,
        });

        for _ in 0..3 {
            assert!(player.handle_fire());
            player.resolve_hit(Some(&mut item));
            for _ in 0..60 {
                player.update(&mut body, &world, 0.0, 0.02);
            }
        }

        assert!(item.is_destroyed());
    }

    #[test]
    fn test_controller_moves_relative_to_camera() {
        let mut player = PlayerController::with_seed(ControllerConfig::default(), 7);
        let mut body = MockBody::new();
        let world = PlaneWorld::new();
        player.handle_move(Vec2::new(0.0, 1.0));

        for _ in 0..30 {
            player.update(&mut body, &world, std::f32::consts::FRAC_PI_2, 0.02);
        }

        let horizontal = Vec3::new(body.position.x, 0.0, body.position.z);
        assert!(horizontal.x > 0.0);
        assert!(horizontal.z.abs() < horizontal.x * 0.1);
    }
}
