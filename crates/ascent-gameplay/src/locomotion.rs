//! Locomotion states for the player controller.
//!
//! Five states (Idle, Move, Jump, Fall, Climb) decide which physical actions
//! run each tick. States carry no data; everything they read or write lives in
//! [`ControllerState`] and is reached through a per-tick [`Frame`].

use ascent_common::EntityId;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actions::{
    apply_gravity, apply_jump_impulse, apply_movement, apply_rotation, probe_wall, WallProbe,
};
use crate::body::{CharacterBody, WorldQuery};
use crate::config::MovementConfig;
use crate::events::{EventBus, GameplayEvent};
use crate::state_machine::{noop, StateBehavior, StateSet};

/// Locomotion state tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LocomotionState {
    /// Standing still
    #[default]
    Idle,
    /// Moving under input
    Move,
    /// Rising after a jump
    Jump,
    /// Descending
    Fall,
    /// Attached to a wall
    Climb,
}

impl LocomotionState {
    /// Every state, in declaration order.
    pub const ALL: [Self; 5] = [Self::Idle, Self::Move, Self::Jump, Self::Fall, Self::Climb];

    /// Animation to play while in this state.
    #[must_use]
    pub fn animation(self) -> LocomotionAnimation {
        match self {
            Self::Idle => LocomotionAnimation::Idle,
            Self::Move => LocomotionAnimation::Moving,
            Self::Jump => LocomotionAnimation::Jumping,
            Self::Fall => LocomotionAnimation::Falling,
            Self::Climb => LocomotionAnimation::Climbing,
        }
    }
}

/// Animation state for rendering.
///
/// This enum is used to communicate the current animation to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LocomotionAnimation {
    /// Standing still
    #[default]
    Idle,
    /// Walking or sprinting
    Moving,
    /// Jumping (going up)
    Jumping,
    /// Falling (going down)
    Falling,
    /// Climbing
    Climbing,
}

/// Mutable per-entity controller data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    /// Vertical speed accumulator
    pub velocity_y: f32,
    /// Last move input; zero means no input
    pub move_input: Vec2,
    /// Direction handed to the body, scaled by speed each tick
    pub direction: Vec3,
    /// Smoothed scalar speed
    pub current_speed: f32,
    /// Whether sprint is held
    pub sprinting: bool,
    /// Jumps taken since the last landing
    pub jump_count: u32,
    /// Animation chosen by the last entered state
    pub animation: LocomotionAnimation,
}

impl ControllerState {
    /// Records a move input.
    ///
    /// While climbing the input maps to the wall plane (x, y); otherwise to the
    /// ground plane (x, z).
    pub fn set_move_input(&mut self, input: Vec2, climbing: bool) {
        self.move_input = input;
        self.direction = if climbing {
            Vec3::new(input.x, input.y, 0.0)
        } else {
            Vec3::new(input.x, 0.0, input.y)
        };
    }

    /// Whether any move input is held.
    #[must_use]
    pub fn has_move_input(&self) -> bool {
        self.move_input != Vec2::ZERO
    }
}

/// Everything a state callback may touch during one tick.
pub struct Frame<'a> {
    /// Controller data
    pub state: &'a mut ControllerState,
    /// Locomotion tuning
    pub config: &'a MovementConfig,
    /// Body being driven
    pub body: &'a mut dyn CharacterBody,
    /// World used for probes
    pub world: &'a dyn WorldQuery,
    /// Bus receiving state events
    pub events: &'a EventBus,
    /// Entity the controller belongs to
    pub entity_id: EntityId,
    /// Camera yaw in radians
    pub camera_yaw: f32,
    /// Tick duration in seconds
    pub dt: f32,
}

impl Frame<'_> {
    /// Movement, then rotation, then gravity.
    pub fn basic_action(&mut self) {
        apply_movement(self.state, self.body, self.config, self.dt);
        apply_rotation(
            self.state,
            self.body,
            self.config,
            self.camera_yaw,
            self.dt,
        );
        let grounded = self.body.is_grounded();
        apply_gravity(self.state, grounded, self.config, self.dt);
    }

    /// Casts the forward wall probe.
    #[must_use]
    pub fn probe_wall(&self) -> WallProbe {
        probe_wall(&*self.body, self.world, self.config)
    }

    fn entered(&mut self, state: LocomotionState) {
        self.state.animation = state.animation();
        debug!(entity = %self.entity_id, ?state, "entered state");
        self.events.publish(GameplayEvent::StateEntered {
            entity_id: self.entity_id,
            state,
        });
    }
}

impl<'a> StateSet<Frame<'a>> for LocomotionState {
    fn behavior(self) -> StateBehavior<Self, Frame<'a>> {
        match self {
            Self::Idle => StateBehavior {
                on_enter: idle_enter,
                on_execute: idle_execute,
                on_exit: noop,
            },
            Self::Move => StateBehavior {
                on_enter: move_enter,
                on_execute: move_execute,
                on_exit: noop,
            },
            Self::Jump => StateBehavior {
                on_enter: jump_enter,
                on_execute: jump_execute,
                on_exit: noop,
            },
            Self::Fall => StateBehavior {
                on_enter: fall_enter,
                on_execute: fall_execute,
                on_exit: noop,
            },
            Self::Climb => StateBehavior {
                on_enter: climb_enter,
                on_execute: climb_execute,
                on_exit: noop,
            },
        }
    }
}

fn idle_enter(frame: &mut Frame<'_>) {
    frame.entered(LocomotionState::Idle);
}

fn idle_execute(frame: &mut Frame<'_>) -> Option<LocomotionState> {
    let next = frame.state.has_move_input().then_some(LocomotionState::Move);
    frame.basic_action();
    next
}

fn move_enter(frame: &mut Frame<'_>) {
    frame.entered(LocomotionState::Move);
}

fn move_execute(frame: &mut Frame<'_>) -> Option<LocomotionState> {
    if !frame.state.has_move_input() {
        return Some(LocomotionState::Idle);
    }
    frame.basic_action();
    None
}

fn jump_enter(frame: &mut Frame<'_>) {
    frame.entered(LocomotionState::Jump);
    apply_jump_impulse(frame.state, frame.config);
}

fn jump_execute(frame: &mut Frame<'_>) -> Option<LocomotionState> {
    let next = (frame.state.velocity_y < 0.0).then_some(LocomotionState::Fall);
    frame.basic_action();
    next
}

fn fall_enter(frame: &mut Frame<'_>) {
    frame.entered(LocomotionState::Fall);
}

fn fall_execute(frame: &mut Frame<'_>) -> Option<LocomotionState> {
    let next = frame.body.is_grounded().then_some(LocomotionState::Idle);
    frame.basic_action();
    next
}

fn climb_enter(frame: &mut Frame<'_>) {
    frame.entered(LocomotionState::Climb);
}

fn climb_execute(frame: &mut Frame<'_>) -> Option<LocomotionState> {
    apply_movement(frame.state, frame.body, frame.config, frame.dt);

    if frame.probe_wall().detected() {
        None
    } else {
        Some(LocomotionState::Jump)
    }
}
