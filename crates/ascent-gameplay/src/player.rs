//! Player controller.
//!
//! Ties the locomotion state machine, input subscription, attack cooldown and
//! landing latch together. One [`PlayerController::update`] call is one tick:
//!
//! 1. queued input events are applied
//! 2. the active state executes once
//! 3. the forward wall probe may start a climb
//! 4. the attack cooldown and landing latch are polled

use ascent_common::EntityId;
use fastrand::Rng;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::attack::AttackState;
use crate::body::{CharacterBody, WorldQuery};
use crate::config::ControllerConfig;
use crate::deferred::LandingLatch;
use crate::events::{EventBus, GameplayEvent};
use crate::hit::{DamageProfile, HitOutcome, Hittable};
use crate::input::{InputError, InputEvent, InputPhase, InputReader, InputSubscription};
use crate::locomotion::{ControllerState, Frame, LocomotionState};
use crate::state_machine::StateMachine;

/// Persistent player progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerData {
    /// Level checked against hit requirements
    pub level: i32,
    /// Experience toward the next level
    pub current_experience: i32,
}

impl Default for PlayerData {
    fn default() -> Self {
        Self {
            level: 1,
            current_experience: 0,
        }
    }
}

/// Result of a jump request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpResult {
    /// The jump started
    Accepted {
        /// Jumps taken since landing, including this one
        jump_count: u32,
    },
    /// The jump budget is spent
    Rejected,
}

/// Player character controller.
#[derive(Debug)]
pub struct PlayerController {
    entity_id: EntityId,
    config: ControllerConfig,
    data: PlayerData,
    state: ControllerState,
    machine: StateMachine<LocomotionState>,
    attack: AttackState,
    landing: LandingLatch,
    subscription: Option<InputSubscription>,
    events: EventBus,
    rng: Rng,
}

impl PlayerController {
    /// Creates a controller with a fresh entity ID.
    #[must_use]
    pub fn new(config: ControllerConfig) -> Self {
        Self::with_rng(config, Rng::new())
    }

    /// Creates a controller whose critical rolls are reproducible.
    #[must_use]
    pub fn with_seed(config: ControllerConfig, seed: u64) -> Self {
        Self::with_rng(config, Rng::with_seed(seed))
    }

    fn with_rng(config: ControllerConfig, rng: Rng) -> Self {
        let attack = AttackState::new(config.attack.cooldown);
        Self {
            entity_id: EntityId::new(),
            config,
            data: PlayerData::default(),
            state: ControllerState::default(),
            machine: StateMachine::new(),
            attack,
            landing: LandingLatch::new(),
            subscription: None,
            events: EventBus::default(),
            rng,
        }
    }

    /// Replaces the progression data.
    #[must_use]
    pub fn with_player_data(mut self, data: PlayerData) -> Self {
        self.data = data;
        self
    }

    /// Subscribes to `reader`. Does nothing if already subscribed.
    pub fn activate(&mut self, reader: &mut InputReader) {
        if self.subscription.is_some() {
            return;
        }
        let subscription = reader.subscribe();
        info!(entity = %self.entity_id, subscription = %subscription.id(), "controller activated");
        self.subscription = Some(subscription);
    }

    /// Unsubscribes from `reader` and cancels the attack cooldown and
    /// landing latch. A cancelled latch also restores the jump budget.
    /// Safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns an error if `reader` does not know the subscription. The
    /// controller is deactivated either way.
    pub fn deactivate(&mut self, reader: &mut InputReader) -> Result<(), InputError> {
        self.attack.cancel();
        if self.landing.cancel() {
            self.state.jump_count = 0;
        }

        let Some(subscription) = self.subscription.take() else {
            return Ok(());
        };
        info!(entity = %self.entity_id, subscription = %subscription.id(), "controller deactivated");
        reader.unsubscribe(subscription.id())
    }

    /// Whether the controller holds an input subscription.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// Enters the initial Idle state. Does nothing once a state is active.
    pub fn start(&mut self, body: &mut dyn CharacterBody, world: &dyn WorldQuery) {
        if self.machine.current().is_some() {
            return;
        }
        self.with_frame(body, world, 0.0, 0.0, |machine, frame| {
            machine.change_state(LocomotionState::Idle, frame);
        });
    }

    /// Runs one tick.
    pub fn update(
        &mut self,
        body: &mut dyn CharacterBody,
        world: &dyn WorldQuery,
        camera_yaw: f32,
        dt: f32,
    ) {
        self.start(body, world);

        let pending = self
            .subscription
            .as_ref()
            .map(InputSubscription::drain)
            .unwrap_or_default();
        for event in pending {
            self.handle_input(event, body, world);
        }

        self.with_frame(body, world, camera_yaw, dt, |machine, frame| {
            machine.execute(frame);
        });

        if !self.machine.is_state(LocomotionState::Climb) {
            self.check_wall(body, world, camera_yaw);
        }

        if self.attack.tick(dt) {
            self.events.publish(GameplayEvent::AttackFinished {
                entity_id: self.entity_id,
            });
        }

        if self.landing.poll(body.is_grounded()) {
            self.state.jump_count = 0;
            debug!(entity = %self.entity_id, "jump budget restored");
            self.events.publish(GameplayEvent::JumpsReset {
                entity_id: self.entity_id,
            });
        }
    }

    /// Applies one input event immediately.
    pub fn handle_input(
        &mut self,
        event: InputEvent,
        body: &mut dyn CharacterBody,
        world: &dyn WorldQuery,
    ) {
        match event {
            InputEvent::Move(input) => self.handle_move(input),
            InputEvent::Jump => {
                self.handle_jump(body, world);
            },
            InputEvent::Fire => {
                self.handle_fire();
            },
            InputEvent::Sprint(phase) => self.handle_sprint(phase),
        }
    }

    /// Records a move vector.
    pub fn handle_move(&mut self, input: Vec2) {
        let climbing = self.machine.is_state(LocomotionState::Climb);
        self.state.set_move_input(input, climbing);
    }

    /// Requests a jump.
    ///
    /// Accepted while grounded or while jumps remain in the budget. The first
    /// jump arms the landing latch that later restores the budget.
    pub fn handle_jump(
        &mut self,
        body: &mut dyn CharacterBody,
        world: &dyn WorldQuery,
    ) -> JumpResult {
        let grounded = body.is_grounded();
        let max_jumps = self.config.movement.max_jumps;

        if !grounded && self.state.jump_count >= max_jumps {
            debug!(entity = %self.entity_id, jump_count = self.state.jump_count, "jump rejected");
            self.events.publish(GameplayEvent::JumpRejected {
                entity_id: self.entity_id,
                jump_count: self.state.jump_count,
            });
            return JumpResult::Rejected;
        }

        if !self.landing.is_armed() {
            self.landing.arm();
        }
        self.state.jump_count = (self.state.jump_count + 1).min(max_jumps);
        let jump_count = self.state.jump_count;
        debug!(entity = %self.entity_id, jump_count, grounded, "jump accepted");

        self.with_frame(body, world, 0.0, 0.0, |machine, frame| {
            machine.change_state(LocomotionState::Jump, frame);
        });
        self.events.publish(GameplayEvent::JumpAccepted {
            entity_id: self.entity_id,
            jump_count,
        });
        JumpResult::Accepted { jump_count }
    }

    /// Starts an attack. Returns `false` if one is already running.
    pub fn handle_fire(&mut self) -> bool {
        if !self.attack.fire() {
            return false;
        }
        debug!(entity = %self.entity_id, "attack started");
        self.events.publish(GameplayEvent::AttackStarted {
            entity_id: self.entity_id,
        });
        true
    }

    /// Updates the sprint flag.
    pub fn handle_sprint(&mut self, phase: InputPhase) {
        self.state.sprinting = phase.is_active();
    }

    /// Resolves the attack volume overlapping `target`.
    ///
    /// Pass `None` for entities that cannot be hit.
    pub fn resolve_hit(&mut self, target: Option<&mut dyn Hittable>) -> HitOutcome {
        let damage = DamageProfile::from(&self.config.attack);
        let outcome =
            self.attack
                .area()
                .resolve_overlap(self.data.level, &damage, &mut self.rng, target);

        match outcome {
            HitOutcome::Hit(roll) => self.events.publish(GameplayEvent::TargetHit {
                entity_id: self.entity_id,
                damage: roll.amount,
                critical: roll.critical,
            }),
            HitOutcome::LevelTooLow {
                attacker_level,
                required_level,
            } => self.events.publish(GameplayEvent::HitRejected {
                entity_id: self.entity_id,
                attacker_level,
                required_level,
            }),
            HitOutcome::Inactive | HitOutcome::NotATarget => {},
        }
        outcome
    }

    fn check_wall(&mut self, body: &mut dyn CharacterBody, world: &dyn WorldQuery, camera_yaw: f32) {
        self.with_frame(body, world, camera_yaw, 0.0, |machine, frame| {
            if frame.probe_wall().climbable() {
                machine.change_state(LocomotionState::Climb, frame);
            }
        });
    }

    fn with_frame<R>(
        &mut self,
        body: &mut dyn CharacterBody,
        world: &dyn WorldQuery,
        camera_yaw: f32,
        dt: f32,
        f: impl FnOnce(&mut StateMachine<LocomotionState>, &mut Frame<'_>) -> R,
    ) -> R {
        let mut frame = Frame {
            state: &mut self.state,
            config: &self.config.movement,
            body,
            world,
            events: &self.events,
            entity_id: self.entity_id,
            camera_yaw,
            dt,
        };
        f(&mut self.machine, &mut frame)
    }

    /// Entity this controller drives.
    #[must_use]
    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    /// Active locomotion state, Idle before the first tick.
    #[must_use]
    pub fn current_state(&self) -> LocomotionState {
        self.machine.current().unwrap_or_default()
    }

    /// Check if `state` is active.
    #[must_use]
    pub fn is_state(&self, state: LocomotionState) -> bool {
        self.machine.is_state(state)
    }

    /// Controller data.
    #[must_use]
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Jumps taken since the last landing.
    #[must_use]
    pub fn jump_count(&self) -> u32 {
        self.state.jump_count
    }

    /// Whether an attack is running.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.attack.is_attacking()
    }

    /// Attack volume and cooldown.
    #[must_use]
    pub fn attack(&self) -> &AttackState {
        &self.attack
    }

    /// Landing latch.
    #[must_use]
    pub fn landing(&self) -> &LandingLatch {
        &self.landing
    }

    /// Tuning in use.
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Progression data.
    #[must_use]
    pub fn data(&self) -> &PlayerData {
        &self.data
    }

    /// Mutable progression data.
    pub fn data_mut(&mut self) -> &mut PlayerData {
        &mut self.data
    }

    /// Bus receiving this controller's events.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Takes all events published since the last drain.
    pub fn drain_events(&self) -> Vec<GameplayEvent> {
        self.events.drain()
    }

    /// Number of state transitions so far.
    #[must_use]
    pub fn transitions(&self) -> u64 {
        self.machine.transitions()
    }
}
