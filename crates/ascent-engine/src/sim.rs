//! Headless simulation of one player in a small arena.
//!
//! The arena is a flat floor with an optional climbable wall and an optional
//! destructible target. Scripted inputs are published through an
//! [`InputReader`] at their scheduled times and every controller event is
//! logged and tallied into a [`SimReport`].

use std::fs;
use std::path::Path;
use std::time::Duration;

use ascent_common::{AscentError, AscentResult};
use ascent_gameplay::{
    CharacterBody, Destructible, GameplayEvent, InputReader, LocomotionState, PlaneWorld,
    PlayerController, WallPlane,
};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{SimConfig, WallConfig};
use crate::timing::FrameTiming;

/// Horizontal clearance kept between the body and the wall face.
const BODY_RADIUS: f32 = 0.3;

/// Kinematic body standing on the floor at y = 0.
///
/// Stops against the wall face while below its top edge.
#[derive(Debug, Clone)]
pub struct ArenaBody {
    position: Vec3,
    rotation: Quat,
    grounded: bool,
    wall: Option<WallConfig>,
}

impl ArenaBody {
    /// Creates a grounded body at the origin facing +Z.
    #[must_use]
    pub fn new(wall: &WallConfig) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            grounded: true,
            wall: wall.enabled.then_some(*wall),
        }
    }
}

impl CharacterBody for ArenaBody {
    fn move_by(&mut self, displacement: Vec3) {
        let mut next = self.position + displacement;

        if let Some(wall) = self.wall {
            let face = wall.distance - BODY_RADIUS;
            if self.position.z <= face && next.y < wall.height {
                next.z = next.z.min(face);
            }
        }

        self.grounded = next.y <= 0.0;
        if self.grounded {
            next.y = 0.0;
        }
        self.position = next;
    }

    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }
}

/// Tally of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimReport {
    /// Ticks simulated
    pub ticks: u64,
    /// Simulated seconds
    pub elapsed: f32,
    /// State active when the run ended
    pub final_state: LocomotionState,
    /// Body position when the run ended
    pub final_position: Vec3,
    /// Times each state was entered
    pub state_entries: Vec<(LocomotionState, u32)>,
    /// Jump requests accepted
    pub jumps_accepted: u32,
    /// Jump requests rejected
    pub jumps_rejected: u32,
    /// Jump budget restorations
    pub landings: u32,
    /// Attacks started
    pub attacks: u32,
    /// Hits that dealt damage
    pub hits: u32,
    /// Critical hits among them
    pub critical_hits: u32,
    /// Hits withheld by the level gate
    pub rejected_hits: u32,
    /// Total damage dealt
    pub damage_dealt: f32,
    /// Whether the target was destroyed
    pub target_destroyed: bool,
}

impl SimReport {
    /// Times `state` was entered.
    #[must_use]
    pub fn entries(&self, state: LocomotionState) -> u32 {
        self.state_entries
            .iter()
            .find(|(entered, _)| *entered == state)
            .map_or(0, |(_, count)| *count)
    }

    fn record(&mut self, event: &GameplayEvent) {
        match event {
            GameplayEvent::StateEntered { state, .. } => {
                match self.state_entries.iter_mut().find(|(s, _)| s == state) {
                    Some((_, count)) => *count += 1,
                    None => self.state_entries.push((*state, 1)),
                }
            },
            GameplayEvent::JumpAccepted { .. } => self.jumps_accepted += 1,
            GameplayEvent::JumpRejected { .. } => self.jumps_rejected += 1,
            GameplayEvent::JumpsReset { .. } => self.landings += 1,
            GameplayEvent::AttackStarted { .. } => self.attacks += 1,
            GameplayEvent::AttackFinished { .. } => {},
            GameplayEvent::TargetHit {
                damage, critical, ..
            } => {
                self.hits += 1;
                self.critical_hits += u32::from(*critical);
                self.damage_dealt += damage;
            },
            GameplayEvent::HitRejected { .. } => self.rejected_hits += 1,
        }
    }

    /// Writes the report as pretty JSON.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> AscentResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AscentError::Serialization(e.to_string()))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)?;

        info!("Wrote report to {}", path.display());
        Ok(())
    }
}

/// One player, one arena, one script.
pub struct Simulation {
    config: SimConfig,
    player: PlayerController,
    reader: InputReader,
    body: ArenaBody,
    world: PlaneWorld,
    target: Option<Destructible>,
    /// Index of the next scripted input
    next_input: usize,
    /// Attack activation already resolved against the target
    resolved_swing: u32,
    elapsed: f32,
    report: SimReport,
}

impl Simulation {
    /// Builds the arena described by `config`.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        let controller = config.controller.clone();
        let mut player = match config.rng_seed {
            Some(seed) => PlayerController::with_seed(controller, seed),
            None => PlayerController::new(controller),
        }
        .with_player_data(config.player);
        let mut reader = InputReader::new();
        player.activate(&mut reader);

        let mut world = PlaneWorld::new();
        if config.wall.enabled {
            world.add_wall(
                WallPlane::new(
                    Vec3::new(0.0, 0.0, config.wall.distance),
                    Vec3::NEG_Z,
                    config.controller.movement.wall_layers,
                )
                .with_top(config.wall.height),
            );
        }

        let target = config
            .target
            .enabled
            .then(|| Destructible::new(config.target.item));

        Self {
            body: ArenaBody::new(&config.wall),
            config,
            player,
            reader,
            world,
            target,
            next_input: 0,
            resolved_swing: 0,
            elapsed: 0.0,
            report: SimReport::default(),
        }
    }

    /// Runs every tick of the configured duration and returns the report.
    pub fn run(mut self) -> AscentResult<SimReport> {
        let total = self.config.total_ticks();
        let mut timing = FrameTiming::new(self.config.tick_rate);
        let dt = timing.fixed_dt();
        info!(
            ticks = total,
            realtime = self.config.realtime,
            "Running simulation"
        );

        if self.config.realtime {
            timing.reset();
            while self.report.ticks < total {
                let frame_dt = timing.delta_time();
                for _ in 0..timing.accumulate(frame_dt) {
                    if self.report.ticks >= total {
                        break;
                    }
                    self.step(dt);
                }
                std::thread::sleep(Duration::from_millis(1));
            }
        } else {
            for _ in 0..total {
                self.step(dt);
            }
        }

        if let Err(e) = self.player.deactivate(&mut self.reader) {
            warn!("Failed to release input subscription: {e}");
        }
        let report_path = self.config.report_path.clone();
        let report = self.finish();
        if let Some(path) = report_path {
            report.write_to(path)?;
        }
        Ok(report)
    }

    /// Advances the arena by one controller tick.
    pub fn step(&mut self, dt: f32) {
        while let Some(entry) = self.config.script.get(self.next_input) {
            if entry.at > self.elapsed {
                break;
            }
            debug!(at = entry.at, input = ?entry.input, "scripted input");
            self.reader.publish(entry.input);
            self.next_input += 1;
        }

        let camera_yaw = self.config.camera_yaw.to_radians();
        self.player
            .update(&mut self.body, &self.world, camera_yaw, dt);
        self.resolve_swing();

        for event in self.player.drain_events() {
            log_event(&event);
            self.report.record(&event);
        }

        self.elapsed += dt;
        self.report.ticks += 1;
    }

    /// Resolves each attack activation against the target at most once.
    fn resolve_swing(&mut self) {
        let area = self.player.attack().area();
        let swing = area.activations();
        if !area.is_active() || swing == self.resolved_swing {
            return;
        }
        let Some(target) = self.target.as_mut() else {
            return;
        };
        if target.is_destroyed()
            || self.body.position().distance(self.config.target.position)
                > self.config.target.reach
        {
            return;
        }

        self.resolved_swing = swing;
        self.player.resolve_hit(Some(&mut *target));

        if target.is_destroyed() {
            info!(health = target.current_health(), "target destroyed");
            self.report.target_destroyed = true;
        }
    }

    fn finish(mut self) -> SimReport {
        self.report.elapsed = self.elapsed;
        self.report.final_state = self.player.current_state();
        self.report.final_position = self.body.position();
        self.report
    }
}

fn log_event(event: &GameplayEvent) {
    match event {
        GameplayEvent::StateEntered { state, .. } => debug!(?state, "state entered"),
        GameplayEvent::JumpAccepted { jump_count, .. } => info!(jump_count, "jump"),
        GameplayEvent::JumpRejected { jump_count, .. } => {
            info!(jump_count, "jump ignored, budget spent");
        },
        GameplayEvent::JumpsReset { .. } => info!("landed, jumps restored"),
        GameplayEvent::AttackStarted { .. } => info!("attack"),
        GameplayEvent::AttackFinished { .. } => debug!("attack finished"),
        GameplayEvent::TargetHit {
            damage, critical, ..
        } => info!(damage, critical, "hit"),
        GameplayEvent::HitRejected {
            attacker_level,
            required_level,
            ..
        } => info!(attacker_level, required_level, "hit withheld, level too low"),
    }
}
