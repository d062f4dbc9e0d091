//! Simulation configuration.
//!
//! Describes the arena, the scripted inputs and the controller tuning for a
//! headless run. Configuration can be loaded from and saved to a TOML file.

use std::fs;
use std::path::{Path, PathBuf};

use ascent_common::{AscentResult, ConfigError};
use ascent_gameplay::{ControllerConfig, InputEvent, InputPhase, ItemSpec, PlayerData};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "ascent.toml";

/// One input fired at a fixed point in simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedInput {
    /// Seconds from the start of the run
    pub at: f32,
    /// Event delivered to the controller
    pub input: InputEvent,
}

impl ScriptedInput {
    /// Creates a scripted input.
    #[must_use]
    pub fn new(at: f32, input: InputEvent) -> Self {
        Self { at, input }
    }
}

/// Climbable wall in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallConfig {
    /// Place the wall in the arena
    pub enabled: bool,
    /// Distance of the wall face along +Z from the spawn point
    pub distance: f32,
    /// Height of the top edge
    pub height: f32,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            distance: 6.0,
            height: 2.5,
        }
    }
}

/// Destructible target in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Place the target in the arena
    pub enabled: bool,
    /// Target position
    pub position: Vec3,
    /// Attack volume reaches targets within this distance
    pub reach: f32,
    /// Target description
    pub item: ItemSpec,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            position: Vec3::new(0.0, 0.0, 1.0),
            reach: 1.5,
            item: ItemSpec::default(),
        }
    }
}

/// Headless simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Run ===
    /// Controller ticks per second
    pub tick_rate: u32,
    /// Simulated seconds to run
    pub duration: f32,
    /// Pace ticks against the wall clock instead of running flat out
    pub realtime: bool,
    /// Seed for critical rolls (None = random)
    pub rng_seed: Option<u64>,

    // === Camera ===
    /// Camera yaw in degrees, applied to move input
    pub camera_yaw: f32,

    // === Output ===
    /// Where to write the JSON run report (None = log only)
    pub report_path: Option<PathBuf>,

    // === Arena ===
    /// Climbable wall
    pub wall: WallConfig,
    /// Target to attack
    pub target: TargetConfig,

    // === Player ===
    /// Player progression
    pub player: PlayerData,
    /// Controller tuning
    pub controller: ControllerConfig,
    /// Inputs delivered during the run
    pub script: Vec<ScriptedInput>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            duration: 6.0,
            realtime: false,
            rng_seed: None,

            camera_yaw: 0.0,

            report_path: None,

            wall: WallConfig::default(),
            target: TargetConfig::default(),

            player: PlayerData::default(),
            controller: ControllerConfig::default(),
            script: default_script(),
        }
    }
}

/// Attack the target, double jump, then run into the wall and climb it.
///
/// Held input keeps its ground heading on the wall, so the second move
/// event steers the climb.
fn default_script() -> Vec<ScriptedInput> {
    vec![
        ScriptedInput::new(0.1, InputEvent::Fire),
        ScriptedInput::new(0.2, InputEvent::Fire),
        ScriptedInput::new(1.3, InputEvent::Fire),
        ScriptedInput::new(2.4, InputEvent::Fire),
        ScriptedInput::new(2.5, InputEvent::Jump),
        ScriptedInput::new(2.6, InputEvent::Jump),
        ScriptedInput::new(2.7, InputEvent::Jump),
        ScriptedInput::new(3.5, InputEvent::Move(Vec2::new(0.0, 1.0))),
        ScriptedInput::new(3.5, InputEvent::Sprint(InputPhase::Started)),
        ScriptedInput::new(4.8, InputEvent::Move(Vec2::new(0.0, 1.0))),
        ScriptedInput::new(5.5, InputEvent::Sprint(InputPhase::Canceled)),
    ]
}

impl SimConfig {
    /// Parse configuration from TOML text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match Self::parse(&contents) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("{e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> AscentResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Encode(e.to_string()))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.tick_rate = self.tick_rate.clamp(1, 1000);
        self.duration = self.duration.clamp(0.0, 3600.0);
        self.camera_yaw = self.camera_yaw.rem_euclid(360.0);

        self.target.reach = self.target.reach.max(0.0);
        self.target.item.max_health = self.target.item.max_health.max(0.0);
        self.wall.height = self.wall.height.max(0.0);

        self.controller.validate();

        // Scripted inputs run in time order
        self.script.retain(|entry| entry.at.is_finite());
        self.script.sort_by(|a, b| a.at.total_cmp(&b.at));
    }

    /// Number of ticks in the run.
    #[must_use]
    pub fn total_ticks(&self) -> u64 {
        (self.duration * self.tick_rate as f32).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.tick_rate, 60);
        assert_eq!(config.total_ticks(), 360);
        assert!(config.wall.enabled);
        assert_eq!(config.rng_seed, None);
        assert!(!config.script.is_empty());
    }

    #[test]
    fn test_config_validation() {
        let mut config = SimConfig::default();
        config.tick_rate = 0;
        config.camera_yaw = -90.0;
        config.controller.attack.critical_chance = 250.0;
        config.script = vec![
            ScriptedInput::new(2.0, InputEvent::Jump),
            ScriptedInput::new(f32::NAN, InputEvent::Fire),
            ScriptedInput::new(1.0, InputEvent::Fire),
        ];

        config.validate();

        assert_eq!(config.tick_rate, 1);
        assert_eq!(config.camera_yaw, 270.0);
        assert_eq!(config.controller.attack.critical_chance, 100.0);
        assert_eq!(
            config.script,
            vec![
                ScriptedInput::new(1.0, InputEvent::Fire),
                ScriptedInput::new(2.0, InputEvent::Jump),
            ]
        );
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("ascent.toml");

        let mut config = SimConfig::default();
        config.tick_rate = 120;
        config.rng_seed = Some(12345);
        config.wall.enabled = false;
        config.report_path = Some(temp_dir.path().join("report.json"));
        config.controller.movement.max_jumps = 3;

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = SimConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = SimConfig::load_from("/nonexistent/path/ascent.toml");
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_config_load_invalid_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "tick_rate = \"fast\"").expect("Failed to write config");

        let config = SimConfig::load_from(&config_path);
        assert_eq!(config.tick_rate, 60);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let text = r#"
            duration = 2.0

            [controller.movement]
            max_jumps = 4

            [[script]]
            at = 0.5
            input = "Jump"

            [[script]]
            at = 1.0
            input = { Move = [1.0, 0.0] }
        "#;

        let config = SimConfig::parse(text).expect("config should parse");

        assert_eq!(config.duration, 2.0);
        assert_eq!(config.controller.movement.max_jumps, 4);
        assert_eq!(config.controller.movement.speed, 5.0);
        assert_eq!(
            config.script,
            vec![
                ScriptedInput::new(0.5, InputEvent::Jump),
                ScriptedInput::new(1.0, InputEvent::Move(Vec2::new(1.0, 0.0))),
            ]
        );
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = SimConfig::parse("tick_rate = [").expect_err("should not parse");
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
