//! Game Configuration
//!
//! Everything that is content rather than code: playfield size, track
//! baselines, physics constants, collision margins, sprite-sheet cells,
//! platform layout and actor placement. Stored as RON, like level files.
//!
//! Cell lists are defined once in `cell_sets` and referenced by name.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::warn;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::game::collision::Margins;
use crate::game::sprite::{Cell, SpriteKind};
use crate::game::timer::TimerError;

/// Default level shipped with the game.
pub const DEFAULT_LEVEL: &str = include_str!("../assets/levels/snail_bait.ron");

/// Points for a collectible without an explicit value.
pub const DEFAULT_ITEM_VALUE: u32 = 50;

/// Error type for config operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Timer(#[from] TimerError),
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayfieldConfig {
    pub canvas_width: f32,
    /// Sprites below this are out of play
    pub canvas_height: f32,
    pub background_width: f32,
    pub background_height: f32,
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 400.0,
            background_width: 1102.0,
            background_height: 400.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Meters per second squared
    pub gravity: f64,
    /// How many meters the canvas spans; sets the pixel scale for gravity
    pub canvas_width_in_meters: f64,
    pub jump_height: f32,
    /// Milliseconds, split evenly between ascent and descent
    pub jump_duration: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 3.0,
            canvas_width_in_meters: 13.0,
            jump_height: 150.0,
            jump_duration: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Background pixels per second while running
    pub background_velocity: f32,
    /// Platforms scroll this many times faster than the background
    pub platform_velocity_multiplier: f32,
    pub slow_motion_rate: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            background_velocity: 42.0,
            platform_velocity_multiplier: 4.35,
            slow_motion_rate: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    pub left: f32,
    pub width: f32,
    pub height: f32,
    pub starting_track: u8,
    /// Milliseconds between run-cycle frames
    pub run_interval: f64,
    pub lives: u32,
    /// Cell set names
    pub cells_right: String,
    pub cells_left: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            left: 50.0,
            width: 50.0,
            height: 54.0,
            starting_track: 1,
            run_interval: 80.0,
            lives: 3,
            cells_right: "runner_right".to_string(),
            cells_left: "runner_left".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BounceDef {
    pub duration: f64,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PulseDef {
    pub duration: f64,
    pub threshold: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileDef {
    pub kind: SpriteKind,
    pub width: f32,
    pub height: f32,
    pub velocity_x: f32,
    pub cells: String,
    pub cycle_interval: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShootDef {
    pub interval: f64,
    pub projectile: ProjectileDef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformDef {
    pub left: f32,
    pub width: f32,
    #[serde(default = "default_platform_height")]
    pub height: f32,
    pub track: u8,
    pub color: [u8; 3],
    #[serde(default)]
    pub pulse: Option<PulseDef>,
}

fn default_platform_height() -> f32 {
    8.0
}

/// Where an actor starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Placement {
    At { left: f32, top: f32 },
    /// Standing on the platform at this index, aligned to its left edge
    OnPlatform(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorDef {
    pub kind: SpriteKind,
    pub placement: Placement,
    pub width: f32,
    pub height: f32,
    pub cells: String,
    #[serde(default)]
    pub value: Option<u32>,
    #[serde(default)]
    pub cycle_interval: Option<f64>,
    #[serde(default)]
    pub bounce: Option<BounceDef>,
    #[serde(default)]
    pub pulse: Option<PulseDef>,
    #[serde(default)]
    pub shoot: Option<ShootDef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugConfig {
    #[serde(default)]
    pub show_collision_boxes: bool,
}

// =============================================================================
// GameConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub playfield: PlayfieldConfig,
    /// Baselines of tracks 1, 2, 3... (y of the walking surface)
    pub tracks: Vec<f32>,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Sprite-sheet image path, relative to the working directory
    #[serde(default)]
    pub sprite_sheet: Option<String>,
    #[serde(default)]
    pub margins: HashMap<SpriteKind, Margins>,
    #[serde(default)]
    pub cell_sets: HashMap<String, Vec<Cell>>,
    #[serde(default)]
    pub platforms: Vec<PlatformDef>,
    #[serde(default)]
    pub actors: Vec<ActorDef>,
    #[serde(default)]
    pub debug: DebugConfig,
}

impl Default for GameConfig {
    /// Stock constants, a runner and nothing else.
    fn default() -> Self {
        let mut cell_sets = HashMap::new();
        cell_sets.insert("runner_right".to_string(), vec![Cell::new(470.0, 310.0, 50.0, 54.0)]);
        cell_sets.insert("runner_left".to_string(), vec![Cell::new(470.0, 370.0, 50.0, 54.0)]);

        Self {
            playfield: PlayfieldConfig::default(),
            tracks: vec![323.0, 223.0, 123.0],
            physics: PhysicsConfig::default(),
            scroll: ScrollConfig::default(),
            runner: RunnerConfig::default(),
            sprite_sheet: None,
            margins: HashMap::new(),
            cell_sets,
            platforms: Vec::new(),
            actors: Vec::new(),
            debug: DebugConfig::default(),
        }
    }
}

impl GameConfig {
    /// The built-in level.
    pub fn embedded() -> Result<Self, ConfigError> {
        load_config_from_str(DEFAULT_LEVEL)
    }

    pub fn pixels_per_meter(&self) -> f64 {
        self.playfield.canvas_width as f64 / self.physics.canvas_width_in_meters
    }

    /// Gravity in pixels per second squared.
    pub fn gravity_px(&self) -> f64 {
        self.physics.gravity * self.pixels_per_meter()
    }

    /// Baseline of a 1-based track.
    pub fn track_baseline(&self, track: u8) -> Option<f32> {
        if track == 0 {
            return None;
        }
        self.tracks.get(track as usize - 1).copied()
    }

    pub fn margins_for(&self, kind: SpriteKind) -> Margins {
        self.margins.get(&kind).copied().unwrap_or_default()
    }

    pub fn cells(&self, name: &str) -> Result<&[Cell], ConfigError> {
        self.cell_sets
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ConfigError::Validation(format!("unknown cell set '{}'", name)))
    }

    /// Check the config for values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pf = &self.playfield;
        if pf.canvas_width <= 0.0 || pf.canvas_height <= 0.0 {
            return Err(invalid(format!(
                "canvas must have a positive size, got {}x{}",
                pf.canvas_width, pf.canvas_height
            )));
        }
        if pf.background_width <= 0.0 {
            return Err(invalid("background width must be positive"));
        }

        if self.tracks.is_empty() || self.tracks.len() > u8::MAX as usize {
            return Err(invalid(format!("expected 1..=255 tracks, got {}", self.tracks.len())));
        }

        let physics = &self.physics;
        if !(physics.canvas_width_in_meters > 0.0) {
            return Err(invalid("canvas_width_in_meters must be positive"));
        }
        check_duration("jump_duration", physics.jump_duration)?;

        if !(self.scroll.slow_motion_rate > 0.0) {
            return Err(invalid("slow_motion_rate must be positive"));
        }

        let runner = &self.runner;
        self.check_track("runner", runner.starting_track)?;
        check_interval("runner run_interval", runner.run_interval)?;
        self.cells(&runner.cells_right)?;
        self.cells(&runner.cells_left)?;

        for (i, platform) in self.platforms.iter().enumerate() {
            let name = format!("platform {}", i);
            self.check_track(&name, platform.track)?;
            if platform.width <= 0.0 || platform.height <= 0.0 {
                return Err(invalid(format!("{} has a non-positive size", name)));
            }
            if let Some(pulse) = platform.pulse {
                check_pulse(&name, pulse)?;
            }
        }

        for (i, actor) in self.actors.iter().enumerate() {
            let name = format!("actor {} ({})", i, actor.kind.label());
            self.cells(&actor.cells)?;
            if let Placement::OnPlatform(index) = actor.placement {
                if index >= self.platforms.len() {
                    return Err(invalid(format!("{} stands on missing platform {}", name, index)));
                }
            }
            if let Some(interval) = actor.cycle_interval {
                check_interval(&name, interval)?;
            }
            if let Some(bounce) = actor.bounce {
                check_duration(&format!("{} bounce", name), bounce.duration)?;
            }
            if let Some(pulse) = actor.pulse {
                check_pulse(&name, pulse)?;
            }
            if let Some(shoot) = &actor.shoot {
                check_interval(&format!("{} shoot", name), shoot.interval)?;
                check_interval(&format!("{} projectile", name), shoot.projectile.cycle_interval)?;
                self.cells(&shoot.projectile.cells)?;
            }
        }

        Ok(())
    }

    fn check_track(&self, name: &str, track: u8) -> Result<(), ConfigError> {
        if track == 0 || track as usize > self.tracks.len() {
            return Err(invalid(format!(
                "{} is on track {}, expected 1..={}",
                name,
                track,
                self.tracks.len()
            )));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation(message.into())
}

fn check_duration(name: &str, duration: f64) -> Result<(), ConfigError> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(invalid(format!("{} must be a positive duration, got {}", name, duration)));
    }
    Ok(())
}

fn check_interval(name: &str, interval: f64) -> Result<(), ConfigError> {
    if !interval.is_finite() || interval < 0.0 {
        return Err(invalid(format!("{} has invalid interval {}", name, interval)));
    }
    Ok(())
}

fn check_pulse(name: &str, pulse: PulseDef) -> Result<(), ConfigError> {
    check_duration(&format!("{} pulse", name), pulse.duration)?;
    if !(0.0..=1.0).contains(&pulse.threshold) {
        return Err(invalid(format!("{} pulse threshold {} outside 0..=1", name, pulse.threshold)));
    }
    Ok(())
}

// =============================================================================
// Load / Save
// =============================================================================

/// Load and validate a config file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<GameConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents).inspect_err(|e| {
        warn!("failed to load config {}: {}", path.display(), e);
    })
}

/// Parse and validate a config from RON text.
pub fn load_config_from_str(s: &str) -> Result<GameConfig, ConfigError> {
    let config: GameConfig = ron::from_str(s)?;
    config.validate()?;
    Ok(config)
}

/// Write a config as pretty RON.
pub fn save_config<P: AsRef<Path>>(config: &GameConfig, path: P) -> Result<(), ConfigError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let ron_string = ron::ser::to_string_pretty(config, pretty)?;
    fs::write(path, ron_string)?;
    Ok(())
}
