//! Game configuration
//!
//! Loaded from JSON (partial files fall back to defaults per field) and
//! validated before any game object is built. Invalid values are rejected,
//! never clamped.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::Joint;

/// Inclusive `[min, max]` range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f32,
    pub max: f32,
}

impl Bounds {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Normalized region targets may spawn in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnArea {
    pub x: Bounds,
    pub y: Bounds,
}

impl Default for SpawnArea {
    fn default() -> Self {
        Self {
            x: Bounds::new(0.2, 0.8),
            y: Bounds::new(0.2, 0.8),
        }
    }
}

/// Pixel dimensions of the analyzed video frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl Default for FrameSize {
    fn default() -> Self {
        Self {
            width: FRAME_WIDTH,
            height: FRAME_HEIGHT,
        }
    }
}

/// How long to wait between spawns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SpawnInterval {
    /// Constant interval
    Fixed { ms: f64 },
    /// Interval shrinks by `step_ms` after every spawn, down to `floor_ms`
    Ramping {
        initial_ms: f64,
        step_ms: f64,
        floor_ms: f64,
    },
}

impl Default for SpawnInterval {
    fn default() -> Self {
        SpawnInterval::Fixed {
            ms: DEFAULT_SPAWN_INTERVAL_MS,
        }
    }
}

impl SpawnInterval {
    /// Interval in effect before the first spawn
    pub fn initial_ms(&self) -> f64 {
        match *self {
            SpawnInterval::Fixed { ms } => ms,
            SpawnInterval::Ramping { initial_ms, .. } => initial_ms,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            SpawnInterval::Fixed { ms } => check_interval("ms", ms),
            SpawnInterval::Ramping {
                initial_ms,
                step_ms,
                floor_ms,
            } => {
                check_interval("initial_ms", initial_ms)?;
                check_interval("floor_ms", floor_ms)?;
                if !step_ms.is_finite() || step_ms < 0.0 {
                    return Err(ConfigError::NegativeRampStep(step_ms));
                }
                if floor_ms > initial_ms {
                    return Err(ConfigError::FloorAboveInitial {
                        floor: floor_ms,
                        initial: initial_ms,
                    });
                }
                Ok(())
            }
        }
    }
}

fn check_interval(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidInterval { field, value })
    }
}

fn check_length(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeLength { field, value })
    }
}

fn check_unit_inset(field: &'static str, bounds: Bounds) -> Result<(), ConfigError> {
    if bounds.min > bounds.max {
        return Err(ConfigError::InvertedRange {
            field,
            min: bounds.min,
            max: bounds.max,
        });
    }
    // Rejects NaN too
    if !(bounds.min > 0.0 && bounds.max < 1.0) {
        return Err(ConfigError::SpawnAreaOutOfBounds {
            field,
            min: bounds.min,
            max: bounds.max,
        });
    }
    Ok(())
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Maximum target age before eviction (ms)
    pub ttl_ms: f64,
    /// Spawn timing policy
    pub spawn_interval: SpawnInterval,
    /// Extra catch distance added to each target's radius (px)
    pub hit_margin_px: f32,
    /// Target radius range (px)
    pub radius_range: Bounds,
    /// Normalized spawn region
    pub spawn_area: SpawnArea,
    /// Spawn one new target for every caught target
    pub replace_on_catch: bool,
    /// Frame dimensions used to convert normalized positions to pixels
    pub frame_size: FrameSize,
    /// Joints checked for catches, in evaluation order
    pub tracked_joints: Vec<Joint>,
    /// RNG seed for target placement
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl GameConfig {
    /// Steady pace: fixed spawn interval, caught targets are replaced
    pub fn classic() -> Self {
        Self {
            ttl_ms: DEFAULT_TTL_MS,
            spawn_interval: SpawnInterval::Fixed {
                ms: DEFAULT_SPAWN_INTERVAL_MS,
            },
            hit_margin_px: DEFAULT_HIT_MARGIN_PX,
            radius_range: Bounds::new(30.0, 50.0),
            spawn_area: SpawnArea::default(),
            replace_on_catch: true,
            frame_size: FrameSize::default(),
            tracked_joints: vec![Joint::LeftWrist, Joint::RightWrist],
            seed: DEFAULT_SEED,
        }
    }

    /// Rising difficulty: spawns speed up over the session, no replacement
    pub fn ramping() -> Self {
        Self {
            ttl_ms: 3000.0,
            spawn_interval: SpawnInterval::Ramping {
                initial_ms: 1000.0,
                step_ms: 10.0,
                floor_ms: 300.0,
            },
            hit_margin_px: 15.0,
            radius_range: Bounds::new(20.0, 40.0),
            spawn_area: SpawnArea {
                x: Bounds::new(0.1, 0.9),
                y: Bounds::new(0.2, 0.8),
            },
            replace_on_catch: false,
            ..Self::classic()
        }
    }

    /// Check every field, returning the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ttl_ms.is_finite() && self.ttl_ms > 0.0) {
            return Err(ConfigError::InvalidTtl(self.ttl_ms));
        }
        self.spawn_interval.validate()?;
        check_length("hit_margin_px", self.hit_margin_px)?;

        check_length("radius_range.min", self.radius_range.min)?;
        check_length("radius_range.max", self.radius_range.max)?;
        if self.radius_range.min > self.radius_range.max {
            return Err(ConfigError::InvertedRange {
                field: "radius_range",
                min: self.radius_range.min,
                max: self.radius_range.max,
            });
        }

        check_unit_inset("spawn_area.x", self.spawn_area.x)?;
        check_unit_inset("spawn_area.y", self.spawn_area.y)?;

        if self.frame_size.width == 0 || self.frame_size.height == 0 {
            return Err(ConfigError::EmptyFrame {
                width: self.frame_size.width,
                height: self.frame_size.height,
            });
        }
        if self.tracked_joints.is_empty() {
            return Err(ConfigError::NoTrackedJoints);
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
