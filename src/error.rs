//! Error types
//!
//! Only construction and startup can fail. Nothing inside a tick returns an
//! error: missing pose data just skips the collision phase.

use thiserror::Error;

/// Invalid game configuration, reported at construction time
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ttl_ms must be a positive finite number, got {0}")]
    InvalidTtl(f64),
    #[error("spawn interval `{field}` must be a positive finite number, got {value}")]
    InvalidInterval { field: &'static str, value: f64 },
    #[error("ramp step must be non-negative, got {0}")]
    NegativeRampStep(f64),
    #[error("ramp floor ({floor} ms) is above the initial interval ({initial} ms)")]
    FloorAboveInitial { floor: f64, initial: f64 },
    #[error("`{field}` range is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("`{field}` must lie strictly inside (0, 1), got [{min}, {max}]")]
    SpawnAreaOutOfBounds {
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("`{field}` must be a non-negative finite number, got {value}")]
    NegativeLength { field: &'static str, value: f32 },
    #[error("frame size must be non-zero, got {width}x{height}")]
    EmptyFrame { width: u32, height: u32 },
    #[error("at least one tracked joint is required")]
    NoTrackedJoints,
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Frame source failed to come up
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("frame source unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by the game loop lifecycle
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot start game loop: {0}")]
    SourceUnavailable(#[from] SourceError),
    #[error("game loop has been stopped")]
    Stopped,
}
