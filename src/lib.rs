//! Ball Catch - catch glowing balls with your wrists
//!
//! Core modules:
//! - `sim`: Deterministic game state (targets, collision, spawning, score, tick)
//! - `platform`: Contracts for the frame source, pose buffer and renderer
//! - `session`: Frame-driven scheduling that ties the pieces together
//! - `config`: Validated, JSON-loadable game configuration

pub mod config;
pub mod error;
pub mod platform;
pub mod session;
pub mod sim;

pub use config::{Bounds, FrameSize, GameConfig, SpawnArea, SpawnInterval};
pub use error::{ConfigError, GameError, SourceError};
pub use session::Session;

use glam::Vec2;

/// Game configuration defaults
pub mod consts {
    /// Analyzed video frame size (px)
    pub const FRAME_WIDTH: u32 = 640;
    pub const FRAME_HEIGHT: u32 = 480;

    /// Target lifetime before eviction (ms)
    pub const DEFAULT_TTL_MS: f64 = 4000.0;
    /// Time between spawns (ms)
    pub const DEFAULT_SPAWN_INTERVAL_MS: f64 = 1500.0;
    /// Roughly the radius of a wrist in a 640x480 frame (px)
    pub const DEFAULT_HIT_MARGIN_PX: f32 = 25.0;

    pub const DEFAULT_SEED: u64 = 0x5EED_BA11;
}

/// Scale a normalized `[0, 1]` position to pixel space
#[inline]
pub fn to_pixels(normalized: Vec2, frame_size: Vec2) -> Vec2 {
    normalized * frame_size
}
