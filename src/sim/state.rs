//! Loop phases, events and the published snapshot
//!
//! The snapshot is everything a renderer needs for one frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pose::Joint;
use super::target::Target;

/// Lifecycle of the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoopPhase {
    /// Not started, or between a reset and the restart
    #[default]
    Idle,
    /// Ticking on every frame
    Running,
    /// Torn down, ignores all further ticks
    Stopped,
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { id: u32 },
    Expired { id: u32 },
    /// Renderers draw the hit burst at `pos`
    Caught { id: u32, joint: Joint, pos: Vec2 },
    Reset,
}

/// Immutable view of the game after a completed tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Number of ticks run since start
    pub tick: u64,
    /// Frame time of the tick (ms)
    pub now_ms: f64,
    pub phase: LoopPhase,
    pub score: u64,
    /// Live targets, oldest first
    pub targets: Vec<Target>,
    /// Events from this tick only
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    pub fn catches(&self) -> impl Iterator<Item = &GameEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, GameEvent::Caught { .. }))
    }
}

/// Per-tick counts reported back to the driver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// False when the loop was not running and nothing happened
    pub ran: bool,
    pub evicted: usize,
    pub spawned: usize,
    pub caught: usize,
    pub replaced: usize,
}
