//! Deterministic game simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in from the caller, never from a clock
//! - Seeded RNG only
//! - Stable iteration order (targets oldest first, joints in config order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod pose;
pub mod score;
pub mod spawn;
pub mod state;
pub mod target;
pub mod tick;

pub use collision::{Catch, CollisionMatcher};
pub use pose::{Joint, POSE_LANDMARK_COUNT, PoseLandmarks};
pub use score::ScoreTracker;
pub use spawn::{SpawnScheduler, should_spawn};
pub use state::{GameEvent, LoopPhase, Snapshot, TickOutcome};
pub use target::{Target, TargetStore};
pub use tick::GameLoop;
