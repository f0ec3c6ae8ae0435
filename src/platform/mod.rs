//! Platform abstraction layer
//!
//! Contracts for the collaborators the game does not own:
//! - Frame source (camera / video element)
//! - Pose estimator output, buffered as "latest available"
//! - Renderer
//!
//! Everything here is single-threaded. Shared handles use `Rc` so a pose
//! callback and the frame loop can hold the same buffer.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::error::SourceError;
use crate::sim::{PoseLandmarks, Snapshot};

/// One video frame notification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Sequence number, starting at 0
    pub seq: u64,
    /// Monotonic frame time (ms)
    pub timestamp_ms: f64,
}

/// Produces a monotonic sequence of timestamped frames
pub trait FrameSource {
    /// Acquire the underlying device. Failure keeps the game from starting.
    fn start(&mut self) -> Result<(), SourceError>;

    /// Release the device. Must be safe to call more than once.
    fn stop(&mut self);

    /// Next ready frame, or `None` if there is none right now
    fn poll_frame(&mut self) -> Option<Frame>;
}

/// Draws published snapshots
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot);
}

/// Latest pose result from the estimator.
///
/// The estimator publishes whenever inference finishes; the game loop takes
/// the value at the start of its next tick. Unconsumed results are overwritten,
/// and each result is consumed by exactly one tick.
#[derive(Debug, Clone, Default)]
pub struct PoseBuffer {
    latest: Rc<RefCell<Option<PoseLandmarks>>>,
}

impl PoseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, pose: PoseLandmarks) {
        self.latest.replace(Some(pose));
    }

    pub fn take_latest(&self) -> Option<PoseLandmarks> {
        self.latest.take()
    }

    pub fn has_pending(&self) -> bool {
        self.latest.borrow().is_some()
    }
}

/// Cancellation handle for a frame subscription
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Frame source that replays a fixed list of timestamps
#[derive(Debug, Clone)]
pub struct ScriptedFrames {
    pending: VecDeque<f64>,
    next_seq: u64,
    started: bool,
}

impl ScriptedFrames {
    pub fn new(timestamps: Vec<f64>) -> Self {
        Self {
            pending: timestamps.into(),
            next_seq: 0,
            started: false,
        }
    }

    /// `duration_ms` worth of frames at a steady rate, starting at 0
    pub fn at_fps(fps: f64, duration_ms: f64) -> Self {
        let frame_ms = 1000.0 / fps;
        let count = (duration_ms / frame_ms).floor() as usize + 1;
        Self::new((0..count).map(|i| i as f64 * frame_ms).collect())
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl FrameSource for ScriptedFrames {
    fn start(&mut self) -> Result<(), SourceError> {
        self.started = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.started = false;
    }

    fn poll_frame(&mut self) -> Option<Frame> {
        if !self.started {
            return None;
        }
        let timestamp_ms = self.pending.pop_front()?;
        let frame = Frame {
            seq: self.next_seq,
            timestamp_ms,
        };
        self.next_seq += 1;
        Some(frame)
    }
}
