//! Frame-driven session
//!
//! Wires a frame source, the pose buffer, a renderer and the game loop
//! together. Each frame runs exactly one tick against whatever pose result is
//! newest at that moment, then hands the snapshot to the renderer.

use crate::config::GameConfig;
use crate::error::GameError;
use crate::platform::{CancelToken, Frame, FrameSource, PoseBuffer, Renderer};
use crate::sim::{GameLoop, LoopPhase, Snapshot, TickOutcome};

pub struct Session<S: FrameSource, R: Renderer> {
    game: GameLoop,
    source: S,
    renderer: R,
    poses: PoseBuffer,
    subscription: Option<CancelToken>,
}

impl<S: FrameSource, R: Renderer> Session<S, R> {
    pub fn new(config: GameConfig, source: S, renderer: R) -> Result<Self, GameError> {
        Ok(Self {
            game: GameLoop::new(config)?,
            source,
            renderer,
            poses: PoseBuffer::new(),
            subscription: None,
        })
    }

    /// Handle for the pose estimator to publish results into
    pub fn pose_buffer(&self) -> PoseBuffer {
        self.poses.clone()
    }

    pub fn game(&self) -> &GameLoop {
        &self.game
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.game.snapshot()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Start the source and subscribe to frames.
    ///
    /// The returned token cancels frame dispatch; `stop` cancels it too.
    pub fn start(&mut self) -> Result<CancelToken, GameError> {
        if let Some(token) = &self.subscription {
            if !token.is_cancelled() && self.game.is_running() {
                return Ok(token.clone());
            }
        }
        self.game.start(&mut self.source)?;
        let token = CancelToken::new();
        self.subscription = Some(token.clone());
        Ok(token)
    }

    fn is_subscribed(&self) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }

    /// Run one tick for `frame`. Frames arriving after cancellation are dropped.
    pub fn on_frame(&mut self, frame: Frame) -> TickOutcome {
        if !self.is_subscribed() {
            log::trace!("Dropping frame {} after cancellation", frame.seq);
            return TickOutcome::default();
        }
        let pose = self.poses.take_latest();
        let outcome = self.game.tick(frame.timestamp_ms, pose.as_ref());
        if outcome.ran {
            self.renderer.render(self.game.snapshot());
        }
        outcome
    }

    /// Dispatch the next ready frame, if any. Returns false when there was
    /// nothing to dispatch or the subscription is cancelled.
    pub fn pump_one(&mut self) -> bool {
        if !self.is_subscribed() {
            return false;
        }
        match self.source.poll_frame() {
            Some(frame) => {
                self.on_frame(frame);
                true
            }
            None => false,
        }
    }

    /// Dispatch every ready frame. Returns how many ticks ran.
    pub fn pump(&mut self) -> usize {
        let mut frames = 0;
        while self.pump_one() {
            frames += 1;
        }
        frames
    }

    pub fn reset(&mut self) {
        self.game.reset();
        // A pose from before the reset must not score in the new round
        self.poses.take_latest();
        if self.game.is_running() {
            self.renderer.render(self.game.snapshot());
        }
    }

    /// Cancel the subscription, stop the source and end the game loop
    pub fn stop(&mut self) {
        if let Some(token) = self.subscription.take() {
            token.cancel();
        }
        self.game.stop(&mut self.source);
    }

    pub fn phase(&self) -> LoopPhase {
        self.game.phase()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::config::Bounds;
    use crate::platform::ScriptedFrames;
    use crate::sim::{GameEvent, Joint, PoseLandmarks};

    #[derive(Default)]
    struct RecordingRenderer {
        frames: Vec<Snapshot>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, snapshot: &Snapshot) {
            self.frames.push(snapshot.clone());
        }
    }

    fn session(timestamps: Vec<f64>) -> Session<ScriptedFrames, RecordingRenderer> {
        let config = GameConfig {
            radius_range: Bounds::new(1.0, 1.0),
            hit_margin_px: 0.0,
            ..GameConfig::classic()
        };
        Session::new(
            config,
            ScriptedFrames::new(timestamps),
            RecordingRenderer::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_renders_once_per_frame() {
        let mut session = session(vec![0.0, 16.0, 33.0, 50.0]);
        session.start().unwrap();
        assert_eq!(session.pump(), 4);

        let frames = &session.renderer().frames;
        assert_eq!(frames.len(), 4);
        assert_eq!(frames.iter().map(|s| s.tick).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(frames[0].targets.len(), 1);
    }

    #[test]
    fn test_no_frames_before_start() {
        let mut session = session(vec![0.0]);
        assert_eq!(session.pump(), 0);
        assert!(session.renderer().frames.is_empty());
        assert_eq!(session.phase(), LoopPhase::Idle);
    }

    #[test]
    fn test_pose_is_consumed_by_one_tick() {
        let mut session = session(vec![0.0, 16.0, 33.0]);
        session.start().unwrap();
        session.pump_one();
        let target = session.snapshot().targets[0].clone();

        // Inference finished between frames
        let poses = session.pose_buffer();
        poses.publish(PoseLandmarks::new().with(Joint::LeftWrist, target.pos));
        session.pump_one();
        assert_eq!(session.snapshot().score, 1);
        assert!(!poses.has_pending());

        // No new inference result: the stale one is not reused
        session.pump_one();
        assert_eq!(session.snapshot().score, 1);
    }

    #[test]
    fn test_stale_pose_still_catches() {
        let mut session = session(vec![0.0, 16.0, 33.0, 50.0]);
        session.start().unwrap();
        session.pump_one();
        let target = session.snapshot().targets[0].clone();

        // Inference for frame 0 lands only after frame 1 has ticked without it
        session.pump_one();
        session
            .pose_buffer()
            .publish(PoseLandmarks::new().with(Joint::RightWrist, target.pos));
        session.pump_one();

        let caught = session
            .snapshot()
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::Caught { id, .. } if *id == target.id));
        assert!(caught);
        assert_eq!(session.snapshot().score, 1);
    }

    #[test]
    fn test_cancel_token_stops_dispatch() {
        let mut session = session(vec![0.0, 16.0, 33.0]);
        let token = session.start().unwrap();
        session.pump_one();
        token.cancel();

        assert_eq!(session.pump(), 0);
        assert_eq!(session.source().remaining(), 2);
        let outcome = session.on_frame(Frame {
            seq: 9,
            timestamp_ms: 5000.0,
        });
        assert!(!outcome.ran);
        assert_eq!(session.renderer().frames.len(), 1);
    }

    #[test]
    fn test_stop_is_final() {
        let mut session = session(vec![0.0, 16.0]);
        let token = session.start().unwrap();
        session.pump_one();
        let before = session.snapshot().clone();

        session.stop();
        assert!(token.is_cancelled());
        assert_eq!(session.phase(), LoopPhase::Stopped);
        assert!(!session.source().is_started());

        session
            .pose_buffer()
            .publish(PoseLandmarks::new().with(Joint::LeftWrist, Vec2::new(0.5, 0.5)));
        let outcome = session.on_frame(Frame {
            seq: 1,
            timestamp_ms: 16.0,
        });
        assert!(!outcome.ran);
        assert_eq!(session.snapshot().targets, before.targets);
        assert!(matches!(session.start(), Err(GameError::Stopped)));
    }

    #[test]
    fn test_reset_renders_empty_board() {
        let mut session = session(vec![0.0, 1600.0, 1616.0]);
        session.start().unwrap();
        session.pump_one();
        session.pump_one();
        session
            .pose_buffer()
            .publish(PoseLandmarks::new().with(Joint::LeftWrist, Vec2::new(0.5, 0.5)));

        session.reset();
        let last = session.renderer().frames.last().unwrap();
        assert!(last.targets.is_empty());
        assert_eq!(last.score, 0);
        assert_eq!(last.events, vec![GameEvent::Reset]);
        assert!(!session.pose_buffer().has_pending());

        // Next frame spawns right away
        session.pump_one();
        assert_eq!(session.snapshot().targets.len(), 1);
    }
}
