//! Ball Catch headless demo
//!
//! Plays a scripted session: 60 fps frames, a simulated pose estimator that
//! reports on every other frame and drifts a wrist toward the oldest ball, and
//! a renderer that logs the board once per second.
//!
//! Usage: `ball-catch [config.json]`

use glam::Vec2;

use ball_catch::platform::{Renderer, ScriptedFrames};
use ball_catch::sim::{GameEvent, Joint, PoseLandmarks, Snapshot};
use ball_catch::{GameConfig, Session};

const FPS: f64 = 60.0;
const SESSION_MS: f64 = 30_000.0;
/// Fraction of the remaining distance the wrist covers per pose result
const WRIST_FOLLOW: f32 = 0.12;

/// Logs a summary line per second of frame time
#[derive(Default)]
struct LogRenderer {
    next_report_ms: f64,
    catches: u64,
}

impl Renderer for LogRenderer {
    fn render(&mut self, snapshot: &Snapshot) {
        for event in snapshot.catches() {
            if let GameEvent::Caught { id, joint, pos } = event {
                self.catches += 1;
                log::debug!("Hit burst for ball {} ({:?}) at {:.2},{:.2}", id, joint, pos.x, pos.y);
            }
        }
        if snapshot.now_ms >= self.next_report_ms {
            log::info!(
                "t={:>6.0}ms balls={} score={}",
                snapshot.now_ms,
                snapshot.targets.len(),
                snapshot.score
            );
            self.next_report_ms += 1000.0;
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{}", err);
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };

    let frames = ScriptedFrames::at_fps(FPS, SESSION_MS);
    let mut session = match Session::new(config, frames, LogRenderer::default()) {
        Ok(session) => session,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = session.start() {
        log::error!("{}", err);
        std::process::exit(1);
    }

    let poses = session.pose_buffer();
    let mut wrist = Vec2::new(0.5, 0.9);
    let mut frame = 0u64;

    loop {
        // Inference runs at half the frame rate and reports between frames
        if frame % 2 == 1 {
            if let Some(target) = session.snapshot().targets.first() {
                wrist = wrist.lerp(target.pos, WRIST_FOLLOW);
            }
            poses.publish(PoseLandmarks::new().with(Joint::RightWrist, wrist));
        }
        if !session.pump_one() {
            break;
        }
        frame += 1;
    }

    let score = session.snapshot().score;
    let catches = session.renderer().catches;
    session.stop();
    println!("Session over after {} frames: score {} ({} catches)", frame, score, catches);
}
