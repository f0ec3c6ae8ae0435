//! Per-frame game loop
//!
//! One tick runs, in order: eviction, spawn scheduling, collision with
//! replacement and scoring, then snapshot publication. A tick never fails and
//! never leaves the store half-updated.

use std::collections::BTreeSet;

use super::collision::CollisionMatcher;
use super::pose::PoseLandmarks;
use super::score::ScoreTracker;
use super::spawn::SpawnScheduler;
use super::state::{GameEvent, LoopPhase, Snapshot, TickOutcome};
use super::target::{Target, TargetStore};
use crate::config::GameConfig;
use crate::error::{ConfigError, GameError};
use crate::platform::FrameSource;

/// Owns all game state and advances it one tick at a time
#[derive(Debug, Clone)]
pub struct GameLoop {
    config: GameConfig,
    phase: LoopPhase,
    store: TargetStore,
    scheduler: SpawnScheduler,
    matcher: CollisionMatcher,
    score: ScoreTracker,
    tick_count: u64,
    published: Snapshot,
}

impl GameLoop {
    /// Validate `config` and build an idle loop
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            store: TargetStore::new(&config),
            scheduler: SpawnScheduler::new(config.spawn_interval),
            matcher: CollisionMatcher::new(&config),
            score: ScoreTracker::new(),
            phase: LoopPhase::Idle,
            tick_count: 0,
            published: Snapshot::default(),
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == LoopPhase::Running
    }

    pub fn score(&self) -> u64 {
        self.score.value()
    }

    /// Live targets as of the last completed mutation
    pub fn targets(&self) -> &[Target] {
        self.store.snapshot()
    }

    /// Last published snapshot
    pub fn snapshot(&self) -> &Snapshot {
        &self.published
    }

    /// Start the frame source and begin ticking.
    ///
    /// If the source fails the loop stays idle. Starting a running loop is a
    /// no-op; a stopped loop cannot be restarted.
    pub fn start<S: FrameSource + ?Sized>(&mut self, source: &mut S) -> Result<(), GameError> {
        match self.phase {
            LoopPhase::Running => return Ok(()),
            LoopPhase::Stopped => return Err(GameError::Stopped),
            LoopPhase::Idle => {}
        }

        if let Err(err) = source.start() {
            log::error!("Frame source failed to start: {}", err);
            return Err(err.into());
        }

        self.phase = LoopPhase::Running;
        self.publish(Vec::new());
        log::info!("Game loop started");
        Ok(())
    }

    /// Advance one tick at frame time `now` (ms).
    ///
    /// `pose` is the latest available pose result, if any. Without one the
    /// collision phase is skipped and the target lifecycle still runs.
    pub fn tick(&mut self, now: f64, pose: Option<&PoseLandmarks>) -> TickOutcome {
        if !self.is_running() {
            log::trace!("Ignoring tick at {:.1} ms in phase {:?}", now, self.phase);
            return TickOutcome::default();
        }

        self.tick_count += 1;
        let mut outcome = TickOutcome {
            ran: true,
            ..Default::default()
        };
        let mut events = Vec::new();

        // 1. Age out
        let expired = self.store.evict_expired_ids(now);
        outcome.evicted = expired.len();
        events.extend(expired.into_iter().map(|id| GameEvent::Expired { id }));

        // 2. Spawn if due
        if self.scheduler.poll(now) {
            let target = self.store.spawn(now);
            outcome.spawned = 1;
            events.push(GameEvent::Spawned { id: target.id });
        }

        // 3. Catch, replace, score
        if let Some(pose) = pose {
            let catches = self.matcher.find_catches(self.store.snapshot(), pose);
            if !catches.is_empty() {
                let caught_ids: BTreeSet<u32> = catches.iter().map(|c| c.target_id).collect();
                let replacements = self.store.remove_and_replace(&caught_ids, now);

                outcome.caught = catches.len();
                outcome.replaced = replacements.len();
                self.score.increment(catches.len() as u64);

                events.extend(catches.iter().map(|c| GameEvent::Caught {
                    id: c.target_id,
                    joint: c.joint,
                    pos: c.pos,
                }));
                events.extend(
                    replacements
                        .iter()
                        .map(|t| GameEvent::Spawned { id: t.id }),
                );

                log::info!(
                    "Caught {} target(s), spawned {} replacement(s), score {}",
                    catches.len(),
                    replacements.len(),
                    self.score.value()
                );
            }
        }

        // 4. Publish
        self.published.now_ms = now;
        self.publish(events);
        outcome
    }

    /// Clear targets, score and spawn timer.
    ///
    /// A running loop passes through `Idle` and resumes immediately since its
    /// frame source is still live. A stopped loop stays stopped.
    pub fn reset(&mut self) {
        if self.phase == LoopPhase::Stopped {
            log::warn!("Ignoring reset of a stopped game loop");
            return;
        }
        let resume = self.phase == LoopPhase::Running;

        self.phase = LoopPhase::Idle;
        self.store.clear();
        self.score.reset();
        self.scheduler.reset();

        if resume {
            self.phase = LoopPhase::Running;
        }
        self.publish(vec![GameEvent::Reset]);
        log::info!("Game reset (phase {:?})", self.phase);
    }

    /// Stop the frame source and end the loop for good
    pub fn stop<S: FrameSource + ?Sized>(&mut self, source: &mut S) {
        if self.phase == LoopPhase::Stopped {
            return;
        }
        source.stop();
        self.phase = LoopPhase::Stopped;
        self.publish(Vec::new());
        log::info!(
            "Game loop stopped after {} ticks, final score {}",
            self.tick_count,
            self.score.value()
        );
    }

    fn publish(&mut self, events: Vec<GameEvent>) {
        self.published = Snapshot {
            tick: self.tick_count,
            now_ms: self.published.now_ms,
            phase: self.phase,
            score: self.score.value(),
            targets: self.store.snapshot().to_vec(),
            events,
        };
    }
}
