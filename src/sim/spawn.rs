//! Time-gated spawn scheduling

use crate::config::SpawnInterval;

/// Whether a spawn is due.
///
/// A scheduler that has never spawned is always due. Otherwise strictly more
/// than `interval_ms` must have passed since the last spawn.
#[inline]
pub fn should_spawn(now: f64, last_spawn: Option<f64>, interval_ms: f64) -> bool {
    match last_spawn {
        None => true,
        Some(last) => now - last > interval_ms,
    }
}

/// Tracks the last spawn time and the current interval
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    policy: SpawnInterval,
    last_spawn: Option<f64>,
    current_interval_ms: f64,
}

impl SpawnScheduler {
    pub fn new(policy: SpawnInterval) -> Self {
        Self {
            policy,
            last_spawn: None,
            current_interval_ms: policy.initial_ms(),
        }
    }

    /// Check the timer at `now`. On `true` the caller must spawn exactly one
    /// target; the timer has already been advanced.
    pub fn poll(&mut self, now: f64) -> bool {
        if !should_spawn(now, self.last_spawn, self.current_interval_ms) {
            return false;
        }
        self.last_spawn = Some(now);

        if let SpawnInterval::Ramping {
            step_ms, floor_ms, ..
        } = self.policy
        {
            self.current_interval_ms = (self.current_interval_ms - step_ms).max(floor_ms);
        }
        true
    }

    /// Back to a fresh start: next poll spawns, ramp restarts
    pub fn reset(&mut self) {
        self.last_spawn = None;
        self.current_interval_ms = self.policy.initial_ms();
    }

    pub fn current_interval_ms(&self) -> f64 {
        self.current_interval_ms
    }

    pub fn last_spawn(&self) -> Option<f64> {
        self.last_spawn
    }
}
