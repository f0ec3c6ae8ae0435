//! Targets and the store that owns them
//!
//! The store is the only writer of the live target list. Everything else reads
//! through `snapshot()`.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::{Bounds, GameConfig, SpawnArea};

/// A catchable ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    /// Normalized position in `[0, 1] x [0, 1]`
    pub pos: Vec2,
    /// Radius in pixels
    pub radius: f32,
    /// Spawn time (ms, frame clock)
    pub created_at: f64,
    /// Set only while a catch is being applied
    #[serde(skip)]
    pub caught: bool,
}

impl Target {
    /// Age at time `now` (ms)
    #[inline]
    pub fn age(&self, now: f64) -> f64 {
        now - self.created_at
    }
}

/// Owns the live targets, their ids and the placement RNG
#[derive(Debug, Clone)]
pub struct TargetStore {
    targets: Vec<Target>,
    rng: Pcg32,
    next_id: u32,
    spawn_area: SpawnArea,
    radius_range: Bounds,
    ttl_ms: f64,
    replace_on_catch: bool,
}

impl TargetStore {
    /// Build a store from an already validated config
    pub fn new(config: &GameConfig) -> Self {
        Self {
            targets: Vec::new(),
            rng: Pcg32::seed_from_u64(config.seed),
            next_id: 1,
            spawn_area: config.spawn_area,
            radius_range: config.radius_range,
            ttl_ms: config.ttl_ms,
            replace_on_catch: config.replace_on_catch,
        }
    }

    fn next_target_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn random_target(&mut self, now: f64) -> Target {
        let id = self.next_target_id();
        let SpawnArea { x, y } = self.spawn_area;
        let pos = Vec2::new(
            self.rng.random_range(x.min..=x.max),
            self.rng.random_range(y.min..=y.max),
        );
        let radius = self
            .rng
            .random_range(self.radius_range.min..=self.radius_range.max);

        Target {
            id,
            pos,
            radius,
            created_at: now,
            caught: false,
        }
    }

    /// Create one target at a random position and add it to the live set
    pub fn spawn(&mut self, now: f64) -> Target {
        let target = self.random_target(now);
        log::debug!(
            "Spawned target {} at ({:.3}, {:.3}) r={:.1}",
            target.id,
            target.pos.x,
            target.pos.y,
            target.radius
        );
        self.targets.push(target.clone());
        target
    }

    /// Remove targets older than the TTL, returning how many were removed
    pub fn evict_expired(&mut self, now: f64) -> usize {
        self.evict_expired_ids(now).len()
    }

    /// Remove targets older than the TTL, returning their ids in store order
    pub fn evict_expired_ids(&mut self, now: f64) -> Vec<u32> {
        let ttl = self.ttl_ms;
        let mut evicted = Vec::new();
        self.targets.retain(|t| {
            let keep = t.age(now) <= ttl;
            if !keep {
                evicted.push(t.id);
            }
            keep
        });
        if !evicted.is_empty() {
            log::debug!("Evicted {} expired target(s): {:?}", evicted.len(), evicted);
        }
        evicted
    }

    /// Remove every live target in `caught_ids` in one step.
    ///
    /// With replacement enabled, spawns as many new targets as were removed and
    /// returns them. Ids that are not live are ignored.
    pub fn remove_and_replace(&mut self, caught_ids: &BTreeSet<u32>, now: f64) -> Vec<Target> {
        for target in &mut self.targets {
            if caught_ids.contains(&target.id) {
                target.caught = true;
            }
        }
        let before = self.targets.len();
        self.targets.retain(|t| !t.caught);
        let removed = before - self.targets.len();

        if !self.replace_on_catch || removed == 0 {
            return Vec::new();
        }

        let replacements: Vec<Target> = (0..removed).map(|_| self.random_target(now)).collect();
        self.targets.extend(replacements.iter().cloned());
        log::debug!("Replaced {} caught target(s)", removed);
        replacements
    }

    /// Current live targets, oldest first
    pub fn snapshot(&self) -> &[Target] {
        &self.targets
    }

    pub fn get(&self, id: u32) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    /// Drop all targets. Ids keep counting up.
    pub fn clear(&mut self) {
        self.targets.clear();
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn replace_on_catch(&self) -> bool {
        self.replace_on_catch
    }
}
