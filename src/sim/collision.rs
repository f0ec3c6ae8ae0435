//! Wrist-to-target collision matching
//!
//! Targets and landmarks are both normalized, so they are scaled to pixel
//! space before measuring: target radii and the hit margin are in pixels and a
//! non-square frame would otherwise distort distances.

use std::collections::BTreeSet;

use glam::Vec2;

use super::pose::{Joint, PoseLandmarks};
use super::target::Target;
use crate::config::GameConfig;
use crate::to_pixels;

/// A single target caught this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Catch {
    pub target_id: u32,
    /// The joint that made the catch
    pub joint: Joint,
    /// Target position (normalized) at the moment of the catch
    pub pos: Vec2,
}

/// Stateless matcher configured with the frame size, margin and joint set
#[derive(Debug, Clone)]
pub struct CollisionMatcher {
    frame_size: Vec2,
    hit_margin_px: f32,
    joints: Vec<Joint>,
}

impl CollisionMatcher {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            frame_size: Vec2::new(
                config.frame_size.width as f32,
                config.frame_size.height as f32,
            ),
            hit_margin_px: config.hit_margin_px,
            joints: config.tracked_joints.clone(),
        }
    }

    /// Find the first tracked joint within reach of `target`, in joint order
    pub fn catching_joint(&self, target: &Target, landmarks: &PoseLandmarks) -> Option<Joint> {
        let center = to_pixels(target.pos, self.frame_size);
        let reach = target.radius + self.hit_margin_px;

        self.joints.iter().copied().find(|&joint| {
            landmarks
                .get(joint)
                .is_some_and(|pos| to_pixels(pos, self.frame_size).distance(center) < reach)
        })
    }

    /// All catches this frame, in target order
    pub fn find_catches(&self, targets: &[Target], landmarks: &PoseLandmarks) -> Vec<Catch> {
        if landmarks.is_empty() {
            return Vec::new();
        }
        targets
            .iter()
            .filter_map(|target| {
                self.catching_joint(target, landmarks).map(|joint| Catch {
                    target_id: target.id,
                    joint,
                    pos: target.pos,
                })
            })
            .collect()
    }

    /// Ids of every target caught this frame
    pub fn caught_ids(&self, targets: &[Target], landmarks: &PoseLandmarks) -> BTreeSet<u32> {
        self.find_catches(targets, landmarks)
            .into_iter()
            .map(|c| c.target_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn target(id: u32, x: f32, y: f32, radius: f32) -> Target {
        Target {
            id,
            pos: Vec2::new(x, y),
            radius,
            created_at: 0.0,
            caught: false,
        }
    }

    fn matcher() -> CollisionMatcher {
        CollisionMatcher::new(&GameConfig::classic())
    }

    /// Normalized position `dx_px` pixels right of `(0.5, 0.5)` in a 640x480 frame
    fn offset_px(dx_px: f32) -> Vec2 {
        Vec2::new((320.0 + dx_px) / 640.0, 0.5)
    }

    #[test]
    fn test_distance_boundary() {
        let matcher = matcher();
        let targets = [target(1, 0.5, 0.5, 40.0)];
        // radius 40 + margin 25
        let reach = 65.0;
        let eps = 0.5;

        let inside = PoseLandmarks::new().with(Joint::LeftWrist, offset_px(reach - eps));
        assert_eq!(matcher.caught_ids(&targets, &inside), BTreeSet::from([1]));

        let outside = PoseLandmarks::new().with(Joint::LeftWrist, offset_px(reach + eps));
        assert!(matcher.caught_ids(&targets, &outside).is_empty());
    }

    #[test]
    fn test_distance_uses_pixel_space() {
        let matcher = matcher();
        let targets = [target(1, 0.5, 0.5, 30.0)];
        // 0.1 normalized is 64 px horizontally but only 48 px vertically
        let horizontal = PoseLandmarks::new().with(Joint::RightWrist, Vec2::new(0.6, 0.5));
        let vertical = PoseLandmarks::new().with(Joint::RightWrist, Vec2::new(0.5, 0.6));

        assert!(matcher.caught_ids(&targets, &horizontal).is_empty());
        assert_eq!(matcher.caught_ids(&targets, &vertical), BTreeSet::from([1]));
    }

    #[test]
    fn test_empty_landmarks_catch_nothing() {
        let matcher = matcher();
        let targets = [target(1, 0.5, 0.5, 50.0), target(2, 0.3, 0.3, 50.0)];
        assert!(matcher.caught_ids(&targets, &PoseLandmarks::new()).is_empty());
    }

    #[test]
    fn test_untracked_joints_are_ignored() {
        let matcher = matcher();
        let targets = [target(1, 0.5, 0.5, 40.0)];
        // Nose sits on the target but only wrists count
        let pose = PoseLandmarks::new().with(Joint::Nose, Vec2::new(0.5, 0.5));
        assert!(matcher.caught_ids(&targets, &pose).is_empty());
    }

    #[test]
    fn test_first_joint_wins() {
        let matcher = matcher();
        let targets = [target(7, 0.5, 0.5, 40.0)];
        let pose = PoseLandmarks::new()
            .with(Joint::LeftWrist, Vec2::new(0.5, 0.5))
            .with(Joint::RightWrist, Vec2::new(0.5, 0.5));

        let catches = matcher.find_catches(&targets, &pose);
        assert_eq!(catches.len(), 1);
        assert_eq!(catches[0].joint, Joint::LeftWrist);
        assert_eq!(catches[0].target_id, 7);
    }

    #[test]
    fn test_either_wrist_can_catch() {
        let matcher = matcher();
        let targets = [target(1, 0.3, 0.3, 30.0), target(2, 0.7, 0.7, 30.0)];
        let pose = PoseLandmarks::new()
            .with(Joint::LeftWrist, Vec2::new(0.3, 0.3))
            .with(Joint::RightWrist, Vec2::new(0.7, 0.7));

        let catches = matcher.find_catches(&targets, &pose);
        assert_eq!(catches[0].joint, Joint::LeftWrist);
        assert_eq!(catches[1].joint, Joint::RightWrist);
        assert_eq!(matcher.caught_ids(&targets, &pose), BTreeSet::from([1, 2]));
    }

    proptest! {
        #[test]
        fn prop_matching_is_deterministic(
            positions in prop::collection::vec((0.2f32..0.8, 0.2f32..0.8, 30.0f32..50.0), 0..12),
            wrist in (0.0f32..1.0, 0.0f32..1.0),
        ) {
            let matcher = matcher();
            let targets: Vec<Target> = positions
                .iter()
                .enumerate()
                .map(|(i, &(x, y, r))| target(i as u32 + 1, x, y, r))
                .collect();
            let pose = PoseLandmarks::new().with(Joint::RightWrist, Vec2::new(wrist.0, wrist.1));

            let first = matcher.caught_ids(&targets, &pose);
            let second = matcher.caught_ids(&targets, &pose);
            prop_assert_eq!(first, second);
        }
    }
}
