//! Pose landmark input
//!
//! A pose result maps joints to normalized image coordinates. A joint that is
//! missing from the map was not tracked in that frame.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Number of landmarks in a MediaPipe pose result
pub const POSE_LANDMARK_COUNT: usize = 33;

/// Body joints the game can track (MediaPipe pose numbering)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Joint {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
}

impl Joint {
    pub const ALL: [Joint; 9] = [
        Joint::Nose,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::RightHip,
    ];

    /// Index into a MediaPipe pose landmark list
    pub fn landmark_index(self) -> usize {
        match self {
            Joint::Nose => 0,
            Joint::LeftShoulder => 11,
            Joint::RightShoulder => 12,
            Joint::LeftElbow => 13,
            Joint::RightElbow => 14,
            Joint::LeftWrist => 15,
            Joint::RightWrist => 16,
            Joint::LeftHip => 23,
            Joint::RightHip => 24,
        }
    }
}

/// One pose estimate: tracked joints with normalized positions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseLandmarks {
    joints: BTreeMap<Joint, Vec2>,
}

impl PoseLandmarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, joint: Joint, pos: Vec2) -> Self {
        self.set(joint, pos);
        self
    }

    /// Record a joint position. Non-finite positions mark the joint untracked.
    pub fn set(&mut self, joint: Joint, pos: Vec2) {
        if pos.is_finite() {
            self.joints.insert(joint, pos);
        } else {
            self.joints.remove(&joint);
        }
    }

    pub fn get(&self, joint: Joint) -> Option<Vec2> {
        self.joints.get(&joint).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Joint, Vec2)> + '_ {
        self.joints.iter().map(|(&joint, &pos)| (joint, pos))
    }

    /// Build from a flat MediaPipe array of 33 `[x, y, z]` triples.
    ///
    /// Returns `None` when the length is wrong. Depth is ignored.
    pub fn from_flat(data: &[f32]) -> Option<Self> {
        if data.len() != POSE_LANDMARK_COUNT * 3 {
            log::warn!(
                "Invalid landmark data length: {} (expected {})",
                data.len(),
                POSE_LANDMARK_COUNT * 3
            );
            return None;
        }

        let mut pose = Self::new();
        for joint in Joint::ALL {
            let i = joint.landmark_index() * 3;
            pose.set(joint, Vec2::new(data[i], data[i + 1]));
        }
        Some(pose)
    }
}
