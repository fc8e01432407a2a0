use serde::Serialize;

use super::keypoint::{
    find_keypoint, Keypoint, Pose, Position, LEFT_EAR, LEFT_EYE, LEFT_SHOULDER, NOSE, RIGHT_EAR,
    RIGHT_EYE, RIGHT_SHOULDER,
};

/// Keypoints and bones at or below this score are not drawn.
pub const MIN_DRAW_SCORE: f64 = 0.5;

/// Upper-body bones drawn over the camera frame.
pub const SKELETON: [(&str, &str); 7] = [
    (NOSE, LEFT_EYE),
    (LEFT_EYE, LEFT_EAR),
    (NOSE, RIGHT_EYE),
    (RIGHT_EYE, RIGHT_EAR),
    (NOSE, LEFT_SHOULDER),
    (NOSE, RIGHT_SHOULDER),
    (LEFT_SHOULDER, RIGHT_SHOULDER),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: Position,
    pub to: Position,
}

/// Everything the view needs to draw one frame's skeleton.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PoseOverlay {
    pub points: Vec<Position>,
    pub segments: Vec<Segment>,
}

impl PoseOverlay {
    pub fn from_pose(pose: &Pose) -> Self {
        Self {
            points: visible_keypoints(pose)
                .map(|keypoint| keypoint.position)
                .collect(),
            segments: skeleton_segments(pose),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.segments.is_empty()
    }
}

pub fn visible_keypoints(pose: &Pose) -> impl Iterator<Item = &Keypoint> {
    pose.keypoints
        .iter()
        .filter(|keypoint| keypoint.score > MIN_DRAW_SCORE)
}

pub fn skeleton_segments(pose: &Pose) -> Vec<Segment> {
    SKELETON
        .iter()
        .filter_map(|(a, b)| {
            let part_a = find_keypoint(&pose.keypoints, a)?;
            let part_b = find_keypoint(&pose.keypoints, b)?;
            (part_a.score > MIN_DRAW_SCORE && part_b.score > MIN_DRAW_SCORE).then(|| Segment {
                from: part_a.position,
                to: part_b.position,
            })
        })
        .collect()
}
