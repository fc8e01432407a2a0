use serde::{Deserialize, Serialize};

pub const NOSE: &str = "nose";
pub const LEFT_EYE: &str = "leftEye";
pub const RIGHT_EYE: &str = "rightEye";
pub const LEFT_EAR: &str = "leftEar";
pub const RIGHT_EAR: &str = "rightEar";
pub const LEFT_SHOULDER: &str = "leftShoulder";
pub const RIGHT_SHOULDER: &str = "rightShoulder";

/// Pixel position in the mirrored camera frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One named body part as reported by the pose estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub part: String,
    pub position: Position,
    pub score: f64,
}

impl Keypoint {
    pub fn new(part: impl Into<String>, x: f64, y: f64, score: f64) -> Self {
        Self {
            part: part.into(),
            position: Position { x, y },
            score,
        }
    }
}

/// A single detected person.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    #[serde(default)]
    pub keypoints: Vec<Keypoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Pose {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self {
            keypoints,
            score: None,
        }
    }

    pub fn keypoint(&self, part: &str) -> Option<&Keypoint> {
        find_keypoint(&self.keypoints, part)
    }
}

/// First keypoint whose `part` matches `name`.
pub fn find_keypoint<'a>(keypoints: &'a [Keypoint], name: &str) -> Option<&'a Keypoint> {
    keypoints.iter().find(|keypoint| keypoint.part == name)
}
