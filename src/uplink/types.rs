use serde::{Deserialize, Serialize};

use crate::pose::{Keypoint, Pose};
use crate::posture::PostureSource;

/// Body of `POST /posenet`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PoseReport {
    pub chair_id: String,
    pub source: PostureSource,
    pub keypoints: Vec<Keypoint>,
}

impl PoseReport {
    pub fn from_pose(chair_id: &str, pose: &Pose) -> Self {
        Self {
            chair_id: chair_id.to_string(),
            source: PostureSource::PoseNet,
            keypoints: pose.keypoints.clone(),
        }
    }
}

/// Response of `GET /api/chairids`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChairIdsResponse {
    #[serde(default)]
    pub ids: Option<Vec<String>>,
}
