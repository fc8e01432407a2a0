use crate::pose::{
    keypoint::{LEFT_SHOULDER, NOSE, RIGHT_SHOULDER},
    Keypoint, Pose,
};

use super::label::PostureLabel;

/// Tunable limits for deriving a posture from head and shoulder keypoints.
/// Distances are in camera pixels; image y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisThresholds {
    /// Nose and both shoulders must score above this to classify at all.
    pub min_keypoint_score: f64,
    /// Shoulder height difference above which posture is poor.
    pub max_shoulder_difference: f64,
    /// Nose below the shoulder midpoint by more than this means leaning forward.
    pub lean_forward_distance: f64,
    /// Nose above the shoulder midpoint by more than this is implausible and
    /// counted as poor.
    pub min_vertical_distance: f64,
}

impl Default for AnalysisThresholds {
    fn default() -> Self {
        Self {
            min_keypoint_score: 0.3,
            max_shoulder_difference: 50.0,
            lean_forward_distance: 80.0,
            min_vertical_distance: -300.0,
        }
    }
}

/// Geometry the classification is based on, reported with each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostureMeasurements {
    pub vertical_distance: f64,
    pub shoulder_difference: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostureAnalysis {
    pub label: PostureLabel,
    pub measurements: Option<PostureMeasurements>,
}

#[derive(Debug, Clone, Default)]
pub struct PostureAnalyzer {
    thresholds: AnalysisThresholds,
}

impl PostureAnalyzer {
    pub fn new(thresholds: AnalysisThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &AnalysisThresholds {
        &self.thresholds
    }

    pub fn classify(&self, pose: &Pose) -> PostureLabel {
        self.analyze(pose).label
    }

    pub fn analyze(&self, pose: &Pose) -> PostureAnalysis {
        let min_score = self.thresholds.min_keypoint_score;
        let (Some(nose), Some(left), Some(right)) = (
            confident(pose, NOSE, min_score),
            confident(pose, LEFT_SHOULDER, min_score),
            confident(pose, RIGHT_SHOULDER, min_score),
        ) else {
            return PostureAnalysis {
                label: PostureLabel::NotSitting,
                measurements: None,
            };
        };

        let shoulder_mid_y = (left.position.y + right.position.y) / 2.0;
        let measurements = PostureMeasurements {
            vertical_distance: nose.position.y - shoulder_mid_y,
            shoulder_difference: (left.position.y - right.position.y).abs(),
        };

        PostureAnalysis {
            label: self.label_for(&measurements),
            measurements: Some(measurements),
        }
    }

    fn label_for(&self, m: &PostureMeasurements) -> PostureLabel {
        let t = &self.thresholds;
        if m.shoulder_difference > t.max_shoulder_difference {
            PostureLabel::Poor
        } else if m.vertical_distance > t.lean_forward_distance {
            PostureLabel::LeaningForward
        } else if m.vertical_distance < t.min_vertical_distance {
            PostureLabel::Poor
        } else {
            PostureLabel::Good
        }
    }
}

fn confident<'a>(pose: &'a Pose, part: &str, min_score: f64) -> Option<&'a Keypoint> {
    pose.keypoint(part).filter(|keypoint| keypoint.score > min_score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper_body(nose_y: f64, left_y: f64, right_y: f64) -> Pose {
        Pose::new(vec![
            Keypoint::new(NOSE, 320.0, nose_y, 0.9),
            Keypoint::new(LEFT_SHOULDER, 260.0, left_y, 0.8),
            Keypoint::new(RIGHT_SHOULDER, 380.0, right_y, 0.8),
        ])
    }

    #[test]
    fn upright_head_above_level_shoulders_is_good() {
        let analysis = PostureAnalyzer::default().analyze(&upper_body(150.0, 300.0, 310.0));

        assert_eq!(analysis.label, PostureLabel::Good);
        let m = analysis.measurements.unwrap();
        assert_eq!(m.vertical_distance, -155.0);
        assert_eq!(m.shoulder_difference, 10.0);
    }

    #[test]
    fn uneven_shoulders_are_poor() {
        let analyzer = PostureAnalyzer::default();
        assert_eq!(analyzer.classify(&upper_body(150.0, 300.0, 360.0)), PostureLabel::Poor);
    }

    #[test]
    fn nose_below_shoulders_is_leaning_forward() {
        let analyzer = PostureAnalyzer::default();
        assert_eq!(
            analyzer.classify(&upper_body(400.0, 300.0, 300.0)),
            PostureLabel::LeaningForward
        );
    }

    #[test]
    fn nose_far_above_shoulders_is_poor() {
        let analyzer = PostureAnalyzer::default();
        assert_eq!(analyzer.classify(&upper_body(-10.0, 300.0, 300.0)), PostureLabel::Poor);
    }

    #[test]
    fn weak_or_missing_keypoints_mean_not_sitting() {
        let analyzer = PostureAnalyzer::default();

        let mut pose = upper_body(150.0, 300.0, 300.0);
        pose.keypoints[1].score = 0.3;
        assert_eq!(analyzer.classify(&pose), PostureLabel::NotSitting);

        let analysis = analyzer.analyze(&Pose::default());
        assert_eq!(analysis.label, PostureLabel::NotSitting);
        assert!(analysis.measurements.is_none());
    }
}
