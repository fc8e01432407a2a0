use serde::Serialize;

use super::label::{PostureLabel, PostureSource};

/// Which panel a feedback update is rendered into.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FeedbackTarget {
    /// Feedback box next to the camera view.
    CameraPanel,
    /// Main posture indicator fed by the chair sensors.
    MainIndicator,
}

impl From<PostureSource> for FeedbackTarget {
    fn from(source: PostureSource) -> Self {
        match source {
            PostureSource::PoseNet => FeedbackTarget::CameraPanel,
            PostureSource::Sensors => FeedbackTarget::MainIndicator,
        }
    }
}

/// Display text for a posture status.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostureFeedback {
    pub label: Option<PostureLabel>,
    pub title: &'static str,
    pub advice: &'static str,
    /// Style class; the raw status string so the view can colour it.
    pub css_class: String,
    pub target: FeedbackTarget,
}

impl PostureFeedback {
    /// Status strings outside the known label set render as "Unknown".
    pub fn for_status(status: &str, source: PostureSource) -> Self {
        let label = PostureLabel::parse(status);
        let (title, advice) = match label {
            Some(PostureLabel::Good) => (
                "Good Posture",
                "Great job! Keep your back straight and relaxed, with your shoulders aligned.",
            ),
            Some(PostureLabel::Poor) => (
                "Poor Posture",
                "Your shoulders appear unbalanced. Straighten your back and distribute your weight evenly.",
            ),
            Some(PostureLabel::NotSitting) => (
                "Not Sitting",
                "No sitting posture detected. Make sure you're seated and visible to the camera.",
            ),
            Some(PostureLabel::LeaningForward) => (
                "Leaning Forward",
                "You are leaning towards the screen. Sit back and rest against the backrest.",
            ),
            Some(PostureLabel::Unknown) | None => ("Unknown", "Posture not recognized."),
        };

        Self {
            label,
            title,
            advice,
            css_class: status.to_string(),
            target: source.into(),
        }
    }

    pub fn for_label(label: PostureLabel, source: PostureSource) -> Self {
        Self::for_status(label.as_str(), source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posenet_feedback_targets_camera_panel() {
        let feedback = PostureFeedback::for_label(PostureLabel::Good, PostureSource::PoseNet);

        assert_eq!(feedback.title, "Good Posture");
        assert_eq!(feedback.css_class, "good");
        assert_eq!(feedback.target, FeedbackTarget::CameraPanel);
    }

    #[test]
    fn sensor_feedback_targets_main_indicator() {
        let feedback = PostureFeedback::for_status("not_sitting", PostureSource::Sensors);

        assert_eq!(feedback.label, Some(PostureLabel::NotSitting));
        assert_eq!(feedback.title, "Not Sitting");
        assert_eq!(feedback.target, FeedbackTarget::MainIndicator);
    }

    #[test]
    fn unrecognized_status_is_unknown() {
        let feedback = PostureFeedback::for_status("slouching", PostureSource::Sensors);

        assert_eq!(feedback.label, None);
        assert_eq!(feedback.title, "Unknown");
        assert_eq!(feedback.advice, "Posture not recognized.");
        assert_eq!(feedback.css_class, "slouching");
    }
}
