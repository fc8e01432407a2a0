use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PostureLabel {
    Good,
    Poor,
    NotSitting,
    LeaningForward,
    #[default]
    Unknown,
}

impl PostureLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostureLabel::Good => "good",
            PostureLabel::Poor => "poor",
            PostureLabel::NotSitting => "not_sitting",
            PostureLabel::LeaningForward => "leaning_forward",
            PostureLabel::Unknown => "unknown",
        }
    }

    /// Parses the wire form. Strings outside the label set yield `None`;
    /// callers decide how to display them.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "good" => Some(PostureLabel::Good),
            "poor" => Some(PostureLabel::Poor),
            "not_sitting" => Some(PostureLabel::NotSitting),
            "leaning_forward" => Some(PostureLabel::LeaningForward),
            "unknown" => Some(PostureLabel::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for PostureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a posture reading came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PostureSource {
    PoseNet,
    Sensors,
}

impl PostureSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostureSource::PoseNet => "posenet",
            PostureSource::Sensors => "sensors",
        }
    }

    /// Anything other than `posenet` is treated as the chair's own sensors.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("posenet") => PostureSource::PoseNet,
            _ => PostureSource::Sensors,
        }
    }
}

impl fmt::Display for PostureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_server_strings() {
        for label in [
            PostureLabel::Good,
            PostureLabel::Poor,
            PostureLabel::NotSitting,
            PostureLabel::LeaningForward,
            PostureLabel::Unknown,
        ] {
            let json = serde_json::to_string(&label).unwrap();
            assert_eq!(json, format!("\"{}\"", label.as_str()));
            assert_eq!(PostureLabel::parse(label.as_str()), Some(label));
        }
    }

    #[test]
    fn default_label_is_unknown() {
        assert_eq!(PostureLabel::default(), PostureLabel::Unknown);
    }

    #[test]
    fn unrecognized_status_is_not_a_label() {
        assert_eq!(PostureLabel::parse("slouching"), None);
        assert_eq!(PostureLabel::parse("Good"), None);
    }

    #[test]
    fn source_tag_defaults_to_sensors() {
        assert_eq!(PostureSource::from_tag(Some("posenet")), PostureSource::PoseNet);
        assert_eq!(PostureSource::from_tag(Some("arduino")), PostureSource::Sensors);
        assert_eq!(PostureSource::from_tag(None), PostureSource::Sensors);
        assert_eq!(serde_json::to_string(&PostureSource::PoseNet).unwrap(), "\"posenet\"");
    }
}
