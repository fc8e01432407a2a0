use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct SensorReading {
    pub value: f64,
}

/// Periodic sensor snapshot pushed by the chair server.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChairData {
    pub chair_id: String,
    #[serde(default)]
    pub sensors: Option<Vec<SensorReading>>,
    #[serde(default)]
    pub posture_status: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Posture computed server side, from either the chair or the camera.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostureUpdate {
    pub chair_id: String,
    #[serde(default)]
    pub posture_status: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChairEvent {
    ChairData(ChairData),
    PostureUpdate(PostureUpdate),
}

impl ChairEvent {
    pub fn chair_id(&self) -> &str {
        match self {
            ChairEvent::ChairData(data) => &data.chair_id,
            ChairEvent::PostureUpdate(update) => &update.chair_id,
        }
    }
}
