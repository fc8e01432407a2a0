use serde::Serialize;

use super::events::SensorReading;

/// How one pressure sensor is drawn on the chair heat-map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorCell {
    /// 1-based, matches the `sensorN` element ids.
    pub index: usize,
    pub value: f64,
    pub normalized: f64,
    /// 0..=100
    pub intensity: u8,
    /// 120 (green) at no load down to 0 (red) at the busiest sensor.
    pub hue: f64,
    pub color: String,
    pub scale: f64,
    pub caption: String,
}

/// Readings are normalised against the busiest sensor, with a floor of 1 so
/// an idle chair does not divide by zero.
pub fn visualize(sensors: &[SensorReading]) -> Vec<SensorCell> {
    let max_value = sensors
        .iter()
        .map(|sensor| sensor.value)
        .fold(f64::NEG_INFINITY, f64::max);
    let divisor = max_value.max(1.0);

    sensors
        .iter()
        .enumerate()
        .map(|(i, sensor)| {
            let normalized = sensor.value / divisor;
            let intensity = (normalized * 100.0).floor().clamp(0.0, 100.0);
            let hue = (120.0 - intensity * 1.2).max(0.0);
            SensorCell {
                index: i + 1,
                value: sensor.value,
                normalized,
                intensity: intensity as u8,
                hue,
                color: format!("hsl({}, 80%, 70%)", hue),
                scale: 1.0 + normalized * 0.2,
                caption: format!("S{}: {}", i + 1, sensor.value),
            }
        })
        .collect()
}
