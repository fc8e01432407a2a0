use tokio::time::Instant;
use uuid::Uuid;

use crate::pose::{Pose, PoseOverlay};
use crate::posture::{PostureAnalyzer, PostureLabel, PostureMeasurements, PostureStabilizer};
use crate::uplink::{PoseUplink, UplinkGate};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_verbose};

/// What one detection frame produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameOutcome {
    /// Raw per-frame classification, before debouncing.
    pub label: Option<PostureLabel>,
    /// Geometry behind `label`; absent when key points were too weak.
    pub measurements: Option<PostureMeasurements>,
    pub uplinked: bool,
    pub overlay: Option<PoseOverlay>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonitorStats {
    pub frames: u64,
    pub frames_with_pose: u64,
    pub uplinks: u64,
}

/// Per-session posture pipeline: classify, debounce, rate-limit the uplink.
pub struct PoseMonitor<U> {
    session_id: Uuid,
    analyzer: PostureAnalyzer,
    stabilizer: PostureStabilizer,
    gate: UplinkGate<U>,
    stats: MonitorStats,
}

impl<U: PoseUplink> PoseMonitor<U> {
    pub fn new(
        analyzer: PostureAnalyzer,
        stabilizer: PostureStabilizer,
        gate: UplinkGate<U>,
    ) -> Self {
        let session_id = Uuid::new_v4();
        log_info!(
            "Monitoring session {} started for chair {}",
            session_id,
            gate.chair_id()
        );
        Self {
            session_id,
            analyzer,
            stabilizer,
            gate,
            stats: MonitorStats::default(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    pub fn stabilizer(&self) -> &PostureStabilizer {
        &self.stabilizer
    }

    pub fn gate(&self) -> &UplinkGate<U> {
        &self.gate
    }

    pub fn on_frame(&mut self, pose: Option<&Pose>, now: Instant) -> FrameOutcome {
        self.stats.frames += 1;

        let mut outcome = FrameOutcome::default();
        if let Some(pose) = pose {
            self.stats.frames_with_pose += 1;
            let analysis = self.analyzer.analyze(pose);
            self.stabilizer.observe(analysis.label, now);
            outcome.label = Some(analysis.label);
            outcome.measurements = analysis.measurements;
            outcome.overlay = Some(PoseOverlay::from_pose(pose));
        }

        outcome.uplinked = self.gate.try_send(pose, now);
        if outcome.uplinked {
            self.stats.uplinks += 1;
        }

        log_verbose!(
            "frame {} of session {}: label={:?} measurements={:?} uplinked={}",
            self.stats.frames,
            self.session_id,
            outcome.label,
            outcome.measurements,
            outcome.uplinked
        );
        outcome
    }

    pub fn stop(&mut self) {
        self.stabilizer.reset();
        log_info!(
            "Monitoring session {} stopped after {} frames ({} uplinks)",
            self.session_id,
            self.stats.frames,
            self.stats.uplinks
        );
    }
}
