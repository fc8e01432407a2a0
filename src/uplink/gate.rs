use std::time::Duration;

use tokio::time::Instant;

use crate::pose::Pose;

use super::types::PoseReport;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_verbose;

/// At most one pose uplink per window.
pub const SEND_WINDOW: Duration = Duration::from_millis(1000);

/// Network side of the gate. Implementations must not block: the gate is
/// called once per rendered frame.
pub trait PoseUplink {
    fn dispatch(&self, report: PoseReport);
}

/// Drops poses that arrive within `window` of the last dispatched one.
/// Dropped poses are not queued.
pub struct UplinkGate<U> {
    uplink: U,
    chair_id: String,
    window: Duration,
    last_sent_at: Option<Instant>,
}

impl<U: PoseUplink> UplinkGate<U> {
    pub fn new(uplink: U, chair_id: impl Into<String>, window: Duration) -> Self {
        Self {
            uplink,
            chair_id: chair_id.into(),
            window,
            last_sent_at: None,
        }
    }

    pub fn chair_id(&self) -> &str {
        &self.chair_id
    }

    pub fn last_sent_at(&self) -> Option<Instant> {
        self.last_sent_at
    }

    pub fn uplink(&self) -> &U {
        &self.uplink
    }

    /// Returns whether `pose` was handed to the uplink.
    pub fn try_send(&mut self, pose: Option<&Pose>, now: Instant) -> bool {
        let Some(pose) = pose else {
            return false;
        };

        let eligible = match self.last_sent_at {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.window,
        };
        if !eligible {
            log_verbose!("uplink throttled for chair {}", self.chair_id);
            return false;
        }

        self.last_sent_at = Some(now);
        self.uplink.dispatch(PoseReport::from_pose(&self.chair_id, pose));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Keypoint;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingUplink {
        sent: RefCell<Vec<PoseReport>>,
    }

    impl PoseUplink for RecordingUplink {
        fn dispatch(&self, report: PoseReport) {
            self.sent.borrow_mut().push(report);
        }
    }

    fn pose(x: f64) -> Pose {
        Pose::new(vec![Keypoint::new("nose", x, 0.0, 0.9)])
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn one_dispatch_per_window() {
        let mut gate = UplinkGate::new(RecordingUplink::default(), "CHAIR01", SEND_WINDOW);
        let t0 = Instant::now();

        assert!(gate.try_send(Some(&pose(1.0)), t0));
        assert!(!gate.try_send(Some(&pose(2.0)), t0 + ms(500)));
        assert!(gate.try_send(Some(&pose(3.0)), t0 + ms(1001)));

        let sent = gate.uplink().sent.borrow();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].keypoints[0].position.x, 1.0);
        assert_eq!(sent[1].keypoints[0].position.x, 3.0);
        assert_eq!(sent[1].chair_id, "CHAIR01");
    }

    #[test]
    fn window_boundary_is_exclusive() {
        let mut gate = UplinkGate::new(RecordingUplink::default(), "CHAIR01", SEND_WINDOW);
        let t0 = Instant::now();

        assert!(gate.try_send(Some(&pose(1.0)), t0));
        assert!(!gate.try_send(Some(&pose(2.0)), t0 + ms(1000)));
        assert_eq!(gate.last_sent_at(), Some(t0));
    }

    #[test]
    fn missing_pose_never_touches_state() {
        let mut gate = UplinkGate::new(RecordingUplink::default(), "CHAIR01", SEND_WINDOW);
        let t0 = Instant::now();

        assert!(!gate.try_send(None, t0));
        assert_eq!(gate.last_sent_at(), None);

        assert!(gate.try_send(Some(&pose(1.0)), t0 + ms(10)));
        assert!(!gate.try_send(None, t0 + ms(5000)));
        assert_eq!(gate.last_sent_at(), Some(t0 + ms(10)));
        assert_eq!(gate.uplink().sent.borrow().len(), 1);
    }

    #[test]
    fn dropped_poses_are_not_replayed() {
        let mut gate = UplinkGate::new(RecordingUplink::default(), "CHAIR01", SEND_WINDOW);
        let t0 = Instant::now();

        assert!(gate.try_send(Some(&pose(1.0)), t0));
        for step in 1..10 {
            assert!(!gate.try_send(Some(&pose(step as f64)), t0 + ms(step * 100)));
        }
        assert!(gate.try_send(Some(&pose(99.0)), t0 + ms(1500)));

        let sent = gate.uplink().sent.borrow();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].keypoints[0].position.x, 99.0);
    }
}
