pub mod controller;

pub use controller::{FrameOutcome, MonitorStats, PoseMonitor};
