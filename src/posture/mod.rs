pub mod analysis;
pub mod feedback;
pub mod label;
pub mod stabilizer;

pub use analysis::{AnalysisThresholds, PostureAnalyzer, PostureMeasurements};
pub use feedback::{FeedbackTarget, PostureFeedback};
pub use label::{PostureLabel, PostureSource};
pub use stabilizer::{PostureSink, PostureStabilizer, MIN_DURATION};
