pub mod keypoint;
pub mod overlay;

pub use keypoint::{find_keypoint, Keypoint, Pose, Position};
pub use overlay::PoseOverlay;
