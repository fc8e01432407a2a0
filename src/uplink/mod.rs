pub mod client;
pub mod gate;
pub mod types;

pub use client::{ChairApi, HttpUplink};
pub use gate::{PoseUplink, UplinkGate, SEND_WINDOW};
pub use types::PoseReport;
