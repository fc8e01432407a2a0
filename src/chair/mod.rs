pub mod events;
pub mod feed;
pub mod sensors;

pub use events::{ChairData, ChairEvent, PostureUpdate, SensorReading};
pub use feed::{run_feed, ChairFeed, ChairView};
pub use sensors::{visualize, SensorCell};
