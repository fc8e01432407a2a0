use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::pose::PoseOverlay;
use crate::posture::{PostureFeedback, PostureSource};

use super::events::{ChairData, ChairEvent, PostureUpdate};
use super::sensors::{visualize, SensorCell};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_verbose, log_warn};

/// Rendering surface for everything the client shows.
pub trait ChairView {
    fn show_sensors(&mut self, cells: &[SensorCell]);
    fn show_feedback(&mut self, feedback: &PostureFeedback);
    fn show_connection_status(&mut self, status: &str);
    fn show_overlay(&mut self, _overlay: &PoseOverlay) {}
}

/// Routes pushed events for one selected chair to a view.
pub struct ChairFeed<V> {
    chair_id: String,
    view: V,
    last_update: Option<DateTime<Local>>,
}

impl<V: ChairView> ChairFeed<V> {
    pub fn new(chair_id: impl Into<String>, view: V) -> Self {
        Self {
            chair_id: chair_id.into(),
            view,
            last_update: None,
        }
    }

    pub fn chair_id(&self) -> &str {
        &self.chair_id
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.last_update
    }

    pub fn mark_connected(&mut self) {
        let status = format!("Connected to {}", self.chair_id);
        self.view.show_connection_status(&status);
    }

    /// Returns whether the event reached the view.
    pub fn handle(&mut self, event: ChairEvent) -> bool {
        self.handle_at(event, Local::now())
    }

    pub fn handle_at(&mut self, event: ChairEvent, at: DateTime<Local>) -> bool {
        if event.chair_id() != self.chair_id {
            log_verbose!("ignoring event for chair {}", event.chair_id());
            return false;
        }

        match event {
            ChairEvent::ChairData(data) => self.apply_chair_data(data, at),
            ChairEvent::PostureUpdate(update) => self.apply_posture_update(update),
        }
    }

    fn apply_chair_data(&mut self, data: ChairData, at: DateTime<Local>) -> bool {
        let Some(sensors) = data.sensors else {
            log_warn!("invalid chair data received for {}: no sensors", data.chair_id);
            return false;
        };

        self.view.show_sensors(&visualize(&sensors));

        // camera postures arrive through postureUpdate instead
        if data.source.as_deref() != Some("posenet") {
            if let Some(status) = data.posture_status.as_deref() {
                let feedback = PostureFeedback::for_status(status, PostureSource::Sensors);
                self.view.show_feedback(&feedback);
            }
        }

        self.last_update = Some(at);
        let status = format!(
            "Connected to {} (Last update: {})",
            self.chair_id,
            at.format("%H:%M:%S")
        );
        self.view.show_connection_status(&status);
        true
    }

    fn apply_posture_update(&mut self, update: PostureUpdate) -> bool {
        let Some(status) = update.posture_status.as_deref() else {
            log_warn!("posture update for {} without postureStatus", update.chair_id);
            return false;
        };

        let source = PostureSource::from_tag(update.source.as_deref());
        self.view.show_feedback(&PostureFeedback::for_status(status, source));
        true
    }
}

/// Feeds events to `feed` until the sender side closes or `cancel_token` fires.
pub async fn run_feed<V: ChairView>(
    mut rx: mpsc::Receiver<ChairEvent>,
    feed: &mut ChairFeed<V>,
    cancel_token: CancellationToken,
) {
    loop {
        tokio::select! {
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(event) => {
                        feed.handle(event);
                    }
                    None => {
                        log_info!("chair event stream closed");
                        break;
                    }
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("chair feed shutting down");
                break;
            }
        }
    }
}
