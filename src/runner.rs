use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    runtime::Handle,
    sync::mpsc,
    time::Instant,
};
use tokio_util::sync::CancellationToken;

use crate::{
    chair::{run_feed, ChairData, ChairEvent, ChairFeed, ChairView, PostureUpdate, SensorCell},
    monitor::PoseMonitor,
    pose::{Pose, PoseOverlay},
    posture::{
        PostureAnalyzer, PostureFeedback, PostureLabel, PostureSink, PostureSource,
        PostureStabilizer,
    },
    settings::Settings,
    uplink::{ChairApi, HttpUplink, PoseUplink, UplinkGate},
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_verbose, log_warn};

const CHAIR_EVENT_BUFFER: usize = 64;

/// One line of the newline-delimited JSON stream on stdin.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum InboundMessage {
    /// A detection frame with one person in it.
    #[serde(rename = "pose")]
    Pose(Pose),
    /// A detection frame in which nobody was found.
    #[serde(rename = "noPose")]
    NoPose,
    #[serde(rename = "chairData")]
    ChairData(ChairData),
    #[serde(rename = "postureUpdate")]
    PostureUpdate(PostureUpdate),
}

impl InboundMessage {
    pub fn parse(line: &str) -> Result<Self> {
        serde_json::from_str(line).context("malformed inbound message")
    }
}

/// The configured chair when the server lists it (or lists nothing),
/// otherwise the first chair the server knows.
pub fn choose_chair(available: &[String], preferred: &str) -> String {
    if available.is_empty() || available.iter().any(|id| id == preferred) {
        return preferred.to_string();
    }
    available[0].clone()
}

/// Logs confirmed postures. A steady posture is re-confirmed on every frame,
/// so only changes go out at `info`.
#[derive(Default)]
struct LogSink {
    last: Mutex<Option<PostureLabel>>,
}

impl LogSink {
    /// Records `label` and reports whether it differs from the previous one.
    fn changed(&self, label: PostureLabel) -> bool {
        let mut last = self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        last.replace(label) != Some(label)
    }
}

impl PostureSink for LogSink {
    fn on_posture(&self, label: PostureLabel, source: PostureSource) {
        let feedback = PostureFeedback::for_label(label, source);
        if self.changed(label) {
            log::info!("[{}] {}: {}", source, feedback.title, feedback.advice);
        } else {
            log_verbose!("[{}] still {}", source, label);
        }
    }
}

struct LogView;

impl ChairView for LogView {
    fn show_sensors(&mut self, cells: &[SensorCell]) {
        let captions: Vec<&str> = cells.iter().map(|cell| cell.caption.as_str()).collect();
        log::info!("sensors: {}", captions.join(", "));
    }

    fn show_feedback(&mut self, feedback: &PostureFeedback) {
        log::info!("{:?}: {} ({})", feedback.target, feedback.title, feedback.advice);
    }

    fn show_connection_status(&mut self, status: &str) {
        log::info!("{}", status);
    }

    fn show_overlay(&mut self, overlay: &PoseOverlay) {
        log_verbose!(
            "overlay: {} keypoints, {} bones",
            overlay.points.len(),
            overlay.segments.len()
        );
    }
}

async fn select_chair(api: &ChairApi, preferred: &str) -> String {
    match api.list_chair_ids().await {
        Ok(ids) => {
            if ids.is_empty() {
                log_warn!("No chairs available on {}", api.base_url());
            }
            let chosen = choose_chair(&ids, preferred);
            if chosen != preferred {
                log_warn!("Chair {} is not known to the server, using {}", preferred, chosen);
            }
            chosen
        }
        Err(err) => {
            log_error!("Error fetching chair IDs: {err:#}");
            preferred.to_string()
        }
    }
}

/// Drives one monitoring session from stdin until EOF or Ctrl-C.
pub async fn run_session(settings: Settings) -> Result<()> {
    let api = ChairApi::new(settings.server.url())?;
    let chair_id = select_chair(&api, &settings.monitor.chair_id).await;

    let cancel_token = CancellationToken::new();
    {
        let token = cancel_token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        });
    }

    let mut feed = ChairFeed::new(chair_id.clone(), LogView);
    feed.mark_connected();

    let stabilizer = PostureStabilizer::new(LogSink::default(), settings.monitor.min_duration())?;
    let gate = UplinkGate::new(
        HttpUplink::new(api.clone(), Handle::current()),
        chair_id.clone(),
        settings.monitor.send_window(),
    );
    let mut monitor = PoseMonitor::new(PostureAnalyzer::default(), stabilizer, gate);

    let input = BufReader::new(tokio::io::stdin());
    drive_session(input, &mut monitor, feed, cancel_token).await
}

/// Routes newline-delimited messages from `input` until EOF, a read error or
/// cancellation. The monitor is stopped and the chair feed drained on every
/// exit path; a read error is returned only after that.
pub async fn drive_session<R, U, V>(
    input: R,
    monitor: &mut PoseMonitor<U>,
    mut feed: ChairFeed<V>,
    cancel_token: CancellationToken,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    U: PoseUplink,
    V: ChairView + Send + 'static,
{
    let (event_tx, event_rx) = mpsc::channel(CHAIR_EVENT_BUFFER);
    let feed_token = cancel_token.clone();
    let feed_task = tokio::spawn(async move {
        run_feed(event_rx, &mut feed, feed_token).await;
    });

    let mut overlay_view = LogView;
    let mut lines = input.lines();
    let mut result = Ok(());
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line.context("failed to read input") {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        log_info!("input closed");
                        break;
                    }
                    Err(err) => {
                        log_error!("{err:#}");
                        result = Err(err);
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }

                let event = match InboundMessage::parse(&line) {
                    Ok(InboundMessage::Pose(pose)) => {
                        let outcome = monitor.on_frame(Some(&pose), Instant::now());
                        if let Some(overlay) = outcome.overlay {
                            overlay_view.show_overlay(&overlay);
                        }
                        continue;
                    }
                    Ok(InboundMessage::NoPose) => {
                        monitor.on_frame(None, Instant::now());
                        continue;
                    }
                    Ok(InboundMessage::ChairData(data)) => ChairEvent::ChairData(data),
                    Ok(InboundMessage::PostureUpdate(update)) => ChairEvent::PostureUpdate(update),
                    Err(err) => {
                        log_warn!("skipping line: {err:#}");
                        continue;
                    }
                };

                if event_tx.send(event).await.is_err() {
                    log_warn!("chair feed stopped, no longer forwarding events");
                    break;
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("interrupted");
                break;
            }
        }
    }

    monitor.stop();
    drop(event_tx);
    feed_task.await.context("chair feed task failed to join")?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posture::MIN_DURATION;
    use crate::uplink::{PoseReport, SEND_WINDOW};
    use std::io;
    use std::pin::Pin;
    use std::sync::Arc;
    use std::task::{Context as TaskContext, Poll};
    use tokio::io::{AsyncRead, ReadBuf};

    #[test]
    fn parses_each_message_type() {
        let pose = InboundMessage::parse(
            r#"{"type":"pose","keypoints":[{"part":"nose","position":{"x":1,"y":2},"score":0.8}]}"#,
        )
        .unwrap();
        assert!(matches!(pose, InboundMessage::Pose(p) if p.keypoints.len() == 1));

        assert!(matches!(
            InboundMessage::parse(r#"{"type":"noPose"}"#).unwrap(),
            InboundMessage::NoPose
        ));

        let data = InboundMessage::parse(
            r#"{"type":"chairData","chairId":"CHAIR01","sensors":[{"value":4}]}"#,
        )
        .unwrap();
        assert!(matches!(data, InboundMessage::ChairData(d) if d.chair_id == "CHAIR01"));

        let update = InboundMessage::parse(
            r#"{"type":"postureUpdate","chairId":"CHAIR01","postureStatus":"good","source":"posenet"}"#,
        )
        .unwrap();
        assert!(matches!(update, InboundMessage::PostureUpdate(u) if u.posture_status.as_deref() == Some("good")));
    }

    #[test]
    fn rejects_unknown_or_broken_lines() {
        assert!(InboundMessage::parse(r#"{"type":"heartbeat"}"#).is_err());
        assert!(InboundMessage::parse("{not json").is_err());
    }

    #[test]
    fn log_sink_reports_only_label_changes() {
        let sink = LogSink::default();

        assert!(sink.changed(PostureLabel::Good));
        assert!(!sink.changed(PostureLabel::Good));
        assert!(!sink.changed(PostureLabel::Good));
        assert!(sink.changed(PostureLabel::Poor));
        assert!(sink.changed(PostureLabel::Good));
    }

    /// Yields `data`, then fails every further read.
    struct FailingInput {
        data: &'static [u8],
    }

    impl AsyncRead for FailingInput {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut TaskContext<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let data = self.data;
            if data.is_empty() {
                return Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed")));
            }
            let n = data.len().min(buf.remaining());
            buf.put_slice(&data[..n]);
            self.data = &data[n..];
            Poll::Ready(Ok(()))
        }
    }

    #[derive(Clone, Default)]
    struct SharedView(Arc<Mutex<Vec<String>>>);

    impl ChairView for SharedView {
        fn show_sensors(&mut self, cells: &[SensorCell]) {
            self.0.lock().unwrap().push(format!("sensors {}", cells.len()));
        }

        fn show_feedback(&mut self, feedback: &PostureFeedback) {
            self.0.lock().unwrap().push(feedback.title.to_string());
        }

        fn show_connection_status(&mut self, status: &str) {
            self.0.lock().unwrap().push(status.to_string());
        }
    }

    struct NoUplink;

    impl PoseUplink for NoUplink {
        fn dispatch(&self, _report: PoseReport) {}
    }

    #[tokio::test]
    async fn read_error_tears_down_before_returning() {
        let input = FailingInput {
            data: concat!(
                r#"{"type":"chairData","chairId":"CHAIR01","sensors":[{"value":4},{"value":7}]}"#,
                "\n",
                r#"{"type":"pose","keypoints":[{"part":"nose","position":{"x":320,"y":400},"score":0.9},"#,
                r#"{"part":"leftShoulder","position":{"x":260,"y":300},"score":0.9},"#,
                r#"{"part":"rightShoulder","position":{"x":380,"y":300},"score":0.9}]}"#,
                "\n",
            )
            .as_bytes(),
        };
        let view = SharedView::default();
        let stabilizer = PostureStabilizer::new(LogSink::default(), MIN_DURATION).unwrap();
        let gate = UplinkGate::new(NoUplink, "CHAIR01", SEND_WINDOW);
        let mut monitor = PoseMonitor::new(PostureAnalyzer::default(), stabilizer, gate);

        let result = drive_session(
            BufReader::new(input),
            &mut monitor,
            ChairFeed::new("CHAIR01", view.clone()),
            CancellationToken::new(),
        )
        .await;

        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("failed to read input"));
        assert_eq!(monitor.stats().frames, 1);
        // stopped: the leaning-forward candidate never gets to confirm
        assert_eq!(monitor.stabilizer().pending_candidate(), None);
        // the feed was drained before the error came back
        assert!(view.0.lock().unwrap().contains(&"sensors 2".to_string()));
    }

    #[test]
    fn prefers_configured_chair() {
        let ids = vec!["CHAIR01".to_string(), "CHAIR02".to_string()];

        assert_eq!(choose_chair(&ids, "CHAIR02"), "CHAIR02");
        assert_eq!(choose_chair(&ids, "CHAIR09"), "CHAIR01");
        assert_eq!(choose_chair(&[], "CHAIR09"), "CHAIR09");
    }
}
