use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{self, Instant},
};

use super::label::{PostureLabel, PostureSource};

// Set to true to enable transition logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_verbose;

/// How long a new posture must hold before it replaces the confirmed one.
pub const MIN_DURATION: Duration = Duration::from_millis(2500);

/// Receives every confirmed posture.
pub trait PostureSink: Send + Sync + 'static {
    fn on_posture(&self, label: PostureLabel, source: PostureSource);
}

struct PendingConfirmation {
    candidate: PostureLabel,
    deadline: Instant,
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct StabilizerState {
    confirmed: Option<PostureLabel>,
    pending: Option<PendingConfirmation>,
    /// Bumped on every new or cancelled timer; a timer only confirms if its
    /// generation is still current when it wakes.
    generation: u64,
}

impl StabilizerState {
    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
            self.generation = self.generation.wrapping_add(1);
        }
    }
}

/// Debounces a per-frame posture stream.
///
/// A label that differs from the confirmed one is only confirmed after it has
/// been the pending candidate for the whole dwell time. Observing the
/// confirmed label again cancels any pending candidate and re-emits at once.
pub struct PostureStabilizer {
    state: Arc<Mutex<StabilizerState>>,
    sink: Arc<dyn PostureSink>,
    dwell: Duration,
    runtime: Handle,
}

impl PostureStabilizer {
    /// Must be called from inside a tokio runtime; dwell timers are spawned on it.
    pub fn new(sink: impl PostureSink, dwell: Duration) -> Result<Self> {
        let runtime = Handle::try_current().context("posture stabilizer needs a tokio runtime")?;
        Ok(Self::with_runtime(runtime, sink, dwell))
    }

    pub fn with_runtime(runtime: Handle, sink: impl PostureSink, dwell: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(StabilizerState::default())),
            sink: Arc::new(sink),
            dwell,
            runtime,
        }
    }

    pub fn dwell(&self) -> Duration {
        self.dwell
    }

    pub fn confirmed(&self) -> Option<PostureLabel> {
        lock_state(&self.state).confirmed
    }

    pub fn pending_candidate(&self) -> Option<PostureLabel> {
        lock_state(&self.state)
            .pending
            .as_ref()
            .map(|pending| pending.candidate)
    }

    /// Deadline of the pending candidate, if any.
    pub fn pending_deadline(&self) -> Option<Instant> {
        lock_state(&self.state)
            .pending
            .as_ref()
            .map(|pending| pending.deadline)
    }

    pub fn observe(&self, label: PostureLabel, now: Instant) {
        let mut state = lock_state(&self.state);

        if state.confirmed == Some(label) {
            state.cancel_pending();
            drop(state);
            self.sink.on_posture(label, PostureSource::PoseNet);
            return;
        }

        if state
            .pending
            .as_ref()
            .is_some_and(|pending| pending.candidate == label)
        {
            return;
        }

        state.cancel_pending();

        let generation = state.generation;
        let deadline = now + self.dwell;
        let handle = self.runtime.spawn(confirm_after(
            Arc::clone(&self.state),
            Arc::clone(&self.sink),
            label,
            deadline,
            generation,
        ));

        log_verbose!("posture candidate {} pending until {:?}", label, deadline);

        state.pending = Some(PendingConfirmation {
            candidate: label,
            deadline,
            generation,
            handle,
        });
    }

    /// Cancels any pending candidate and forgets the confirmed posture.
    pub fn reset(&self) {
        let mut state = lock_state(&self.state);
        state.cancel_pending();
        state.confirmed = None;
    }
}

impl Drop for PostureStabilizer {
    fn drop(&mut self) {
        lock_state(&self.state).cancel_pending();
    }
}

async fn confirm_after(
    state: Arc<Mutex<StabilizerState>>,
    sink: Arc<dyn PostureSink>,
    candidate: PostureLabel,
    deadline: Instant,
    generation: u64,
) {
    time::sleep_until(deadline).await;

    {
        let mut guard = lock_state(&state);
        let current = guard
            .pending
            .as_ref()
            .is_some_and(|pending| pending.generation == generation);
        if !current {
            return;
        }
        guard.pending = None;
        guard.confirmed = Some(candidate);
    }

    log_verbose!("posture {} confirmed", candidate);
    sink.on_posture(candidate, PostureSource::PoseNet);
}

fn lock_state(state: &Mutex<StabilizerState>) -> MutexGuard<'_, StabilizerState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
