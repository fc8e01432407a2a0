pub mod chair;
pub mod monitor;
pub mod pose;
pub mod posture;
pub mod runner;
pub mod settings;
pub mod uplink;
mod utils;

pub use chair::{ChairEvent, ChairFeed, ChairView};
pub use monitor::PoseMonitor;
pub use pose::{Keypoint, Pose, PoseOverlay};
pub use posture::{PostureLabel, PostureSink, PostureSource, PostureStabilizer};
pub use settings::{Settings, SettingsStore};
pub use uplink::{ChairApi, PoseUplink, UplinkGate};

use anyhow::Context;
use utils::logging;

pub fn run() -> anyhow::Result<()> {
    let verbose = logging::verbose_from_env();

    // RUST_LOG wins; otherwise info, or debug when CHAIRLINK_DEBUG is set
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    logging::set_verbose(verbose);

    log::info!("chairlink starting up...");

    let store = SettingsStore::from_env()?;
    let settings = store.snapshot();
    log::info!(
        "Using settings from {} (server {})",
        store.path().display(),
        settings.server.url()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    runtime.block_on(runner::run_session(settings))
}
