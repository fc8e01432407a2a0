use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
    time::Duration,
};

pub const SETTINGS_PATH_ENV: &str = "CHAIRLINK_SETTINGS";
pub const DEFAULT_SETTINGS_FILE: &str = "chairlink.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            ip: "localhost".into(),
            port: 3000,
        }
    }
}

impl ServerSettings {
    /// Base URL of the chair server, e.g. `http://localhost:3000`.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.ip, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorSettings {
    /// Chair the monitor reports for when none was selected.
    pub chair_id: String,
    /// How long a posture must hold before it is confirmed.
    pub min_duration_ms: u64,
    /// At most one pose uplink per window.
    pub send_window_ms: u64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            chair_id: "CHAIR01".into(),
            min_duration_ms: 2500,
            send_window_ms: 1000,
        }
    }
}

impl MonitorSettings {
    pub fn min_duration(&self) -> Duration {
        Duration::from_millis(self.min_duration_ms)
    }

    pub fn send_window(&self) -> Duration {
        Duration::from_millis(self.send_window_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub monitor: MonitorSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<Settings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!(
                    "Ignoring malformed settings in {}: {}",
                    path.display(),
                    err
                );
                Settings::default()
            })
        } else {
            Settings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Store located by `CHAIRLINK_SETTINGS`, falling back to `chairlink.json`
    /// in the working directory.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var_os(SETTINGS_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> Settings {
        self.data
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn server(&self) -> ServerSettings {
        self.snapshot().server
    }

    pub fn monitor(&self) -> MonitorSettings {
        self.snapshot().monitor
    }

    pub fn update_monitor(&self, monitor: MonitorSettings) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow::anyhow!("settings lock poisoned"))?;
        guard.monitor = monitor;
        self.persist(&guard)
    }

    fn persist(&self, data: &Settings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
