use std::time::Duration;

use anyhow::{Context, Result};
use tokio::runtime::Handle;

use super::gate::PoseUplink;
use super::types::{ChairIdsResponse, PoseReport};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_verbose};

const REQUEST_TIMEOUT_SECS: u64 = 5;

/// REST client for the chair server.
#[derive(Clone)]
pub struct ChairApi {
    client: reqwest::Client,
    base_url: String,
}

impl ChairApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chairs known to the server. A response without `ids` means none.
    pub async fn list_chair_ids(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/chairids", self.base_url);
        let response: ChairIdsResponse = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?
            .error_for_status()
            .with_context(|| format!("GET {url} rejected"))?
            .json()
            .await
            .context("chair id list is not valid json")?;

        let ids = response.ids.unwrap_or_default();
        log_info!("Received {} chair ids", ids.len());
        Ok(ids)
    }

    pub async fn post_pose(&self, report: &PoseReport) -> Result<()> {
        let url = format!("{}/posenet", self.base_url);
        self.client
            .post(&url)
            .json(report)
            .send()
            .await
            .with_context(|| format!("POST {url} failed"))?
            .error_for_status()
            .with_context(|| format!("POST {url} rejected"))?;
        Ok(())
    }
}

/// Fire-and-forget uplink: every dispatch becomes its own task and the
/// outcome is only logged.
#[derive(Clone)]
pub struct HttpUplink {
    api: ChairApi,
    runtime: Handle,
}

impl HttpUplink {
    pub fn new(api: ChairApi, runtime: Handle) -> Self {
        Self { api, runtime }
    }
}

impl PoseUplink for HttpUplink {
    fn dispatch(&self, report: PoseReport) {
        let api = self.api.clone();
        self.runtime.spawn(async move {
            match api.post_pose(&report).await {
                Ok(()) => log_verbose!("pose data sent for chair {}", report.chair_id),
                Err(err) => log_error!("error sending pose data: {err:#}"),
            }
        });
    }
}
