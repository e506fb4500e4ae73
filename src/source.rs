use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::store::SnapshotStore;

/// Where the analysis stage gets its dataset from.
pub trait DatasetSource {
    fn load_dataset(&self) -> Result<Dataset>;
}

impl DatasetSource for Dataset {
    fn load_dataset(&self) -> Result<Dataset> {
        Ok(self.clone())
    }
}

/// The day's snapshot in the store.
pub struct StoreSource<'a> {
    pub store: &'a SnapshotStore,
    pub date: NaiveDate,
}

impl DatasetSource for StoreSource<'_> {
    fn load_dataset(&self) -> Result<Dataset> {
        self.store.load_snapshot(self.date)
    }
}

/// The retrieval endpoint, which answers GET with the snapshot JSON.
pub struct RetrievalApi<'a> {
    pub client: &'a Client,
    pub url: String,
}

impl DatasetSource for RetrievalApi<'_> {
    fn load_dataset(&self) -> Result<Dataset> {
        info!(url = %self.url, "requesting dataset");
        let resp = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .context("dataset request failed")?;
        let status = resp.status();
        let body = resp.text().context("failed reading dataset body")?;
        if !status.is_success() {
            return Err(anyhow!("dataset request failed with status {}", status));
        }
        let dataset = Dataset::from_json(&body).context("failed to parse dataset response")?;
        debug!(records = dataset.len(), list = dataset.list_key().as_str(), "dataset loaded");
        Ok(dataset)
    }
}
