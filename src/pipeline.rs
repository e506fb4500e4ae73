use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use tracing::info;

use crate::config::{Config, DATASET_TYPE};
use crate::dataset::{Dataset, Provenance, TeamRecord};
use crate::handler::{ApiResponse, handle_analysis};
use crate::http_client::http_client;
use crate::scrape::{fetch_stats_page, parse_stats_table};
use crate::source::{RetrievalApi, StoreSource};
use crate::store::SnapshotStore;

#[derive(Debug, Clone)]
pub struct CollectSummary {
    pub key: String,
    pub rows: usize,
}

pub fn snapshot_store(cfg: &Config) -> SnapshotStore {
    SnapshotStore::new(cfg.snapshot_root.clone(), cfg.snapshot_prefix.clone())
}

/// Wraps scraped rows in the provenance envelope for the day they were collected.
pub fn build_snapshot(
    records: Vec<TeamRecord>,
    cfg: &Config,
    store: &SnapshotStore,
    now: DateTime<Utc>,
) -> Dataset {
    let key = store.key_for(now.date_naive());
    Dataset::new(records).with_provenance(Provenance {
        data_source: Some(cfg.data_source.clone()),
        dataset_type: Some(DATASET_TYPE.to_string()),
        dataset_id: Some(format!("{}/{}", store.root().display(), key)),
        timestamp: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
    })
}

pub fn collect(cfg: &Config, store: &SnapshotStore) -> Result<CollectSummary> {
    let client = http_client(cfg.http_timeout)?;
    let html = fetch_stats_page(client, &cfg.stats_url)?;
    let records = parse_stats_table(&html).context("failed to parse stats table")?;

    let now = Utc::now();
    let rows = records.len();
    let dataset = build_snapshot(records, cfg, store, now);
    let key = store
        .save_snapshot(&dataset, now.date_naive())
        .context("failed to store snapshot")?;

    info!(key = %key, rows, "collection complete");
    Ok(CollectSummary { key, rows })
}

pub fn retrieve(store: &SnapshotStore, date: NaiveDate) -> Result<Dataset> {
    store
        .load_snapshot(date)
        .with_context(|| format!("failed to retrieve snapshot for {date}"))
}

/// Runs an analysis request against the configured dataset source: the retrieval
/// endpoint when one is set, otherwise today's snapshot.
pub fn analyze_with_config(cfg: &Config, body: Option<&str>) -> ApiResponse {
    match cfg.retrieve_api_url.as_deref() {
        Some(url) => match http_client(cfg.http_timeout) {
            Ok(client) => {
                let source = RetrievalApi {
                    client,
                    url: url.to_string(),
                };
                handle_analysis(body, &source)
            }
            Err(err) => ApiResponse::from_error(&err.into()),
        },
        None => {
            let store = snapshot_store(cfg);
            let source = StoreSource {
                store: &store,
                date: Utc::now().date_naive(),
            };
            handle_analysis(body, &source)
        }
    }
}
