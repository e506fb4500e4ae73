use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::dataset::Dataset;

pub const SNAPSHOT_FILE: &str = "data.json";

/// `{prefix}/{YYYY-MM-DD}/data.json`
pub fn snapshot_key(prefix: &str, date: NaiveDate) -> String {
    let prefix = prefix.trim_matches('/');
    let date = date.format("%Y-%m-%d");
    if prefix.is_empty() {
        format!("{date}/{SNAPSHOT_FILE}")
    } else {
        format!("{prefix}/{date}/{SNAPSHOT_FILE}")
    }
}

/// Key/value object store backed by a directory; keys are `/`-separated relative paths.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
    prefix: String,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn key_for(&self, date: NaiveDate) -> String {
        snapshot_key(&self.prefix, date)
    }

    pub fn put(&self, key: &str, body: &str) -> Result<()> {
        let path = self.object_path(key)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("create store directory {}", dir.display()))?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, body).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("swap {}", path.display()))?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String> {
        let path = self.object_path(key)?;
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
    }

    pub fn save_snapshot(&self, dataset: &Dataset, date: NaiveDate) -> Result<String> {
        let key = self.key_for(date);
        let json = serde_json::to_string_pretty(&dataset.to_adage_value())
            .context("serialize snapshot")?;
        self.put(&key, &json)?;
        info!(
            key = %key,
            root = %self.root.display(),
            records = dataset.len(),
            "snapshot stored"
        );
        Ok(key)
    }

    pub fn load_snapshot(&self, date: NaiveDate) -> Result<Dataset> {
        let key = self.key_for(date);
        let raw = self.get(&key)?;
        let dataset =
            Dataset::from_json(&raw).with_context(|| format!("parse snapshot {key}"))?;
        if !dataset.is_adage() {
            warn!(key = %key, "snapshot is not in ADAGE 3.0 format");
        }
        Ok(dataset)
    }

    fn object_path(&self, key: &str) -> Result<PathBuf> {
        let mut path = self.root.clone();
        for part in key.split('/').filter(|p| !p.is_empty()) {
            if part == "." || part == ".." {
                return Err(anyhow!("invalid object key: {key}"));
            }
            path.push(part);
        }
        if path == self.root {
            return Err(anyhow!("empty object key"));
        }
        Ok(path)
    }
}
