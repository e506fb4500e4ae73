use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_STATS_URL: &str = "https://sports.yahoo.com/nba/stats/team/";
pub const DEFAULT_SNAPSHOT_ROOT: &str = "snapshots";
pub const DEFAULT_SNAPSHOT_PREFIX: &str = "nba-stats";
pub const DEFAULT_DATA_SOURCE: &str = "Yahoo Sports";
pub const DATASET_TYPE: &str = "NBA Team Statistics";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub stats_url: String,
    pub snapshot_root: PathBuf,
    pub snapshot_prefix: String,
    /// When set, analysis reads the dataset from this endpoint instead of the snapshot store.
    pub retrieve_api_url: Option<String>,
    pub http_timeout: Duration,
    pub data_source: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stats_url: DEFAULT_STATS_URL.to_string(),
            snapshot_root: PathBuf::from(DEFAULT_SNAPSHOT_ROOT),
            snapshot_prefix: DEFAULT_SNAPSHOT_PREFIX.to_string(),
            retrieve_api_url: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            data_source: DEFAULT_DATA_SOURCE.to_string(),
        }
    }
}

impl Config {
    /// Reads `.env` (if any) and then the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let http_timeout_secs = get("HTTP_TIMEOUT_SECS")
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)
            .max(1);

        Self {
            stats_url: get("NBA_STATS_URL").unwrap_or(defaults.stats_url),
            snapshot_root: get("SNAPSHOT_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_root),
            snapshot_prefix: get("SNAPSHOT_PREFIX").unwrap_or(defaults.snapshot_prefix),
            retrieve_api_url: get("RETRIEVE_API_URL"),
            http_timeout: Duration::from_secs(http_timeout_secs),
            data_source: get("DATA_SOURCE_NAME").unwrap_or(defaults.data_source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(Config::from_lookup(|_| None), Config::default());
    }

    #[test]
    fn values_are_trimmed_and_clamped() {
        let env = HashMap::from([
            ("SNAPSHOT_ROOT", " /var/lib/nba "),
            ("RETRIEVE_API_URL", "   "),
            ("HTTP_TIMEOUT_SECS", "0"),
            ("SNAPSHOT_PREFIX", "team-stats"),
        ]);
        let cfg = Config::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.snapshot_root, PathBuf::from("/var/lib/nba"));
        assert_eq!(cfg.retrieve_api_url, None);
        assert_eq!(cfg.http_timeout, Duration::from_secs(1));
        assert_eq!(cfg.snapshot_prefix, "team-stats");
        assert_eq!(cfg.stats_url, DEFAULT_STATS_URL);
    }

    #[test]
    fn bad_timeout_falls_back() {
        let cfg = Config::from_lookup(|k| (k == "HTTP_TIMEOUT_SECS").then(|| "soon".to_string()));
        assert_eq!(cfg.http_timeout, Duration::from_secs(10));
    }
}
