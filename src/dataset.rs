use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;

/// Reserved record key holding the team's display name.
pub const TEAM_KEY: &str = "Team";

pub const ADAGE_TIMEZONE: &str = "UTC";
pub const TEAM_STATS_EVENT_TYPE: &str = "team_statistics";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("invalid dataset json: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
}

/// Raw per-team statistics as collected: statistic name to string or number.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamRecord {
    fields: Map<String, Value>,
}

impl TeamRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn team(&self) -> Option<&str> {
        self.fields.get(TEAM_KEY).and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Keys other than [`TEAM_KEY`].
    pub fn stat_keys(&self) -> impl Iterator<Item = &str> {
        self.fields
            .keys()
            .map(String::as_str)
            .filter(|k| *k != TEAM_KEY)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for TeamRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Provenance {
    pub data_source: Option<String>,
    pub dataset_type: Option<String>,
    pub dataset_id: Option<String>,
    pub timestamp: Option<String>,
}

/// Which list key the records were read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListKey {
    #[default]
    Events,
    Data,
}

impl ListKey {
    pub fn as_str(self) -> &'static str {
        match self {
            ListKey::Events => "events",
            ListKey::Data => "data",
        }
    }
}

/// Ordered team records plus optional provenance. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    records: Vec<TeamRecord>,
    provenance: Provenance,
    list_key: ListKey,
}

impl Dataset {
    pub fn new(records: Vec<TeamRecord>) -> Self {
        Self {
            records,
            provenance: Provenance::default(),
            list_key: ListKey::Events,
        }
    }

    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    pub fn records(&self) -> &[TeamRecord] {
        &self.records
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    pub fn list_key(&self) -> ListKey {
        self.list_key
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when the envelope carried `data_source`, `dataset_type` and an `events` list.
    pub fn is_adage(&self) -> bool {
        self.provenance.data_source.is_some()
            && self.provenance.dataset_type.is_some()
            && self.list_key == ListKey::Events
    }

    pub fn from_json(raw: &str) -> Result<Self, DatasetError> {
        let root: Value = serde_json::from_str(raw.trim())?;
        Self::from_value(root)
    }

    /// Accepts the ADAGE `{ events: [...] }` envelope or the legacy `{ data: [...] }` shape.
    /// List items are either `{ attributes: {...} }` or a flat record.
    pub fn from_value(root: Value) -> Result<Self, DatasetError> {
        let Value::Object(mut root) = root else {
            return Err(DatasetError::InvalidDataset(
                "dataset root is not a JSON object".to_string(),
            ));
        };

        let (list_key, items) = if let Some(items) = root.remove("events") {
            (ListKey::Events, items)
        } else if let Some(items) = root.remove("data") {
            (ListKey::Data, items)
        } else {
            return Err(DatasetError::InvalidDataset(
                "missing `events` or `data` list".to_string(),
            ));
        };
        let Value::Array(items) = items else {
            return Err(DatasetError::InvalidDataset(format!(
                "`{}` is not a list",
                list_key.as_str()
            )));
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| record_from_item(idx, item))
            .collect::<Result<Vec<_>, _>>()?;

        let provenance = Provenance {
            data_source: pick_string(&root, "data_source"),
            dataset_type: pick_string(&root, "dataset_type"),
            dataset_id: pick_string(&root, "dataset_id"),
            timestamp: root
                .get("time_object")
                .and_then(|t| t.get("timestamp"))
                .and_then(Value::as_str)
                .map(str::to_string),
        };

        Ok(Self {
            records,
            provenance,
            list_key,
        })
    }

    /// Serialise as an ADAGE 3.0 envelope, one `team_statistics` event per record.
    pub fn to_adage_value(&self) -> Value {
        let timestamp = self.provenance.timestamp.clone().unwrap_or_default();
        let events = self
            .records
            .iter()
            .map(|record| {
                json!({
                    "time_object": {
                        "timestamp": timestamp,
                        "duration": 1,
                        "duration_unit": "day",
                        "timezone": ADAGE_TIMEZONE,
                    },
                    "event_type": TEAM_STATS_EVENT_TYPE,
                    "attributes": record,
                })
            })
            .collect::<Vec<_>>();

        json!({
            "data_source": self.provenance.data_source,
            "dataset_type": self.provenance.dataset_type,
            "dataset_id": self.provenance.dataset_id,
            "time_object": {
                "timestamp": timestamp,
                "timezone": ADAGE_TIMEZONE,
            },
            "events": events,
        })
    }
}

fn record_from_item(idx: usize, item: Value) -> Result<TeamRecord, DatasetError> {
    let Value::Object(mut item) = item else {
        return Err(DatasetError::InvalidDataset(format!(
            "record {idx} is not an object"
        )));
    };
    match item.remove("attributes") {
        Some(Value::Object(attributes)) => Ok(TeamRecord::new(attributes)),
        Some(_) => Err(DatasetError::InvalidDataset(format!(
            "record {idx} has non-object attributes"
        ))),
        None => Ok(TeamRecord::new(item)),
    }
}

fn pick_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
