use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::dataset::{TEAM_KEY, TeamRecord};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("record has no statistic fields")]
    InvalidRecord,
}

/// Team record with every statistic coerced to `f64`. Unparseable values are NaN.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedStats {
    team: Option<String>,
    stats: BTreeMap<String, f64>,
}

impl NormalizedStats {
    pub fn team(&self) -> Option<&str> {
        self.team.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.stats.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.stats.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// At least one statistic is a finite number.
    pub fn has_usable_stats(&self) -> bool {
        self.stats.values().any(|v| v.is_finite())
    }

    /// Back to a raw record; non-finite values become `null`.
    pub fn to_record(&self) -> TeamRecord {
        let mut fields = Map::new();
        if let Some(team) = &self.team {
            fields.insert(TEAM_KEY.to_string(), Value::String(team.clone()));
        }
        for (key, value) in &self.stats {
            let value = Number::from_f64(*value)
                .map(Value::Number)
                .unwrap_or(Value::Null);
            fields.insert(key.clone(), value);
        }
        TeamRecord::new(fields)
    }
}

pub fn normalize(record: &TeamRecord) -> Result<NormalizedStats, ExtractError> {
    if record.stat_keys().next().is_none() {
        return Err(ExtractError::InvalidRecord);
    }

    let team = record.get(TEAM_KEY).and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    });

    let stats = record
        .fields()
        .iter()
        .filter(|(key, _)| key.as_str() != TEAM_KEY)
        .map(|(key, value)| (key.clone(), value_to_f64(value)))
        .collect();

    Ok(NormalizedStats { team, stats })
}

fn value_to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_float_prefix(s),
        _ => f64::NAN,
    }
}

/// Parses the longest leading decimal literal, ignoring whatever follows it.
/// "82 GP" is 82, "45.6%" is 45.6, "W-L" is NaN.
pub fn parse_float_prefix(raw: &str) -> f64 {
    let s = raw.trim_start();
    let b = s.as_bytes();
    let mut i = 0;

    let negative = matches!(b.first(), Some(b'-'));
    if matches!(b.first(), Some(b'-' | b'+')) {
        i += 1;
    }
    if s[i..].starts_with("Infinity") {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;

    let mut frac_digits = 0;
    if i < b.len() && b[i] == b'.' {
        let mut j = i + 1;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        frac_digits = j - (i + 1);
        if int_digits > 0 || frac_digits > 0 {
            i = j;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    if i < b.len() && matches!(b[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < b.len() && matches!(b[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    s[..i].parse::<f64>().unwrap_or(f64::NAN)
}
