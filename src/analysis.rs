use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use crate::compare::{StatDifferences, compare};
use crate::dataset::{Dataset, TeamRecord};
use crate::extract::{NormalizedStats, normalize};
use crate::lookup::find;
use crate::win_prob::{WinProbabilities, estimate};

/// Client-facing text for `Unexpected`; the cause chain only goes to the log.
pub const UNEXPECTED_MESSAGE: &str = "An error occurred while processing the request";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Please provide team names (team1 and team2)")]
    MissingParameters,
    #[error("Could not find data for {}", .missing.join(", "))]
    TeamNotFound { missing: Vec<String> },
    #[error("{0}")]
    InvalidDataFormat(String),
    #[error("{0:#}")]
    Unexpected(#[from] anyhow::Error),
}

impl AnalysisError {
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::MissingParameters => "MissingParameters",
            AnalysisError::TeamNotFound { .. } => "TeamNotFound",
            AnalysisError::InvalidDataFormat(_) => "InvalidDataFormat",
            AnalysisError::Unexpected(_) => "Unexpected",
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            AnalysisError::MissingParameters => 400,
            AnalysisError::TeamNotFound { .. } => 404,
            AnalysisError::InvalidDataFormat(_) => 422,
            AnalysisError::Unexpected(_) => 500,
        }
    }

    pub fn to_body(&self) -> Value {
        let message = match self {
            AnalysisError::Unexpected(_) => UNEXPECTED_MESSAGE.to_string(),
            other => other.to_string(),
        };
        json!({
            "error": self.code(),
            "message": message,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub win_probabilities: WinProbabilities,
    pub analysis_timestamp: String,
    pub stat_differences: StatDifferences,
}

impl AnalysisResult {
    pub fn to_body(&self) -> Value {
        json!({ "analysis": self })
    }
}

pub fn analyze(
    dataset: &Dataset,
    team1: &str,
    team2: &str,
) -> Result<AnalysisResult, AnalysisError> {
    analyze_at(dataset, team1, team2, Utc::now())
}

pub fn analyze_at(
    dataset: &Dataset,
    team1: &str,
    team2: &str,
    now: DateTime<Utc>,
) -> Result<AnalysisResult, AnalysisError> {
    if team1.trim().is_empty() || team2.trim().is_empty() {
        return Err(AnalysisError::MissingParameters);
    }

    let (record1, record2) = match (find(dataset, team1), find(dataset, team2)) {
        (Ok(r1), Ok(r2)) => (r1, r2),
        (r1, r2) => {
            let missing = [(r1, team1), (r2, team2)]
                .into_iter()
                .filter_map(|(res, name)| res.err().map(|_| name.to_string()))
                .collect();
            return Err(AnalysisError::TeamNotFound { missing });
        }
    };

    let stats1 = usable_stats(record1, team1)?;
    let stats2 = usable_stats(record2, team2)?;

    let differences = compare(&stats1, &stats2);
    debug!(?differences, team1, team2, "stat differences");

    let split = estimate(&differences).map_err(|err| {
        AnalysisError::InvalidDataFormat(format!("{err} ({team1} vs {team2})"))
    })?;

    let name1 = stats1.team().unwrap_or(team1).to_string();
    let name2 = stats2.team().unwrap_or(team2).to_string();

    Ok(AnalysisResult {
        win_probabilities: WinProbabilities::new(name1, name2, split),
        analysis_timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        stat_differences: differences,
    })
}

fn usable_stats(record: &TeamRecord, requested: &str) -> Result<NormalizedStats, AnalysisError> {
    let stats = normalize(record).map_err(|err| {
        AnalysisError::InvalidDataFormat(format!(
            "Team statistics not available for {requested}: {err}"
        ))
    })?;
    if !stats.has_usable_stats() {
        return Err(AnalysisError::InvalidDataFormat(format!(
            "Team statistics not available for {requested}: no numeric statistics"
        )));
    }
    Ok(stats)
}
