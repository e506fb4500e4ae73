use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

use crate::compare::StatDifferences;

/// Turnovers: the one statistic where a lower value is better.
pub const TURNOVER_STAT: &str = "TO";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EstimateError {
    #[error("no comparable statistics between the two teams")]
    EmptyComparison,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilitySplit {
    pub team1: f64,
    pub team2: f64,
    pub favorable: usize,
    pub total: usize,
}

/// Probability split keyed by the two teams' display names.
#[derive(Debug, Clone, PartialEq)]
pub struct WinProbabilities {
    pub team1: String,
    pub team2: String,
    pub split: ProbabilitySplit,
}

impl WinProbabilities {
    pub fn new(team1: impl Into<String>, team2: impl Into<String>, split: ProbabilitySplit) -> Self {
        Self {
            team1: team1.into(),
            team2: team2.into(),
            split,
        }
    }

    pub fn team1_probability(&self) -> f64 {
        self.split.team1
    }

    pub fn team2_probability(&self) -> f64 {
        self.split.team2
    }
}

impl Serialize for WinProbabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Same display name twice collapses to one key; the second team's value wins.
        if self.team1 == self.team2 {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry(&self.team2, &self.split.team2)?;
            return map.end();
        }
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(&self.team1, &self.split.team1)?;
        map.serialize_entry(&self.team2, &self.split.team2)?;
        map.end()
    }
}

/// A zero delta is never favorable, but still counts toward the total.
pub fn is_favorable(stat: &str, delta: f64) -> bool {
    if stat == TURNOVER_STAT {
        delta < 0.0
    } else {
        delta > 0.0
    }
}

pub fn estimate(differences: &StatDifferences) -> Result<ProbabilitySplit, EstimateError> {
    let total = differences.len();
    if total == 0 {
        return Err(EstimateError::EmptyComparison);
    }
    let favorable = differences
        .iter()
        .filter(|(stat, delta)| is_favorable(stat, **delta))
        .count();

    let team1 = favorable as f64 / total as f64;
    let team2 = (total - favorable) as f64 / total as f64;

    Ok(ProbabilitySplit {
        team1,
        team2,
        favorable,
        total,
    })
}
