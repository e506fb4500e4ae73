use thiserror::Error;

use crate::dataset::{Dataset, TeamRecord};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("team name is empty")]
    EmptyTeamName,
    #[error("team not found: {0}")]
    TeamNotFound(String),
}

/// Case-insensitive exact match on the `Team` field. First match wins.
pub fn find<'a>(dataset: &'a Dataset, team_name: &str) -> Result<&'a TeamRecord, LookupError> {
    if team_name.trim().is_empty() {
        return Err(LookupError::EmptyTeamName);
    }
    let wanted = team_name.to_lowercase();

    dataset
        .records()
        .iter()
        .find(|record| {
            record
                .team()
                .is_some_and(|name| name.to_lowercase() == wanted)
        })
        .ok_or_else(|| LookupError::TeamNotFound(team_name.to_string()))
}
