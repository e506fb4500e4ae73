use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::analysis::{AnalysisError, AnalysisResult, analyze};
use crate::source::DatasetSource;

pub const RESPONSE_HEADERS: [(&str, &str); 2] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
];

#[derive(Debug, Default, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub team1: Option<String>,
    #[serde(default)]
    pub team2: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(result: &AnalysisResult) -> Self {
        Self::with_status(200, result.to_body())
    }

    pub fn from_error(err: &AnalysisError) -> Self {
        Self::with_status(err.status(), err.to_body())
    }

    fn with_status(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: RESPONSE_HEADERS.to_vec(),
            body,
        }
    }

    pub fn body_string(&self) -> String {
        self.body.to_string()
    }
}

/// Request body in, status + JSON body out. Never panics on bad input.
pub fn handle_analysis(body: Option<&str>, source: &dyn DatasetSource) -> ApiResponse {
    match run_analysis(body, source) {
        Ok(result) => {
            info!(probabilities = ?result.win_probabilities, "analysis complete");
            ApiResponse::ok(&result)
        }
        Err(err) => {
            match &err {
                AnalysisError::Unexpected(cause) => error!(error = ?cause, "analysis failed"),
                other => warn!(code = other.code(), message = %other, "analysis rejected"),
            }
            ApiResponse::from_error(&err)
        }
    }
}

pub fn run_analysis(
    body: Option<&str>,
    source: &dyn DatasetSource,
) -> Result<AnalysisResult, AnalysisError> {
    let request = parse_request(body)?;
    let (Some(team1), Some(team2)) = (request.team1, request.team2) else {
        return Err(AnalysisError::MissingParameters);
    };
    if team1.trim().is_empty() || team2.trim().is_empty() {
        return Err(AnalysisError::MissingParameters);
    }

    let dataset = source.load_dataset()?;
    analyze(&dataset, &team1, &team2)
}

fn parse_request(body: Option<&str>) -> Result<AnalysisRequest, AnalysisError> {
    let Some(raw) = body.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(AnalysisRequest::default());
    };
    let request: AnalysisRequest = serde_json::from_str(raw).context("invalid request body")?;
    Ok(request)
}
