use serde::{Deserialize, Serialize};
use crate::models::domain::{Application, JobPosting, MatchBreakdown, MatchEstimate};

/// Response for the score endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreMatchResponse {
    pub score: u32,
    pub breakdown: MatchBreakdown,
}

/// A feed job annotated with its match score
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredJob {
    pub job: JobPosting,
    pub match_score: u32,
}

/// Response for the feed endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankFeedResponse {
    pub jobs: Vec<ScoredJob>,
    pub total_jobs: usize,
}

/// Response for the swipe endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeResponse {
    pub saved: bool,
    pub application_id: Option<String>,
}

/// A user's tracked applications, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<Application>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImproveTextResponse {
    pub text: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            status_code,
        }
    }
}

/// Response for the estimate endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateMatchResponse {
    #[serde(flatten)]
    pub estimate: MatchEstimate,
    pub backend: String,
}
