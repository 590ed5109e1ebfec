use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{CandidateProfile, JobPosting};

/// Request to score one job against an inline profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreMatchRequest {
    pub profile: CandidateProfile,
    pub job: JobPosting,
}

/// Request to rank a batch of feed jobs for a stored profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankFeedRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub jobs: Vec<JobPosting>,
    #[serde(default)]
    #[serde(alias = "exclude_job_ids", rename = "excludeJobIds")]
    pub exclude_job_ids: Vec<String>,
    #[serde(default = "default_limit")]
    pub limit: u16,
}

fn default_limit() -> u16 {
    20
}

/// Which estimator backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateStrategy {
    #[default]
    Ai,
    Keyword,
}

/// Request for a (possibly AI-based) match estimate
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EstimateMatchRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    pub profile: CandidateProfile,
    pub job: JobPosting,
    #[serde(default)]
    pub strategy: EstimateStrategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Swipe on a feed job; right swipes save it to the tracker
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SwipeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    pub job: JobPosting,
    pub direction: SwipeDirection,
}

/// Request to refine a CV section with the user's AI provider
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ImproveTextRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    pub text: String,
    #[serde(default = "default_section")]
    pub section: String,
}

fn default_section() -> String {
    "general".to_string()
}
