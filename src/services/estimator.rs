//! Match estimators: pluggable backends that turn a (job, profile) pair into a
//! `MatchEstimate`.
//!
//! `KeywordEstimator` wraps the deterministic matcher. `AiMatchEstimator` asks
//! the user's completion provider and falls back to `MatchEstimate::failed()`
//! on anything but cancellation.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::core::Matcher;
use crate::models::{AiConfig, CandidateProfile, JobPosting, MatchEstimate};
use crate::services::ai::{AiClient, AiError, ChatMessage};
use crate::services::prompts;

/// Estimator trait. Implement this to swap backends without touching the
/// handlers that call it.
#[async_trait]
pub trait MatchEstimator: Send + Sync {
    /// Estimate the fit of a profile for a job.
    ///
    /// The only error an estimator may return is `AiError::Cancelled`.
    async fn estimate(
        &self,
        job: &JobPosting,
        profile: &CandidateProfile,
        cancel: &CancellationToken,
    ) -> Result<MatchEstimate, AiError>;

    /// Backend label, for transparency in responses and logs
    fn backend(&self) -> &'static str;
}

/// Deterministic keyword estimator
#[derive(Debug, Clone, Default)]
pub struct KeywordEstimator {
    matcher: Matcher,
}

impl KeywordEstimator {
    pub fn new(matcher: Matcher) -> Self {
        Self { matcher }
    }
}

#[async_trait]
impl MatchEstimator for KeywordEstimator {
    async fn estimate(
        &self,
        job: &JobPosting,
        profile: &CandidateProfile,
        cancel: &CancellationToken,
    ) -> Result<MatchEstimate, AiError> {
        if cancel.is_cancelled() {
            return Err(AiError::Cancelled);
        }

        let breakdown = self.matcher.explain(profile, job);

        let mut reasons = Vec::new();
        if !breakdown.skill_matches.is_empty() {
            reasons.push(format!("skills match {}", breakdown.skill_matches.join(", ")));
        }
        if !breakdown.experience_matches.is_empty() {
            reasons.push(format!("held roles in {}", breakdown.experience_matches.join(", ")));
        }
        if !breakdown.summary_matches.is_empty() {
            reasons.push(format!("summary mentions {}", breakdown.summary_matches.join(", ")));
        }
        if breakdown.research_bonus {
            reasons.push("research background".to_string());
        }
        if breakdown.phd_bonus {
            reasons.push("holds a doctorate".to_string());
        }

        let reason = if reasons.is_empty() {
            "No overlap between the job title and the profile.".to_string()
        } else {
            format!("Keyword match: {}.", reasons.join("; "))
        };

        Ok(MatchEstimate {
            score: breakdown.score,
            reason,
            missing_skills: vec![],
        })
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

/// Raw estimate as the provider writes it
#[derive(Debug, Deserialize)]
struct ProviderEstimate {
    score: f64,
    reason: String,
    #[serde(default)]
    missing_skills: Vec<String>,
}

/// Estimator backed by the user's configured completion provider
pub struct AiMatchEstimator {
    client: Arc<AiClient>,
    config: Option<AiConfig>,
}

impl AiMatchEstimator {
    pub fn new(client: Arc<AiClient>, config: Option<AiConfig>) -> Self {
        Self { client, config }
    }

    async fn try_estimate(
        &self,
        job: &JobPosting,
        profile: &CandidateProfile,
        cancel: &CancellationToken,
    ) -> Result<MatchEstimate, AiError> {
        let prompt = prompts::match_prompt(job, profile);
        let text = self
            .client
            .completion(self.config.as_ref(), &[ChatMessage::user(prompt)], true, cancel)
            .await?;

        parse_estimate(&text)
    }
}

#[async_trait]
impl MatchEstimator for AiMatchEstimator {
    async fn estimate(
        &self,
        job: &JobPosting,
        profile: &CandidateProfile,
        cancel: &CancellationToken,
    ) -> Result<MatchEstimate, AiError> {
        match self.try_estimate(job, profile, cancel).await {
            Ok(estimate) => Ok(estimate),
            Err(AiError::Cancelled) => Err(AiError::Cancelled),
            Err(e) => {
                tracing::error!("AI match estimate failed for job {:?}: {}", job.id, e);
                Ok(MatchEstimate::failed())
            }
        }
    }

    fn backend(&self) -> &'static str {
        "ai"
    }
}

/// Parse the provider's JSON estimate, tolerating code fences
fn parse_estimate(text: &str) -> Result<MatchEstimate, AiError> {
    let raw: ProviderEstimate = serde_json::from_str(strip_json_fences(text))
        .map_err(|e| AiError::InvalidResponse(format!("Failed to parse estimate: {}", e)))?;

    if !raw.score.is_finite() {
        return Err(AiError::InvalidResponse("Score is not a number".into()));
    }

    Ok(MatchEstimate {
        score: raw.score.round().clamp(0.0, 100.0) as u32,
        reason: raw.reason,
        missing_skills: raw.missing_skills,
    })
}

/// Strips ```json ... ``` or ``` ... ``` code fences from provider output
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped.strip_suffix("```").map(str::trim).unwrap_or(stripped)
        }
        None => text,
    }
}
