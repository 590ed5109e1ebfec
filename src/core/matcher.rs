use crate::core::scoring::{calculate_match_score, score_breakdown};
use crate::models::{CandidateProfile, JobPosting, MatchBreakdown, MatchResult, ScoredJob, ScoringWeights};

/// Result of ranking a feed
#[derive(Debug)]
pub struct RankedFeed {
    pub jobs: Vec<ScoredJob>,
    pub total_jobs: usize,
}

/// Main matching orchestrator - scores pairs and ranks the discovery feed
///
/// # Feed Stages
/// 1. Drop jobs the user already swiped or tracked
/// 2. Score every remaining job against the profile
/// 3. Rank by score, keeping the source order for ties
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a single (profile, job) pair
    pub fn score(&self, profile: Option<&CandidateProfile>, job: Option<&JobPosting>) -> MatchResult {
        MatchResult {
            score: calculate_match_score(profile, job, &self.weights),
        }
    }

    /// Score a pair and keep the per-axis detail
    pub fn explain(&self, profile: &CandidateProfile, job: &JobPosting) -> MatchBreakdown {
        score_breakdown(profile, job, &self.weights)
    }

    /// Rank feed jobs for a candidate
    ///
    /// # Arguments
    /// * `profile` - The candidate's CV profile
    /// * `jobs` - Jobs returned by the job search
    /// * `exclude_job_ids` - Jobs already swiped or saved
    /// * `limit` - Maximum number of jobs to return
    pub fn rank_jobs(
        &self,
        profile: &CandidateProfile,
        jobs: Vec<JobPosting>,
        exclude_job_ids: &[String],
        limit: usize,
    ) -> RankedFeed {
        let total_jobs = jobs.len();

        let mut scored: Vec<ScoredJob> = jobs
            .into_iter()
            .filter(|job| !exclude_job_ids.contains(&job.id))
            .map(|job| {
                let match_score = calculate_match_score(Some(profile), Some(&job), &self.weights);
                ScoredJob { job, match_score }
            })
            .collect();

        // Stable sort so equal scores keep the search order
        scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        scored.truncate(limit);

        tracing::debug!("Ranked {} of {} feed jobs", scored.len(), total_jobs);

        RankedFeed {
            jobs: scored,
            total_jobs,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
