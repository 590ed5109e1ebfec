use std::collections::{BTreeSet, HashSet};

use crate::core::tokenizer::{token_set, token_union};
use crate::models::{CandidateProfile, JobPosting, MatchBreakdown, ScoringWeights};

/// Added to every raw overlap before clamping
const BASE_SCORE: u32 = 10;
/// Ceiling applied by normalization
const NORMALIZED_CEILING: u32 = 95;
/// Final clamp bounds
const MIN_SCORE: u32 = 10;
const MAX_SCORE: u32 = 99;

/// Calculate a match score (10-99) for a job against a candidate profile
///
/// Scoring formula:
/// raw = (
///     15 * |job ∩ skills| +        # Skill named in the job title
///     10 * |job ∩ experience| +    # Held a similar role before
///      5 * |job ∩ summary| +       # Stated intent
///     20 * research_bonus +        # Research post, research background
///     25 * phd_bonus               # PhD post, doctoral degree
/// )
/// score = clamp(min(raw + 10, 95), 10, 99)
///
/// Returns 0 when either side is absent.
pub fn calculate_match_score(
    profile: Option<&CandidateProfile>,
    job: Option<&JobPosting>,
    weights: &ScoringWeights,
) -> u32 {
    match (profile, job) {
        (Some(profile), Some(job)) => score_breakdown(profile, job, weights).score,
        _ => 0,
    }
}

/// Score a pair and report which tokens and rules contributed
pub fn score_breakdown(
    profile: &CandidateProfile,
    job: &JobPosting,
    weights: &ScoringWeights,
) -> MatchBreakdown {
    let mut job_tokens = token_set(Some(job.title.as_str()));
    job_tokens.extend(token_set(Some(job.employer.as_str())));

    let skills_tokens = token_union(profile.skills.iter().map(String::as_str));
    let exp_tokens = token_union(profile.experience.iter().map(|e| e.role.as_str()));
    let summary_tokens = token_set(Some(profile.summary()));

    let skill_matches = overlap(&job_tokens, &skills_tokens);
    let experience_matches = overlap(&job_tokens, &exp_tokens);
    let summary_matches = overlap(&job_tokens, &summary_tokens);

    let research_bonus = has_research_bonus(profile, job);
    let phd_bonus = has_phd_bonus(profile, job);

    // Configured weights may be arbitrarily large
    let mut raw = tier(weights.skills, &skill_matches)
        .saturating_add(tier(weights.experience, &experience_matches))
        .saturating_add(tier(weights.summary, &summary_matches));

    if research_bonus {
        raw = raw.saturating_add(weights.research_bonus);
    }
    if phd_bonus {
        raw = raw.saturating_add(weights.phd_bonus);
    }

    MatchBreakdown {
        skill_matches,
        experience_matches,
        summary_matches,
        research_bonus,
        phd_bonus,
        raw,
        score: normalize(raw),
    }
}

/// Map a raw weighted overlap onto the bounded percentage scale
#[inline]
pub fn normalize(raw: u32) -> u32 {
    let score = raw.saturating_add(BASE_SCORE).min(NORMALIZED_CEILING);
    score.min(MAX_SCORE).max(MIN_SCORE)
}

#[inline]
fn tier(weight: u32, matches: &[String]) -> u32 {
    let count = u32::try_from(matches.len()).unwrap_or(u32::MAX);
    weight.saturating_mul(count)
}

/// Job tokens present in a profile axis, sorted for stable output
fn overlap(job_tokens: &HashSet<String>, axis: &HashSet<String>) -> Vec<String> {
    job_tokens
        .iter()
        .filter(|t| axis.contains(*t))
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Research post and the candidate either mentions research or holds any degree
fn has_research_bonus(profile: &CandidateProfile, job: &JobPosting) -> bool {
    job.title.to_lowercase().contains("research")
        && (profile.summary().to_lowercase().contains("research") || !profile.education.is_empty())
}

/// PhD post and the candidate holds a doctorate
fn has_phd_bonus(profile: &CandidateProfile, job: &JobPosting) -> bool {
    job.title.to_lowercase().contains("phd")
        && profile.education.iter().any(|e| {
            let degree = e.degree.to_lowercase();
            degree.contains("phd") || degree.contains("doctorate")
        })
}
