use serde::{Deserialize, Serialize};

/// Candidate CV profile as stored by the CV builder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    #[serde(default)]
    pub personal: PersonalDetails,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub publications: Vec<Publication>,
    #[serde(default)]
    pub awards: Vec<Award>,
}

impl CandidateProfile {
    /// Profile summary, empty when the candidate has not written one
    pub fn summary(&self) -> &str {
        self.personal.summary.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub portfolio: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub thesis: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub role: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub title: String,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Award {
    pub title: String,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Job posting from the discovery feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub employer: String,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(rename = "type", default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    /// Older feeds send the posting URL here instead of `link`
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl JobPosting {
    /// Employer name, falling back to the institution some sources use instead
    pub fn employer_name(&self) -> &str {
        if self.employer.is_empty() {
            self.institution.as_deref().unwrap_or("")
        } else {
            &self.employer
        }
    }
}

/// Deterministic match score for one (profile, job) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: u32,
}

/// Per-axis detail behind a deterministic match score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchBreakdown {
    pub skill_matches: Vec<String>,
    pub experience_matches: Vec<String>,
    pub summary_matches: Vec<String>,
    pub research_bonus: bool,
    pub phd_bonus: bool,
    pub raw: u32,
    pub score: u32,
}

/// Match estimate as produced by an estimator backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEstimate {
    pub score: u32,
    pub reason: String,
    #[serde(default)]
    pub missing_skills: Vec<String>,
}

impl MatchEstimate {
    /// Fixed result returned when an estimate could not be produced
    pub fn failed() -> Self {
        Self {
            score: 0,
            reason: "Failed to calculate match.".to_string(),
            missing_skills: vec![],
        }
    }
}

/// Application tracker stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Saved,
    Applied,
    Interviewing,
    Offer,
    Rejected,
}

/// Tracked application, created when a job is swiped right
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub user_id: String,
    pub job_id: String,
    pub title: String,
    pub employer: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub match_score: Option<u32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Job as it was when saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<JobPosting>,
}

impl Application {
    /// Build a freshly saved application from a feed job
    pub fn saved(user_id: &str, job: &JobPosting, match_score: Option<u32>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            job_id: job.id.clone(),
            title: job.title.clone(),
            employer: job.employer_name().to_string(),
            location: job.location.clone().unwrap_or_else(|| "Remote".to_string()),
            link: job
                .link
                .as_deref()
                .or(job.url.as_deref())
                .unwrap_or_default()
                .to_string(),
            deadline: job.deadline.clone().unwrap_or_default(),
            status: ApplicationStatus::Saved,
            notes: String::new(),
            match_score,
            created_at: chrono::Utc::now(),
            raw_data: Some(job.clone()),
        }
    }
}

/// Completion provider selectable in settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    Openai,
    Claude,
    Groq,
    Gemini,
    Deepseek,
}

/// Per-user AI provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiConfig {
    pub provider: AiProvider,
    pub api_key: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Prefix of an API key that was masked on the way out
const REDACTED_KEY_PREFIX: &str = "****";

impl AiConfig {
    /// Copy with the API key masked, keeping the last four characters of long keys
    pub fn redacted(&self) -> Self {
        let chars: Vec<char> = self.api_key.chars().collect();
        let visible: String = if chars.len() > 8 {
            chars[chars.len() - 4..].iter().collect()
        } else {
            String::new()
        };

        Self {
            api_key: format!("{}{}", REDACTED_KEY_PREFIX, visible),
            ..self.clone()
        }
    }

    /// Whether the key is a masked value echoed back by a client
    pub fn has_redacted_key(&self) -> bool {
        self.api_key.starts_with(REDACTED_KEY_PREFIX)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPreferences {
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub min_salary: String,
    #[serde(default)]
    pub job_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default)]
    pub ai_config: Option<AiConfig>,
    #[serde(default)]
    pub job_preferences: Option<JobPreferences>,
}

impl UserSettings {
    /// Settings safe to return to a client
    pub fn redacted(&self) -> Self {
        Self {
            ai_config: self.ai_config.as_ref().map(AiConfig::redacted),
            job_preferences: self.job_preferences.clone(),
        }
    }
}

/// Scoring weights for the deterministic matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub skills: u32,
    pub experience: u32,
    pub summary: u32,
    pub research_bonus: u32,
    pub phd_bonus: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 15,
            experience: 10,
            summary: 5,
            research_bonus: 20,
            phd_bonus: 25,
        }
    }
}
