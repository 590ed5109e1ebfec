// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AiConfig, AiProvider, Application, ApplicationStatus, Award, CandidateProfile, Education,
    Experience, JobPosting, JobPreferences, MatchBreakdown, MatchEstimate, MatchResult,
    PersonalDetails, Project, Publication, ScoringWeights, UserSettings,
};
pub use requests::{
    EstimateMatchRequest, EstimateStrategy, ImproveTextRequest, RankFeedRequest,
    ScoreMatchRequest, SwipeDirection, SwipeRequest,
};
pub use responses::{
    ApplicationListResponse, ErrorResponse, EstimateMatchResponse, HealthResponse, ImproveTextResponse, RankFeedResponse, ScoreMatchResponse,
    ScoredJob, SwipeResponse,
};
