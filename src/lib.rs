//! Scholar Match - matching and ranking service for the academic job discovery app
//!
//! This library provides the deterministic job-to-candidate matching engine,
//! the AI-backed alternative estimator, and the repository layer over the
//! hosted document database.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, RankedFeed, calculate_match_score, tokenize};
pub use models::{CandidateProfile, JobPosting, MatchEstimate, MatchResult, ScoringWeights};
pub use services::{AiClient, AiError, MatchEstimator, Repository};
