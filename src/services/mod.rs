// Service exports
pub mod ai;
pub mod appwrite;
pub mod estimator;
pub mod prompts;
pub mod repository;

pub use ai::{AiClient, AiError, ChatMessage, ResolvedAiConfig};
pub use appwrite::{AppwriteClient, AppwriteCollections, AppwriteError};
pub use estimator::{AiMatchEstimator, KeywordEstimator, MatchEstimator};
pub use repository::{AppwriteRepository, InMemoryRepository, Repository, RepositoryError};
