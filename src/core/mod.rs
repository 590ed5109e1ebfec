// Core algorithm exports
pub mod matcher;
pub mod scoring;
pub mod tokenizer;

pub use matcher::{Matcher, RankedFeed};
pub use scoring::{calculate_match_score, normalize, score_breakdown};
pub use tokenizer::{token_set, tokenize, STOPWORDS};
