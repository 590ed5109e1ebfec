// Route exports
pub mod matches;
pub mod records;

use actix_web::web;
use std::sync::Arc;

use crate::core::Matcher;
use crate::models::{Application, CandidateProfile, UserSettings};
use crate::services::{
    AiClient, AppwriteClient, AppwriteCollections, AppwriteRepository, InMemoryRepository,
    Repository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn Repository<CandidateProfile>>,
    pub applications: Arc<dyn Repository<Application>>,
    pub settings: Arc<dyn Repository<UserSettings>>,
    pub ai: Arc<AiClient>,
    pub matcher: Matcher,
}

impl AppState {
    /// State backed by Appwrite collections
    pub fn with_appwrite(
        appwrite: Arc<AppwriteClient>,
        collections: &AppwriteCollections,
        ai: Arc<AiClient>,
        matcher: Matcher,
    ) -> Self {
        Self {
            profiles: Arc::new(AppwriteRepository::new(appwrite.clone(), &collections.profiles)),
            applications: Arc::new(AppwriteRepository::new(
                appwrite.clone(),
                &collections.applications,
            )),
            settings: Arc::new(AppwriteRepository::new(appwrite, &collections.settings)),
            ai,
            matcher,
        }
    }

    /// State backed by process memory
    pub fn in_memory(ai: Arc<AiClient>, matcher: Matcher) -> Self {
        Self {
            profiles: Arc::new(InMemoryRepository::new()),
            applications: Arc::new(InMemoryRepository::new()),
            settings: Arc::new(InMemoryRepository::new()),
            ai,
            matcher,
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(records::configure),
    );
}
