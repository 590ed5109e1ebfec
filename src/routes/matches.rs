use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crate::models::{
    Application, EstimateMatchRequest, EstimateMatchResponse, EstimateStrategy, ErrorResponse,
    HealthResponse, ImproveTextRequest, ImproveTextResponse, RankFeedRequest, RankFeedResponse,
    ScoreMatchRequest, ScoreMatchResponse, SwipeDirection, SwipeRequest, SwipeResponse,
};
use crate::routes::AppState;
use crate::services::{AiMatchEstimator, KeywordEstimator, MatchEstimator};

/// Cap on feed size to keep responses small
const MAX_FEED_LIMIT: u16 = 100;

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/score", web::post().to(score_match))
        .route("/matches/feed", web::post().to(rank_feed))
        .route("/matches/estimate", web::post().to(estimate_match))
        .route("/applications/swipe", web::post().to(swipe))
        .route("/cv/improve", web::post().to(improve_text));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new("Validation failed", errors.to_string(), 400))
}

/// Response sent when the request's token fired before the estimate finished
fn cancelled() -> HttpResponse {
    HttpResponse::build(StatusCode::from_u16(499).unwrap_or(StatusCode::BAD_REQUEST))
        .json(ErrorResponse::new("cancelled", "Request was cancelled", 499))
}

/// Token cancelled when the returned guard is dropped
///
/// actix drops the handler future when the client goes away, which drops the
/// guard and aborts any in-flight provider call.
fn request_token() -> (CancellationToken, tokio_util::sync::DropGuard) {
    let token = CancellationToken::new();
    let guard = token.clone().drop_guard();
    (token, guard)
}

/// Score one job against an inline profile
///
/// POST /api/v1/matches/score
async fn score_match(
    state: web::Data<AppState>,
    req: web::Json<ScoreMatchRequest>,
) -> impl Responder {
    let breakdown = state.matcher.explain(&req.profile, &req.job);

    tracing::debug!("Scored job {:?}: {} (raw {})", req.job.id, breakdown.score, breakdown.raw);

    HttpResponse::Ok().json(ScoreMatchResponse {
        score: breakdown.score,
        breakdown,
    })
}

/// Rank feed jobs for a stored profile
///
/// POST /api/v1/matches/feed
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "jobs": [{"id": "string", "title": "string", "employer": "string"}],
///   "excludeJobIds": ["string"],
///   "limit": 20
/// }
/// ```
async fn rank_feed(
    state: web::Data<AppState>,
    req: web::Json<RankFeedRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let req = req.into_inner();
    let limit = req.limit.min(MAX_FEED_LIMIT) as usize;

    tracing::info!("Ranking {} jobs for user: {}, limit: {}", req.jobs.len(), req.user_id, limit);

    let profile = match state.profiles.get(&req.user_id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse::new(
                "Profile not found",
                format!("No CV profile stored for user {}", req.user_id),
                404,
            ));
        }
        Err(e) => {
            tracing::error!("Failed to fetch profile for {}: {}", req.user_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Failed to fetch user profile",
                e.to_string(),
                500,
            ));
        }
    };

    let feed = state
        .matcher
        .rank_jobs(&profile, req.jobs, &req.exclude_job_ids, limit);

    tracing::info!(
        "Returning {} jobs for user {} (from {} jobs)",
        feed.jobs.len(),
        req.user_id,
        feed.total_jobs
    );

    HttpResponse::Ok().json(RankFeedResponse {
        jobs: feed.jobs,
        total_jobs: feed.total_jobs,
    })
}

/// Estimate a match with the AI or keyword backend
///
/// POST /api/v1/matches/estimate
async fn estimate_match(
    state: web::Data<AppState>,
    req: web::Json<EstimateMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let estimator: Box<dyn MatchEstimator> = match req.strategy {
        EstimateStrategy::Keyword => Box::new(KeywordEstimator::new(state.matcher.clone())),
        EstimateStrategy::Ai => {
            let config = match state.settings.get(&req.user_id).await {
                Ok(settings) => settings.and_then(|s| s.ai_config),
                Err(e) => {
                    tracing::warn!("Failed to fetch settings for {}, proceeding without AI config: {}", req.user_id, e);
                    None
                }
            };
            Box::new(AiMatchEstimator::new(state.ai.clone(), config))
        }
    };

    let (cancel, _guard) = request_token();

    match estimator.estimate(&req.job, &req.profile, &cancel).await {
        Ok(estimate) => HttpResponse::Ok().json(EstimateMatchResponse {
            estimate,
            backend: estimator.backend().to_string(),
        }),
        Err(e) => {
            tracing::debug!("Estimate for {} aborted: {}", req.user_id, e);
            cancelled()
        }
    }
}

/// Swipe on a feed job
///
/// POST /api/v1/applications/swipe
///
/// Right swipes save the job to the tracker with its match score.
async fn swipe(
    state: web::Data<AppState>,
    req: web::Json<SwipeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    if req.direction == SwipeDirection::Left {
        tracing::debug!("User {} passed on job {}", req.user_id, req.job.id);
        return HttpResponse::Ok().json(SwipeResponse {
            saved: false,
            application_id: None,
        });
    }

    let match_score = match state.profiles.get(&req.user_id).await {
        Ok(profile) => profile.map(|p| state.matcher.score(Some(&p), Some(&req.job)).score),
        Err(e) => {
            tracing::warn!("Failed to fetch profile for {}, saving without score: {}", req.user_id, e);
            None
        }
    };

    let application = Application::saved(&req.user_id, &req.job, match_score);

    match state.applications.put(&application.id, &application).await {
        Ok(()) => {
            tracing::info!("Saved job {} for user {} as {}", req.job.id, req.user_id, application.id);
            HttpResponse::Ok().json(SwipeResponse {
                saved: true,
                application_id: Some(application.id),
            })
        }
        Err(e) => {
            tracing::error!("Failed to save application for {}: {}", req.user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Failed to save application",
                e.to_string(),
                500,
            ))
        }
    }
}

/// Refine a CV section with the user's AI provider
///
/// POST /api/v1/cv/improve
async fn improve_text(
    state: web::Data<AppState>,
    req: web::Json<ImproveTextRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let config = match state.settings.get(&req.user_id).await {
        Ok(settings) => settings.and_then(|s| s.ai_config),
        Err(e) => {
            tracing::error!("Failed to fetch settings for {}: {}", req.user_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Failed to fetch settings",
                e.to_string(),
                500,
            ));
        }
    };

    let (cancel, _guard) = request_token();

    match state
        .ai
        .improve_text(config.as_ref(), &req.text, &req.section, &cancel)
        .await
    {
        Ok(text) => HttpResponse::Ok().json(ImproveTextResponse { text }),
        Err(_) => cancelled(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Matcher;
    use crate::models::{CandidateProfile, JobPosting};
    use crate::services::AiClient;
    use actix_web::{test, App};
    use std::sync::Arc;
    use std::time::Duration;

    fn create_state() -> AppState {
        let ai = AiClient::new("http://127.0.0.1:9".to_string(), Duration::from_secs(1)).unwrap();
        AppState::in_memory(Arc::new(ai), Matcher::default())
    }

    fn create_profile() -> CandidateProfile {
        CandidateProfile {
            skills: vec!["React".to_string(), "Python".to_string()],
            ..Default::default()
        }
    }

    fn create_job(id: &str, title: &str) -> JobPosting {
        JobPosting {
            id: id.to_string(),
            title: title.to_string(),
            employer: "Acme".to_string(),
            ..Default::default()
        }
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(
            App::new().configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/health").to_request();
        let resp: HealthResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.status, "healthy");
    }

    #[actix_web::test]
    async fn test_score_endpoint() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/matches/score")
            .set_json(ScoreMatchRequest {
                profile: create_profile(),
                job: create_job("1", "React Developer"),
            })
            .to_request();
        let resp: ScoreMatchResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.score, 25);
        assert_eq!(resp.breakdown.skill_matches, vec!["react"]);
    }

    #[actix_web::test]
    async fn test_feed_requires_profile() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/matches/feed")
            .set_json(serde_json::json!({"userId": "ghost", "jobs": []}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_feed_ranks_stored_profile() {
        let state = create_state();
        state.profiles.put("u1", &create_profile()).await.unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/matches/feed")
            .set_json(serde_json::json!({
                "userId": "u1",
                "jobs": [
                    {"id": "a", "title": "Chemist", "employer": "Lab"},
                    {"id": "b", "title": "Python React Engineer", "employer": "Lab"}
                ]
            }))
            .to_request();
        let resp: RankFeedResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.total_jobs, 2);
        assert_eq!(resp.jobs[0].job.id, "b");
        assert_eq!(resp.jobs[0].match_score, 40);
        assert_eq!(resp.jobs[1].match_score, 10);
    }

    #[actix_web::test]
    async fn test_right_swipe_saves_application() {
        let state = create_state();
        state.profiles.put("u1", &create_profile()).await.unwrap();
        let applications = state.applications.clone();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/applications/swipe")
            .set_json(serde_json::json!({
                "userId": "u1",
                "job": {"id": "j1", "title": "React Developer", "employer": "Acme"},
                "direction": "right"
            }))
            .to_request();
        let resp: SwipeResponse = test::call_and_read_body_json(&app, req).await;

        assert!(resp.saved);
        let id = resp.application_id.unwrap();
        let saved = applications.get(&id).await.unwrap().unwrap();
        assert_eq!(saved.job_id, "j1");
        assert_eq!(saved.match_score, Some(25));
    }

    #[actix_web::test]
    async fn test_keyword_estimate_endpoint() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/matches/estimate")
            .set_json(serde_json::json!({
                "userId": "u1",
                "profile": {"skills": ["React"]},
                "job": {"title": "React Developer", "employer": "Acme"},
                "strategy": "keyword"
            }))
            .to_request();
        let resp: EstimateMatchResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.backend, "keyword");
        assert_eq!(resp.estimate.score, 25);
    }

    #[actix_web::test]
    async fn test_ai_estimate_without_settings_degrades() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/matches/estimate")
            .set_json(serde_json::json!({
                "userId": "u1",
                "profile": {},
                "job": {"title": "Lecturer"}
            }))
            .to_request();
        let resp: EstimateMatchResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.backend, "ai");
        assert_eq!(resp.estimate.score, 0);
        assert_eq!(resp.estimate.reason, "Failed to calculate match.");
    }

    #[actix_web::test]
    async fn test_improve_without_provider_returns_no_text() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/cv/improve")
            .set_json(serde_json::json!({
                "userId": "u1",
                "text": "Worked on ML things",
                "section": "summary"
            }))
            .to_request();
        let resp: ImproveTextResponse = test::call_and_read_body_json(&app, req).await;

        assert!(resp.text.is_none());
    }
}
