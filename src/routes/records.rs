use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::convert::identity;
use std::sync::Arc;

use crate::models::{
    Application, ApplicationListResponse, CandidateProfile, ErrorResponse, UserSettings,
};
use crate::routes::AppState;
use crate::services::{Repository, RepositoryError};

/// Configure profile, application and settings record routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/profiles/{user_id}", web::get().to(get_profile))
        .route("/profiles/{user_id}", web::put().to(put_profile))
        .route("/applications/{id}", web::get().to(get_application))
        .route("/applications/{id}", web::put().to(put_application))
        .route("/users/{user_id}/applications", web::get().to(list_applications))
        .route("/settings/{user_id}", web::get().to(get_settings))
        .route("/settings/{user_id}", web::put().to(put_settings));
}

fn store_error(action: &str, kind: &str, id: &str, e: RepositoryError) -> HttpResponse {
    tracing::error!("Failed to {} {} {}: {}", action, kind, id, e);
    HttpResponse::InternalServerError().json(ErrorResponse::new(
        &format!("Failed to {} {}", action, kind),
        e.to_string(),
        500,
    ))
}

/// Fetch an entity and render it through `view`
async fn fetch<T, R>(
    repo: &Arc<dyn Repository<T>>,
    kind: &str,
    id: &str,
    view: impl FnOnce(T) -> R,
) -> HttpResponse
where
    T: Clone + Send + Sync + 'static,
    R: Serialize,
{
    match repo.get(id).await {
        Ok(Some(value)) => HttpResponse::Ok().json(view(value)),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse::new(
            &format!("{} not found", kind),
            format!("No {} stored for {}", kind, id),
            404,
        )),
        Err(e) => store_error("fetch", kind, id, e),
    }
}

/// Store an entity and echo it back through `view`
async fn store<T, R>(
    repo: &Arc<dyn Repository<T>>,
    kind: &str,
    id: &str,
    value: T,
    view: impl FnOnce(T) -> R,
) -> HttpResponse
where
    T: Clone + Send + Sync + 'static,
    R: Serialize,
{
    match repo.put(id, &value).await {
        Ok(()) => {
            tracing::debug!("Stored {} {}", kind, id);
            HttpResponse::Ok().json(view(value))
        }
        Err(e) => store_error("store", kind, id, e),
    }
}

/// GET /api/v1/profiles/{user_id}
async fn get_profile(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    fetch(&state.profiles, "profile", &path, identity).await
}

/// PUT /api/v1/profiles/{user_id}
async fn put_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CandidateProfile>,
) -> impl Responder {
    store(&state.profiles, "profile", &path, body.into_inner(), identity).await
}

/// GET /api/v1/applications/{id}
async fn get_application(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    fetch(&state.applications, "application", &path, identity).await
}

/// PUT /api/v1/applications/{id}
///
/// The path id wins over the id in the body.
async fn put_application(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Application>,
) -> impl Responder {
    let mut application = body.into_inner();
    application.id = path.into_inner();
    let id = application.id.clone();
    store(&state.applications, "application", &id, application, identity).await
}

/// GET /api/v1/users/{user_id}/applications
///
/// Every application tracked by the user, newest first.
async fn list_applications(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let user_id = path.into_inner();

    let mut applications = match state.applications.find_by("userId", &user_id).await {
        Ok(applications) => applications,
        Err(e) => return store_error("list", "applications", &user_id, e),
    };
    applications.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    tracing::debug!("Listing {} applications for user {}", applications.len(), user_id);

    HttpResponse::Ok().json(ApplicationListResponse {
        total: applications.len(),
        applications,
    })
}

/// GET /api/v1/settings/{user_id}
///
/// The AI provider key is masked.
async fn get_settings(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    fetch(&state.settings, "settings", &path, |s: UserSettings| s.redacted()).await
}

/// PUT /api/v1/settings/{user_id}
///
/// A masked key echoed back from GET keeps the stored key.
async fn put_settings(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UserSettings>,
) -> impl Responder {
    let user_id = path.into_inner();
    let mut settings = body.into_inner();

    if let Some(config) = settings.ai_config.as_mut().filter(|c| c.has_redacted_key()) {
        let stored = match state.settings.get(&user_id).await {
            Ok(stored) => stored.and_then(|s| s.ai_config),
            Err(e) => return store_error("fetch", "settings", &user_id, e),
        };
        match stored {
            Some(stored) => config.api_key = stored.api_key,
            None => config.api_key.clear(),
        }
    }

    store(&state.settings, "settings", &user_id, settings, |s: UserSettings| s.redacted()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Matcher;
    use crate::models::{AiConfig, AiProvider, ApplicationStatus, SwipeResponse};
    use crate::services::AiClient;
    use actix_web::{http::StatusCode, test, App};
    use std::time::Duration;

    fn create_state() -> AppState {
        let ai = AiClient::new("http://127.0.0.1:9".to_string(), Duration::from_secs(1)).unwrap();
        AppState::in_memory(Arc::new(ai), Matcher::default())
    }

    #[actix_web::test]
    async fn test_profile_put_then_get() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let put = test::TestRequest::put()
            .uri("/api/v1/profiles/u1")
            .set_json(serde_json::json!({"skills": ["Rust"], "personal": {"fullName": "Ada"}}))
            .to_request();
        assert_eq!(test::call_service(&app, put).await.status(), StatusCode::OK);

        let get = test::TestRequest::get().uri("/api/v1/profiles/u1").to_request();
        let profile: CandidateProfile = test::call_and_read_body_json(&app, get).await;

        assert_eq!(profile.skills, vec!["Rust"]);
        assert_eq!(profile.personal.full_name, "Ada");
    }

    #[actix_web::test]
    async fn test_missing_settings_is_not_found() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let get = test::TestRequest::get().uri("/api/v1/settings/nobody").to_request();
        assert_eq!(test::call_service(&app, get).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_application_status_update() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let put = test::TestRequest::put()
            .uri("/api/v1/applications/app-1")
            .set_json(serde_json::json!({
                "id": "ignored",
                "userId": "u1",
                "jobId": "j1",
                "title": "Research Fellow",
                "employer": "UCL",
                "status": "Interviewing",
                "createdAt": "2026-01-05T10:00:00Z"
            }))
            .to_request();
        let stored: Application = test::call_and_read_body_json(&app, put).await;

        assert_eq!(stored.id, "app-1");
        assert_eq!(stored.status, ApplicationStatus::Interviewing);
    }

    #[actix_web::test]
    async fn test_right_swipes_listed_newest_first() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(crate::routes::configure_routes),
        )
        .await;

        for (id, title) in [("j1", "Research Fellow"), ("j2", "Lecturer in Physics")] {
            let swipe = test::TestRequest::post()
                .uri("/api/v1/applications/swipe")
                .set_json(serde_json::json!({
                    "userId": "u1",
                    "job": {"id": id, "title": title, "employer": "UCL"},
                    "direction": "right"
                }))
                .to_request();
            let resp: SwipeResponse = test::call_and_read_body_json(&app, swipe).await;
            assert!(resp.saved);
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let other = test::TestRequest::post()
            .uri("/api/v1/applications/swipe")
            .set_json(serde_json::json!({
                "userId": "u2",
                "job": {"id": "j3", "title": "Archivist"},
                "direction": "right"
            }))
            .to_request();
        test::call_service(&app, other).await;

        let list = test::TestRequest::get()
            .uri("/api/v1/users/u1/applications")
            .to_request();
        let resp: ApplicationListResponse = test::call_and_read_body_json(&app, list).await;

        assert_eq!(resp.total, 2);
        assert_eq!(resp.applications[0].job_id, "j2");
        assert_eq!(resp.applications[1].job_id, "j1");
        assert!(resp.applications[0].created_at > resp.applications[1].created_at);
        assert_eq!(
            resp.applications[0].raw_data.as_ref().map(|j| j.title.as_str()),
            Some("Lecturer in Physics")
        );
    }

    #[actix_web::test]
    async fn test_list_applications_empty_for_unknown_user() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let list = test::TestRequest::get()
            .uri("/api/v1/users/nobody/applications")
            .to_request();
        let resp: ApplicationListResponse = test::call_and_read_body_json(&app, list).await;

        assert_eq!(resp.total, 0);
        assert!(resp.applications.is_empty());
    }

    #[actix_web::test]
    async fn test_settings_key_masked_and_preserved() {
        let state = create_state();
        let settings_repo = state.settings.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let put = test::TestRequest::put()
            .uri("/api/v1/settings/u1")
            .set_json(serde_json::json!({
                "aiConfig": {"provider": "openai", "apiKey": "sk-live-abcd1234"}
            }))
            .to_request();
        let echoed: UserSettings = test::call_and_read_body_json(&app, put).await;
        assert_eq!(echoed.ai_config.unwrap().api_key, "****1234");

        let get = test::TestRequest::get().uri("/api/v1/settings/u1").to_request();
        let fetched: UserSettings = test::call_and_read_body_json(&app, get).await;
        let masked = fetched.ai_config.unwrap();
        assert_eq!(masked.api_key, "****1234");

        // Client saves the form back with the masked key and a new model
        let put = test::TestRequest::put()
            .uri("/api/v1/settings/u1")
            .set_json(UserSettings {
                ai_config: Some(AiConfig {
                    model: Some("gpt-4o-mini".to_string()),
                    ..masked
                }),
                job_preferences: None,
            })
            .to_request();
        assert_eq!(test::call_service(&app, put).await.status(), StatusCode::OK);

        let stored = settings_repo.get("u1").await.unwrap().unwrap().ai_config.unwrap();
        assert_eq!(stored.provider, AiProvider::Openai);
        assert_eq!(stored.api_key, "sk-live-abcd1234");
        assert_eq!(stored.model.as_deref(), Some("gpt-4o-mini"));
    }
}
