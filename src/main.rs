use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use scholar_match::config::Settings;
use scholar_match::core::Matcher;
use scholar_match::models::{ErrorResponse, ScoringWeights};
use scholar_match::routes::{self, AppState};
use scholar_match::services::{AiClient, AppwriteClient, AppwriteCollections};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON error for malformed request payloads
#[derive(Debug)]
struct PayloadError(ErrorResponse);

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.0.error, self.0.message)
    }
}

impl error::ResponseError for PayloadError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.0.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(&self.0)
    }
}

/// Handle JSON payload errors
fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    PayloadError(ErrorResponse::new("invalid_json", format!("Invalid JSON: {}", err), 400)).into()
}

/// Handle path parameter errors
fn handle_path_error(err: error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    PayloadError(ErrorResponse::new("invalid_path", format!("Invalid path: {}", err), 400)).into()
}

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting Scholar Match service...");

    let ai = AiClient::new(
        settings.ai.completion_url.clone(),
        Duration::from_secs(settings.ai.timeout_secs),
    )
    .map_err(|e| {
        error!("Failed to create AI client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    let ai = Arc::new(ai);

    info!("AI client initialized (completion proxy: {})", ai.completion_url());

    // Initialize matcher with configured weights
    let matcher = Matcher::new(ScoringWeights::from(&settings.scoring.weights));

    info!("Matcher initialized with weights: {:?}", matcher.weights());

    let app_state = match settings.appwrite {
        Some(ref appwrite) => {
            let client = AppwriteClient::new(
                appwrite.endpoint.clone(),
                appwrite.api_key.clone(),
                appwrite.project_id.clone(),
                appwrite.database_id.clone(),
            )
            .map_err(|e| {
                error!("Failed to create Appwrite client: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
            })?;

            let collections = AppwriteCollections {
                profiles: settings.collection.profiles.clone(),
                applications: settings.collection.applications.clone(),
                settings: settings.collection.settings.clone(),
            };

            info!("Appwrite client initialized (database: {})", appwrite.database_id);
            AppState::with_appwrite(Arc::new(client), &collections, ai, matcher)
        }
        None => {
            warn!("No Appwrite settings, records are kept in memory only");
            AppState::in_memory(ai, matcher)
        }
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
