use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use lovocco_match::config::{Settings, StorageBackend};
use lovocco_match::core::Matcher;
use lovocco_match::routes::{self, AppState};
use lovocco_match::services::{
    CacheManager, CachedReferenceData, MatchingService, MemoryStore, PostgresClient, ReferenceData,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle path parameter errors, e.g. a non-numeric profile id
pub fn handle_path_error(err: error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_path".to_string(),
        message: format!("Invalid path: {}", err),
        status_code: 400,
    }
    .into()
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
        subscriber.init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    // LOG_LEVEL / LOG_FORMAT win over the config file
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());
    init_logging(&log_level, &log_format);

    info!("Starting Lovocco matching service...");

    // Initialize cache manager (Redis tier is optional)
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(3600);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(64);

    let cache = match settings.cache.redis_url() {
        Some(url) => match CacheManager::connect(url, l1_cache_size, cache_ttl).await {
            Ok(c) => {
                info!("Cache manager initialized (L1: {} entries, TTL: {}s, Redis enabled)", l1_cache_size, cache_ttl);
                c
            }
            Err(e) => {
                warn!("Failed to connect to Redis ({}), running with in-process cache only", e);
                CacheManager::local(l1_cache_size, cache_ttl)
            }
        },
        None => CacheManager::local(l1_cache_size, cache_ttl),
    };
    let cache = Arc::new(cache);

    let matcher = Matcher::new(settings.matching.exclude_disliked);
    let defaults = settings.matching.profile_defaults();

    info!(
        "Matcher initialized (exclude disliked: {}, defaults: {:?})",
        matcher.exclude_disliked(),
        defaults
    );

    // Build the store for the configured backend
    let (service, postgres) = match settings.storage.backend {
        StorageBackend::Memory => {
            let store = Arc::new(MemoryStore::with_reference(
                settings.reference.genders.clone(),
                settings.reference.cities.clone(),
            ));
            info!(
                "In-memory store initialized ({} genders, {} cities)",
                settings.reference.genders.len(),
                settings.reference.cities.len()
            );

            let reference: Arc<dyn ReferenceData> = store.clone();
            let service = MatchingService::from_store(store, matcher, defaults)
                .with_reference(Arc::new(CachedReferenceData::new(reference, cache.clone())));
            (service, None)
        }
        StorageBackend::Postgres => {
            let Some(database) = settings.database.as_ref() else {
                error!("storage.backend is postgres but no [database] section is configured");
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "missing database settings",
                ));
            };

            let postgres = PostgresClient::from_settings(
                &database.url,
                database.max_connections,
                database.min_connections,
                database.acquire_timeout_secs,
                database.idle_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
            })?;
            let postgres = Arc::new(postgres);

            info!(
                "PostgreSQL client initialized (max: {} connections)",
                database.max_connections.unwrap_or(10)
            );

            let reference: Arc<dyn ReferenceData> = postgres.clone();
            let service = MatchingService::from_store(postgres.clone(), matcher, defaults)
                .with_reference(Arc::new(CachedReferenceData::new(reference, cache.clone())));
            (service, Some(postgres))
        }
    };

    // Build application state
    let app_state = AppState {
        service,
        postgres,
        cache: Some(cache),
        default_limit: settings.matching.default_limit,
        max_limit: settings.matching.max_limit.unwrap_or(200),
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
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
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
