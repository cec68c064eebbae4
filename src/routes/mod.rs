// Route exports
pub mod matches;
pub mod profiles;

use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::error::MatchError;
use crate::models::{ErrorResponse, UserId};
use crate::services::{CacheManager, MatchingService, PostgresClient};

/// Header carrying the authenticated user id, set by the upstream gateway
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: MatchingService,
    pub postgres: Option<Arc<PostgresClient>>,
    pub cache: Option<Arc<CacheManager>>,
    pub default_limit: Option<u16>,
    pub max_limit: u16,
}

impl AppState {
    pub fn new(service: MatchingService) -> Self {
        Self {
            service,
            postgres: None,
            cache: None,
            default_limit: None,
            max_limit: 200,
        }
    }

    /// Requested limit, falling back to the default and capped at the maximum
    pub fn effective_limit(&self, requested: Option<u16>) -> Option<usize> {
        requested
            .or(self.default_limit)
            .map(|limit| limit.min(self.max_limit) as usize)
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(profiles::configure),
    );
}

/// Resolve the acting user from the request
pub fn actor_id(req: &HttpRequest) -> Result<UserId, HttpResponse> {
    req.headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<UserId>().ok())
        .ok_or_else(|| {
            HttpResponse::Unauthorized().json(ErrorResponse {
                error: "Missing user".to_string(),
                message: format!("{} header with a numeric user id is required", USER_ID_HEADER),
                status_code: 401,
            })
        })
}

/// Map a service error onto the JSON error shape
pub fn error_response(err: &MatchError) -> HttpResponse {
    let (status, error) = match err {
        MatchError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found"),
        MatchError::InvalidState(_) => (StatusCode::CONFLICT, "Invalid state"),
        MatchError::ConcurrencyConflict(_) => (StatusCode::CONFLICT, "Concurrency conflict"),
        MatchError::Store(e) => {
            tracing::error!("Store failure: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Store failure")
        }
    };

    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: err.to_string(),
        status_code: status.as_u16(),
    })
}

/// 400 response for a request that failed validation
pub fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_actor_id_from_header() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "42"))
            .to_http_request();
        assert_eq!(actor_id(&req).ok(), Some(42));

        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "abc"))
            .to_http_request();
        assert!(actor_id(&req).is_err());

        assert!(actor_id(&TestRequest::default().to_http_request()).is_err());
    }

    #[test]
    fn test_error_status_mapping() {
        let resp = error_response(&MatchError::NotFound("profile 1".to_string()));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = error_response(&MatchError::InvalidState("self".to_string()));
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }
}
