use actix_web::{web, HttpRequest, HttpResponse, Responder};

use crate::models::{CandidatesQuery, CandidatesResponse, HealthResponse, MatchesResponse, ProfileId, StatusResponse};
use crate::routes::{actor_id, error_response, AppState};

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/candidates", web::get().to(find_candidates))
        .route("/lovers/{id}/like", web::post().to(like))
        .route("/lovers/{id}/dislike", web::post().to(dislike))
        .route("/matches", web::get().to(list_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = match &state.postgres {
        Some(postgres) => postgres.health_check().await.unwrap_or(false),
        None => true,
    };

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cache: state.cache.as_ref().map(|cache| cache.stats()),
    })
}

/// Find candidates endpoint
///
/// GET /api/v1/candidates?limit=20
///
/// Candidates are ordered by ascending profile id.
async fn find_candidates(
    state: web::Data<AppState>,
    query: web::Query<CandidatesQuery>,
    http_req: HttpRequest,
) -> impl Responder {
    let user_id = match actor_id(&http_req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let limit = state.effective_limit(query.limit);
    tracing::info!("Finding candidates for user: {}, limit: {:?}", user_id, limit);

    let today = chrono::Utc::now().date_naive();
    match state.service.find_candidates_on(user_id, today, limit).await {
        Ok(candidates) => HttpResponse::Ok().json(CandidatesResponse {
            total_results: candidates.len(),
            candidates,
        }),
        Err(e) => error_response(&e),
    }
}

/// Like endpoint
///
/// POST /api/v1/lovers/{id}/like
///
/// Response body:
/// ```json
/// { "match": true }
/// ```
async fn like(
    state: web::Data<AppState>,
    path: web::Path<ProfileId>,
    http_req: HttpRequest,
) -> impl Responder {
    let user_id = match actor_id(&http_req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match state.service.like(user_id, path.into_inner()).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => error_response(&e),
    }
}

/// Dislike endpoint
///
/// POST /api/v1/lovers/{id}/dislike
async fn dislike(
    state: web::Data<AppState>,
    path: web::Path<ProfileId>,
    http_req: HttpRequest,
) -> impl Responder {
    let user_id = match actor_id(&http_req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match state.service.dislike(user_id, path.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(StatusResponse::ok()),
        Err(e) => error_response(&e),
    }
}

/// Mutual likes of the caller
///
/// GET /api/v1/matches
async fn list_matches(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let user_id = match actor_id(&http_req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match state.service.matches(user_id).await {
        Ok(matches) => HttpResponse::Ok().json(MatchesResponse { matches }),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Matcher, ProfileDefaults};
    use crate::models::{City, Gender, LikeOutcome, Profile};
    use crate::routes::{configure_routes, USER_ID_HEADER};
    use crate::services::{CacheManager, MatchingService, MemoryStore};
    use actix_web::{http::StatusCode, test, App};
    use chrono::{Datelike, Utc};
    use std::sync::Arc;

    fn test_state() -> AppState {
        let store = Arc::new(MemoryStore::with_reference(
            vec![
                Gender { id: 1, code: "M".to_string(), label: "Homme".to_string() },
                Gender { id: 2, code: "F".to_string(), label: "Femme".to_string() },
            ],
            vec![City { id: 1, name: "Paris".to_string() }],
        ));
        let service = MatchingService::from_store(store, Matcher::default(), ProfileDefaults::default());
        AppState::new(service)
    }

    fn registration(name: &str, gender_id: i64, age: i32) -> serde_json::Value {
        let today = Utc::now().date_naive();
        // 1 January keeps the age exact whatever today's date is
        let birth_year = today.year() - age;
        serde_json::json!({
            "name": name,
            "genderId": gender_id,
            "birthDate": format!("{}-01-01", birth_year),
            "cityId": 1,
        })
    }

    #[actix_web::test]
    async fn test_register_like_and_match_over_http() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/profile")
            .insert_header((USER_ID_HEADER, "1"))
            .set_json(registration("Marc", 1, 30))
            .to_request();
        let marc: Profile = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/profile")
            .insert_header((USER_ID_HEADER, "2"))
            .set_json(registration("Julie", 2, 30))
            .to_request();
        let julie: Profile = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/candidates")
            .insert_header((USER_ID_HEADER, "1"))
            .to_request();
        let candidates: CandidatesResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(candidates.total_results, 1);
        assert_eq!(candidates.candidates[0].id, julie.id);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/lovers/{}/like", julie.id))
            .insert_header((USER_ID_HEADER, "1"))
            .to_request();
        let outcome: LikeOutcome = test::call_and_read_body_json(&app, req).await;
        assert!(!outcome.is_match);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/lovers/{}/like", marc.id))
            .insert_header((USER_ID_HEADER, "2"))
            .to_request();
        let outcome: LikeOutcome = test::call_and_read_body_json(&app, req).await;
        assert!(outcome.is_match);

        let req = test::TestRequest::get()
            .uri("/api/v1/matches")
            .insert_header((USER_ID_HEADER, "2"))
            .to_request();
        let matches: MatchesResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(matches.matches.len(), 1);
        assert_eq!(matches.matches[0].id, marc.id);
    }

    #[actix_web::test]
    async fn test_self_like_and_missing_actor() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/profile")
            .insert_header((USER_ID_HEADER, "5"))
            .set_json(registration("Solo", 1, 25))
            .to_request();
        let solo: Profile = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/lovers/{}/like", solo.id))
            .insert_header((USER_ID_HEADER, "5"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/lovers/{}/dislike", solo.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/v1/candidates")
            .insert_header((USER_ID_HEADER, "6"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_health_without_database() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/health").to_request();
        let health: HealthResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(health.status, "healthy");
        assert!(health.cache.is_none());
    }

    #[actix_web::test]
    async fn test_health_reports_cache_stats() {
        let mut state = test_state();
        state.cache = Some(Arc::new(CacheManager::local(16, 60)));

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/health").to_request();
        let health: HealthResponse = test::call_and_read_body_json(&app, req).await;

        let cache = health.cache.expect("cache stats");
        assert!(!cache.redis_enabled);
    }
}
