use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;

use crate::models::{RegisterProfileRequest, RegistrationPayload, UpdateProfileRequest, UploadPhotoRequest};
use crate::routes::{actor_id, error_response, validation_error, AppState};

/// Configure profile and reference-data routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/genders", web::get().to(list_genders))
        .route("/cities", web::get().to(list_cities))
        .route("/profile", web::post().to(register_profile))
        .route("/profile", web::get().to(get_profile))
        .route("/profile", web::put().to(update_profile))
        .route("/profile/photos", web::get().to(list_photos))
        .route("/profile/photos", web::post().to(upload_photo));
}

async fn list_genders(state: web::Data<AppState>) -> impl Responder {
    match state.service.list_genders().await {
        Ok(genders) => HttpResponse::Ok().json(genders),
        Err(e) => error_response(&e),
    }
}

async fn list_cities(state: web::Data<AppState>) -> impl Responder {
    match state.service.list_cities().await {
        Ok(cities) => HttpResponse::Ok().json(cities),
        Err(e) => error_response(&e),
    }
}

/// Create the caller's profile from registration data
///
/// POST /api/v1/profile
///
/// Request body:
/// ```json
/// {
///   "name": "string",
///   "genderId": 1,
///   "birthDate": "1994-06-15",
///   "cityId": 1
/// }
/// ```
///
/// Returns the existing profile unchanged if the caller already has one.
async fn register_profile(
    state: web::Data<AppState>,
    req: web::Json<RegisterProfileRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let user_id = match actor_id(&http_req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for register_profile request: {:?}", errors);
        return validation_error(errors);
    }

    let payload = RegistrationPayload::from(req.into_inner());

    match state.service.get_or_create_profile(user_id, &payload).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => error_response(&e),
    }
}

async fn get_profile(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let user_id = match actor_id(&http_req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match state.service.get_profile(user_id).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => error_response(&e),
    }
}

/// Overwrite the caller's profile
///
/// PUT /api/v1/profile
async fn update_profile(
    state: web::Data<AppState>,
    req: web::Json<UpdateProfileRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let user_id = match actor_id(&http_req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for update_profile request: {:?}", errors);
        return validation_error(errors);
    }

    match state.service.update_profile(user_id, req.into_inner().into()).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => error_response(&e),
    }
}

async fn list_photos(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let user_id = match actor_id(&http_req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match state.service.list_photos(user_id).await {
        Ok(photos) => HttpResponse::Ok().json(photos),
        Err(e) => error_response(&e),
    }
}

/// Record the caller's photo, replacing any previous one
///
/// POST /api/v1/profile/photos
///
/// The image bytes are uploaded to object storage separately; this endpoint
/// records the photo and returns its storage path.
async fn upload_photo(
    state: web::Data<AppState>,
    req: web::Json<UploadPhotoRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let user_id = match actor_id(&http_req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    match state.service.replace_photo(user_id, &req.file_name).await {
        Ok(photo) => HttpResponse::Ok().json(photo),
        Err(e) => error_response(&e),
    }
}
