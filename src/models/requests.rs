use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{CityId, GenderId, ProfileUpdate, RegistrationPayload};

/// Request to create the caller's profile from registration data
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterProfileRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[serde(alias = "gender_id", rename = "genderId")]
    pub gender_id: GenderId,
    #[serde(alias = "birth_date", rename = "birthDate")]
    pub birth_date: NaiveDate,
    #[serde(alias = "city_id", rename = "cityId")]
    pub city_id: CityId,
}

impl From<RegisterProfileRequest> for RegistrationPayload {
    fn from(req: RegisterProfileRequest) -> Self {
        Self {
            name: req.name,
            gender_id: req.gender_id,
            birth_date: req.birth_date,
            city_id: req.city_id,
        }
    }
}

/// Request to overwrite the caller's profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[serde(alias = "birth_date", rename = "birthDate")]
    pub birth_date: NaiveDate,
    #[serde(alias = "gender_id", rename = "genderId")]
    pub gender_id: GenderId,
    #[serde(alias = "city_id", rename = "cityId")]
    pub city_id: CityId,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(alias = "target_gender_id", rename = "targetGenderId")]
    pub target_gender_id: GenderId,
    #[validate(range(min = 0, max = 150))]
    #[serde(alias = "age_min", rename = "ageMin", default)]
    pub age_min: Option<i32>,
    #[validate(range(min = 0, max = 150))]
    #[serde(alias = "age_max", rename = "ageMax", default)]
    pub age_max: Option<i32>,
    #[serde(alias = "is_active", rename = "isActive", default)]
    pub active: Option<bool>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            name: req.name,
            birth_date: req.birth_date,
            gender_id: req.gender_id,
            city_id: req.city_id,
            description: req.description,
            target_gender_id: req.target_gender_id,
            age_min: req.age_min,
            age_max: req.age_max,
            active: req.active,
        }
    }
}

/// Request to upload (replace) the caller's photo
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UploadPhotoRequest {
    #[validate(length(min = 1, max = 255))]
    #[serde(alias = "file_name", rename = "fileName")]
    pub file_name: String,
}

/// Query string for the candidates endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatesQuery {
    #[serde(default)]
    pub limit: Option<u16>,
}
