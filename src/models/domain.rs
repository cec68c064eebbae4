use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub type ProfileId = i64;
pub type UserId = i64;
pub type GenderId = i64;
pub type CityId = i64;

/// A user's dating profile ("lover")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub name: String,
    #[serde(rename = "birthDate")]
    pub birth_date: NaiveDate,
    #[serde(rename = "genderId")]
    pub gender_id: GenderId,
    #[serde(rename = "cityId")]
    pub city_id: CityId,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "targetGenderId", default)]
    pub target_gender_id: Option<GenderId>,
    #[serde(rename = "ageMin")]
    pub age_min: i32,
    #[serde(rename = "ageMax")]
    pub age_max: i32,
    #[serde(rename = "isActive", default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool { true }

/// Profile data before the store has assigned an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub user_id: UserId,
    pub name: String,
    pub birth_date: NaiveDate,
    pub gender_id: GenderId,
    pub city_id: CityId,
    pub description: Option<String>,
    pub target_gender_id: Option<GenderId>,
    pub age_min: i32,
    pub age_max: i32,
    pub active: bool,
}

impl NewProfile {
    pub fn with_id(self, id: ProfileId) -> Profile {
        Profile {
            id,
            user_id: self.user_id,
            name: self.name,
            birth_date: self.birth_date,
            gender_id: self.gender_id,
            city_id: self.city_id,
            description: self.description,
            target_gender_id: self.target_gender_id,
            age_min: self.age_min,
            age_max: self.age_max,
            active: self.active,
        }
    }
}

/// Structured data collected at account registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationPayload {
    pub name: String,
    #[serde(rename = "genderId")]
    pub gender_id: GenderId,
    #[serde(rename = "birthDate")]
    pub birth_date: NaiveDate,
    #[serde(rename = "cityId")]
    pub city_id: CityId,
}

/// Explicit overwrite of a profile's editable fields
///
/// Age bounds left empty fall back to the configured defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub birth_date: NaiveDate,
    pub gender_id: GenderId,
    pub city_id: CityId,
    pub description: Option<String>,
    pub target_gender_id: GenderId,
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
    pub active: Option<bool>,
}

/// Photo metadata; the bytes live in external storage under `file_path`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: i64,
    #[serde(rename = "profileId")]
    pub profile_id: ProfileId,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gender {
    pub id: GenderId,
    pub code: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestKind {
    Like,
    Dislike,
}

/// Directed like/dislike from one profile to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestEdge {
    #[serde(rename = "fromProfileId")]
    pub from: ProfileId,
    #[serde(rename = "toProfileId")]
    pub to: ProfileId,
    pub kind: InterestKind,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Inclusive birth-date range a candidate must fall in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthDateWindow {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

impl BirthDateWindow {
    pub fn contains(&self, birth_date: NaiveDate) -> bool {
        self.earliest <= birth_date && birth_date <= self.latest
    }
}

/// Candidate query parameters, derived from the requesting profile
#[derive(Debug, Clone)]
pub struct CandidateQuery {
    pub requester_id: ProfileId,
    /// Gender a candidate must have; `None` means the requester seeks nobody
    pub candidate_gender_id: Option<GenderId>,
    /// Gender a candidate must be seeking (the requester's own)
    pub candidate_target_gender_id: GenderId,
    pub city_id: CityId,
    pub birth_window: BirthDateWindow,
    pub requester_age: i32,
    /// Sorted, deduplicated
    pub exclude_profile_ids: Vec<ProfileId>,
    pub limit: Option<usize>,
}

impl CandidateQuery {
    pub fn is_excluded(&self, id: ProfileId) -> bool {
        self.exclude_profile_ids.binary_search(&id).is_ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeOutcome {
    #[serde(rename = "match")]
    pub is_match: bool,
}
