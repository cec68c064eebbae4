use chrono::NaiveDate;

use crate::core::age::current_age;
use crate::models::{Gender, GenderId, NewProfile, Profile, ProfileUpdate, RegistrationPayload, UserId};

/// Values used when a profile's preferences are derived rather than chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileDefaults {
    pub legal_min_age: i32,
    pub default_age_min: i32,
    pub default_age_max: i32,
    /// Half-width of the age window derived at registration
    pub registration_age_spread: i32,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            legal_min_age: 18,
            default_age_min: 18,
            default_age_max: 60,
            registration_age_spread: 3,
        }
    }
}

/// First gender, by ascending id, that differs from `own`
///
/// Placeholder heuristic; users override it with an explicit profile update.
pub fn default_target_gender(own: GenderId, genders: &[Gender]) -> Option<GenderId> {
    genders
        .iter()
        .map(|gender| gender.id)
        .filter(|&id| id != own)
        .min()
}

/// Age window centred on the user's own age, floored at the legal minimum
pub fn registration_age_window(age: i32, defaults: &ProfileDefaults) -> (i32, i32) {
    let age_min = (age - defaults.registration_age_spread).max(defaults.legal_min_age);
    let age_max = age + defaults.registration_age_spread;
    (age_min, age_max)
}

/// Build the profile created on a user's first access
pub fn new_profile(
    user_id: UserId,
    payload: &RegistrationPayload,
    genders: &[Gender],
    today: NaiveDate,
    defaults: &ProfileDefaults,
) -> NewProfile {
    let age = current_age(payload.birth_date, today);
    let (age_min, age_max) = registration_age_window(age, defaults);

    NewProfile {
        user_id,
        name: payload.name.clone(),
        birth_date: payload.birth_date,
        gender_id: payload.gender_id,
        city_id: payload.city_id,
        description: None,
        target_gender_id: default_target_gender(payload.gender_id, genders),
        age_min,
        age_max,
        active: true,
    }
}

/// Overwrite a profile's editable fields; nothing is re-derived
pub fn apply_update(profile: &mut Profile, update: ProfileUpdate, defaults: &ProfileDefaults) {
    profile.name = update.name;
    profile.birth_date = update.birth_date;
    profile.gender_id = update.gender_id;
    profile.city_id = update.city_id;
    profile.description = update.description;
    profile.target_gender_id = Some(update.target_gender_id);
    profile.age_min = update.age_min.unwrap_or(defaults.default_age_min);
    profile.age_max = update.age_max.unwrap_or(defaults.default_age_max);
    if let Some(active) = update.active {
        profile.active = active;
    }
}
