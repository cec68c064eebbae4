use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::{
    apply_update, ensure_distinct, is_match, mutual_likes, new_profile, InterestState, Matcher,
    ProfileDefaults,
};
use crate::error::{MatchError, MatchResult};
use crate::models::{
    City, Gender, InterestKind, LikeOutcome, Photo, Profile, ProfileId, ProfileUpdate,
    RegistrationPayload, UserId,
};
use crate::services::store::{PhotoStore, ProfileStore, ReferenceData, RelationStore, StoreError};

/// Entry point for every matching operation
///
/// The acting user is always passed in explicitly; nothing is resolved from
/// ambient request state.
#[derive(Clone)]
pub struct MatchingService {
    profiles: Arc<dyn ProfileStore>,
    relations: Arc<dyn RelationStore>,
    reference: Arc<dyn ReferenceData>,
    photos: Arc<dyn PhotoStore>,
    matcher: Matcher,
    defaults: ProfileDefaults,
}

impl MatchingService {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        relations: Arc<dyn RelationStore>,
        reference: Arc<dyn ReferenceData>,
        photos: Arc<dyn PhotoStore>,
        matcher: Matcher,
        defaults: ProfileDefaults,
    ) -> Self {
        Self {
            profiles,
            relations,
            reference,
            photos,
            matcher,
            defaults,
        }
    }

    /// Build a service where one store backs every port
    pub fn from_store<S>(store: Arc<S>, matcher: Matcher, defaults: ProfileDefaults) -> Self
    where
        S: ProfileStore + RelationStore + ReferenceData + PhotoStore + 'static,
    {
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            matcher,
            defaults,
        )
    }

    /// Replace the reference-data port, e.g. with a cached one
    pub fn with_reference(mut self, reference: Arc<dyn ReferenceData>) -> Self {
        self.reference = reference;
        self
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Fetch the user's profile, creating it from registration data on first access
    pub async fn get_or_create_profile(
        &self,
        user_id: UserId,
        payload: &RegistrationPayload,
    ) -> MatchResult<Profile> {
        self.get_or_create_profile_on(user_id, payload, Self::today()).await
    }

    pub async fn get_or_create_profile_on(
        &self,
        user_id: UserId,
        payload: &RegistrationPayload,
        today: NaiveDate,
    ) -> MatchResult<Profile> {
        if let Some(profile) = self.profiles.get_by_user(user_id).await? {
            return Ok(profile);
        }

        if self.reference.get_gender(payload.gender_id).await?.is_none() {
            return Err(MatchError::NotFound(format!("gender {}", payload.gender_id)));
        }
        if self.reference.get_city(payload.city_id).await?.is_none() {
            return Err(MatchError::NotFound(format!("city {}", payload.city_id)));
        }

        let genders = self.reference.list_genders().await?;
        let draft = new_profile(user_id, payload, &genders, today, &self.defaults);

        match self.profiles.create(draft).await {
            Ok(profile) => {
                info!(
                    "Created profile {} for user {} (ages {}-{})",
                    profile.id, user_id, profile.age_min, profile.age_max
                );
                Ok(profile)
            }
            Err(StoreError::Conflict(reason)) => {
                // Lost a creation race; the winner's row should now be visible
                debug!("Profile creation conflict for user {}: {}", user_id, reason);
                self.profiles.get_by_user(user_id).await?.ok_or_else(|| {
                    warn!("Profile for user {} still missing after conflict", user_id);
                    MatchError::ConcurrencyConflict(reason)
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch the user's existing profile
    pub async fn get_profile(&self, user_id: UserId) -> MatchResult<Profile> {
        self.profiles
            .get_by_user(user_id)
            .await?
            .ok_or_else(|| MatchError::NotFound(format!("profile for user {}", user_id)))
    }

    /// Overwrite the user's profile fields
    pub async fn update_profile(&self, user_id: UserId, update: ProfileUpdate) -> MatchResult<Profile> {
        let mut profile = self.get_profile(user_id).await?;

        if self.reference.get_gender(update.gender_id).await?.is_none() {
            return Err(MatchError::NotFound(format!("gender {}", update.gender_id)));
        }
        if self.reference.get_gender(update.target_gender_id).await?.is_none() {
            return Err(MatchError::NotFound(format!("gender {}", update.target_gender_id)));
        }
        if self.reference.get_city(update.city_id).await?.is_none() {
            return Err(MatchError::NotFound(format!("city {}", update.city_id)));
        }

        apply_update(&mut profile, update, &self.defaults);
        self.profiles.update(&profile).await?;

        info!("Updated profile {} for user {}", profile.id, user_id);
        Ok(profile)
    }

    /// Candidates currently visible to the user
    pub async fn find_candidates(&self, user_id: UserId) -> MatchResult<Vec<Profile>> {
        self.find_candidates_on(user_id, Self::today(), None).await
    }

    pub async fn find_candidates_on(
        &self,
        user_id: UserId,
        today: NaiveDate,
        limit: Option<usize>,
    ) -> MatchResult<Vec<Profile>> {
        let profile = self.get_profile(user_id).await?;
        let outgoing = self.relations.edges_from(profile.id).await?;

        let query = self.matcher.build_query(&profile, today, &outgoing, limit)?;
        if query.candidate_gender_id.is_none() {
            debug!("Profile {} seeks no gender, no candidates", profile.id);
            return Ok(Vec::new());
        }

        let scanned = self.profiles.query(&query).await?;
        let result = self.matcher.find_candidates(&query, scanned);

        info!(
            "Returning {} candidates for profile {} (from {} scanned, {} excluded)",
            result.candidates.len(),
            profile.id,
            result.total_scanned,
            query.exclude_profile_ids.len()
        );

        Ok(result.candidates)
    }

    async fn resolve_pair(&self, user_id: UserId, target_id: ProfileId) -> MatchResult<ProfileId> {
        let actor = self.get_profile(user_id).await?;
        ensure_distinct(actor.id, target_id)?;

        if self.profiles.get(target_id).await?.is_none() {
            return Err(MatchError::NotFound(format!("profile {}", target_id)));
        }

        Ok(actor.id)
    }

    /// Like a profile; reports whether the like completed a match
    pub async fn like(&self, user_id: UserId, target_id: ProfileId) -> MatchResult<LikeOutcome> {
        let actor_id = self.resolve_pair(user_id, target_id).await?;

        let edge = self.relations.upsert_edge(actor_id, target_id, InterestKind::Like).await?;
        let forward = InterestState::from_edge(Some(edge.kind));

        let reverse = if self.relations.has_edge(target_id, actor_id, InterestKind::Like).await? {
            InterestState::Likes
        } else {
            InterestState::None
        };

        let outcome = LikeOutcome {
            is_match: is_match(forward, reverse),
        };

        info!(
            "Profile {} liked profile {} (match: {})",
            actor_id, target_id, outcome.is_match
        );

        Ok(outcome)
    }

    /// Dislike a profile
    pub async fn dislike(&self, user_id: UserId, target_id: ProfileId) -> MatchResult<()> {
        let actor_id = self.resolve_pair(user_id, target_id).await?;

        self.relations.upsert_edge(actor_id, target_id, InterestKind::Dislike).await?;

        info!("Profile {} disliked profile {}", actor_id, target_id);
        Ok(())
    }

    /// Profiles that share a mutual like with the user
    pub async fn matches(&self, user_id: UserId) -> MatchResult<Vec<Profile>> {
        let profile = self.get_profile(user_id).await?;

        let outgoing = self.relations.edges_from(profile.id).await?;
        let incoming = self.relations.edges_to(profile.id).await?;
        let ids = mutual_likes(&outgoing, &incoming);

        let mut matched = self.profiles.get_many(&ids).await?;
        matched.sort_by_key(|p| p.id);

        debug!("Profile {} has {} matches", profile.id, matched.len());
        Ok(matched)
    }

    pub async fn list_photos(&self, user_id: UserId) -> MatchResult<Vec<Photo>> {
        let profile = self.get_profile(user_id).await?;
        Ok(self.photos.list(profile.id).await?)
    }

    /// Record a new photo for the user, replacing any previous one
    pub async fn replace_photo(&self, user_id: UserId, file_name: &str) -> MatchResult<Photo> {
        let profile = self.get_profile(user_id).await?;

        let file_path = photo_path(profile.id, file_name);
        let photo = self.photos.replace(profile.id, &file_path).await?;

        info!("Stored photo {} for profile {}", photo.file_path, profile.id);
        Ok(photo)
    }

    pub async fn list_genders(&self) -> MatchResult<Vec<Gender>> {
        Ok(self.reference.list_genders().await?)
    }

    pub async fn list_cities(&self) -> MatchResult<Vec<City>> {
        Ok(self.reference.list_cities().await?)
    }
}

/// Capacity of `photos.file_path`, in characters
pub const MAX_PHOTO_PATH_LEN: usize = 255;

/// Storage key for an uploaded photo: `photos/<profile id>/<unique>-<file name>`
///
/// Long file names are shortened, keeping their extension, so the key never
/// exceeds `MAX_PHOTO_PATH_LEN`.
pub fn photo_path(profile_id: ProfileId, file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("photo");

    let prefix = format!("photos/{}/{}-", profile_id, uuid::Uuid::new_v4().simple());
    let budget = MAX_PHOTO_PATH_LEN.saturating_sub(prefix.chars().count());

    format!("{}{}", prefix, shorten_file_name(base, budget))
}

fn shorten_file_name(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }

    let (stem, extension) = match name.rfind('.') {
        Some(dot) if dot > 0 && name[dot..].chars().count() < max_chars => name.split_at(dot),
        _ => (name, ""),
    };

    let stem_chars = max_chars - extension.chars().count();
    stem.chars().take(stem_chars).chain(extension.chars()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_path_strips_directories() {
        let path = photo_path(12, "../../etc/me.jpg");

        assert!(path.starts_with("photos/12/"));
        assert!(path.ends_with("-me.jpg"));
        assert!(!path.contains(".."));
    }

    #[test]
    fn test_photo_path_fallback_name() {
        assert!(photo_path(3, "dir/").ends_with("-photo"));
    }

    #[test]
    fn test_photo_path_fits_column_for_longest_valid_name() {
        use crate::models::UploadPhotoRequest;
        use validator::Validate;

        let req = UploadPhotoRequest {
            file_name: format!("{}.jpg", "a".repeat(251)),
        };
        assert!(req.validate().is_ok());

        let path = photo_path(1_234_567_890, &req.file_name);
        assert_eq!(path.chars().count(), MAX_PHOTO_PATH_LEN);
        assert!(path.starts_with("photos/1234567890/"));
        assert!(path.ends_with("aaa.jpg"));
    }

    #[test]
    fn test_shorten_file_name_counts_characters() {
        let name = format!("{}.png", "é".repeat(300));
        let short = shorten_file_name(&name, 20);

        assert_eq!(short.chars().count(), 20);
        assert!(short.ends_with(".png"));

        // No usable extension
        assert_eq!(shorten_file_name(&"b".repeat(30), 10), "b".repeat(10));
        assert_eq!(shorten_file_name("short.jpg", 10), "short.jpg");
    }
}
