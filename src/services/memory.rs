use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::core::filters::matches_query_constraints;
use crate::models::{
    CandidateQuery, City, CityId, Gender, GenderId, InterestEdge, InterestKind, NewProfile, Photo,
    Profile, ProfileId, UserId,
};
use crate::services::store::{
    PhotoStore, ProfileStore, ReferenceData, RelationStore, StoreError, StoreResult,
};

#[derive(Debug, Default)]
struct MemoryState {
    profiles: BTreeMap<ProfileId, Profile>,
    profile_by_user: HashMap<UserId, ProfileId>,
    edges: BTreeMap<(ProfileId, ProfileId), InterestEdge>,
    genders: BTreeMap<GenderId, Gender>,
    cities: BTreeMap<CityId, City>,
    photos: BTreeMap<ProfileId, Vec<Photo>>,
    next_profile_id: ProfileId,
    next_photo_id: i64,
}

/// In-process store backing every port
///
/// A single lock guards all tables, so check-then-insert and edge upserts are
/// atomic with respect to each other.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with seeded reference data
    pub fn with_reference(genders: Vec<Gender>, cities: Vec<City>) -> Self {
        let state = MemoryState {
            genders: genders.into_iter().map(|g| (g.id, g)).collect(),
            cities: cities.into_iter().map(|c| (c.id, c)).collect(),
            ..MemoryState::default()
        };

        Self {
            state: RwLock::new(state),
        }
    }

    pub async fn profile_count(&self) -> usize {
        self.state.read().await.profiles.len()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get(&self, id: ProfileId) -> StoreResult<Option<Profile>> {
        Ok(self.state.read().await.profiles.get(&id).cloned())
    }

    async fn get_by_user(&self, user_id: UserId) -> StoreResult<Option<Profile>> {
        let state = self.state.read().await;
        Ok(state
            .profile_by_user
            .get(&user_id)
            .and_then(|id| state.profiles.get(id))
            .cloned())
    }

    async fn create(&self, profile: NewProfile) -> StoreResult<Profile> {
        let mut state = self.state.write().await;

        if state.profile_by_user.contains_key(&profile.user_id) {
            return Err(StoreError::Conflict(format!(
                "user {} already has a profile",
                profile.user_id
            )));
        }

        state.next_profile_id += 1;
        let profile = profile.with_id(state.next_profile_id);
        state.profile_by_user.insert(profile.user_id, profile.id);
        state.profiles.insert(profile.id, profile.clone());

        Ok(profile)
    }

    async fn update(&self, profile: &Profile) -> StoreResult<()> {
        let mut state = self.state.write().await;

        match state.profiles.get_mut(&profile.id) {
            Some(existing) => {
                // The owning user never changes
                let user_id = existing.user_id;
                *existing = profile.clone();
                existing.user_id = user_id;
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("profile {}", profile.id))),
        }
    }

    async fn query(&self, query: &CandidateQuery) -> StoreResult<Vec<Profile>> {
        let state = self.state.read().await;

        let matches = state
            .profiles
            .values()
            .filter(|profile| matches_query_constraints(profile, query))
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(matches)
    }

    async fn get_many(&self, ids: &[ProfileId]) -> StoreResult<Vec<Profile>> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.profiles.get(id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RelationStore for MemoryStore {
    async fn upsert_edge(
        &self,
        from: ProfileId,
        to: ProfileId,
        kind: InterestKind,
    ) -> StoreResult<InterestEdge> {
        let edge = InterestEdge {
            from,
            to,
            kind,
            updated_at: Utc::now(),
        };

        self.state.write().await.edges.insert((from, to), edge.clone());
        Ok(edge)
    }

    async fn has_edge(&self, from: ProfileId, to: ProfileId, kind: InterestKind) -> StoreResult<bool> {
        Ok(self
            .state
            .read()
            .await
            .edges
            .get(&(from, to))
            .is_some_and(|edge| edge.kind == kind))
    }

    async fn edges_from(&self, from: ProfileId) -> StoreResult<Vec<InterestEdge>> {
        Ok(self
            .state
            .read()
            .await
            .edges
            .range((from, ProfileId::MIN)..=(from, ProfileId::MAX))
            .map(|(_, edge)| edge.clone())
            .collect())
    }

    async fn edges_to(&self, to: ProfileId) -> StoreResult<Vec<InterestEdge>> {
        Ok(self
            .state
            .read()
            .await
            .edges
            .values()
            .filter(|edge| edge.to == to)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReferenceData for MemoryStore {
    async fn list_genders(&self) -> StoreResult<Vec<Gender>> {
        Ok(self.state.read().await.genders.values().cloned().collect())
    }

    async fn get_gender(&self, id: GenderId) -> StoreResult<Option<Gender>> {
        Ok(self.state.read().await.genders.get(&id).cloned())
    }

    async fn list_cities(&self) -> StoreResult<Vec<City>> {
        Ok(self.state.read().await.cities.values().cloned().collect())
    }

    async fn get_city(&self, id: CityId) -> StoreResult<Option<City>> {
        Ok(self.state.read().await.cities.get(&id).cloned())
    }
}

#[async_trait]
impl PhotoStore for MemoryStore {
    async fn list(&self, profile_id: ProfileId) -> StoreResult<Vec<Photo>> {
        Ok(self
            .state
            .read()
            .await
            .photos
            .get(&profile_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace(&self, profile_id: ProfileId, file_path: &str) -> StoreResult<Photo> {
        let mut state = self.state.write().await;

        state.next_photo_id += 1;
        let photo = Photo {
            id: state.next_photo_id,
            profile_id,
            file_path: file_path.to_string(),
            uploaded_at: Utc::now(),
        };
        state.photos.insert(profile_id, vec![photo.clone()]);

        Ok(photo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_profile(user_id: UserId) -> NewProfile {
        NewProfile {
            user_id,
            name: format!("User {}", user_id),
            birth_date: NaiveDate::from_ymd_opt(1994, 6, 15).unwrap(),
            gender_id: 1,
            city_id: 1,
            description: None,
            target_gender_id: Some(2),
            age_min: 18,
            age_max: 60,
            active: true,
        }
    }

    #[test]
    fn test_create_enforces_unique_user() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();

            let first = store.create(new_profile(42)).await.unwrap();
            assert_eq!(first.id, 1);

            let second = store.create(new_profile(42)).await;
            assert!(matches!(second, Err(StoreError::Conflict(_))));
            assert_eq!(store.profile_count().await, 1);
        });
    }

    #[test]
    fn test_upsert_overwrites_pair() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();

            store.upsert_edge(1, 2, InterestKind::Like).await.unwrap();
            store.upsert_edge(1, 2, InterestKind::Dislike).await.unwrap();
            store.upsert_edge(2, 1, InterestKind::Like).await.unwrap();

            let outgoing = store.edges_from(1).await.unwrap();
            assert_eq!(outgoing.len(), 1);
            assert_eq!(outgoing[0].kind, InterestKind::Dislike);
            assert!(!store.has_edge(1, 2, InterestKind::Like).await.unwrap());
            assert!(store.has_edge(2, 1, InterestKind::Like).await.unwrap());
            assert_eq!(store.edges_to(1).await.unwrap().len(), 1);
        });
    }

    #[test]
    fn test_photo_replaced_on_upload() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();

            store.replace(1, "photos/1/a.jpg").await.unwrap();
            let latest = store.replace(1, "photos/1/b.jpg").await.unwrap();

            let photos = store.list(1).await.unwrap();
            assert_eq!(photos, vec![latest]);
        });
    }

    #[test]
    fn test_update_missing_profile() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let profile = new_profile(1).with_id(99);

            assert!(matches!(store.update(&profile).await, Err(StoreError::NotFound(_))));
        });
    }
}
