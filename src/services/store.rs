use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    CandidateQuery, City, CityId, Gender, GenderId, InterestEdge, InterestKind, NewProfile, Photo,
    Profile, ProfileId, UserId,
};

/// Errors that can occur inside a store adapter
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Uniqueness conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Profile records, one per user
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, id: ProfileId) -> StoreResult<Option<Profile>>;

    async fn get_by_user(&self, user_id: UserId) -> StoreResult<Option<Profile>>;

    /// Fails with `StoreError::Conflict` when the user already owns a profile
    async fn create(&self, profile: NewProfile) -> StoreResult<Profile>;

    async fn update(&self, profile: &Profile) -> StoreResult<()>;

    /// Predicate scan; results may be a superset of the exact candidate set
    async fn query(&self, query: &CandidateQuery) -> StoreResult<Vec<Profile>>;

    async fn get_many(&self, ids: &[ProfileId]) -> StoreResult<Vec<Profile>>;
}

/// Directed like/dislike edges, keyed by ordered pair
#[async_trait]
pub trait RelationStore: Send + Sync {
    /// Atomic insert-or-overwrite of the `(from, to)` edge
    async fn upsert_edge(
        &self,
        from: ProfileId,
        to: ProfileId,
        kind: InterestKind,
    ) -> StoreResult<InterestEdge>;

    async fn has_edge(&self, from: ProfileId, to: ProfileId, kind: InterestKind) -> StoreResult<bool>;

    async fn edges_from(&self, from: ProfileId) -> StoreResult<Vec<InterestEdge>>;

    async fn edges_to(&self, to: ProfileId) -> StoreResult<Vec<InterestEdge>>;
}

/// Read-only gender and city lookup tables
#[async_trait]
pub trait ReferenceData: Send + Sync {
    /// Ordered by ascending id
    async fn list_genders(&self) -> StoreResult<Vec<Gender>>;

    async fn get_gender(&self, id: GenderId) -> StoreResult<Option<Gender>>;

    /// Ordered by ascending id
    async fn list_cities(&self) -> StoreResult<Vec<City>>;

    async fn get_city(&self, id: CityId) -> StoreResult<Option<City>>;
}

/// Photo metadata per profile
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Ordered by upload
    async fn list(&self, profile_id: ProfileId) -> StoreResult<Vec<Photo>>;

    /// Drop the profile's existing photos and record a new one
    async fn replace(&self, profile_id: ProfileId, file_path: &str) -> StoreResult<Photo>;
}
