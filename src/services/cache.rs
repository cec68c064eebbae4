use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::{City, CityId, Gender, GenderId};
use crate::services::store::{ReferenceData, StoreResult};

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Multi-tier cache manager
///
/// L1 is an in-process moka cache. L2 (Redis) is optional and shared across
/// instances; without it the manager behaves as a plain local cache.
pub struct CacheManager {
    redis: Option<Arc<tokio::sync::Mutex<ConnectionManager>>>,
    l1_cache: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl CacheManager {
    /// Create a cache manager backed by Redis
    pub async fn connect(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        Ok(Self {
            redis: Some(Arc::new(tokio::sync::Mutex::new(redis))),
            l1_cache: build_l1(l1_size, ttl_secs),
            ttl_secs,
        })
    }

    /// Create an in-process cache manager with no Redis tier
    pub fn local(l1_size: u64, ttl_secs: u64) -> Self {
        Self {
            redis: None,
            l1_cache: build_l1(l1_size, ttl_secs),
            ttl_secs,
        }
    }

    pub fn has_redis(&self) -> bool {
        self.redis.is_some()
    }

    /// Get a value from cache (L1 first, then L2)
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(bytes) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let value: Option<String> = redis::cmd("GET")
                .arg(key)
                .query_async(&mut *conn)
                .await?;
            drop(conn);

            if let Some(json) = value {
                tracing::trace!("L2 cache hit: {}", key);

                // Populate L1 cache
                self.l1_cache.insert(key.to_string(), json.as_bytes().to_vec()).await;

                return Ok(serde_json::from_str(&json)?);
            }
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Set a value in cache (both tiers)
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        self.l1_cache.insert(key.to_string(), json.as_bytes().to_vec()).await;

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let _: () = redis::cmd("SETEX")
                .arg(key)
                .arg(self.ttl_secs)
                .arg(json)
                .query_async(&mut *conn)
                .await?;
        }

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            l1_size: self.l1_cache.entry_count(),
            redis_enabled: self.has_redis(),
        }
    }
}

fn build_l1(l1_size: u64, ttl_secs: u64) -> moka::future::Cache<String, Vec<u8>> {
    moka::future::CacheBuilder::new(l1_size)
        .time_to_live(Duration::from_secs(ttl_secs))
        .build()
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub l1_size: u64,
    pub redis_enabled: bool,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for the gender table
    pub fn genders() -> String {
        "ref:genders".to_string()
    }

    /// Build a cache key for the city table
    pub fn cities() -> String {
        "ref:cities".to_string()
    }
}

/// Read-through cache in front of a `ReferenceData` port
///
/// Gender and city tables are immutable once seeded, so whole tables are
/// cached and point lookups are served from the cached list. Cache failures are
/// logged and fall through to the backing port.
pub struct CachedReferenceData {
    inner: Arc<dyn ReferenceData>,
    cache: Arc<CacheManager>,
}

impl CachedReferenceData {
    pub fn new(inner: Arc<dyn ReferenceData>, cache: Arc<CacheManager>) -> Self {
        Self { inner, cache }
    }

    async fn cached<T>(&self, key: &str) -> Option<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        match self.cache.get(key).await {
            Ok(value) => Some(value),
            Err(CacheError::CacheMiss(_)) => None,
            Err(e) => {
                tracing::warn!("Reference cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    async fn store<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.cache.set(key, value).await {
            tracing::warn!("Reference cache write failed for {}: {}", key, e);
        }
    }
}

#[async_trait]
impl ReferenceData for CachedReferenceData {
    async fn list_genders(&self) -> StoreResult<Vec<Gender>> {
        let key = CacheKey::genders();
        if let Some(genders) = self.cached(&key).await {
            return Ok(genders);
        }

        let genders = self.inner.list_genders().await?;
        self.store(&key, &genders).await;
        Ok(genders)
    }

    async fn get_gender(&self, id: GenderId) -> StoreResult<Option<Gender>> {
        Ok(self.list_genders().await?.into_iter().find(|gender| gender.id == id))
    }

    async fn list_cities(&self) -> StoreResult<Vec<City>> {
        let key = CacheKey::cities();
        if let Some(cities) = self.cached(&key).await {
            return Ok(cities);
        }

        let cities = self.inner.list_cities().await?;
        self.store(&key, &cities).await;
        Ok(cities)
    }

    async fn get_city(&self, id: CityId) -> StoreResult<Option<City>> {
        Ok(self.list_cities().await?.into_iter().find(|city| city.id == id))
    }
}
