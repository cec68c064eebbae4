// Service exports
pub mod cache;
pub mod matching;
pub mod memory;
pub mod postgres;
pub mod store;

pub use cache::{CacheError, CacheKey, CacheManager, CacheStats, CachedReferenceData};
pub use matching::MatchingService;
pub use memory::MemoryStore;
pub use postgres::{EdgeKind, PostgresClient};
pub use store::{PhotoStore, ProfileStore, ReferenceData, RelationStore, StoreError, StoreResult};
