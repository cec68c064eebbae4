//! Lovocco Match - candidate matching and mutual-interest service for the Lovocco dating app
//!
//! The core decides which profiles a user may see as candidates and tracks the
//! like/dislike edges between profiles, reporting a match when two likes meet.
//! Storage sits behind the traits in [`services::store`].

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, ProfileDefaults, compute_age_window, current_age};
pub use crate::error::{MatchError, MatchResult};
pub use crate::models::{Profile, RegistrationPayload, ProfileUpdate, LikeOutcome, InterestKind};
pub use crate::services::{MatchingService, MemoryStore};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_library_exports() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let birth = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();
        assert_eq!(current_age(birth, today), 24);
    }
}
