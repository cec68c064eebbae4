// Core algorithm exports
pub mod age;
pub mod filters;
pub mod interest;
pub mod lifecycle;
pub mod matcher;

pub use age::{compute_age_window, current_age, years_before};
pub use filters::{matches_age_constraints, matches_orientation, matches_query_constraints};
pub use interest::{decided_targets, ensure_distinct, is_match, mutual_likes, InterestState};
pub use lifecycle::{apply_update, default_target_gender, new_profile, registration_age_window, ProfileDefaults};
pub use matcher::{CandidateResult, Matcher};
