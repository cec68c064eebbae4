use chrono::NaiveDate;

use crate::core::{
    age::{compute_age_window, current_age},
    filters::matches_query_constraints,
    interest::decided_targets,
};
use crate::error::MatchResult;
use crate::models::{CandidateQuery, InterestEdge, Profile};

/// Result of the candidate discovery process
#[derive(Debug)]
pub struct CandidateResult {
    pub candidates: Vec<Profile>,
    pub total_scanned: usize,
}

/// Candidate discovery orchestrator
///
/// # Pipeline Stages
/// 1. Derive a `CandidateQuery` from the requester (age window, orientation, city,
///    already decided targets)
/// 2. Let the store pre-filter with that query
/// 3. Re-apply the full eligibility predicate
/// 4. Order by ascending profile id and cap at the limit
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    exclude_disliked: bool,
}

impl Matcher {
    pub fn new(exclude_disliked: bool) -> Self {
        Self { exclude_disliked }
    }

    pub fn exclude_disliked(&self) -> bool {
        self.exclude_disliked
    }

    /// Build the candidate query for `profile`
    ///
    /// # Arguments
    /// * `profile` - The requesting profile
    /// * `today` - Reference date for ages and the birth-date window
    /// * `outgoing` - The requester's existing like/dislike edges
    /// * `limit` - Maximum number of candidates to return, if any
    ///
    /// # Errors
    /// `InvalidState` when the requester's age window is inverted
    pub fn build_query(
        &self,
        profile: &Profile,
        today: NaiveDate,
        outgoing: &[InterestEdge],
        limit: Option<usize>,
    ) -> MatchResult<CandidateQuery> {
        let birth_window = compute_age_window(profile, today)?;

        Ok(CandidateQuery {
            requester_id: profile.id,
            candidate_gender_id: profile.target_gender_id,
            candidate_target_gender_id: profile.gender_id,
            city_id: profile.city_id,
            birth_window,
            requester_age: current_age(profile.birth_date, today),
            exclude_profile_ids: decided_targets(outgoing, self.exclude_disliked),
            limit,
        })
    }

    /// Filter and order store results against `query`
    pub fn find_candidates(&self, query: &CandidateQuery, scanned: Vec<Profile>) -> CandidateResult {
        let total_scanned = scanned.len();

        let mut candidates: Vec<Profile> = scanned
            .into_iter()
            .filter(|candidate| matches_query_constraints(candidate, query))
            .collect();

        candidates.sort_by_key(|candidate| candidate.id);
        candidates.dedup_by_key(|candidate| candidate.id);

        if let Some(limit) = query.limit {
            candidates.truncate(limit);
        }

        CandidateResult {
            candidates,
            total_scanned,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(true)
    }
}
