use crate::models::{CandidateQuery, Profile};

/// Mutual orientation check
///
/// The candidate must have the gender the requester seeks, and seek the
/// requester's gender in return.
#[inline]
pub fn matches_orientation(candidate: &Profile, query: &CandidateQuery) -> bool {
    match query.candidate_gender_id {
        Some(gender_id) => {
            candidate.gender_id == gender_id
                && candidate.target_gender_id == Some(query.candidate_target_gender_id)
        }
        None => false,
    }
}

/// Two-sided age check
///
/// The candidate's birth date must fall inside the requester's window, and the
/// requester's age inside the candidate's `[age_min, age_max]`.
#[inline]
pub fn matches_age_constraints(candidate: &Profile, query: &CandidateQuery) -> bool {
    query.birth_window.contains(candidate.birth_date)
        && candidate.age_min <= query.requester_age
        && query.requester_age <= candidate.age_max
}

/// Full eligibility predicate for one candidate
///
/// Stores may pre-filter with a subset of these rules; the matcher always
/// re-applies the whole predicate.
#[inline]
pub fn matches_query_constraints(candidate: &Profile, query: &CandidateQuery) -> bool {
    if !candidate.active {
        return false;
    }

    // Never offer the requester to themselves
    if candidate.id == query.requester_id {
        return false;
    }

    if candidate.city_id != query.city_id {
        return false;
    }

    if !matches_orientation(candidate, query) {
        return false;
    }

    if !matches_age_constraints(candidate, query) {
        return false;
    }

    // Already liked (or disliked, depending on policy)
    !query.is_excluded(candidate.id)
}
