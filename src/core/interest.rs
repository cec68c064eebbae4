use std::collections::HashSet;

use crate::error::{MatchError, MatchResult};
use crate::models::{InterestEdge, InterestKind, ProfileId};

/// State of one ordered pair (A, B)
///
/// The reverse pair (B, A) is tracked independently. Any action moves the pair
/// straight into the action's state; there is no undo back to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterestState {
    #[default]
    None,
    Likes,
    Dislikes,
}

impl InterestState {
    pub fn from_edge(kind: Option<InterestKind>) -> Self {
        match kind {
            Some(InterestKind::Like) => Self::Likes,
            Some(InterestKind::Dislike) => Self::Dislikes,
            None => Self::None,
        }
    }

    /// Later actions overwrite earlier ones
    pub fn apply(self, action: InterestKind) -> Self {
        Self::from_edge(Some(action))
    }

    /// Whether this pair takes the target out of future candidate lists
    pub fn is_decided(self, exclude_disliked: bool) -> bool {
        match self {
            Self::Likes => true,
            Self::Dislikes => exclude_disliked,
            Self::None => false,
        }
    }
}

/// A match is two likes pointing at each other
#[inline]
pub fn is_match(forward: InterestState, reverse: InterestState) -> bool {
    forward == InterestState::Likes && reverse == InterestState::Likes
}

/// Reject a profile acting on itself
pub fn ensure_distinct(actor: ProfileId, target: ProfileId) -> MatchResult<()> {
    if actor == target {
        return Err(MatchError::InvalidState(format!(
            "profile {} cannot like or dislike itself",
            actor
        )));
    }
    Ok(())
}

/// Targets of the actor's outgoing edges that must not be offered again
///
/// Returned sorted and deduplicated, ready for `CandidateQuery::exclude_profile_ids`.
pub fn decided_targets(outgoing: &[InterestEdge], exclude_disliked: bool) -> Vec<ProfileId> {
    let mut ids: Vec<ProfileId> = outgoing
        .iter()
        .filter(|edge| InterestState::from_edge(Some(edge.kind)).is_decided(exclude_disliked))
        .map(|edge| edge.to)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Profiles the actor likes that like the actor back, ascending
pub fn mutual_likes(outgoing: &[InterestEdge], incoming: &[InterestEdge]) -> Vec<ProfileId> {
    let likers: HashSet<ProfileId> = incoming
        .iter()
        .filter(|edge| edge.kind == InterestKind::Like)
        .map(|edge| edge.from)
        .collect();

    let mut ids: Vec<ProfileId> = outgoing
        .iter()
        .filter(|edge| edge.kind == InterestKind::Like && likers.contains(&edge.to))
        .map(|edge| edge.to)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn edge(from: ProfileId, to: ProfileId, kind: InterestKind) -> InterestEdge {
        InterestEdge {
            from,
            to,
            kind,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_actions_overwrite() {
        let state = InterestState::None.apply(InterestKind::Like);
        assert_eq!(state, InterestState::Likes);

        let state = state.apply(InterestKind::Dislike);
        assert_eq!(state, InterestState::Dislikes);

        // Repeating an action leaves the state unchanged
        assert_eq!(state.apply(InterestKind::Dislike), InterestState::Dislikes);
    }

    #[test]
    fn test_match_needs_both_likes() {
        assert!(is_match(InterestState::Likes, InterestState::Likes));
        assert!(!is_match(InterestState::Likes, InterestState::None));
        assert!(!is_match(InterestState::Likes, InterestState::Dislikes));
        assert!(!is_match(InterestState::Dislikes, InterestState::Likes));
    }

    #[test]
    fn test_self_action_rejected() {
        assert!(matches!(ensure_distinct(7, 7), Err(MatchError::InvalidState(_))));
        assert!(ensure_distinct(7, 8).is_ok());
    }

    #[test]
    fn test_decided_targets_policy() {
        let outgoing = vec![
            edge(1, 5, InterestKind::Like),
            edge(1, 3, InterestKind::Dislike),
            edge(1, 4, InterestKind::Like),
        ];

        assert_eq!(decided_targets(&outgoing, true), vec![3, 4, 5]);
        assert_eq!(decided_targets(&outgoing, false), vec![4, 5]);
    }

    #[test]
    fn test_mutual_likes() {
        let outgoing = vec![
            edge(1, 2, InterestKind::Like),
            edge(1, 3, InterestKind::Like),
            edge(1, 4, InterestKind::Dislike),
        ];
        let incoming = vec![
            edge(2, 1, InterestKind::Like),
            edge(3, 1, InterestKind::Dislike),
            edge(4, 1, InterestKind::Like),
        ];

        assert_eq!(mutual_likes(&outgoing, &incoming), vec![2]);
    }
}
