use crate::core::distance::{calculate_bounding_box, is_within_bounding_box, profile_distance};
use crate::models::{DecisionHistory, UserProfile};

/// Why a candidate was kept out of a feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    SelfCandidate,
    NotMatchable,
    OutsideRadius,
    AlreadyDecided,
    AlreadyMatched,
}

/// Check if a candidate may appear in the user's feed
#[inline]
pub fn is_eligible(user: &UserProfile, candidate: &UserProfile, history: &DecisionHistory) -> bool {
    exclusion_reason(user, candidate, history).is_none()
}

/// First rule that keeps `candidate` out of `user`'s feed, if any
///
/// Checks run cheapest first: identity, profile shape, a bounding-box
/// pre-check, the exact great-circle radius test, then the decision history.
pub fn exclusion_reason(
    user: &UserProfile,
    candidate: &UserProfile,
    history: &DecisionHistory,
) -> Option<Exclusion> {
    if candidate.user_id == user.user_id {
        return Some(Exclusion::SelfCandidate);
    }

    if !candidate.is_matchable() {
        return Some(Exclusion::NotMatchable);
    }

    if !is_within_radius(user, candidate) {
        return Some(Exclusion::OutsideRadius);
    }

    if history.is_matched(&user.user_id, &candidate.user_id) {
        return Some(Exclusion::AlreadyMatched);
    }

    if history
        .current_decision(&user.user_id, &candidate.user_id)
        .is_some()
    {
        return Some(Exclusion::AlreadyDecided);
    }

    None
}

/// Check if a candidate lies within the user's own search radius
#[inline]
pub fn is_within_radius(user: &UserProfile, candidate: &UserProfile) -> bool {
    let radius_km = user.search_radius_km as f64;

    // Stage 1: geospatial pre-filter, only trusted when the box does not wrap
    let bbox = calculate_bounding_box(user.latitude, user.longitude, radius_km);
    if bbox.is_simple() && !is_within_bounding_box(candidate.latitude, candidate.longitude, &bbox) {
        return false;
    }

    // Stage 2: exact distance; NaN coordinates never pass
    profile_distance(user, candidate) <= radius_km
}
