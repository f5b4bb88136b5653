use crate::core::distance::profile_distance;
use crate::error::MatchError;
use crate::models::{CompatibilityScore, MatchingConfig, SkillLevel, UserProfile};
use validator::Validate;

/// Score a candidate against the requesting user
///
/// Scoring formula:
/// composite = (
///     level_score * w_level +           # shared sports at a similar level
///     availability_score * w_avail +    # share of the user's slots the candidate also has
///     distance_score * w_distance       # closer within the user's radius = higher
/// )
///
/// `config` is assumed validated. Both profiles must carry at least one sport.
pub fn calculate_compatibility(
    user: &UserProfile,
    candidate: &UserProfile,
    config: &MatchingConfig,
) -> Result<CompatibilityScore, MatchError> {
    ensure_has_sports(user)?;
    ensure_has_sports(candidate)?;

    let (level_score, shared_sports) =
        calculate_level_score(user, candidate, config.max_level_difference);
    let availability_score = calculate_availability_score(user, candidate);

    let distance_km = profile_distance(user, candidate);
    let distance_score = calculate_distance_score(distance_km, user.search_radius_km);

    let weights = config.weights();
    let composite_score = (level_score * weights.level_similarity
        + availability_score * weights.availability_overlap
        + distance_score * weights.distance_proximity)
        .clamp(0.0, 1.0);

    Ok(CompatibilityScore {
        candidate_id: candidate.user_id.clone(),
        level_score,
        availability_score,
        distance_score,
        composite_score,
        distance_km,
        shared_sports,
    })
}

/// Check that a requesting user's profile can drive a feed
///
/// Beyond having sports, the user's own radius must sit inside the configured
/// bounds and the coordinates must be valid.
pub fn validate_requester(user: &UserProfile, config: &MatchingConfig) -> Result<(), MatchError> {
    user.validate()
        .map_err(|errors| MatchError::invalid_profile(&user.user_id, errors.to_string()))?;
    ensure_has_sports(user)?;

    if !config.accepts_radius(user.search_radius_km) {
        return Err(MatchError::invalid_profile(
            &user.user_id,
            format!(
                "search radius {}km outside [{}, {}]",
                user.search_radius_km, config.min_radius_km, config.max_radius_km
            ),
        ));
    }

    Ok(())
}

fn ensure_has_sports(profile: &UserProfile) -> Result<(), MatchError> {
    if profile.is_matchable() {
        Ok(())
    } else {
        Err(MatchError::invalid_profile(&profile.user_id, "sports must not be empty"))
    }
}

/// Calculate level similarity (0-1) over the sports both users play
///
/// A shared sport whose ordinal gap exceeds `max_level_difference` contributes
/// nothing at all. Returns the shared sport ids in sorted order.
pub fn calculate_level_score(
    user: &UserProfile,
    candidate: &UserProfile,
    max_level_difference: u8,
) -> (f64, Vec<String>) {
    let mut total = 0.0;
    let mut shared_sports = Vec::new();

    for (sport, level) in &user.sports {
        if let Some(other) = candidate.sports.get(sport) {
            shared_sports.push(sport.clone());
            total += sport_level_similarity(*level, *other, max_level_difference);
        }
    }

    if shared_sports.is_empty() {
        return (0.0, shared_sports);
    }

    (total / shared_sports.len() as f64, shared_sports)
}

#[inline]
fn sport_level_similarity(a: SkillLevel, b: SkillLevel, max_level_difference: u8) -> f64 {
    let diff = a.ordinal().abs_diff(b.ordinal());
    if diff > max_level_difference {
        return 0.0;
    }

    1.0 - (diff as f64 / SkillLevel::MAX_ORDINAL as f64).min(1.0)
}

/// Calculate availability overlap (0-1)
/// Fraction of the user's own slots the candidate can also meet
#[inline]
pub fn calculate_availability_score(user: &UserProfile, candidate: &UserProfile) -> f64 {
    if user.availability.is_empty() {
        return 0.0;
    }

    let shared = user
        .availability
        .iter()
        .filter(|slot| candidate.availability.contains(slot))
        .count();

    shared as f64 / user.availability.len() as f64
}

/// Calculate distance score (0-1)
/// Linear falloff from 1 at the user's location to 0 at the search radius
#[inline]
pub fn calculate_distance_score(distance_km: f64, search_radius_km: u16) -> f64 {
    let radius = search_radius_km as f64;
    if radius <= 0.0 {
        return 0.0;
    }

    (1.0 - distance_km / radius).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AvailabilitySlot, TimeSlot};
    use chrono::Weekday;
    use std::collections::{BTreeMap, HashSet};

    fn create_test_profile(id: &str, sports: &[(&str, SkillLevel)], lat: f64) -> UserProfile {
        UserProfile {
            user_id: id.to_string(),
            sports: sports
                .iter()
                .map(|(sport, level)| (sport.to_string(), *level))
                .collect::<BTreeMap<_, _>>(),
            availability: HashSet::from([AvailabilitySlot::new(Weekday::Mon, TimeSlot::Evening)]),
            latitude: lat,
            longitude: 13.405,
            search_radius_km: 10,
        }
    }

    #[test]
    fn test_level_score_within_difference() {
        let user = create_test_profile("u", &[("soccer", SkillLevel::Intermediate)], 52.52);
        let candidate = create_test_profile("c", &[("soccer", SkillLevel::Advanced)], 52.52);

        let (score, shared) = calculate_level_score(&user, &candidate, 1);
        assert!((score - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(shared, vec!["soccer"]);
    }

    #[test]
    fn test_level_score_hard_penalty() {
        let user = create_test_profile("u", &[("soccer", SkillLevel::Beginner)], 52.52);
        let candidate = create_test_profile("c", &[("soccer", SkillLevel::Advanced)], 52.52);

        let (score, shared) = calculate_level_score(&user, &candidate, 1);
        assert_eq!(score, 0.0);
        assert_eq!(shared.len(), 1);

        // A looser limit lets the partial value through
        let (score, _) = calculate_level_score(&user, &candidate, 2);
        assert!((score - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_level_score_averages_shared_sports() {
        let user = create_test_profile(
            "u",
            &[("soccer", SkillLevel::Expert), ("tennis", SkillLevel::Beginner), ("golf", SkillLevel::Expert)],
            52.52,
        );
        let candidate = create_test_profile(
            "c",
            &[("soccer", SkillLevel::Expert), ("tennis", SkillLevel::Expert)],
            52.52,
        );

        // soccer = 1.0, tennis = 0 (gap 3), golf not shared
        let (score, shared) = calculate_level_score(&user, &candidate, 1);
        assert!((score - 0.5).abs() < 1e-9);
        assert_eq!(shared, vec!["soccer", "tennis"]);
    }

    #[test]
    fn test_no_shared_sports_scores_zero() {
        let user = create_test_profile("u", &[("soccer", SkillLevel::Expert)], 52.52);
        let candidate = create_test_profile("c", &[("tennis", SkillLevel::Expert)], 52.52);

        let (score, shared) = calculate_level_score(&user, &candidate, 1);
        assert_eq!(score, 0.0);
        assert!(shared.is_empty());
    }

    #[test]
    fn test_availability_score() {
        let mut user = create_test_profile("u", &[("soccer", SkillLevel::Expert)], 52.52);
        let mut candidate = create_test_profile("c", &[("soccer", SkillLevel::Expert)], 52.52);
        user.availability.insert(AvailabilitySlot::new(Weekday::Sat, TimeSlot::Morning));

        assert!((calculate_availability_score(&user, &candidate) - 0.5).abs() < 1e-9);

        candidate.availability.insert(AvailabilitySlot::new(Weekday::Sat, TimeSlot::Morning));
        candidate.availability.insert(AvailabilitySlot::new(Weekday::Sun, TimeSlot::Night));
        assert_eq!(calculate_availability_score(&user, &candidate), 1.0);

        user.availability.clear();
        assert_eq!(calculate_availability_score(&user, &candidate), 0.0);
    }

    #[test]
    fn test_distance_score() {
        assert_eq!(calculate_distance_score(0.0, 10), 1.0);
        assert!((calculate_distance_score(4.0, 10) - 0.6).abs() < 1e-9);
        assert_eq!(calculate_distance_score(10.0, 10), 0.0);
        assert_eq!(calculate_distance_score(25.0, 10), 0.0);
    }

    #[test]
    fn test_composite_in_unit_range() {
        let config = MatchingConfig::default();
        let user = create_test_profile("u", &[("soccer", SkillLevel::Intermediate)], 52.52);
        let candidate = create_test_profile("c", &[("soccer", SkillLevel::Intermediate)], 52.52);

        let score = calculate_compatibility(&user, &candidate, &config).unwrap();
        assert!((score.composite_score - 1.0).abs() < 1e-9);
        assert!(score.composite_score <= 1.0);
    }

    #[test]
    fn test_empty_sports_is_invalid() {
        let config = MatchingConfig::default();
        let user = create_test_profile("u", &[("soccer", SkillLevel::Intermediate)], 52.52);
        let candidate = create_test_profile("c", &[], 52.52);

        let err = calculate_compatibility(&user, &candidate, &config).unwrap_err();
        assert!(matches!(err, MatchError::InvalidProfile { ref user_id, .. } if user_id == "c"));
    }

    #[test]
    fn test_validate_requester_radius_bounds() {
        let config = MatchingConfig::default();
        let mut user = create_test_profile("u", &[("soccer", SkillLevel::Intermediate)], 52.52);
        assert!(validate_requester(&user, &config).is_ok());

        user.search_radius_km = 2;
        assert!(validate_requester(&user, &config).is_err());

        user.search_radius_km = 10;
        user.latitude = 123.0;
        assert!(validate_requester(&user, &config).is_err());
    }
}
