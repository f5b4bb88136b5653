use crate::core::{CandidateRanker, SwipeEngine};
use crate::error::MatchError;
use crate::models::{
    CompatibilityScore, DecisionOutcome, FeedPage, MatchingConfig, PairState, UserProfile,
};
use crate::services::{DecisionHistorySource, DecisionLedger, ProfileSource};

/// Entry point the serving layer talks to
///
/// Wires the ranker and the swipe engine to the data layer's lookups. Profiles
/// and decision history are fetched fresh on every call; nothing is cached
/// across calls.
pub struct DiscoveryEngine<P, H, L> {
    ranker: CandidateRanker,
    swipes: SwipeEngine<L>,
    profiles: P,
    history: H,
}

impl<P, H, L> DiscoveryEngine<P, H, L>
where
    P: ProfileSource,
    H: DecisionHistorySource,
    L: DecisionLedger,
{
    /// Build an engine, failing fast on an invalid configuration
    pub fn new(config: MatchingConfig, profiles: P, history: H, ledger: L) -> Result<Self, MatchError> {
        let ranker = CandidateRanker::new(config)?;
        tracing::info!("Discovery engine initialized with weights: {:?}", ranker.config().weights());

        Ok(Self {
            ranker,
            swipes: SwipeEngine::new(ledger),
            profiles,
            history,
        })
    }

    pub fn config(&self) -> &MatchingConfig {
        self.ranker.config()
    }

    pub fn ledger(&self) -> &L {
        self.swipes.ledger()
    }

    /// Rank `pool` for `user_id`; `page_size` defaults to the configured one
    pub fn rank(
        &self,
        user_id: &str,
        pool: &[UserProfile],
        page: u32,
        page_size: Option<usize>,
    ) -> Result<FeedPage, MatchError> {
        let user = self.requester(user_id)?;
        let history = self.history.history_for(user_id)?;
        let page_size = page_size.unwrap_or(self.config().page_size);

        let feed = self.ranker.rank_page(&user, pool, &history, page, page_size)?;

        tracing::info!(
            "Returning {} candidates for user {} (page {}, {} eligible of {})",
            feed.candidates.len(),
            user_id,
            page,
            feed.total_eligible,
            pool.len()
        );

        Ok(feed)
    }

    fn requester(&self, user_id: &str) -> Result<UserProfile, MatchError> {
        let mut user = self.profiles.profile(user_id)?;
        user.search_radius_km = self.config().effective_radius(user.search_radius_km);
        Ok(user)
    }

    /// Explain the compatibility between two users
    pub fn score(&self, user_id: &str, candidate_id: &str) -> Result<CompatibilityScore, MatchError> {
        let user = self.requester(user_id)?;
        let candidate = self.profiles.profile(candidate_id)?;
        self.ranker.score(&user, &candidate)
    }

    /// Record a swipe; both users must exist
    pub fn record_decision(
        &self,
        actor_id: &str,
        target_id: &str,
        liked: bool,
    ) -> Result<DecisionOutcome, MatchError> {
        self.profiles.profile(actor_id)?;
        self.profiles.profile(target_id)?;

        let outcome = self.swipes.record_decision(actor_id, target_id, liked)?;
        if let Some(record) = outcome.match_record() {
            tracing::info!(
                "Decision {} -> {} completed match {}",
                actor_id,
                target_id,
                record.match_id
            );
        }

        Ok(outcome)
    }

    pub fn undo_decision(&self, actor_id: &str, target_id: &str) -> Result<bool, MatchError> {
        self.swipes.undo_decision(actor_id, target_id)
    }

    pub fn pair_state(&self, a: &str, b: &str) -> Result<PairState, MatchError> {
        self.swipes.pair_state(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SkillLevel;
    use crate::services::{InMemoryLedger, InMemoryProfiles};
    use std::collections::{BTreeMap, HashSet};
    use std::sync::Arc;

    fn profile(id: &str, lat: f64) -> UserProfile {
        UserProfile {
            user_id: id.to_string(),
            sports: BTreeMap::from([("padel".to_string(), SkillLevel::Advanced)]),
            availability: HashSet::new(),
            latitude: lat,
            longitude: 2.1734,
            search_radius_km: 10,
        }
    }

    fn engine() -> DiscoveryEngine<InMemoryProfiles, Arc<InMemoryLedger>, Arc<InMemoryLedger>> {
        let profiles = InMemoryProfiles::new(vec![
            profile("ana", 41.3851),
            profile("ben", 41.3900),
            profile("cai", 41.3950),
        ]);
        let ledger = Arc::new(InMemoryLedger::new());
        DiscoveryEngine::new(MatchingConfig::default(), profiles, Arc::clone(&ledger), ledger).unwrap()
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = MatchingConfig {
            weight_distance_proximity: 0.9,
            ..MatchingConfig::default()
        };
        let ledger = Arc::new(InMemoryLedger::new());
        let result = DiscoveryEngine::new(
            config,
            InMemoryProfiles::default(),
            Arc::clone(&ledger),
            ledger,
        );
        assert!(matches!(result, Err(MatchError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_rank_hides_decided_candidates() {
        let engine = engine();
        let pool = vec![profile("ben", 41.3900), profile("cai", 41.3950)];

        let feed = engine.rank("ana", &pool, 1, None).unwrap();
        assert_eq!(feed.candidates.len(), 2);
        assert_eq!(feed.page_size, 20);

        engine.record_decision("ana", "ben", false).unwrap();
        let feed = engine.rank("ana", &pool, 1, None).unwrap();
        assert_eq!(feed.candidates.len(), 1);
        assert_eq!(feed.candidates[0].candidate_id, "cai");
    }

    #[test]
    fn test_matched_candidates_hidden_for_both() {
        let engine = engine();
        engine.record_decision("ana", "ben", true).unwrap();
        let outcome = engine.record_decision("ben", "ana", true).unwrap();
        assert!(outcome.match_record().is_some());

        let feed = engine.rank("ben", &[profile("ana", 41.3851)], 1, None).unwrap();
        assert!(feed.candidates.is_empty());
    }

    #[test]
    fn test_unknown_profiles() {
        let engine = engine();

        assert_eq!(
            engine.rank("nobody", &[], 1, None).unwrap_err(),
            MatchError::ProfileNotFound("nobody".to_string())
        );
        assert_eq!(
            engine.record_decision("ana", "ghost", true).unwrap_err(),
            MatchError::ProfileNotFound("ghost".to_string())
        );
        assert_eq!(engine.ledger().match_count().unwrap(), 0);
    }

    #[test]
    fn test_unset_radius_uses_default() {
        let mut near = profile("ana", 41.3851);
        near.search_radius_km = 0;
        let ledger = Arc::new(InMemoryLedger::new());
        let engine = DiscoveryEngine::new(
            MatchingConfig::default(),
            InMemoryProfiles::new(vec![near, profile("ben", 41.3900)]),
            Arc::clone(&ledger),
            ledger,
        )
        .unwrap();

        // ~15km north, outside the 10km default
        let pool = vec![profile("ben", 41.3900), profile("far", 41.52)];
        let feed = engine.rank("ana", &pool, 1, None).unwrap();
        let ids: Vec<&str> = feed.candidates.iter().map(|c| c.candidate_id.as_str()).collect();
        assert_eq!(ids, vec!["ben"]);
    }

    #[test]
    fn test_score_explains_pair() {
        let engine = engine();
        let score = engine.score("ana", "ben").unwrap();

        assert_eq!(score.candidate_id, "ben");
        assert_eq!(score.level_score, 1.0);
        assert_eq!(score.availability_score, 0.0);
        assert_eq!(score.shared_sports, vec!["padel"]);
    }
}
