use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::MatchError;
use crate::models::{DecisionHistory, Match, PairKey, SwipeDecision, UserProfile};
use crate::services::sources::{DecisionHistorySource, DecisionLedger, ProfileSource};

fn poisoned(what: &str) -> MatchError {
    MatchError::Storage(format!("{} lock poisoned", what))
}

/// Profile lookup backed by a map, for tests and the CLI
#[derive(Debug, Default)]
pub struct InMemoryProfiles {
    profiles: HashMap<String, UserProfile>,
}

impl InMemoryProfiles {
    pub fn new(profiles: impl IntoIterator<Item = UserProfile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|profile| (profile.user_id.clone(), profile))
                .collect(),
        }
    }

    /// Every profile except `user_id`, ordered by id
    pub fn pool_for(&self, user_id: &str) -> Vec<UserProfile> {
        let mut pool: Vec<UserProfile> = self
            .profiles
            .values()
            .filter(|profile| profile.user_id != user_id)
            .cloned()
            .collect();
        pool.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        pool
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl ProfileSource for InMemoryProfiles {
    fn profile(&self, user_id: &str) -> Result<UserProfile, MatchError> {
        self.profiles
            .get(user_id)
            .cloned()
            .ok_or_else(|| MatchError::ProfileNotFound(user_id.to_string()))
    }
}

/// Decision ledger and history source held in process memory
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    decisions: RwLock<HashMap<(String, String), SwipeDecision>>,
    matches: RwLock<HashMap<PairKey, Match>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of matches recorded so far
    pub fn match_count(&self) -> Result<usize, MatchError> {
        Ok(self.matches.read().map_err(|_| poisoned("matches"))?.len())
    }

    /// All matches, ordered by pair key
    pub fn matches(&self) -> Result<Vec<Match>, MatchError> {
        let matches = self.matches.read().map_err(|_| poisoned("matches"))?;
        let mut all: Vec<Match> = matches.values().cloned().collect();
        all.sort_by(|a, b| a.pair_key().cmp(&b.pair_key()));
        Ok(all)
    }
}

impl DecisionLedger for InMemoryLedger {
    fn decision(
        &self,
        actor_id: &str,
        target_id: &str,
    ) -> Result<Option<SwipeDecision>, MatchError> {
        let decisions = self.decisions.read().map_err(|_| poisoned("decisions"))?;
        Ok(decisions
            .get(&(actor_id.to_string(), target_id.to_string()))
            .cloned())
    }

    fn find_match(&self, key: &PairKey) -> Result<Option<Match>, MatchError> {
        let matches = self.matches.read().map_err(|_| poisoned("matches"))?;
        Ok(matches.get(key).cloned())
    }

    fn store_decision(&self, decision: &SwipeDecision) -> Result<(), MatchError> {
        let mut decisions = self.decisions.write().map_err(|_| poisoned("decisions"))?;
        decisions.insert(
            (decision.actor_id.clone(), decision.target_id.clone()),
            decision.clone(),
        );
        Ok(())
    }

    fn store_match(&self, record: &Match) -> Result<(), MatchError> {
        let mut matches = self.matches.write().map_err(|_| poisoned("matches"))?;
        matches
            .entry(record.pair_key())
            .or_insert_with(|| record.clone());
        Ok(())
    }

    fn remove_decision(&self, actor_id: &str, target_id: &str) -> Result<bool, MatchError> {
        let mut decisions = self.decisions.write().map_err(|_| poisoned("decisions"))?;
        Ok(decisions
            .remove(&(actor_id.to_string(), target_id.to_string()))
            .is_some())
    }
}

impl DecisionHistorySource for InMemoryLedger {
    fn history_for(&self, user_id: &str) -> Result<DecisionHistory, MatchError> {
        let mut decisions: Vec<SwipeDecision> = {
            let decisions = self.decisions.read().map_err(|_| poisoned("decisions"))?;
            decisions
                .values()
                .filter(|d| d.actor_id == user_id || d.target_id == user_id)
                .cloned()
                .collect()
        };
        decisions.sort_by(|a, b| {
            a.decided_at
                .cmp(&b.decided_at)
                .then_with(|| a.actor_id.cmp(&b.actor_id))
                .then_with(|| a.target_id.cmp(&b.target_id))
        });

        let matches = {
            let matches = self.matches.read().map_err(|_| poisoned("matches"))?;
            matches
                .values()
                .filter(|m| m.involves(user_id))
                .cloned()
                .collect()
        };

        Ok(DecisionHistory::new(decisions, matches))
    }
}
