use std::sync::Arc;

use crate::error::MatchError;
use crate::models::{DecisionHistory, Match, PairKey, SwipeDecision, UserProfile};

/// Read-only profile lookup supplied by the data layer
///
/// Any `Fn(&str) -> Result<UserProfile, MatchError>` closure implements it.
pub trait ProfileSource: Send + Sync {
    /// Fetch a profile, failing with `MatchError::ProfileNotFound` on a miss
    fn profile(&self, user_id: &str) -> Result<UserProfile, MatchError>;
}

impl<F> ProfileSource for F
where
    F: Fn(&str) -> Result<UserProfile, MatchError> + Send + Sync,
{
    fn profile(&self, user_id: &str) -> Result<UserProfile, MatchError> {
        self(user_id)
    }
}

/// Read-only snapshot of the decisions and matches involving a user
pub trait DecisionHistorySource: Send + Sync {
    fn history_for(&self, user_id: &str) -> Result<DecisionHistory, MatchError>;
}

impl<T: DecisionHistorySource + ?Sized> DecisionHistorySource for Arc<T> {
    fn history_for(&self, user_id: &str) -> Result<DecisionHistory, MatchError> {
        (**self).history_for(user_id)
    }
}

/// Keyed store the swipe engine applies its results through
///
/// Holds the current decision per ordered pair and at most one match per
/// pair key. Callers serialize access per pair, so implementations only need
/// to be safe for concurrent calls on disjoint pairs.
pub trait DecisionLedger: Send + Sync {
    /// Current decision of `actor_id` on `target_id`
    fn decision(&self, actor_id: &str, target_id: &str)
        -> Result<Option<SwipeDecision>, MatchError>;

    fn find_match(&self, key: &PairKey) -> Result<Option<Match>, MatchError>;

    /// Insert or overwrite the decision for its ordered pair
    fn store_decision(&self, decision: &SwipeDecision) -> Result<(), MatchError>;

    /// Insert a match; a second match for the same pair key is a no-op
    fn store_match(&self, record: &Match) -> Result<(), MatchError>;

    /// Remove the current decision, returning whether one existed
    fn remove_decision(&self, actor_id: &str, target_id: &str) -> Result<bool, MatchError>;
}

impl<T: DecisionLedger + ?Sized> DecisionLedger for Arc<T> {
    fn decision(
        &self,
        actor_id: &str,
        target_id: &str,
    ) -> Result<Option<SwipeDecision>, MatchError> {
        (**self).decision(actor_id, target_id)
    }

    fn find_match(&self, key: &PairKey) -> Result<Option<Match>, MatchError> {
        (**self).find_match(key)
    }

    fn store_decision(&self, decision: &SwipeDecision) -> Result<(), MatchError> {
        (**self).store_decision(decision)
    }

    fn store_match(&self, record: &Match) -> Result<(), MatchError> {
        (**self).store_match(record)
    }

    fn remove_decision(&self, actor_id: &str, target_id: &str) -> Result<bool, MatchError> {
        (**self).remove_decision(actor_id, target_id)
    }
}
