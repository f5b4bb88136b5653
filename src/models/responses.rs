use serde::{Deserialize, Serialize};

use crate::error::MatchError;
use crate::models::domain::{DecisionOutcome, Match};

/// Flattened view of a decision outcome for the serving layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionResponse {
    #[serde(rename = "actorId")]
    pub actor_id: String,
    #[serde(rename = "targetId")]
    pub target_id: String,
    pub liked: bool,
    pub matched: bool,
    #[serde(rename = "match")]
    pub match_record: Option<Match>,
}

impl From<DecisionOutcome> for DecisionResponse {
    fn from(outcome: DecisionOutcome) -> Self {
        let match_record = outcome.match_record().cloned();
        let decision = outcome.decision();
        Self {
            actor_id: decision.actor_id.clone(),
            target_id: decision.target_id.clone(),
            liked: decision.liked,
            matched: match_record.is_some(),
            match_record,
        }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub retryable: bool,
}

impl From<&MatchError> for ErrorResponse {
    fn from(err: &MatchError) -> Self {
        let error = match err {
            MatchError::InvalidProfile { .. } => "invalid_profile",
            MatchError::InvalidConfiguration(_) => "invalid_configuration",
            MatchError::InvalidPage { .. } => "invalid_page",
            MatchError::ProfileNotFound(_) => "profile_not_found",
            MatchError::StaleDecision { .. } => "stale_decision",
            MatchError::SelfDecision(_) => "self_decision",
            MatchError::Storage(_) => "storage",
        };

        Self {
            error: error.to_string(),
            message: err.to_string(),
            retryable: err.is_transient(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::{PairKey, SwipeDecision};

    #[test]
    fn test_decision_response_from_match() {
        let outcome = DecisionOutcome::RecordedAndMatched {
            decision: SwipeDecision::new("b", "a", true),
            match_record: Match::new(&PairKey::new("a", "b")),
        };

        let response = DecisionResponse::from(outcome);
        assert!(response.matched);
        assert_eq!(response.actor_id, "b");
        assert_eq!(response.match_record.unwrap().user_a, "a");
    }

    #[test]
    fn test_error_response_codes() {
        let err = MatchError::StaleDecision {
            actor_id: "a".to_string(),
            target_id: "b".to_string(),
        };
        let response = ErrorResponse::from(&err);
        assert_eq!(response.error, "stale_decision");
        assert!(!response.retryable);
    }
}
