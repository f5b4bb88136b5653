use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::tuning::INITIAL_PAGE;

/// Request for one page of a user's discovery feed
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FeedRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(range(min = 1))]
    #[serde(default = "default_page")]
    pub page: u32,
    #[validate(range(min = 1))]
    #[serde(alias = "page_size", rename = "pageSize", default)]
    pub page_size: Option<usize>,
}

fn default_page() -> u32 {
    INITIAL_PAGE
}

/// Request to record a swipe decision
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DecisionRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "actor_id", rename = "actorId")]
    pub actor_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "target_id", rename = "targetId")]
    pub target_id: String,
    pub liked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_request_defaults_to_first_page() {
        let req: FeedRequest = serde_json::from_str(r#"{"userId": "u1"}"#).unwrap();
        assert_eq!(req.page, 1);
        assert!(req.page_size.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_feed_request_rejects_zero_page() {
        let req: FeedRequest =
            serde_json::from_str(r#"{"userId": "u1", "page": 0, "pageSize": 10}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_decision_request_requires_ids() {
        let req = DecisionRequest {
            actor_id: String::new(),
            target_id: "u2".to_string(),
            liked: true,
        };
        assert!(req.validate().is_err());
    }
}
