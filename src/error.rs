use thiserror::Error;

/// Errors surfaced by the discovery and matching core
///
/// Every variant is a synchronous, non-transient failure except
/// `ProfileNotFound` and `Storage`, which come from collaborators and may
/// be worth retrying by the serving layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("Invalid profile {user_id}: {reason}")]
    InvalidProfile { user_id: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid page: page={page}, page_size={page_size}")]
    InvalidPage { page: u32, page_size: usize },

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Stale decision: {actor_id} -> {target_id} contradicts a confirmed match")]
    StaleDecision { actor_id: String, target_id: String },

    #[error("User {0} cannot decide on themselves")]
    SelfDecision(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl MatchError {
    pub(crate) fn invalid_profile(user_id: &str, reason: impl Into<String>) -> Self {
        MatchError::InvalidProfile {
            user_id: user_id.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the serving layer may reasonably retry the call
    pub fn is_transient(&self) -> bool {
        matches!(self, MatchError::ProfileNotFound(_) | MatchError::Storage(_))
    }
}
