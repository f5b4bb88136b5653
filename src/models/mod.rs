// Model exports
pub mod domain;
pub mod requests;
pub mod responses;
pub mod tuning;

pub use domain::{
    AvailabilitySlot, BoundingBox, CompatibilityScore, DecisionHistory, DecisionOutcome, FeedPage,
    Match, PairKey, PairState, RankedCandidate, SkillLevel, SwipeDecision, TimeSlot, UserProfile,
};
pub use requests::{DecisionRequest, FeedRequest};
pub use responses::{DecisionResponse, ErrorResponse};
pub use tuning::{MatchingConfig, ScoringWeights, INITIAL_PAGE, WEIGHT_SUM_TOLERANCE};
