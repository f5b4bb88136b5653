//! PairPlay - discovery and matching engine for a sports partner app
//!
//! Filters a candidate pool by radius and prior decisions, scores each
//! candidate on sport level, availability and distance, serves a ranked,
//! paginated feed, and turns mutual likes into matches exactly once per pair.

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use self::core::{haversine_distance, CandidateRanker, SwipeEngine};
pub use engine::DiscoveryEngine;
pub use error::MatchError;
pub use models::{
    CompatibilityScore, DecisionHistory, DecisionOutcome, FeedPage, Match, MatchingConfig,
    PairState, RankedCandidate, SkillLevel, SwipeDecision, UserProfile,
};
pub use services::{DecisionHistorySource, DecisionLedger, InMemoryLedger, InMemoryProfiles, ProfileSource};
