// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod locks;
pub mod ranker;
pub mod scoring;
pub mod swipe;

pub use distance::{calculate_bounding_box, haversine_distance, is_within_bounding_box, profile_distance};
pub use filters::{exclusion_reason, is_eligible, is_within_radius, Exclusion};
pub use locks::PairLocks;
pub use ranker::CandidateRanker;
pub use scoring::{calculate_compatibility, validate_requester};
pub use swipe::SwipeEngine;
