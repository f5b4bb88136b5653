use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;
use validator::Validate;

/// Self-reported skill level for a sport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    /// Highest ordinal, used to normalize level differences
    pub const MAX_ORDINAL: u8 = 3;

    #[inline]
    pub fn ordinal(self) -> u8 {
        match self {
            SkillLevel::Beginner => 0,
            SkillLevel::Intermediate => 1,
            SkillLevel::Advanced => 2,
            SkillLevel::Expert => 3,
        }
    }
}

/// Coarse part of the day a user is free to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
    Night,
}

/// One weekly availability window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub day: Weekday,
    pub slot: TimeSlot,
}

impl AvailabilitySlot {
    pub fn new(day: Weekday, slot: TimeSlot) -> Self {
        Self { day, slot }
    }
}

/// User profile with sports, availability and location data
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserProfile {
    #[validate(length(min = 1))]
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Sport id to the user's level in it
    #[serde(default)]
    pub sports: BTreeMap<String, SkillLevel>,
    #[serde(default)]
    pub availability: HashSet<AvailabilitySlot>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    /// Zero means unset; the engine substitutes the configured default
    #[serde(rename = "searchRadiusKm", default)]
    pub search_radius_km: u16,
}

impl UserProfile {
    /// A profile without any sport can never be scored
    pub fn is_matchable(&self) -> bool {
        !self.sports.is_empty()
    }
}

/// One user's decision on another, as shown in a swipe feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeDecision {
    #[serde(rename = "actorId")]
    pub actor_id: String,
    #[serde(rename = "targetId")]
    pub target_id: String,
    pub liked: bool,
    #[serde(rename = "decidedAt")]
    pub decided_at: DateTime<Utc>,
}

impl SwipeDecision {
    pub fn new(actor_id: &str, target_id: &str, liked: bool) -> Self {
        Self {
            actor_id: actor_id.to_string(),
            target_id: target_id.to_string(),
            liked,
            decided_at: Utc::now(),
        }
    }
}

/// Canonical unordered identifier for a pair of users
///
/// `PairKey::new("b", "a") == PairKey::new("a", "b")`; the lexically smaller
/// id is always stored first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    low: String,
    high: String,
}

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self { low: a.to_string(), high: b.to_string() }
        } else {
            Self { low: b.to_string(), high: a.to_string() }
        }
    }

    pub fn low(&self) -> &str {
        &self.low
    }

    pub fn high(&self) -> &str {
        &self.high
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.low == user_id || self.high == user_id
    }
}

impl std::fmt::Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.low, self.high)
    }
}

/// Confirmed mutual match between two users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    #[serde(rename = "matchId")]
    pub match_id: Uuid,
    #[serde(rename = "userA")]
    pub user_a: String,
    #[serde(rename = "userB")]
    pub user_b: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn new(key: &PairKey) -> Self {
        Self {
            match_id: Uuid::new_v4(),
            user_a: key.low().to_string(),
            user_b: key.high().to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn pair_key(&self) -> PairKey {
        PairKey::new(&self.user_a, &self.user_b)
    }

    pub fn involves(&self, user_id: &str) -> bool {
        self.user_a == user_id || self.user_b == user_id
    }
}

/// Read-only snapshot of the decisions and matches involving one user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionHistory {
    #[serde(default)]
    pub decisions: Vec<SwipeDecision>,
    #[serde(default)]
    pub matches: Vec<Match>,
}

impl DecisionHistory {
    pub fn new(decisions: Vec<SwipeDecision>, matches: Vec<Match>) -> Self {
        Self { decisions, matches }
    }

    /// Latest decision for the ordered pair; older ones are stale
    ///
    /// On equal timestamps the entry appearing later in the snapshot wins.
    pub fn current_decision(&self, actor_id: &str, target_id: &str) -> Option<&SwipeDecision> {
        self.decisions
            .iter()
            .filter(|d| d.actor_id == actor_id && d.target_id == target_id)
            .max_by(|a, b| a.decided_at.cmp(&b.decided_at))
    }

    pub fn is_matched(&self, a: &str, b: &str) -> bool {
        let key = PairKey::new(a, b);
        self.matches.iter().any(|m| m.pair_key() == key)
    }
}

/// Compatibility breakdown between a requesting user and one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityScore {
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    #[serde(rename = "levelScore")]
    pub level_score: f64,
    #[serde(rename = "availabilityScore")]
    pub availability_score: f64,
    #[serde(rename = "distanceScore")]
    pub distance_score: f64,
    #[serde(rename = "compositeScore")]
    pub composite_score: f64,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
    #[serde(rename = "sharedSports")]
    pub shared_sports: Vec<String>,
}

/// One entry of a ranked feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    #[serde(rename = "compositeScore")]
    pub composite_score: f64,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
    #[serde(rename = "sharedSports")]
    pub shared_sports: Vec<String>,
}

impl From<CompatibilityScore> for RankedCandidate {
    fn from(score: CompatibilityScore) -> Self {
        Self {
            candidate_id: score.candidate_id,
            composite_score: score.composite_score,
            distance_km: score.distance_km,
            shared_sports: score.shared_sports,
        }
    }
}

/// One page of a ranked feed plus paging metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPage {
    pub candidates: Vec<RankedCandidate>,
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: usize,
    #[serde(rename = "totalEligible")]
    pub total_eligible: usize,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

/// Result of recording a swipe decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DecisionOutcome {
    Recorded {
        decision: SwipeDecision,
    },
    RecordedAndMatched {
        decision: SwipeDecision,
        #[serde(rename = "match")]
        match_record: Match,
    },
}

impl DecisionOutcome {
    pub fn decision(&self) -> &SwipeDecision {
        match self {
            DecisionOutcome::Recorded { decision } => decision,
            DecisionOutcome::RecordedAndMatched { decision, .. } => decision,
        }
    }

    pub fn match_record(&self) -> Option<&Match> {
        match self {
            DecisionOutcome::Recorded { .. } => None,
            DecisionOutcome::RecordedAndMatched { match_record, .. } => Some(match_record),
        }
    }
}

/// State of the swipe state machine for an unordered pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PairState {
    NoInteraction,
    OneSidedLike {
        #[serde(rename = "likedBy")]
        liked_by: Vec<String>,
    },
    Declined {
        #[serde(rename = "declinedBy")]
        declined_by: Vec<String>,
    },
    Matched {
        #[serde(rename = "match")]
        match_record: Match,
    },
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Whether the box stays inside valid coordinates without wrapping
    pub fn is_simple(&self) -> bool {
        self.min_lat.is_finite()
            && self.max_lat.is_finite()
            && self.min_lon.is_finite()
            && self.max_lon.is_finite()
            && self.min_lat >= -90.0
            && self.max_lat <= 90.0
            && self.min_lon >= -180.0
            && self.max_lon <= 180.0
    }
}
