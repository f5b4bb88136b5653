use crate::error::MatchError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// Maximum allowed deviation of the weight sum from 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// First page of a feed; pages are 1-based
pub const INITIAL_PAGE: u32 = 1;

/// Scoring weights for the three compatibility sub-scores
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub level_similarity: f64,
    pub availability_overlap: f64,
    pub distance_proximity: f64,
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.level_similarity + self.availability_overlap + self.distance_proximity
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            level_similarity: 0.4,
            availability_overlap: 0.3,
            distance_proximity: 0.3,
        }
    }
}

/// Tuning for the discovery and matching core
///
/// Validated once when an engine is built and never mutated afterwards;
/// rebuild the engine to reconfigure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_consistency"))]
pub struct MatchingConfig {
    #[validate(range(min = 0.0, max = 1.0))]
    pub weight_level_similarity: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub weight_availability_overlap: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub weight_distance_proximity: f64,
    /// Ordinal gap above which a shared sport scores zero
    #[validate(range(max = 3))]
    pub max_level_difference: u8,
    #[validate(range(min = 1))]
    pub default_radius_km: u16,
    #[validate(range(min = 1))]
    pub min_radius_km: u16,
    #[validate(range(min = 1))]
    pub max_radius_km: u16,
    #[validate(range(min = 1))]
    pub page_size: usize,
    /// Eligible pool size from which scoring fans out across threads
    #[validate(range(min = 1))]
    pub parallel_threshold: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        let weights = ScoringWeights::default();
        Self {
            weight_level_similarity: weights.level_similarity,
            weight_availability_overlap: weights.availability_overlap,
            weight_distance_proximity: weights.distance_proximity,
            max_level_difference: 1,
            default_radius_km: 10,
            min_radius_km: 5,
            max_radius_km: 50,
            page_size: 20,
            parallel_threshold: 256,
        }
    }
}

impl MatchingConfig {
    pub fn weights(&self) -> ScoringWeights {
        ScoringWeights {
            level_similarity: self.weight_level_similarity,
            availability_overlap: self.weight_availability_overlap,
            distance_proximity: self.weight_distance_proximity,
        }
    }

    /// Validate and return the configuration, failing fast on any inconsistency
    pub fn validated(self) -> Result<Self, MatchError> {
        self.validate()
            .map_err(|errors| MatchError::InvalidConfiguration(errors.to_string()))?;
        Ok(self)
    }

    /// The radius to search with, substituting the default for an unset (zero) one
    pub fn effective_radius(&self, radius_km: u16) -> u16 {
        if radius_km == 0 {
            self.default_radius_km
        } else {
            radius_km
        }
    }

    /// Whether a search radius lies inside the configured bounds
    pub fn accepts_radius(&self, radius_km: u16) -> bool {
        (self.min_radius_km..=self.max_radius_km).contains(&radius_km)
    }
}

fn validate_consistency(config: &MatchingConfig) -> Result<(), ValidationError> {
    let weights = config.weights();
    let each = [
        weights.level_similarity,
        weights.availability_overlap,
        weights.distance_proximity,
    ];
    // Range checks pass NaN through, so finiteness is checked here
    if !each.iter().all(|w| w.is_finite()) {
        let mut err = ValidationError::new("weight_not_finite");
        err.message = Some(Cow::from("scoring weights must be finite numbers"));
        return Err(err);
    }

    let sum = weights.sum();
    if !((sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE) {
        let mut err = ValidationError::new("weight_sum");
        err.message = Some(Cow::from(format!("scoring weights must sum to 1.0, got {sum}")));
        return Err(err);
    }

    if !(config.min_radius_km <= config.default_radius_km
        && config.default_radius_km <= config.max_radius_km)
    {
        let mut err = ValidationError::new("radius_bounds");
        err.message = Some(Cow::from(format!(
            "radius bounds must satisfy min <= default <= max, got {} <= {} <= {}",
            config.min_radius_km, config.default_radius_km, config.max_radius_km
        )));
        return Err(err);
    }

    Ok(())
}
