use rayon::prelude::*;
use std::cmp::Ordering;

use crate::core::{
    filters::exclusion_reason,
    scoring::{calculate_compatibility, validate_requester},
};
use crate::error::MatchError;
use crate::models::{
    CompatibilityScore, DecisionHistory, FeedPage, MatchingConfig, RankedCandidate, UserProfile,
};

/// Builds ranked, paginated discovery feeds
///
/// # Pipeline Stages
/// 1. Eligibility filtering (self, radius, prior decisions, matches)
/// 2. Compatibility scoring, fanned out across threads for large pools
/// 3. Total ordering: score desc, distance asc, candidate id asc
/// 4. Pagination
#[derive(Debug, Clone)]
pub struct CandidateRanker {
    config: MatchingConfig,
}

impl CandidateRanker {
    /// Build a ranker, validating the configuration once
    pub fn new(config: MatchingConfig) -> Result<Self, MatchError> {
        Ok(Self {
            config: config.validated()?,
        })
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Score one candidate for diagnostics and explainability
    pub fn score(
        &self,
        user: &UserProfile,
        candidate: &UserProfile,
    ) -> Result<CompatibilityScore, MatchError> {
        validate_requester(user, &self.config)?;
        calculate_compatibility(user, candidate, &self.config)
    }

    /// Ranked slice `[(page-1)*page_size, page*page_size)` of the eligible pool
    pub fn rank(
        &self,
        user: &UserProfile,
        pool: &[UserProfile],
        history: &DecisionHistory,
        page: u32,
        page_size: usize,
    ) -> Result<Vec<RankedCandidate>, MatchError> {
        Ok(self.rank_page(user, pool, history, page, page_size)?.candidates)
    }

    /// Same as [`CandidateRanker::rank`], with paging metadata
    ///
    /// The user's radius is re-read on every call, so paging across a radius
    /// change may skip or repeat candidates.
    pub fn rank_page(
        &self,
        user: &UserProfile,
        pool: &[UserProfile],
        history: &DecisionHistory,
        page: u32,
        page_size: usize,
    ) -> Result<FeedPage, MatchError> {
        if page < 1 || page_size == 0 {
            return Err(MatchError::InvalidPage { page, page_size });
        }
        validate_requester(user, &self.config)?;

        let eligible: Vec<&UserProfile> = pool
            .iter()
            .filter(|candidate| match exclusion_reason(user, candidate, history) {
                Some(reason) => {
                    tracing::debug!(
                        "Excluding {} from feed of {}: {:?}",
                        candidate.user_id,
                        user.user_id,
                        reason
                    );
                    false
                }
                None => true,
            })
            .collect();

        let mut scored = self.score_all(user, &eligible)?;
        scored.sort_by(compare_ranked);

        let total_eligible = scored.len();
        let start = (page as usize - 1).saturating_mul(page_size);
        let end = start.saturating_add(page_size).min(total_eligible);

        let candidates: Vec<RankedCandidate> = if start >= total_eligible {
            Vec::new()
        } else {
            scored.drain(start..end).map(RankedCandidate::from).collect()
        };

        tracing::debug!(
            "Ranked {} of {} candidates for {} (page {}, size {}, {} eligible)",
            candidates.len(),
            pool.len(),
            user.user_id,
            page,
            page_size,
            total_eligible
        );

        Ok(FeedPage {
            candidates,
            page,
            page_size,
            total_eligible,
            has_more: end < total_eligible,
        })
    }

    fn score_all(
        &self,
        user: &UserProfile,
        eligible: &[&UserProfile],
    ) -> Result<Vec<CompatibilityScore>, MatchError> {
        if eligible.len() >= self.config.parallel_threshold {
            eligible
                .par_iter()
                .map(|candidate| calculate_compatibility(user, candidate, &self.config))
                .collect()
        } else {
            eligible
                .iter()
                .map(|candidate| calculate_compatibility(user, candidate, &self.config))
                .collect()
        }
    }
}

/// Total order for feed entries: score descending, then distance ascending,
/// then candidate id ascending
fn compare_ranked(a: &CompatibilityScore, b: &CompatibilityScore) -> Ordering {
    b.composite_score
        .total_cmp(&a.composite_score)
        .then_with(|| a.distance_km.total_cmp(&b.distance_km))
        .then_with(|| a.candidate_id.cmp(&b.candidate_id))
}
