use crate::core::locks::PairLocks;
use crate::error::MatchError;
use crate::models::{DecisionOutcome, Match, PairKey, PairState, SwipeDecision};
use crate::services::DecisionLedger;

/// Records swipe decisions and turns mutual likes into matches
///
/// State per unordered pair:
/// `NoInteraction -> OneSidedLike -> Matched`, or `NoInteraction -> Declined`,
/// with `Declined -> OneSidedLike` on a fresh like. Every read-check-write for
/// a pair happens under that pair's lock, so two racing likes create exactly
/// one match.
pub struct SwipeEngine<L> {
    ledger: L,
    locks: PairLocks,
}

impl<L: DecisionLedger> SwipeEngine<L> {
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            locks: PairLocks::new(),
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Record `actor_id`'s decision on `target_id`
    ///
    /// A like looks up the reciprocal decision and forms a match when it is
    /// also a like; a decline never consults it. Once a pair is matched,
    /// repeating the like returns the existing match and a decline fails with
    /// `MatchError::StaleDecision`.
    pub fn record_decision(
        &self,
        actor_id: &str,
        target_id: &str,
        liked: bool,
    ) -> Result<DecisionOutcome, MatchError> {
        if actor_id == target_id {
            return Err(MatchError::SelfDecision(actor_id.to_string()));
        }

        let key = PairKey::new(actor_id, target_id);
        self.locks.with_pair(&key, || -> Result<DecisionOutcome, MatchError> {
            if let Some(existing) = self.ledger.find_match(&key)? {
                return self.revisit_matched(actor_id, target_id, liked, existing);
            }

            let decision = SwipeDecision::new(actor_id, target_id, liked);
            self.ledger.store_decision(&decision)?;

            if !liked {
                tracing::debug!("Recorded decline: {} -> {}", actor_id, target_id);
                return Ok(DecisionOutcome::Recorded { decision });
            }

            match self.ledger.decision(target_id, actor_id)? {
                Some(reciprocal) if reciprocal.liked => {
                    let match_record = Match::new(&key);
                    self.ledger.store_match(&match_record)?;
                    // Re-read so a ledger that already held a match wins
                    let match_record = self.ledger.find_match(&key)?.unwrap_or(match_record);

                    tracing::info!(
                        "Match formed for {} (match {})",
                        key,
                        match_record.match_id
                    );
                    Ok(DecisionOutcome::RecordedAndMatched {
                        decision,
                        match_record,
                    })
                }
                _ => {
                    tracing::debug!("Recorded like: {} -> {}", actor_id, target_id);
                    Ok(DecisionOutcome::Recorded { decision })
                }
            }
        })
    }

    fn revisit_matched(
        &self,
        actor_id: &str,
        target_id: &str,
        liked: bool,
        existing: Match,
    ) -> Result<DecisionOutcome, MatchError> {
        if !liked {
            tracing::warn!(
                "Rejected stale decline {} -> {}: pair already matched ({})",
                actor_id,
                target_id,
                existing.match_id
            );
            return Err(MatchError::StaleDecision {
                actor_id: actor_id.to_string(),
                target_id: target_id.to_string(),
            });
        }

        let decision = match self.ledger.decision(actor_id, target_id)? {
            Some(decision) if decision.liked => decision,
            _ => {
                let decision = SwipeDecision::new(actor_id, target_id, true);
                self.ledger.store_decision(&decision)?;
                decision
            }
        };

        Ok(DecisionOutcome::RecordedAndMatched {
            decision,
            match_record: existing,
        })
    }

    /// Withdraw `actor_id`'s current decision on `target_id`
    ///
    /// Returns whether a decision was removed. Matched pairs cannot be undone
    /// here; unmatching belongs to the serving layer.
    pub fn undo_decision(&self, actor_id: &str, target_id: &str) -> Result<bool, MatchError> {
        if actor_id == target_id {
            return Err(MatchError::SelfDecision(actor_id.to_string()));
        }

        let key = PairKey::new(actor_id, target_id);
        self.locks.with_pair(&key, || -> Result<bool, MatchError> {
            if self.ledger.find_match(&key)?.is_some() {
                return Err(MatchError::StaleDecision {
                    actor_id: actor_id.to_string(),
                    target_id: target_id.to_string(),
                });
            }

            let removed = self.ledger.remove_decision(actor_id, target_id)?;
            tracing::debug!("Undo {} -> {}: removed={}", actor_id, target_id, removed);
            Ok(removed)
        })
    }

    /// Current state of the pair `{a, b}`
    pub fn pair_state(&self, a: &str, b: &str) -> Result<PairState, MatchError> {
        let key = PairKey::new(a, b);
        self.locks.with_pair(&key, || -> Result<PairState, MatchError> {
            if let Some(match_record) = self.ledger.find_match(&key)? {
                return Ok(PairState::Matched { match_record });
            }

            let mut liked_by = Vec::new();
            let mut declined_by = Vec::new();
            for (actor, target) in [(key.low(), key.high()), (key.high(), key.low())] {
                match self.ledger.decision(actor, target)? {
                    Some(decision) if decision.liked => liked_by.push(actor.to_string()),
                    Some(_) => declined_by.push(actor.to_string()),
                    None => {}
                }
            }

            Ok(if !declined_by.is_empty() {
                PairState::Declined { declined_by }
            } else if !liked_by.is_empty() {
                PairState::OneSidedLike { liked_by }
            } else {
                PairState::NoInteraction
            })
        })
    }
}
